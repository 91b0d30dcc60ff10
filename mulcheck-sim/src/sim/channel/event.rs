//! channel events

use crate::sim;

/// level changes on a digital line, stamped with the time they occur
#[derive(Clone, Copy, PartialEq, Eq, std::fmt::Debug)]
pub enum Digital {
    Hi(sim::Time),
    Lo(sim::Time),
}
