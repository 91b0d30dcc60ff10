//! status led
//! 
//! a single gpio output driving a digital channel

use std::sync::Arc;

use crate::sim;
use crate::sim::Clock;
use crate::sim::channel::{Channel, ChannelLogger, Digital};

pub struct Led {
    level: bool,
    channel: Channel<Digital>,
}

impl Led {
    /// create an led, initially off
    pub fn new_with(clock: Arc<Clock>) -> Self {
        Self {
            level: false,
            channel: Channel::new_with(clock),
        }
    }

    pub fn is_on(&self) -> bool {
        self.level
    }

    /// attach a logger to the led's output
    pub fn get_logger(&mut self) -> ChannelLogger<Digital> {
        self.channel.get_logger()
    }

    pub fn toggle(&mut self) -> Result<(), sim::Error> {
        self.level = !self.level;
        let now = self.channel.clock().ticks_elapsed();
        let event = if self.level { Digital::Hi(now) } else { Digital::Lo(now) };
        self.channel.emit(&event)
    }
}
