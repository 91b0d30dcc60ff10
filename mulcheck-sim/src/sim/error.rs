//! simulation errors

use thiserror::Error;

use mulcheck_core::driver;

use super::channel;

#[derive(Error, Debug)]
pub enum Error {
    #[error("simulation time: {1} | driver error: {0}")]
    Driver(driver::Error, usize),
    #[error("simulation time: {0} | serial line down with a transfer pending")]
    Stalled(usize),
    #[error("clock error: {0}")]
    Clock(String),
    #[error(transparent)]
    Channel(#[from] channel::Error),
}
