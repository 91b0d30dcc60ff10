//! channel module
//! 
//! implements channels with emitters/receivers of various kinds

use std::sync::mpsc;
use std::sync::Arc;

use crate::sim;
use crate::sim::Clock;

pub mod event;
pub use event::*;
pub mod error;
pub use error::Error;
pub mod logger;
pub use logger::ChannelLogger;
pub mod serial;

/// a broadcast channel
/// 
/// data/messages/transactions can be emitted and received on channels
/// 
/// receivers should be registered using a mspc::Sender
pub struct Channel<T: Clone + std::fmt::Debug> {
    clock: Arc<Clock>,
    receivers: Vec<mpsc::Sender<T>>,
}

impl<T: Clone + std::fmt::Debug> Channel<T> {
    /// create a new channel with the given clock as a time source
    pub fn new_with(clock: Arc<Clock>) -> Self {
        Self {
            clock,
            receivers: Vec::new(),
        }
    }

    /// get shared reference to channel's clock
    pub fn clock(&self) -> &Clock {
        self.clock.as_ref()
    }

    /// create a channel logger
    pub fn get_logger(&mut self) -> ChannelLogger<T> {
        ChannelLogger::new_with(self.receiver())
    }

    /// emit an event to all receivers
    pub fn emit(&self, data: &T) -> Result<(), sim::Error> {
        for tx in self.receivers.iter() {
            tx.send(data.clone()).map_err(|err| Error::emit("broadcast", err))?;
        }
        Ok(())
    }

    /// add a receiver by registering a mspc::Sender
    /// and returning a mpsc::Receiver
    pub fn receiver(&mut self) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel();
        self.receivers.push(tx);
        rx
    }
}
