//! serial channel
//! 
//! TX/RX channel

use std::sync::mpsc;
use std::sync::Arc;

use crate::sim;
use crate::sim::Clock;

use super::logger::ChannelLogger;

/// serial channel events
#[derive(Clone, Copy, PartialEq, Eq, std::fmt::Debug)]
pub enum Event {
    /// indicates the start of a new serial transaction
    Start(sim::Time),
    /// bytes sent via serial
    Data(u8),
}

/// serial channel for tx/rx between 2 devices
/// that sends/receives bytes only
/// 
/// ignoring flow control (RTS/CTS)
pub struct Channel {
    clock: Arc<Clock>,
    devices: (Option<mpsc::Sender<Event>>, Option<mpsc::Sender<Event>>),
    logger: Option<mpsc::Sender<Event>>,
}

impl Channel {
    /// create new serial channel with provided clock as time source
    pub fn new_with(clock: Arc<Clock>) -> Self {
        Self {
            clock,
            devices: (None, None),
            logger: None,
        }
    }

    /// get shared reference to channel's clock
    pub fn clock(&self) -> &Clock {
        self.clock.as_ref()
    }

    fn device(&self, id: usize) -> Result<&mpsc::Sender<Event>, super::Error> {
        let device = match id {
            0 => &self.devices.0,
            1 => &self.devices.1,
            _ => &None,
        };
        device
            .as_ref()
            .ok_or_else(|| super::Error::disconnected("serial", format!("device {id}")))
    }

    fn send(&self, id: usize, event: Event) -> Result<(), sim::Error> {
        self.device(id)?
            .send(event)
            .map_err(|err| super::Error::emit("serial", err))?;
        if let Some(logger) = self.logger.as_ref() {
            logger.send(event).map_err(|err| super::Error::emit("serial", err))?;
        }
        Ok(())
    }

    /// mark the start of a transaction to device `id`
    pub fn start(&self, id: usize) -> Result<(), sim::Error> {
        self.send(id, Event::Start(self.clock.ticks_elapsed()))
    }

    /// send bytes to device `id` without starting a new transaction
    pub fn send_bytes(&self, id: usize, data: &[u8]) -> Result<(), sim::Error> {
        for byte in data.iter() {
            self.send(id, Event::Data(*byte))?;
        }
        Ok(())
    }

    /// emit a complete transaction to device `id`
    pub fn emit(&self, id: usize, data: &[u8]) -> Result<(), sim::Error> {
        self.start(id)?;
        self.send_bytes(id, data)
    }

    /// add a receiver by registering a mspc::Sender
    /// and returning a mpsc::Receiver
    pub fn receiver(&mut self) -> Option<(usize, mpsc::Receiver<Event>)> {
        let (tx, rx) = mpsc::channel();

        if self.devices.0.is_none() {
            self.devices.0 = Some(tx);
            Some((0, rx))
        } else if self.devices.1.is_none() {
            self.devices.1 = Some(tx);
            Some((1, rx))
        } else {
            None
        }
    }

    /// create a channel logger
    /// 
    /// only one logger may be attached at a time
    pub fn get_logger(&mut self) -> Option<ChannelLogger<Event>> {
        if self.logger.is_none() {
            let (tx, rx) = mpsc::channel();
            self.logger = Some(tx);
            Some(ChannelLogger::new_with(rx))
        } else {
            None
        }
    }
}

/// collect the data bytes of a slice of serial events as text
pub fn text(events: &[Event]) -> String {
    let bytes = events
        .iter()
        .filter_map(|event| match event {
            Event::Data(byte) => Some(*byte),
            Event::Start(_) => None,
        })
        .collect::<Vec<_>>();
    String::from_utf8_lossy(&bytes).into_owned()
}
