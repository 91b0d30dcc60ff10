//! usart with dma transmit
//! 
//! the report sink renders a report and queues it on the dma; every clock
//! cycle the usart moves as many bytes onto the serial line as the baud
//! rate allows. a transfer is complete once the queue has drained.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;

use mulcheck_core::config::BoardConfig;
use mulcheck_core::report::{Report, ReportSink};

use crate::fmt;
use crate::sim;
use crate::sim::Clock;
use crate::sim::channel::{self, serial, ChannelLogger};
use crate::sim::traits::Clocked;

/// dma transmit state shared between the usart and its sink
#[derive(Debug, Default)]
struct Dma {
    pending: VecDeque<u8>,
    /// the next byte sent opens a new transaction
    starting: bool,
    connected: bool,
    /// bytes put on the line so far
    sent: u64,
}

pub struct Usart {
    channel: serial::Channel,
    host: Option<usize>,
    bytes_per_tick: usize,
    max_print_len: usize,
    dma: Arc<Mutex<Dma>>,
}

impl Usart {
    pub fn new_with(clock: Arc<Clock>, config: &BoardConfig) -> Self {
        Self {
            channel: serial::Channel::new_with(clock),
            host: None,
            bytes_per_tick: config.bytes_per_tick(),
            max_print_len: config.max_print_len,
            dma: Arc::new(Mutex::new(Dma::default())),
        }
    }

    /// connect the host end of the line
    /// 
    /// returns None if a host is already connected
    pub fn connect(&mut self) -> Option<mpsc::Receiver<serial::Event>> {
        if self.host.is_some() {
            return None;
        }
        let (id, rx) = self.channel.receiver()?;
        self.host = Some(id);
        self.dma.lock().connected = true;
        Some(rx)
    }

    /// take the line down or bring it back up
    /// 
    /// queued bytes stay queued while the line is down
    pub fn set_connected(&mut self, connected: bool) {
        self.dma.lock().connected = connected && self.host.is_some();
    }

    pub fn is_connected(&self) -> bool {
        self.dma.lock().connected
    }

    /// attach a logger that sees every event put on the line
    pub fn get_logger(&mut self) -> Option<ChannelLogger<serial::Event>> {
        self.channel.get_logger()
    }

    /// a report sink feeding this usart's dma
    pub fn sink(&self) -> SerialSink {
        SerialSink {
            dma: self.dma.clone(),
            max_print_len: self.max_print_len,
        }
    }

    pub fn is_tx_complete(&self) -> bool {
        self.dma.lock().pending.is_empty()
    }

    pub fn bytes_sent(&self) -> u64 {
        self.dma.lock().sent
    }
}

impl Clocked for Usart {
    fn step(&mut self) -> Result<(), sim::Error> {
        let Some(host) = self.host else {
            return Ok(());
        };

        let mut dma = self.dma.lock();
        if !dma.connected || dma.pending.is_empty() {
            return Ok(());
        }
        if dma.starting {
            self.channel.start(host)?;
            dma.starting = false;
        }

        let n = self.bytes_per_tick.min(dma.pending.len());
        let burst = dma.pending.drain(..n).collect::<Vec<_>>();
        self.channel.send_bytes(host, &burst)?;
        dma.sent += n as u64;
        Ok(())
    }
}

/// renders reports as text and queues them for transmission
#[derive(Clone)]
pub struct SerialSink {
    dma: Arc<Mutex<Dma>>,
    max_print_len: usize,
}

impl SerialSink {
    pub fn is_complete(&self) -> bool {
        self.dma.lock().pending.is_empty()
    }
}

impl ReportSink for SerialSink {
    type Error = channel::Error;

    fn emit_report(&mut self, report: &Report) -> Result<(), Self::Error> {
        let mut dma = self.dma.lock();
        if !dma.connected {
            return Err(channel::Error::disconnected("serial", "host"));
        }

        let mut text = fmt::render(report);
        fmt::truncate(&mut text, self.max_print_len);

        if dma.pending.is_empty() {
            dma.starting = true;
        }
        dma.pending.extend(text.into_bytes());
        Ok(())
    }
}
