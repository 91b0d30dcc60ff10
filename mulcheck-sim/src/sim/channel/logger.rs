//! channel logger module

use std::sync::mpsc;

/// records every event a channel delivers to it
pub struct ChannelLogger<Event> {
    log: Vec<Event>,
    rx: mpsc::Receiver<Event>,
}

impl<Event> ChannelLogger<Event> {
    pub fn new_with(rx: mpsc::Receiver<Event>) -> Self {
        Self {
            log: Vec::new(),
            rx,
        }
    }

    /// everything collected so far
    pub fn log(&self) -> &[Event] {
        &self.log
    }

    /// move pending events into the log and return the ones just added
    pub fn collect_pending(&mut self) -> &[Event] {
        let start = self.log.len();
        self.log.extend(self.rx.try_iter());
        &self.log[start..]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_collect_pending_returns_new_events() {
        let (tx, rx) = mpsc::channel();
        let mut logger = ChannelLogger::new_with(rx);

        tx.send(1u8).unwrap();
        tx.send(2).unwrap();
        assert_eq!(logger.collect_pending(), &[1, 2]);

        tx.send(3).unwrap();
        assert_eq!(logger.collect_pending(), &[3]);
        assert!(logger.collect_pending().is_empty());
        assert_eq!(logger.log(), &[1, 2, 3]);
    }
}
