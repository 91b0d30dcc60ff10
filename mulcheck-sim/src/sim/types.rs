//! simulation types
//! 
//! various types used across the simulation module

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::sim;

pub type Time = usize;

/// a simulation clock is a time source
/// 
/// shared between the board and every channel wired to it, so elapsed
/// time is kept atomically and advanced through a shared reference
#[derive(Debug)]
pub struct Clock {
    resolution: f64,
    elapsed: AtomicUsize,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// create a new clock (time source)
    pub fn new() -> Self {
        Self {
            resolution: sim::MIN_QUANT,
            elapsed: AtomicUsize::new(0),
        }
    }

    /// create a new clock with specified resolution in seconds
    /// 
    /// errors if resolution is lower than minimum
    pub fn new_with(resolution: f64) -> Result<Self, sim::Error> {
        if !(resolution >= sim::MIN_QUANT) {
            return Err(sim::Error::Clock(
                format!("failed to create clock with resolution {}", resolution)));
        }
        Ok(Self {
            resolution,
            elapsed: AtomicUsize::new(0),
        })
    }

    /// create a clock ticking at the given frequency
    pub fn from_hz(hz: u32) -> Result<Self, sim::Error> {
        if hz == 0 {
            return Err(sim::Error::Clock("clock frequency must be non-zero".into()));
        }
        Self::new_with(1.0 / hz as f64)
    }

    /// get clock resolution in seconds
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// get elapsed time in ticks since instantiation
    pub fn ticks_elapsed(&self) -> Time {
        self.elapsed.load(Ordering::Relaxed)
    }

    /// increment elapsed time by one
    pub fn tick(&self) {
        self.elapsed.fetch_add(1, Ordering::Relaxed);
    }

    /// increment elapsed time by n
    pub fn ticks(&self, n: Time) {
        self.elapsed.fetch_add(n, Ordering::Relaxed);
    }

    /// get elapsed time in virtual seconds
    pub fn elapsed_seconds(&self) -> f64 {
        (self.ticks_elapsed() as f64) * self.resolution
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clock() -> Result<(), sim::Error> {
        let clock = Clock::from_hz(1024)?;
        clock.tick();
        clock.ticks(1023);
        assert_eq!(clock.ticks_elapsed(), 1024);
        assert!((clock.elapsed_seconds() - 1.0).abs() < 1e-9);

        assert!(matches!(Clock::new_with(1e-9), Err(sim::Error::Clock(_))));
        assert!(matches!(Clock::from_hz(0), Err(sim::Error::Clock(_))));
        Ok(())
    }
}
