//! real time counter
//! 
//! counts clock ticks up to a compare value, raises its expired flag and
//! starts over. the flag stays raised until it is cleared.

use crate::sim;
use crate::sim::traits::Timed;

#[derive(Debug, Clone)]
pub struct Rtc {
    period: u64,
    remaining: u64,
    expired: bool,
}

impl Rtc {
    pub fn new(period: u64) -> Self {
        Self {
            period,
            remaining: period,
            expired: false,
        }
    }

    /// compare value in clock ticks
    pub fn period(&self) -> u64 {
        self.period
    }

    /// load a new compare value and restart the count
    pub fn set_compare(&mut self, period: u64) {
        self.period = period;
        self.remaining = period;
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn clear(&mut self) {
        self.expired = false;
    }
}

impl Timed for Rtc {
    fn countdown(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn timed_out(&self) -> bool {
        self.remaining == 0
    }

    fn timeout_handler(&mut self) -> Result<(), sim::Error> {
        self.expired = true;
        self.remaining = self.period;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(rtc: &mut Rtc, cycles: usize) -> Result<usize, sim::Error> {
        let mut expiries = 0;
        for _ in 0..cycles {
            if rtc.timed_out() {
                rtc.timeout_handler()?;
            }
            if rtc.is_expired() {
                expiries += 1;
                rtc.clear();
            }
            rtc.countdown();
        }
        Ok(expiries)
    }

    #[test]
    fn test_rtc_period() -> Result<(), sim::Error> {
        let mut rtc = Rtc::new(4);
        assert_eq!(run(&mut rtc, 4)?, 0);
        assert_eq!(run(&mut rtc, 1)?, 1);
        assert_eq!(run(&mut rtc, 8)?, 2);

        rtc.set_compare(16);
        assert_eq!(rtc.period(), 16);
        assert_eq!(run(&mut rtc, 16)?, 0);
        assert_eq!(run(&mut rtc, 1)?, 1);
        Ok(())
    }
}
