//! Elapsed-time cadence timers
//!
//! Timers accumulate the loop's measured `dt` in microseconds and are
//! compared against a fixed period. They never read a clock themselves.

/// Microsecond accumulator with a fixed period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_us: u32,
    elapsed_us: u32,
}

impl Interval {
    /// Timer that becomes due after one full period
    pub const fn new(period_us: u32) -> Self {
        Self {
            period_us,
            elapsed_us: 0,
        }
    }

    /// Timer that is due immediately
    pub const fn due(period_us: u32) -> Self {
        Self {
            period_us,
            elapsed_us: period_us,
        }
    }

    pub fn elapsed_us(&self) -> u32 {
        self.elapsed_us
    }

    /// Add elapsed time
    pub fn accumulate(&mut self, delta_us: u32) {
        self.elapsed_us = self.elapsed_us.saturating_add(delta_us);
    }

    /// Check if a full period has elapsed
    pub fn is_due(&self) -> bool {
        self.elapsed_us >= self.period_us
    }

    /// Start a new period
    pub fn reset(&mut self) {
        self.elapsed_us = 0;
    }

    /// Accumulate and, if due, reset and return `true`
    pub fn tick(&mut self, delta_us: u32) -> bool {
        self.accumulate(delta_us);
        if self.is_due() {
            self.reset();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_fires_once_per_period() {
        let mut interval = Interval::new(1000);
        assert!(!interval.tick(400));
        assert!(!interval.tick(400));
        assert!(interval.tick(400));
        assert_eq!(interval.elapsed_us(), 0);
    }

    #[test]
    fn test_due_starts_full() {
        let mut interval = Interval::due(1000);
        assert!(interval.is_due());
        assert!(interval.tick(0));
        assert!(!interval.is_due());
    }

    #[test]
    fn test_accumulate_without_reset() {
        let mut interval = Interval::new(100);
        interval.accumulate(150);
        assert!(interval.is_due());
        interval.accumulate(10);
        assert_eq!(interval.elapsed_us(), 160);
        interval.reset();
        assert!(!interval.is_due());
    }

    #[test]
    fn test_saturates() {
        let mut interval = Interval::new(100);
        interval.accumulate(u32::MAX);
        interval.accumulate(u32::MAX);
        assert_eq!(interval.elapsed_us(), u32::MAX);
    }
}
