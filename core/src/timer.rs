use std::time::Instant;

use crate::constants::TICK_PERIOD;

/// Source of wall-clock time for the timers.
///
/// The machine only ever asks for "now", so tests can substitute a clock that
/// is advanced by hand.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The monotonic system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// # Timer
/// An 8-bit countdown that decays at 60Hz of elapsed real time, independent of
/// how fast instructions are executed.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    value: u8,
    last_tick: Instant,
}

impl Timer {
    pub fn new(now: Instant) -> Self {
        Timer {
            value: 0,
            last_tick: now,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Loads a new count; the next tick is a full period away.
    pub fn set(&mut self, value: u8, now: Instant) {
        self.value = value;
        self.last_tick = now;
    }

    /// Decrements by however many whole periods have elapsed since the last tick.
    ///
    /// Returns whether the value went down. While the timer is at 0 nothing
    /// happens and the last tick is left to drift.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.value == 0 {
            return false;
        }
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed < TICK_PERIOD {
            return false;
        }
        let periods = elapsed.as_micros() / TICK_PERIOD.as_micros();
        let periods = u8::try_from(periods).unwrap_or(u8::MAX);
        self.value = self.value.saturating_sub(periods);
        self.last_tick = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_value_within_a_period() {
        let start = Instant::now();
        let mut timer = Timer::new(start);
        timer.set(5, start);
        assert!(!timer.tick(start + TICK_PERIOD / 2));
        assert_eq!(timer.value(), 5);
    }

    #[test]
    fn test_decrements_once_per_period() {
        let start = Instant::now();
        let mut timer = Timer::new(start);
        timer.set(5, start);
        assert!(timer.tick(start + TICK_PERIOD));
        assert_eq!(timer.value(), 4);
    }

    #[test]
    fn test_catches_up_on_long_gaps() {
        let start = Instant::now();
        let mut timer = Timer::new(start);
        timer.set(10, start);
        assert!(timer.tick(start + TICK_PERIOD * 3 + TICK_PERIOD / 2));
        assert_eq!(timer.value(), 7);
    }

    #[test]
    fn test_never_goes_below_zero() {
        let start = Instant::now();
        let mut timer = Timer::new(start);
        timer.set(10, start);
        assert!(timer.tick(start + TICK_PERIOD * 1000));
        assert_eq!(timer.value(), 0);
        assert!(!timer.tick(start + TICK_PERIOD * 2000));
        assert_eq!(timer.value(), 0);
    }

    #[test]
    fn test_tick_resets_period() {
        let start = Instant::now();
        let mut timer = Timer::new(start);
        timer.set(10, start);
        timer.tick(start + TICK_PERIOD);
        assert!(!timer.tick(start + TICK_PERIOD + TICK_PERIOD / 2));
        assert_eq!(timer.value(), 9);
    }

    #[test]
    fn test_setting_restarts_the_period() {
        let start = Instant::now();
        let mut timer = Timer::new(start);
        // left at zero long enough to drift
        let later = start + TICK_PERIOD * 100;
        timer.set(3, later);
        assert!(!timer.tick(later + TICK_PERIOD / 2));
        assert_eq!(timer.value(), 3);
    }
}
