//! Software timers measured in counter cycles.

use crate::time::{ClockConfig, Tick, TimeBase};

/// A software timer built on a [`TimeBase`].
///
/// Construction only computes the wait in counter cycles; the timer measures
/// from the moment [`SoftwareTimer::start`] is called. Calling `start` again
/// restarts it. A timer that was never started measures from process start,
/// when the counter sat at its reload value with zero rollovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftwareTimer {
    start: Tick,
    cycles_to_wait: u64,
}

impl SoftwareTimer {
    /// Creates a timer that expires `wait_ms` milliseconds after it is started.
    pub const fn new(wait_ms: u64, config: &ClockConfig) -> Self {
        Self {
            start: Tick {
                counter: config.counter_max,
                rollovers: 0,
            },
            cycles_to_wait: config.cycles_per_ms() * wait_ms,
        }
    }

    /// Starts, or restarts, the timer from the current instant.
    #[inline]
    pub fn start<T: TimeBase>(&mut self, time: &T) {
        self.start = time.now();
    }

    /// Counter cycles elapsed since the timer was started.
    #[inline]
    pub fn elapsed_cycles<T: TimeBase>(&self, time: &T) -> u64 {
        time.now().cycles_since(self.start, time.config().period())
    }

    /// Returns `true` once the wait time has fully elapsed.
    #[inline]
    pub fn expired<T: TimeBase>(&self, time: &T) -> bool {
        self.elapsed_cycles(time) >= self.cycles_to_wait
    }

    /// Counter cycles left until expiry, zero once expired.
    pub fn remaining_cycles<T: TimeBase>(&self, time: &T) -> u64 {
        self.cycles_to_wait.saturating_sub(self.elapsed_cycles(time))
    }

    /// Whole seconds left until expiry, rounded up.
    ///
    /// Reads the full round length right after start and zero only once expired.
    /// Always zero on a clock that does not tick.
    pub fn remaining_secs<T: TimeBase>(&self, time: &T) -> u64 {
        match time.config().cycles_per_sec() {
            0 => 0,
            per_sec => self.remaining_cycles(time).div_ceil(per_sec),
        }
    }

    /// The wait time in counter cycles.
    #[inline]
    pub fn wait_cycles(&self) -> u64 {
        self.cycles_to_wait
    }
}
