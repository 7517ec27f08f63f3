//! Interrupt-latched tap detection.
//!
//! The GPIO edge interrupt only sets an [`EdgeFlag`]; the main loop polls a
//! [`TapDetector`] which consumes the flag and suppresses further edges for
//! the rest of the debounce window.

use core::cell::Cell;

use critical_section::Mutex;

use crate::time::{ClockConfig, TimeBase};
use crate::timer::SoftwareTimer;

/// Single-producer, single-consumer "maybe changed" flag.
///
/// Set from the edge interrupt, taken by the button's own poll.
pub struct EdgeFlag(Mutex<Cell<bool>>);

impl EdgeFlag {
    /// Creates a cleared flag.
    pub const fn new() -> Self {
        Self(Mutex::new(Cell::new(false)))
    }

    /// Latches an edge. Interrupt side.
    #[inline]
    pub fn set(&self) {
        critical_section::with(|cs| self.0.borrow(cs).set(true));
    }

    /// Reads and clears the flag in one step. Poll side.
    #[inline]
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.0.borrow(cs).replace(false))
    }

    /// Reads the flag without clearing it.
    pub fn is_set(&self) -> bool {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }
}

impl Default for EdgeFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounces one interrupt-latched button into at most one tap per window.
#[derive(Debug, Clone, Copy)]
pub struct TapDetector {
    debouncing: bool,
    timer: SoftwareTimer,
}

impl TapDetector {
    /// Creates a detector that ignores edges for `window_ms` after each tap.
    pub const fn new(window_ms: u64, config: &ClockConfig) -> Self {
        Self {
            debouncing: false,
            timer: SoftwareTimer::new(window_ms, config),
        }
    }

    /// Consumes `flag` and returns `true` if it reports a new tap.
    ///
    /// The flag is always cleared, so edges that arrive while debouncing are
    /// dropped rather than reported once the window closes.
    pub fn poll<T: TimeBase>(&mut self, flag: &EdgeFlag, time: &T) -> bool {
        let modified = flag.take();

        if self.debouncing && self.timer.expired(time) {
            self.debouncing = false;
        }

        if !self.debouncing && modified {
            self.debouncing = true;
            self.timer.start(time);
            return true;
        }

        false
    }

    /// Returns `true` while edges are being suppressed.
    pub fn is_debouncing(&self) -> bool {
        self.debouncing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Tick;

    struct ManualTime(Cell<u32>, ClockConfig);

    impl TimeBase for ManualTime {
        fn now(&self) -> Tick {
            Tick {
                counter: self.0.get(),
                rollovers: 0,
            }
        }

        fn config(&self) -> &ClockConfig {
            &self.1
        }
    }

    #[test]
    fn flag_take_clears() {
        let flag = EdgeFlag::new();
        assert!(!flag.take());

        flag.set();
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.is_set());
    }

    #[test]
    fn bounces_within_window_report_one_tap() {
        let config = ClockConfig::new(1_000_000, 1).unwrap();
        let time = ManualTime(Cell::new(u32::MAX), config);
        let flag = EdgeFlag::new();
        let mut detector = TapDetector::new(500, &config);

        flag.set();
        assert!(detector.poll(&flag, &time));

        for _ in 0..10 {
            time.0.set(time.0.get() - 40_000);
            flag.set();
            assert!(!detector.poll(&flag, &time));
        }

        assert!(detector.is_debouncing());
    }
}
