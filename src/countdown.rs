//! The per-round countdown shared between the rollover interrupt and the main loop.

use core::cell::Cell;

use critical_section::Mutex;

use crate::time::{ClockConfig, TimeBase};
use crate::timer::SoftwareTimer;

#[derive(Clone, Copy)]
struct Inner {
    timer: SoftwareTimer,
    armed: bool,
    game_over: bool,
}

/// Round countdown with a latched game-over flag.
///
/// The rollover interrupt runs [`RoundCountdown::check_deadline`]; the main
/// loop consumes the result through [`RoundCountdown::take_game_over`]. A
/// halted countdown never latches, so a reset in one screen cannot leak an
/// expiry into the next round.
pub struct RoundCountdown(Mutex<Cell<Inner>>);

impl RoundCountdown {
    /// Creates a halted countdown of `round_ms` milliseconds.
    pub const fn new(round_ms: u64, config: &ClockConfig) -> Self {
        Self(Mutex::new(Cell::new(Inner {
            timer: SoftwareTimer::new(round_ms, config),
            armed: false,
            game_over: false,
        })))
    }

    /// Restarts the countdown from full length and clears game-over.
    pub fn arm<T: TimeBase>(&self, time: &T) {
        critical_section::with(|cs| {
            let cell = self.0.borrow(cs);
            let mut inner = cell.get();
            inner.timer.start(time);
            inner.armed = true;
            inner.game_over = false;
            cell.set(inner);
        });
    }

    /// Stops the countdown and drops any latched game-over.
    pub fn halt(&self) {
        critical_section::with(|cs| {
            let cell = self.0.borrow(cs);
            let mut inner = cell.get();
            inner.armed = false;
            inner.game_over = false;
            cell.set(inner);
        });
    }

    /// Latches game-over if the armed countdown has run out, and reloads it.
    ///
    /// Returns `true` when this call latched the flag.
    pub fn check_deadline<T: TimeBase>(&self, time: &T) -> bool {
        critical_section::with(|cs| {
            let cell = self.0.borrow(cs);
            let mut inner = cell.get();

            if !inner.armed || !inner.timer.expired(time) {
                return false;
            }

            inner.game_over = true;
            inner.timer.start(time);
            cell.set(inner);

            debug!("round countdown expired");
            true
        })
    }

    /// Returns `true` once per expiry.
    ///
    /// Runs the deadline check itself first, so expiry is seen even when the
    /// rollover interrupt fires less often than the round length.
    pub fn take_game_over<T: TimeBase>(&self, time: &T) -> bool {
        self.check_deadline(time);
        critical_section::with(|cs| {
            let cell = self.0.borrow(cs);
            let mut inner = cell.get();
            let game_over = inner.game_over;
            inner.game_over = false;
            cell.set(inner);
            game_over
        })
    }

    /// Whole seconds left in the round, rounded up. Zero while halted.
    pub fn remaining_secs<T: TimeBase>(&self, time: &T) -> u64 {
        let inner = critical_section::with(|cs| self.0.borrow(cs).get());

        if inner.armed {
            inner.timer.remaining_secs(time)
        } else {
            0
        }
    }

    /// Returns `true` while the countdown is running.
    pub fn is_armed(&self) -> bool {
        critical_section::with(|cs| self.0.borrow(cs).get().armed)
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

    fn setup() -> (RoundCountdown, ManualTime) {
        let config = ClockConfig::new(1_000_000, 1).unwrap();
        (
            RoundCountdown::new(1_000, &config),
            ManualTime(Cell::new(u32::MAX), config),
        )
    }

    #[test]
    fn halted_countdown_never_expires() {
        let (countdown, time) = setup();

        time.0.set(u32::MAX - 5_000_000);
        assert!(!countdown.check_deadline(&time));
        assert!(!countdown.take_game_over(&time));
        assert_eq!(countdown.remaining_secs(&time), 0);
    }

    #[test]
    fn expiry_latches_once_and_reloads() {
        let (countdown, time) = setup();
        countdown.arm(&time);

        time.0.set(u32::MAX - 999_999);
        assert!(!countdown.take_game_over(&time));
        assert_eq!(countdown.remaining_secs(&time), 1);

        time.0.set(u32::MAX - 1_000_000);
        assert!(countdown.check_deadline(&time));
        assert!(countdown.take_game_over(&time));
        assert!(!countdown.take_game_over(&time));
        assert_eq!(countdown.remaining_secs(&time), 1);
    }

    #[test]
    fn halt_discards_latched_expiry() {
        let (countdown, time) = setup();
        countdown.arm(&time);

        time.0.set(u32::MAX - 2_000_000);
        assert!(countdown.check_deadline(&time));

        countdown.halt();
        assert!(!countdown.is_armed());
        assert!(!countdown.take_game_over(&time));
    }
}
