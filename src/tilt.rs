//! Tilt gesture classification with hysteresis.
//!
//! The tilt axis of the accelerometer is sampled continuously on a 14-bit
//! scale (0-16383). Holding the board upright reads near the middle of the
//! range; tilting it away from the player drops the reading, tilting it
//! toward the player raises it.
//!
//! A gesture only counts once the reading comes back from the tilted band,
//! so a sustained tilt reports a single gesture no matter how long it is held.

use crate::config::ConfigError;

/// Tilt state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TiltState {
    /// Tilted toward the player.
    Up,
    /// Upright.
    Normal,
    /// Tilted away from the player.
    Down,
}

/// Completed tilt gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TiltGesture {
    /// Tilted away and back: the word was guessed.
    Correct,
    /// Tilted toward and back: the word was skipped.
    Pass,
}

/// Hysteresis thresholds for the tilt axis.
///
/// Entering a tilted state needs the reading to pass the outer threshold,
/// leaving it needs the reading to come back past the inner one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltThresholds {
    down_enter: u16,
    down_release: u16,
    up_release: u16,
    up_enter: u16,
}

impl TiltThresholds {
    /// Thresholds tuned for the BoosterPack accelerometer z axis.
    pub const DEFAULT: Self = Self {
        down_enter: 7_000,
        down_release: 7_500,
        up_release: 10_000,
        up_enter: 10_500,
    };

    /// Creates validated thresholds.
    ///
    /// Requires `down_enter <= down_release <= up_release <= up_enter`.
    pub fn new(
        down_enter: u16,
        down_release: u16,
        up_release: u16,
        up_enter: u16,
    ) -> Result<Self, ConfigError> {
        if down_enter > down_release || down_release > up_release || up_release > up_enter {
            return Err(ConfigError::ThresholdsOutOfOrder);
        }

        Ok(Self {
            down_enter,
            down_release,
            up_release,
            up_enter,
        })
    }

    /// Reading below which an upright board counts as tilted down.
    pub fn down_enter(&self) -> u16 {
        self.down_enter
    }

    /// Reading above which a tilted-down board counts as upright again.
    pub fn down_release(&self) -> u16 {
        self.down_release
    }

    /// Reading below which a tilted-up board counts as upright again.
    pub fn up_release(&self) -> u16 {
        self.up_release
    }

    /// Reading above which an upright board counts as tilted up.
    pub fn up_enter(&self) -> u16 {
        self.up_enter
    }
}

impl Default for TiltThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Three-state tilt classifier.
#[derive(Debug, Clone, Copy)]
pub struct TiltClassifier {
    state: TiltState,
    thresholds: TiltThresholds,
}

impl TiltClassifier {
    /// Creates an upright classifier.
    pub const fn new(thresholds: TiltThresholds) -> Self {
        Self {
            state: TiltState::Normal,
            thresholds,
        }
    }

    /// Classifies one sample, returning the gesture it completes, if any.
    pub fn step(&mut self, sample: u16) -> Option<TiltGesture> {
        let t = &self.thresholds;

        match self.state {
            TiltState::Normal => {
                if sample < t.down_enter {
                    self.state = TiltState::Down;
                } else if sample > t.up_enter {
                    self.state = TiltState::Up;
                }
                None
            }
            TiltState::Down => {
                if sample > t.down_release {
                    self.state = TiltState::Normal;
                    Some(TiltGesture::Correct)
                } else {
                    None
                }
            }
            TiltState::Up => {
                if sample < t.up_release {
                    self.state = TiltState::Normal;
                    Some(TiltGesture::Pass)
                } else {
                    None
                }
            }
        }
    }

    /// Returns the current tilt state.
    #[inline]
    pub fn state(&self) -> TiltState {
        self.state
    }

    /// Forgets any half-finished gesture.
    pub fn reset(&mut self) {
        self.state = TiltState::Normal;
    }
}
