//! Game configuration and validation errors.

use crate::display::Theme;
use crate::system::SAMPLE_CHANNELS;
use crate::tilt::TiltThresholds;
use crate::time::ClockConfig;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Counter prescaler of zero.
    ZeroPrescaler,

    /// Counter runs slower than one cycle per millisecond.
    ClockTooSlow {
        /// Requested core clock in Hz.
        frequency_hz: u32,
        /// Requested prescaler.
        prescaler: u32,
    },

    /// Tilt thresholds do not form nested hysteresis bands.
    ThresholdsOutOfOrder,

    /// Word deck built from an empty list.
    EmptyWordList,

    /// Round countdown of zero length.
    ZeroRoundLength,

    /// Tilt channel index outside the sample buffer.
    ChannelOutOfRange(usize),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPrescaler => {
                write!(f, "counter prescaler must be at least 1")
            }
            ConfigError::ClockTooSlow { frequency_hz, prescaler } => {
                write!(
                    f,
                    "clock of {} Hz with prescaler {} gives less than one cycle per millisecond",
                    frequency_hz, prescaler
                )
            }
            ConfigError::ThresholdsOutOfOrder => {
                write!(
                    f,
                    "tilt thresholds must satisfy down_enter <= down_release <= up_release <= up_enter"
                )
            }
            ConfigError::EmptyWordList => {
                write!(f, "word list must contain at least one word")
            }
            ConfigError::ZeroRoundLength => {
                write!(f, "round length must be non-zero")
            }
            ConfigError::ChannelOutOfRange(channel) => {
                write!(
                    f,
                    "tilt channel {} exceeds the {} sampled channels",
                    channel, SAMPLE_CHANNELS
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Every tunable constant of the controller in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Clock tree and counter parameters.
    pub clock: ClockConfig,

    /// Window during which further edges on an interrupt-latched button are ignored.
    pub tap_debounce_ms: u64,

    /// Time a polled button level must hold before it is accepted.
    pub level_debounce_ms: u64,

    /// Length of one round.
    pub round_ms: u64,

    /// Tilt hysteresis thresholds.
    pub thresholds: TiltThresholds,

    /// Index of the tilt axis in the analog sample buffer.
    pub tilt_channel: usize,

    /// Display colors.
    pub theme: Theme,
}

impl GameConfig {
    /// 48 MHz clock, 500 ms tap debounce, 20 ms level debounce, 60 s rounds.
    pub const DEFAULT: Self = Self {
        clock: ClockConfig::DEFAULT,
        tap_debounce_ms: 500,
        level_debounce_ms: 20,
        round_ms: 60_000,
        thresholds: TiltThresholds::DEFAULT,
        tilt_channel: 2,
        theme: Theme::DEFAULT,
    };

    /// Replaces the clock configuration.
    pub fn clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the tap debounce window.
    pub fn tap_debounce_ms(mut self, millis: u64) -> Self {
        self.tap_debounce_ms = millis;
        self
    }

    /// Sets the level debounce window.
    pub fn level_debounce_ms(mut self, millis: u64) -> Self {
        self.level_debounce_ms = millis;
        self
    }

    /// Sets the round length.
    pub fn round_ms(mut self, millis: u64) -> Result<Self, ConfigError> {
        if millis == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }

        self.round_ms = millis;
        Ok(self)
    }

    /// Replaces the tilt thresholds.
    pub fn thresholds(mut self, thresholds: TiltThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Selects which sampled channel carries the tilt axis.
    pub fn tilt_channel(mut self, channel: usize) -> Result<Self, ConfigError> {
        if channel >= SAMPLE_CHANNELS {
            return Err(ConfigError::ChannelOutOfRange(channel));
        }

        self.tilt_channel = channel;
        Ok(self)
    }

    /// Replaces the display colors.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Checks a configuration built with struct literals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate()?;

        if self.round_ms == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }

        if self.tilt_channel >= SAMPLE_CHANNELS {
            return Err(ConfigError::ChannelOutOfRange(self.tilt_channel));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
