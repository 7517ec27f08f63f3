//! Time abstraction traits for cycle-accurate timing on a free-running counter.

use crate::config::ConfigError;

/// Trait for abstracting the free-running hardware down-counter.
///
/// The counter is loaded with [`ClockConfig::counter_max`], counts down to zero
/// and wraps back to the maximum, raising the rollover interrupt each time.
pub trait CycleCounter {
    /// Returns the live counter value.
    fn current_value(&self) -> u32;

    /// Clears the pending rollover interrupt on the counter peripheral.
    fn clear_rollover_interrupt(&self);

    /// Returns `true` while a rollover interrupt is raised but not yet cleared.
    fn rollover_pending(&self) -> bool;
}

/// A consistent snapshot of the counter and the rollover count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Hardware counter value at the time of the snapshot.
    pub counter: u32,

    /// Number of rollovers counted at the time of the snapshot.
    pub rollovers: u64,
}

impl Tick {
    /// Counter cycles elapsed since an earlier snapshot.
    ///
    /// `period` is the number of cycles in one full counter wrap. The counter
    /// counts down, so progress within a wrap is `earlier.counter - self.counter`.
    /// Saturates to zero when the counter wrapped but the rollover interrupt has
    /// not yet been serviced.
    #[inline]
    pub fn cycles_since(&self, earlier: Tick, period: u64) -> u64 {
        let rollovers = self.rollovers.wrapping_sub(earlier.rollovers);
        (rollovers * period + u64::from(earlier.counter)).saturating_sub(u64::from(self.counter))
    }
}

/// Trait for anything that can produce [`Tick`] snapshots.
pub trait TimeBase {
    /// Returns the current counter snapshot.
    fn now(&self) -> Tick;

    /// Returns the clock configuration the counter runs with.
    fn config(&self) -> &ClockConfig;
}

/// Clock tree and counter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Core clock driving the counter, in Hz.
    pub frequency_hz: u32,

    /// Counter prescaler.
    pub prescaler: u32,

    /// Counter reload value. One wrap lasts `counter_max + 1` cycles.
    pub counter_max: u32,

    /// Flash wait states required before the core clock is raised.
    pub flash_wait_states: u8,
}

impl ClockConfig {
    /// 48 MHz core clock, prescaler 1, full 32-bit counter range.
    pub const DEFAULT: Self = Self {
        frequency_hz: 48_000_000,
        prescaler: 1,
        counter_max: u32::MAX,
        flash_wait_states: 2,
    };

    /// Creates a validated clock configuration with a full 32-bit counter range.
    pub fn new(frequency_hz: u32, prescaler: u32) -> Result<Self, ConfigError> {
        let config = Self {
            frequency_hz,
            prescaler,
            ..Self::DEFAULT
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks a configuration built field by field.
    ///
    /// The counter must tick at least once per millisecond.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prescaler == 0 {
            return Err(ConfigError::ZeroPrescaler);
        }

        if self.cycles_per_ms() == 0 {
            return Err(ConfigError::ClockTooSlow {
                frequency_hz: self.frequency_hz,
                prescaler: self.prescaler,
            });
        }

        Ok(())
    }

    /// Sets the counter reload value.
    pub const fn with_counter_max(mut self, counter_max: u32) -> Self {
        self.counter_max = counter_max;
        self
    }

    /// Sets the flash wait states.
    pub const fn with_flash_wait_states(mut self, wait_states: u8) -> Self {
        self.flash_wait_states = wait_states;
        self
    }

    /// Counter cycles per millisecond. Zero for an invalid configuration.
    #[inline]
    pub const fn cycles_per_ms(&self) -> u64 {
        self.cycles_per_sec() / 1_000
    }

    /// Counter cycles per second. Zero for an invalid configuration.
    #[inline]
    pub const fn cycles_per_sec(&self) -> u64 {
        match self.frequency_hz.checked_div(self.prescaler) {
            Some(rate) => rate as u64,
            None => 0,
        }
    }

    /// Cycles in one full counter wrap.
    #[inline]
    pub const fn period(&self) -> u64 {
        self.counter_max as u64 + 1
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_since_within_one_wrap() {
        let start = Tick { counter: 1_000, rollovers: 3 };
        let now = Tick { counter: 400, rollovers: 3 };

        assert_eq!(now.cycles_since(start, 1 << 32), 600);
    }

    #[test]
    fn cycles_since_across_rollover() {
        let start = Tick { counter: 100, rollovers: 0 };
        let now = Tick { counter: 900, rollovers: 1 };

        // 100 cycles down to zero, then 1000 - 900 after the reload.
        assert_eq!(now.cycles_since(start, 1_000), 200);
    }

    #[test]
    fn cycles_since_saturates_on_unserviced_wrap() {
        let start = Tick { counter: 100, rollovers: 5 };
        let now = Tick { counter: 900, rollovers: 5 };

        assert_eq!(now.cycles_since(start, 1_000), 0);
    }

    #[test]
    fn config_rejects_zero_prescaler() {
        assert_eq!(ClockConfig::new(48_000_000, 0), Err(ConfigError::ZeroPrescaler));
    }

    #[test]
    fn config_rejects_sub_millisecond_resolution() {
        assert!(matches!(
            ClockConfig::new(999, 1),
            Err(ConfigError::ClockTooSlow { .. })
        ));
    }

    #[test]
    fn validate_catches_literal_configs() {
        let zero_clock = ClockConfig {
            frequency_hz: 0,
            ..ClockConfig::DEFAULT
        };
        assert_eq!(
            zero_clock.validate(),
            Err(ConfigError::ClockTooSlow { frequency_hz: 0, prescaler: 1 })
        );

        let zero_prescaler = ClockConfig {
            prescaler: 0,
            ..ClockConfig::DEFAULT
        };
        assert_eq!(zero_prescaler.validate(), Err(ConfigError::ZeroPrescaler));
        assert_eq!(zero_prescaler.cycles_per_sec(), 0);

        assert_eq!(ClockConfig::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn default_config_cycles() {
        let config = ClockConfig::DEFAULT;
        assert_eq!(config.cycles_per_ms(), 48_000);
        assert_eq!(config.period(), 1 << 32);
    }
}
