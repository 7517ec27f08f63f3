//! Level-sampled push-button debouncing.
//!
//! Provides [`Button`], a four-state debounce machine that is refreshed once per
//! main-loop pass, and the [`ButtonInput`] trait it samples through.

use embedded_hal::digital::InputPin;

use crate::time::{ClockConfig, TimeBase};
use crate::timer::SoftwareTimer;

/// Trait for abstracting the raw button level.
///
/// Implement this for whatever reads the physical switch. The reading is raw:
/// it may bounce, and the debouncer is responsible for cleaning it up.
pub trait ButtonInput {
    /// Returns `true` while the switch is closed.
    fn is_pressed(&mut self) -> bool;
}

/// Adapts an active-low [`InputPin`] (switch to ground, pulled up) to [`ButtonInput`].
///
/// A failed pin read counts as released.
pub struct ActiveLow<P>(pub P);

impl<P: InputPin> ButtonInput for ActiveLow<P> {
    #[inline]
    fn is_pressed(&mut self) -> bool {
        self.0.is_low().unwrap_or(false)
    }
}

/// Debounced output level of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PushState {
    /// Switch open.
    Released,
    /// Switch closed.
    Pressed,
}

/// State of the debounce machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// Released and settled.
    StableReleased,
    /// Raw level reads pressed; waiting for it to hold for the debounce window.
    TransitionReleasedToPressed,
    /// Pressed and settled.
    StablePressed,
    /// Raw level reads released; waiting for it to hold for the debounce window.
    TransitionPressedToReleased,
}

/// A debounced push-button.
///
/// Each [`Button::refresh`] samples the raw level once and advances the
/// debounce machine by one step. [`Button::is_pressed`] and
/// [`Button::is_tapped`] only return what the last refresh computed.
pub struct Button<P: ButtonInput> {
    input: P,
    state: DebounceState,
    push_state: PushState,
    tapped: bool,
    timer: SoftwareTimer,
}

impl<P: ButtonInput> Button<P> {
    /// Creates a released button whose level must hold for `debounce_ms` to change.
    pub fn new(input: P, debounce_ms: u64, config: &ClockConfig) -> Self {
        Self {
            input,
            state: DebounceState::StableReleased,
            push_state: PushState::Released,
            tapped: false,
            timer: SoftwareTimer::new(debounce_ms, config),
        }
    }

    /// Samples the raw level and advances the debounce machine.
    pub fn refresh<T: TimeBase>(&mut self, time: &T) {
        let raw_pressed = self.input.is_pressed();

        let output = match self.state {
            DebounceState::StableReleased => {
                if raw_pressed {
                    self.timer.start(time);
                    self.state = DebounceState::TransitionReleasedToPressed;
                }
                PushState::Released
            }
            DebounceState::TransitionReleasedToPressed => {
                if !raw_pressed {
                    self.state = DebounceState::StableReleased;
                } else if self.timer.expired(time) {
                    self.state = DebounceState::StablePressed;
                }
                PushState::Released
            }
            DebounceState::StablePressed => {
                if !raw_pressed {
                    self.timer.start(time);
                    self.state = DebounceState::TransitionPressedToReleased;
                }
                PushState::Pressed
            }
            DebounceState::TransitionPressedToReleased => {
                if raw_pressed {
                    self.state = DebounceState::StablePressed;
                } else if self.timer.expired(time) {
                    self.state = DebounceState::StableReleased;
                }
                PushState::Pressed
            }
        };

        self.tapped = output == PushState::Pressed && self.push_state == PushState::Released;
        self.push_state = output;
    }

    /// Returns `true` if the button was held down at the last refresh.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.push_state == PushState::Pressed
    }

    /// Returns `true` if the last refresh turned the button from released to pressed.
    #[inline]
    pub fn is_tapped(&self) -> bool {
        self.tapped
    }

    /// Returns the current debounce state.
    pub fn debounce_state(&self) -> DebounceState {
        self.state
    }

    /// Returns the raw input.
    pub fn input_mut(&mut self) -> &mut P {
        &mut self.input
    }
}
