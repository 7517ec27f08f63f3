#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`RolloverClock`**: Free-running down-counter extended to 64 bits by its wrap interrupt
//! - **`SoftwareTimer`**: Deadline measured in counter cycles on any `TimeBase`
//! - **`Button`**: Four-state debounce machine for a level-polled switch
//! - **`TapDetector`**: Turns interrupt-latched edges into debounced taps
//! - **`TiltClassifier`**: Hysteresis classifier producing `Correct` and `Pass` gestures
//! - **`RoundCountdown`**: Round deadline shared between the rollover interrupt and the main loop
//! - **`Application`**: The Title, Instructions, Game and Results screens
//! - **`SystemContext`** / **`Controller`**: Interrupt side and main-loop side of the game
//! - **`Display`**: Trait to implement for your screen
//! - **`CycleCounter`**: Trait to implement for your hardware counter
//!
//! Colors are `Srgb<u8>`; convert to your panel's native format in the `Display` impl.

#[macro_use]
mod fmt;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod app;
pub mod button;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod display;
pub mod system;
pub mod tap;
pub mod tilt;
pub mod time;
pub mod timer;
pub mod words;

pub use app::{Application, Inputs, MAX_PLAYERS, Scoreboard, Screen};
pub use button::{ActiveLow, Button, ButtonInput, DebounceState, PushState};
pub use clock::{RolloverClock, TimingHardware, init_system_timing};
pub use config::{ConfigError, GameConfig};
pub use countdown::RoundCountdown;
pub use display::{Display, Font, Theme};
pub use system::{ButtonId, Controller, SAMPLE_CHANNELS, SampleBuffer, SystemContext};
pub use tap::{EdgeFlag, TapDetector};
pub use tilt::{TiltClassifier, TiltGesture, TiltState, TiltThresholds};
pub use time::{ClockConfig, CycleCounter, Tick, TimeBase};
pub use timer::SoftwareTimer;
pub use words::{DEFAULT_WORDS, WordDeck};
