//! Interrupt-shared system context and the main-loop controller.
//!
//! [`SystemContext`] holds everything an interrupt handler touches: the
//! rollover clock, the round countdown, one edge flag per latched button and
//! the analog sample buffer. Firmware keeps a single instance in a `static`
//! and forwards each interrupt to the matching `on_*` method; hosted tests
//! call the same methods to inject events.
//!
//! [`Controller`] owns the main-loop side: the debouncers and the
//! [`Application`]. Each [`Controller::poll`] refreshes every button before the
//! application reads any of them, so one physical tap reaches at most one
//! screen handler.

use core::cell::Cell;

use critical_section::Mutex;

use crate::app::{Application, Inputs, Screen};
use crate::button::{Button, ButtonInput};
use crate::clock::{RolloverClock, TimingHardware, init_system_timing};
use crate::config::{ConfigError, GameConfig};
use crate::countdown::RoundCountdown;
use crate::display::Display;
use crate::tap::{EdgeFlag, TapDetector};
use crate::time::CycleCounter;
use crate::words::WordDeck;

/// Number of analog channels converted per sample sequence.
pub const SAMPLE_CHANNELS: usize = 3;

/// Mid-scale of the 14-bit converter; reads as an upright board.
const MID_SCALE: u16 = 8_192;

/// Latest analog conversion results, written by the sample-complete interrupt.
pub struct SampleBuffer(Mutex<Cell<[u16; SAMPLE_CHANNELS]>>);

impl SampleBuffer {
    /// Creates a buffer reading mid-scale on every channel.
    pub const fn new() -> Self {
        Self(Mutex::new(Cell::new([MID_SCALE; SAMPLE_CHANNELS])))
    }

    /// Stores a full conversion sequence. Interrupt side.
    #[inline]
    pub fn store(&self, samples: [u16; SAMPLE_CHANNELS]) {
        critical_section::with(|cs| self.0.borrow(cs).set(samples));
    }

    /// Returns the latest reading of every channel.
    #[inline]
    pub fn load(&self) -> [u16; SAMPLE_CHANNELS] {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Buttons whose edges are latched by a GPIO interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// Start button.
    A,
    /// Help button.
    B,
}

/// State shared between interrupt handlers and the main loop.
pub struct SystemContext<C: CycleCounter> {
    clock: RolloverClock<C>,
    countdown: RoundCountdown,
    button_a: EdgeFlag,
    button_b: EdgeFlag,
    samples: SampleBuffer,
}

impl<C: CycleCounter> SystemContext<C> {
    /// Creates the context over the free-running `counter`.
    pub const fn new(counter: C, config: &GameConfig) -> Self {
        Self {
            clock: RolloverClock::new(counter, config.clock),
            countdown: RoundCountdown::new(config.round_ms, &config.clock),
            button_a: EdgeFlag::new(),
            button_b: EdgeFlag::new(),
            samples: SampleBuffer::new(),
        }
    }

    /// Brings up the clock tree and the counter. Call once at boot.
    pub fn init_timing<H: TimingHardware>(&self, hw: &mut H) {
        init_system_timing(hw, &self.clock);
    }

    /// Counter wrap interrupt: counts the rollover and checks the round deadline.
    pub fn on_rollover(&self) {
        self.clock.on_rollover();
        self.countdown.check_deadline(&self.clock);
    }

    /// GPIO falling-edge interrupt for `button`.
    #[inline]
    pub fn on_button_edge(&self, button: ButtonId) {
        self.edge_flag(button).set();
    }

    /// Sample-sequence-complete interrupt.
    #[inline]
    pub fn on_samples(&self, samples: [u16; SAMPLE_CHANNELS]) {
        self.samples.store(samples);
    }

    /// Returns the rollover clock.
    pub fn clock(&self) -> &RolloverClock<C> {
        &self.clock
    }

    /// Returns the round countdown.
    pub fn countdown(&self) -> &RoundCountdown {
        &self.countdown
    }

    /// Returns the sample buffer.
    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    /// Returns the edge flag latched for `button`.
    pub fn edge_flag(&self, button: ButtonId) -> &EdgeFlag {
        match button {
            ButtonId::A => &self.button_a,
            ButtonId::B => &self.button_b,
        }
    }
}

/// Main-loop side of the controller.
///
/// # Type Parameters
/// * `'w` - Lifetime of the word list
/// * `P` - Raw input of the level-polled select button
pub struct Controller<'w, P: ButtonInput> {
    tap_a: TapDetector,
    tap_b: TapDetector,
    select: Button<P>,
    app: Application<'w>,
    tilt_channel: usize,
}

impl<'w, P: ButtonInput> Controller<'w, P> {
    /// Creates the controller with every button released and the title screen pending.
    ///
    /// Fails if `config` does not pass [`GameConfig::validate`].
    pub fn new(select: P, deck: WordDeck<'w>, config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            tap_a: TapDetector::new(config.tap_debounce_ms, &config.clock),
            tap_b: TapDetector::new(config.tap_debounce_ms, &config.clock),
            select: Button::new(select, config.level_debounce_ms, &config.clock),
            app: Application::new(deck, config),
            tilt_channel: config.tilt_channel,
        })
    }

    /// Runs one main-loop pass and returns the screen it left the game on.
    pub fn poll<C, D>(&mut self, ctx: &SystemContext<C>, display: &mut D) -> Screen
    where
        C: CycleCounter,
        D: Display,
    {
        let clock = ctx.clock();

        let a_tapped = self.tap_a.poll(ctx.edge_flag(ButtonId::A), clock);
        let b_tapped = self.tap_b.poll(ctx.edge_flag(ButtonId::B), clock);
        self.select.refresh(clock);

        let inputs = Inputs {
            a_tapped,
            b_tapped,
            select_tapped: self.select.is_tapped(),
            tilt_sample: ctx.samples().load()[self.tilt_channel],
        };
        trace!("inputs {}", inputs);

        self.app.step(&inputs, ctx.countdown(), clock, display);
        self.app.screen()
    }

    /// Runs the main loop forever.
    ///
    /// `sleep` must block in a low-power state until any enabled interrupt fires.
    pub fn run<C, D, S>(&mut self, ctx: &SystemContext<C>, display: &mut D, mut sleep: S) -> !
    where
        C: CycleCounter,
        D: Display,
        S: FnMut(),
    {
        loop {
            sleep();
            self.poll(ctx, display);
        }
    }

    /// Returns the application.
    pub fn app(&self) -> &Application<'w> {
        &self.app
    }

    /// Returns the level-polled select button.
    pub fn select_button(&self) -> &Button<P> {
        &self.select
    }
}
