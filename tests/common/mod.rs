//! Shared test infrastructure for tilt-charades integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use tilt_charades::{
    ClockConfig, CycleCounter, Display, Font, RolloverClock, Srgb, SystemContext, TimeBase,
};

// ============================================================================
// Mock Counter
// ============================================================================

/// Mock down-counter whose value is set by the test
pub struct MockCounter {
    value: Cell<u32>,
    counter_max: u32,
    interrupts_cleared: Cell<u32>,
    pending: Cell<bool>,
}

impl MockCounter {
    /// Counter sitting at its reload value, as right after start-up
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            value: Cell::new(config.counter_max),
            counter_max: config.counter_max,
            interrupts_cleared: Cell::new(0),
            pending: Cell::new(false),
        }
    }

    pub fn set(&self, value: u32) {
        self.value.set(value);
    }

    pub fn value(&self) -> u32 {
        self.value.get()
    }

    pub fn interrupts_cleared(&self) -> u32 {
        self.interrupts_cleared.get()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Counts down by `cycles`, calling `on_wrap` each time the counter reloads
    pub fn count_down(&self, cycles: u64, mut on_wrap: impl FnMut()) {
        let mut remaining = cycles;

        loop {
            let current = u64::from(self.value.get());
            if remaining <= current {
                self.value.set((current - remaining) as u32);
                return;
            }

            // Down to zero, then one more cycle to reload.
            remaining -= current + 1;
            self.value.set(self.counter_max);
            self.pending.set(true);
            on_wrap();
        }
    }
}

impl CycleCounter for MockCounter {
    fn current_value(&self) -> u32 {
        self.value.get()
    }

    fn clear_rollover_interrupt(&self) {
        self.interrupts_cleared.set(self.interrupts_cleared.get() + 1);
        self.pending.set(false);
    }

    fn rollover_pending(&self) -> bool {
        self.pending.get()
    }
}

// ============================================================================
// Time Helpers
// ============================================================================

pub fn new_clock(config: ClockConfig) -> RolloverClock<MockCounter> {
    RolloverClock::new(MockCounter::new(&config), config)
}

/// Advance a bare clock, servicing every rollover interrupt
pub fn advance_clock(clock: &RolloverClock<MockCounter>, cycles: u64) {
    clock.counter().count_down(cycles, || clock.on_rollover());
}

/// Advance a bare clock with the rollover interrupt masked
///
/// At most one wrap may happen while masked, as on hardware.
pub fn advance_masked(counter: &MockCounter, cycles: u64) {
    let mut wraps = 0;
    counter.count_down(cycles, || wraps += 1);
    assert!(wraps <= 1, "{} wraps while masked", wraps);
}

/// Advance a system context, servicing every rollover interrupt
pub fn advance(ctx: &SystemContext<MockCounter>, cycles: u64) {
    ctx.clock().counter().count_down(cycles, || ctx.on_rollover());
}

pub fn advance_ms(ctx: &SystemContext<MockCounter>, millis: u64) {
    let cycles_per_ms = ctx.clock().config().cycles_per_ms();
    advance(ctx, millis * cycles_per_ms);
}

// ============================================================================
// Mock Display
// ============================================================================

/// Everything the game asked the display to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Clear,
    Centered(String, i16, i16),
    Text(String, i16, i16),
    Font(Font),
    Colors(Srgb<u8>, Srgb<u8>),
}

/// Mock display that records all draw calls for testing
#[derive(Default)]
pub struct RecordingDisplay {
    calls: Vec<DrawCall>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// All drawn strings, in order
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Centered(text, _, _) | DrawCall::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn drew(&self, text: &str) -> bool {
        self.texts().contains(&text)
    }

    /// Number of times `text` was drawn
    pub fn count(&self, text: &str) -> usize {
        self.texts().iter().filter(|drawn| **drawn == text).count()
    }

    pub fn clear_count(&self) -> usize {
        self.calls.iter().filter(|call| **call == DrawCall::Clear).count()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Display for RecordingDisplay {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn draw_centered_text(&mut self, text: &str, x: i16, y: i16) {
        self.calls.push(DrawCall::Centered(text.to_string(), x, y));
    }

    fn draw_text(&mut self, text: &str, x: i16, y: i16) {
        self.calls.push(DrawCall::Text(text.to_string(), x, y));
    }

    fn set_font(&mut self, font: Font) {
        self.calls.push(DrawCall::Font(font));
    }

    fn set_colors(&mut self, foreground: Srgb<u8>, background: Srgb<u8>) {
        self.calls.push(DrawCall::Colors(foreground, background));
    }
}

// ============================================================================
// Mock Pins
// ============================================================================

/// Mock input pin reading the level the test holds in `low`
pub struct MockPin<'a> {
    low: &'a Cell<bool>,
}

impl<'a> MockPin<'a> {
    pub fn new(low: &'a Cell<bool>) -> Self {
        Self { low }
    }
}

impl ErrorType for MockPin<'_> {
    type Error = Infallible;
}

impl InputPin for MockPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.low.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.low.get())
    }
}

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Pin whose every read fails
pub struct FaultyPin;

impl ErrorType for FaultyPin {
    type Error = PinFault;
}

impl InputPin for FaultyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(PinFault)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(PinFault)
    }
}
