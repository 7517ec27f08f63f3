//! Rollover clock: the free-running counter plus the rollover count kept by
//! its wrap interrupt.

use core::cell::Cell;

use critical_section::Mutex;

use crate::time::{ClockConfig, CycleCounter, Tick, TimeBase};

/// Free-running down-counter extended to 64 bits by counting its rollovers.
///
/// Meant to live in a `static` shared between the rollover interrupt, which
/// calls [`RolloverClock::on_rollover`], and the main loop, which takes
/// [`Tick`] snapshots through [`TimeBase::now`].
pub struct RolloverClock<C: CycleCounter> {
    counter: C,
    config: ClockConfig,
    rollovers: Mutex<Cell<u64>>,
}

impl<C: CycleCounter> RolloverClock<C> {
    /// Creates a clock over `counter` with zero rollovers.
    pub const fn new(counter: C, config: ClockConfig) -> Self {
        Self {
            counter,
            config,
            rollovers: Mutex::new(Cell::new(0)),
        }
    }

    /// Counts one counter wrap and clears the interrupt source.
    ///
    /// Must only be called from the rollover interrupt handler; any other call
    /// skews every software timer built on this clock.
    pub fn on_rollover(&self) {
        critical_section::with(|cs| {
            self.counter.clear_rollover_interrupt();
            let rollovers = self.rollovers.borrow(cs);
            rollovers.set(rollovers.get() + 1);
        });
    }

    /// Returns the number of counter wraps since initialization.
    pub fn rollovers(&self) -> u64 {
        critical_section::with(|cs| self.rollovers.borrow(cs).get())
    }

    /// Returns the live hardware counter value.
    #[inline]
    pub fn current_counter_value(&self) -> u32 {
        self.counter.current_value()
    }

    /// Returns the underlying counter.
    pub fn counter(&self) -> &C {
        &self.counter
    }

    fn reset(&self) {
        critical_section::with(|cs| self.rollovers.borrow(cs).set(0));
    }
}

impl<C: CycleCounter> TimeBase for RolloverClock<C> {
    /// Takes a snapshot that stays consistent across a wrap whose interrupt
    /// has not run yet.
    ///
    /// The counter is read before the pending flag. If the flag is up, the
    /// wrap is counted here and the counter re-read, so the value always
    /// belongs to the same wrap as the rollover count.
    fn now(&self) -> Tick {
        critical_section::with(|cs| {
            let rollovers = self.rollovers.borrow(cs).get();
            let counter = self.counter.current_value();

            if self.counter.rollover_pending() {
                Tick {
                    counter: self.counter.current_value(),
                    rollovers: rollovers + 1,
                }
            } else {
                Tick { counter, rollovers }
            }
        })
    }

    fn config(&self) -> &ClockConfig {
        &self.config
    }
}

/// Trait for the one-shot clock tree and counter bring-up.
///
/// Each method maps to a single peripheral operation; [`init_system_timing`]
/// owns the order in which they are issued.
pub trait TimingHardware {
    /// Globally masks interrupts.
    fn disable_interrupts(&mut self);

    /// Programs the flash controller wait states for every bank.
    fn set_flash_wait_states(&mut self, wait_states: u8);

    /// Switches the core and peripheral clocks to `frequency_hz`.
    fn set_core_clock(&mut self, frequency_hz: u32);

    /// Configures the counter as periodic with the given reload and prescaler.
    fn configure_counter(&mut self, reload: u32, prescaler: u32);

    /// Clears any stale rollover interrupt and enables it.
    fn enable_rollover_interrupt(&mut self);

    /// Globally unmasks interrupts.
    fn enable_interrupts(&mut self);

    /// Starts the counter.
    fn start_counter(&mut self);
}

/// Brings up system timing and resets the rollover count.
///
/// Flash wait states are raised before the core clock: the other order makes
/// the core fetch instructions faster than flash can deliver them, which can
/// leave the device unflashable.
pub fn init_system_timing<H, C>(hw: &mut H, clock: &RolloverClock<C>)
where
    H: TimingHardware,
    C: CycleCounter,
{
    let config = *clock.config();

    hw.disable_interrupts();
    hw.set_flash_wait_states(config.flash_wait_states);
    hw.set_core_clock(config.frequency_hz);
    hw.configure_counter(config.counter_max, config.prescaler);
    hw.enable_rollover_interrupt();
    hw.enable_interrupts();
    hw.start_counter();

    clock.reset();

    info!(
        "system timing up: {=u32} Hz, prescaler {=u32}",
        config.frequency_hz, config.prescaler
    );
}
