use cortex_m::peripheral::NVIC;
use rtt_target::rprintln;
use stm32f0xx_hal::{pac, prelude::*, rcc::Rcc};

use tilt_charades::{CycleCounter, TimingHardware};

/// TIM2 as the free-running down-counter
///
/// TIM2 is the only 32-bit timer on the STM32F072. It is configured to count
/// down from the reload value and raise its update interrupt on every wrap.
pub struct Tim2Counter;

impl Tim2Counter {
    fn regs() -> &'static pac::tim2::RegisterBlock {
        // SAFETY: only CNT and SR.UIF are accessed, each in a single-word access
        unsafe { &*pac::TIM2::ptr() }
    }
}

impl CycleCounter for Tim2Counter {
    fn current_value(&self) -> u32 {
        Self::regs().cnt.read().bits()
    }

    fn clear_rollover_interrupt(&self) {
        Self::regs().sr.modify(|_, w| w.uif().clear_bit());
    }

    fn rollover_pending(&self) -> bool {
        Self::regs().sr.read().uif().bit_is_set()
    }
}

/// Board bring-up steps driven by `init_system_timing`
///
/// Owns the RCC until the core clock is switched, then hands back the
/// configured HAL `Rcc` through [`BoardTiming::finish`].
pub struct BoardTiming<'a> {
    flash: &'a mut pac::FLASH,
    tim2: &'a pac::TIM2,
    rcc: Option<pac::RCC>,
    clocks: Option<Rcc>,
}

impl<'a> BoardTiming<'a> {
    pub fn new(flash: &'a mut pac::FLASH, rcc: pac::RCC, tim2: &'a pac::TIM2) -> Self {
        Self {
            flash,
            tim2,
            rcc: Some(rcc),
            clocks: None,
        }
    }

    /// Returns the configured clocks, or `None` if bring-up never ran
    pub fn finish(self) -> Option<Rcc> {
        self.clocks
    }
}

impl TimingHardware for BoardTiming<'_> {
    fn disable_interrupts(&mut self) {
        cortex_m::interrupt::disable();
    }

    fn set_flash_wait_states(&mut self, wait_states: u8) {
        self.flash.acr.modify(|_, w| {
            let w = w.prftbe().set_bit();
            if wait_states == 0 {
                w.latency().ws0()
            } else {
                w.latency().ws1()
            }
        });
    }

    fn set_core_clock(&mut self, frequency_hz: u32) {
        if let Some(rcc) = self.rcc.take() {
            let rcc = rcc.configure().sysclk(frequency_hz.hz()).freeze(self.flash);
            rprintln!("System clock configured: {} Hz", rcc.clocks.sysclk().0);
            self.clocks = Some(rcc);
        }
    }

    fn configure_counter(&mut self, reload: u32, prescaler: u32) {
        // SAFETY: single read-modify-write of the TIM2 clock enable bit
        unsafe {
            (*pac::RCC::ptr()).apb1enr.modify(|_, w| w.tim2en().set_bit());
        }

        self.tim2.cr1.modify(|_, w| w.cen().clear_bit().dir().down());
        self.tim2.psc.write(|w| w.psc().bits((prescaler - 1) as u16));
        self.tim2.arr.write(|w| unsafe { w.bits(reload) });
        self.tim2.cnt.write(|w| unsafe { w.bits(reload) });
        self.tim2.egr.write(|w| w.ug().set_bit());
    }

    fn enable_rollover_interrupt(&mut self) {
        self.tim2.sr.modify(|_, w| w.uif().clear_bit());
        self.tim2.dier.modify(|_, w| w.uie().set_bit());
        // SAFETY: the TIM2 handler only touches the shared system context
        unsafe { NVIC::unmask(pac::Interrupt::TIM2) };
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: every enabled handler is installed by then
        unsafe { cortex_m::interrupt::enable() };
    }

    fn start_counter(&mut self) {
        self.tim2.cr1.modify(|_, w| w.cen().set_bit());
        rprintln!("TIM2 counting down from {}", self.tim2.arr.read().bits());
    }
}
