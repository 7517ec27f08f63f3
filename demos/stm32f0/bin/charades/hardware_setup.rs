use core::cell::RefCell;

use cortex_m::peripheral::{NVIC, SYST};
use critical_section::Mutex;
use rtt_target::rprintln;
use stm32f0xx_hal::{
    adc::Adc,
    gpio::{gpioa, gpiob, gpioc, Analog, Floating, Input, PullUp},
    pac,
    prelude::*,
    rcc::Rcc,
};

use stm32f0_demos::counter::{BoardTiming, Tim2Counter};
use tilt_charades::{ButtonInput, SystemContext};

/// Tilt axes are sampled this often by SysTick
const SAMPLE_RATE_HZ: u32 = 100;

/// EXTI lines of the tap buttons
pub const BUTTON_A_LINE: u32 = 1 << 4;
pub const BUTTON_B_LINE: u32 = 1 << 5;

/// Joystick select on the user button (PC13), pressed pulls low
///
/// The HAL pins implement the 0.2 digital traits, so this reads the pin
/// directly instead of going through `ActiveLow`.
pub struct SelectButton(gpioc::PC13<Input<PullUp>>);

impl ButtonInput for SelectButton {
    fn is_pressed(&mut self) -> bool {
        self.0.is_low().unwrap_or(false)
    }
}

/// Container for the peripherals the main loop owns
pub struct HardwareContext {
    pub select: SelectButton,
}

struct Sampler {
    adc: Adc,
    x: gpioa::PA0<Analog>,
    y: gpioa::PA1<Analog>,
    z: gpioa::PA4<Analog>,
}

impl Sampler {
    /// One conversion per axis, scaled from 12 to 14 bits
    fn sample(&mut self) -> [u16; 3] {
        let x: u16 = self.adc.read(&mut self.x).unwrap_or(0);
        let y: u16 = self.adc.read(&mut self.y).unwrap_or(0);
        let z: u16 = self.adc.read(&mut self.z).unwrap_or(0);
        [x << 2, y << 2, z << 2]
    }
}

static SAMPLER: Mutex<RefCell<Option<Sampler>>> = Mutex::new(RefCell::new(None));

/// Converts all three axes and hands them to the system context
///
/// Called from the SysTick handler.
pub fn sample_tilt(ctx: &SystemContext<Tim2Counter>) {
    critical_section::with(|cs| {
        if let Some(sampler) = SAMPLER.borrow_ref_mut(cs).as_mut() {
            ctx.on_samples(sampler.sample());
        }
    });
}

/// Initialize all hardware peripherals
///
/// - Flash, core clock and TIM2 through `init_system_timing`
/// - Select button (PC13)
/// - Tap buttons A (PB4) and B (PB5) on falling-edge EXTI
/// - ADC on PA0, PA1, PA4, sampled by SysTick
pub fn init_hardware(ctx: &SystemContext<Tim2Counter>) -> HardwareContext {
    let mut dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    let mut rcc = {
        let mut timing = BoardTiming::new(&mut dp.FLASH, dp.RCC, &dp.TIM2);
        ctx.init_timing(&mut timing);
        timing.finish().unwrap()
    };

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);
    let gpioc = dp.GPIOC.split(&mut rcc);

    let select = setup_select(gpioc.pc13);
    setup_tap_buttons(gpiob.pb4, gpiob.pb5, &dp.SYSCFG, &dp.EXTI);
    setup_sampler(gpioa.pa0, gpioa.pa1, gpioa.pa4, dp.ADC, &mut rcc);
    configure_systick(&rcc, &mut cp.SYST);

    HardwareContext { select }
}

fn setup_select(pc13: gpioc::PC13<Input<Floating>>) -> SelectButton {
    let pin = cortex_m::interrupt::free(|cs| pc13.into_pull_up_input(cs));

    rprintln!("Select button configured on PC13");
    SelectButton(pin)
}

/// Route PB4 and PB5 to EXTI lines 4 and 5, falling edge
fn setup_tap_buttons(
    pb4: gpiob::PB4<Input<Floating>>,
    pb5: gpiob::PB5<Input<Floating>>,
    syscfg: &pac::SYSCFG,
    exti: &pac::EXTI,
) {
    // Pins stay configured after the typed handles are dropped
    cortex_m::interrupt::free(|cs| {
        pb4.into_pull_up_input(cs);
        pb5.into_pull_up_input(cs);
    });

    // SAFETY: single read-modify-write of the SYSCFG clock enable bit
    unsafe {
        (*pac::RCC::ptr()).apb2enr.modify(|_, w| w.syscfgen().set_bit());
    }

    syscfg.exticr2.modify(|_, w| w.exti4().pb4().exti5().pb5());
    exti.ftsr.modify(|_, w| w.tr4().set_bit().tr5().set_bit());
    exti.pr.write(|w| unsafe { w.bits(BUTTON_A_LINE | BUTTON_B_LINE) });
    exti.imr.modify(|_, w| w.mr4().set_bit().mr5().set_bit());

    // SAFETY: the EXTI4_15 handler only sets edge flags
    unsafe { NVIC::unmask(pac::Interrupt::EXTI4_15) };

    rprintln!("Tap buttons configured on PB4 (A) and PB5 (B)");
}

fn setup_sampler(
    pa0: gpioa::PA0<Input<Floating>>,
    pa1: gpioa::PA1<Input<Floating>>,
    pa4: gpioa::PA4<Input<Floating>>,
    adc: pac::ADC,
    rcc: &mut Rcc,
) {
    let (x, y, z) = cortex_m::interrupt::free(|cs| {
        (pa0.into_analog(cs), pa1.into_analog(cs), pa4.into_analog(cs))
    });
    let adc = Adc::new(adc, rcc);

    critical_section::with(|cs| {
        SAMPLER.borrow_ref_mut(cs).replace(Sampler { adc, x, y, z });
    });

    rprintln!("ADC configured on PA0, PA1, PA4");
}

fn configure_systick(rcc: &Rcc, syst: &mut SYST) {
    let sysclk_freq = rcc.clocks.sysclk();

    syst.set_clock_source(cortex_m::peripheral::syst::SystClkSource::Core);
    syst.set_reload((sysclk_freq.0 / SAMPLE_RATE_HZ) - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();

    rprintln!("SysTick configured for {} Hz tilt sampling", SAMPLE_RATE_HZ);
}
