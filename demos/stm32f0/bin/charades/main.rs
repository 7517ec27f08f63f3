#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f0xx_hal::pac::{self, interrupt};

use stm32f0_demos::counter::Tim2Counter;
use stm32f0_demos::rtt_display::RttDisplay;
use tilt_charades::{
    ButtonId, ClockConfig, Controller, CycleCounter, GameConfig, SystemContext, WordDeck,
    DEFAULT_WORDS,
};

mod hardware_setup;

use hardware_setup::{BUTTON_A_LINE, BUTTON_B_LINE};

/// The STM32F0 flash supports at most one wait state
const CONFIG: GameConfig = GameConfig {
    clock: ClockConfig::DEFAULT.with_flash_wait_states(1),
    ..GameConfig::DEFAULT
};

static CTX: SystemContext<Tim2Counter> = SystemContext::new(Tim2Counter, &CONFIG);

/// TIM2 update interrupt - once per counter wrap
#[interrupt]
fn TIM2() {
    CTX.on_rollover();
}

/// Falling edge on a tap button
#[interrupt]
fn EXTI4_15() {
    // SAFETY: PR is write-one-to-clear; only the button lines are cleared
    let exti = unsafe { &*pac::EXTI::ptr() };
    let pending = exti.pr.read().bits() & (BUTTON_A_LINE | BUTTON_B_LINE);
    exti.pr.write(|w| unsafe { w.bits(pending) });

    if pending & BUTTON_A_LINE != 0 {
        CTX.on_button_edge(ButtonId::A);
    }
    if pending & BUTTON_B_LINE != 0 {
        CTX.on_button_edge(ButtonId::B);
    }
}

/// SysTick - tilt sampling
#[cortex_m_rt::exception]
fn SysTick() {
    hardware_setup::sample_tilt(&CTX);
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("=== Tilt Charades ===");
    rprintln!("Starting initialization...");

    let hw = hardware_setup::init_hardware(&CTX);
    rprintln!("Hardware initialized successfully");

    let seed = CTX.clock().counter().current_value();
    let deck = WordDeck::new(&DEFAULT_WORDS, seed).unwrap();
    let mut controller = Controller::new(hw.select, deck, &CONFIG).unwrap();
    let mut display = RttDisplay::new();

    rprintln!("=== System Ready ===");
    rprintln!("  A (PB4): start a round");
    rprintln!("  B (PB5): instructions");
    rprintln!("  Select (PC13): end round / continue");

    controller.run(&CTX, &mut display, cortex_m::asm::wfi)
}
