#![no_std]

pub mod counter;
pub mod rtt_display;
