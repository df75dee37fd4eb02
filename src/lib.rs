#![cfg_attr(not(test), no_std)]

pub mod api;
pub mod boards;
pub mod config;
pub mod mcu;
pub mod pwm;
pub mod regs;
pub mod support;
pub mod util;

pub use mcu::{Mcu, Stm32f0};
pub use pwm::{Descriptor, Fault, PwmOut, TimingBase};
