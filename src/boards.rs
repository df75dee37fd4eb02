//! Output wiring of the known products.
//!
//! One constant per pin wired to a timer output, and one table per product
//! built from them. The position of a descriptor in its table is the channel
//! index used with [`PwmOut::set_duty`](crate::pwm::PwmOut::set_duty).

use crate::pwm::{AltFunction, Channel, Descriptor, Pin, Port, TimerId};

pub const PA6: Descriptor =
    Descriptor::new(Pin::P6, AltFunction::AF5, Port::A, Channel::CH1, TimerId::Tim16);
pub const PA7: Descriptor =
    Descriptor::new(Pin::P7, AltFunction::AF1, Port::A, Channel::CH2, TimerId::Tim3);
pub const PA8: Descriptor =
    Descriptor::new(Pin::P8, AltFunction::AF2, Port::A, Channel::CH1, TimerId::Tim1);
pub const PA9: Descriptor =
    Descriptor::new(Pin::P9, AltFunction::AF2, Port::A, Channel::CH2, TimerId::Tim1);
pub const PA10: Descriptor =
    Descriptor::new(Pin::P10, AltFunction::AF2, Port::A, Channel::CH3, TimerId::Tim1);
pub const PA11: Descriptor =
    Descriptor::new(Pin::P11, AltFunction::AF2, Port::A, Channel::CH4, TimerId::Tim1);

pub const PB1: Descriptor =
    Descriptor::new(Pin::P1, AltFunction::AF0, Port::B, Channel::CH1, TimerId::Tim14);
pub const PB4: Descriptor =
    Descriptor::new(Pin::P4, AltFunction::AF1, Port::B, Channel::CH1, TimerId::Tim3);
pub const PB7: Descriptor =
    Descriptor::new(Pin::P7, AltFunction::AF2, Port::B, Channel::CH1N, TimerId::Tim17);
pub const PB14: Descriptor =
    Descriptor::new(Pin::P14, AltFunction::AF1, Port::B, Channel::CH1, TimerId::Tim15);

/// WB-PWM2.
pub static TWO_CHANNEL: [Descriptor; 2] = [PA10, PA11];

/// WB-PWM4.
pub static FOUR_CHANNEL: [Descriptor; 4] = [PA6, PA10, PA8, PA7];

/// WB-PWM8.
pub static EIGHT_CHANNEL: [Descriptor; 8] = [PB14, PB7, PA6, PA10, PA8, PA7, PB1, PB4];
