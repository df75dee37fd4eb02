use super::{Fault, TimerId};
use crate::regs::rcc::{Bus, ClockGate};
use crate::regs::tim::CcChannel;

/// One GPIO pin of a port, encoded as a single-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u16);

impl Pin {
    pub const P0: Pin = Pin(1 << 0);
    pub const P1: Pin = Pin(1 << 1);
    pub const P2: Pin = Pin(1 << 2);
    pub const P3: Pin = Pin(1 << 3);
    pub const P4: Pin = Pin(1 << 4);
    pub const P5: Pin = Pin(1 << 5);
    pub const P6: Pin = Pin(1 << 6);
    pub const P7: Pin = Pin(1 << 7);
    pub const P8: Pin = Pin(1 << 8);
    pub const P9: Pin = Pin(1 << 9);
    pub const P10: Pin = Pin(1 << 10);
    pub const P11: Pin = Pin(1 << 11);
    pub const P12: Pin = Pin(1 << 12);
    pub const P13: Pin = Pin(1 << 13);
    pub const P14: Pin = Pin(1 << 14);
    pub const P15: Pin = Pin(1 << 15);

    /// Raw mask as found in wiring tables. Not checked here, see [`Pin::index`].
    pub const fn from_mask(mask: u16) -> Self {
        Self(mask)
    }

    pub const fn mask(self) -> u16 {
        self.0
    }

    /// Bit position 0..=15 of the pin.
    pub const fn index(self) -> Result<u8, Fault> {
        if self.0.count_ones() == 1 {
            Ok(self.0.trailing_zeros() as u8)
        } else {
            Err(Fault::InvalidPin)
        }
    }
}

/// Alternate function selector written to AFRL/AFRH.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AltFunction(pub u8);

impl AltFunction {
    pub const AF0: AltFunction = AltFunction(0);
    pub const AF1: AltFunction = AltFunction(1);
    pub const AF2: AltFunction = AltFunction(2);
    pub const AF3: AltFunction = AltFunction(3);
    pub const AF4: AltFunction = AltFunction(4);
    pub const AF5: AltFunction = AltFunction(5);
    pub const AF6: AltFunction = AltFunction(6);
    pub const AF7: AltFunction = AltFunction(7);

    pub const fn code(self) -> Result<u8, Fault> {
        if self.0 <= 0xF {
            Ok(self.0)
        } else {
            Err(Fault::InvalidAlternateFunction)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    pub const COUNT: usize = 6;

    pub const fn offset(self) -> usize {
        self as usize
    }

    /// IOPxEN bits start at 17 in AHBENR.
    pub const fn clock(self) -> ClockGate {
        ClockGate {
            bus: Bus::Ahb,
            bit: 17 + self as u8,
        }
    }
}

/// Compare channel number as written in a wiring table, plus whether the
/// table means its complementary (`CHxN`) output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel {
    number: u8,
    complementary: bool,
}

impl Channel {
    pub const CH1: Channel = Channel::new(1);
    pub const CH2: Channel = Channel::new(2);
    pub const CH3: Channel = Channel::new(3);
    pub const CH4: Channel = Channel::new(4);
    pub const CH1N: Channel = Channel::CH1.complementary();
    pub const CH2N: Channel = Channel::CH2.complementary();
    pub const CH3N: Channel = Channel::CH3.complementary();

    pub const fn new(number: u8) -> Self {
        Self {
            number,
            complementary: false,
        }
    }

    pub const fn complementary(self) -> Self {
        Self {
            number: self.number,
            complementary: true,
        }
    }

    pub const fn number(self) -> u8 {
        self.number
    }

    pub const fn is_complementary(self) -> bool {
        self.complementary
    }

    pub const fn compare_channel(self) -> Result<CcChannel, Fault> {
        match self.number {
            1 => Ok(CcChannel::C1),
            2 => Ok(CcChannel::C2),
            3 => Ok(CcChannel::C3),
            4 => Ok(CcChannel::C4),
            _ => Err(Fault::InvalidChannel),
        }
    }
}

/// Wiring of one physical PWM output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Descriptor {
    pub pin: Pin,
    pub af: AltFunction,
    pub port: Port,
    pub channel: Channel,
    pub timer: TimerId,
}

/// A descriptor that passed [`Descriptor::validate`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Checked {
    pub pin_index: u8,
    pub af: u8,
    pub cc: CcChannel,
}

impl Descriptor {
    pub const fn new(
        pin: Pin,
        af: AltFunction,
        port: Port,
        channel: Channel,
        timer: TimerId,
    ) -> Self {
        Self {
            pin,
            af,
            port,
            channel,
            timer,
        }
    }

    pub(crate) fn validate(&self) -> Result<Checked, Fault> {
        let pin_index = self.pin.index()?;
        let af = self.af.code()?;
        let cc = self.channel.compare_channel()?;

        let caps = self.timer.capabilities();
        if !caps.channels.contains(cc) {
            return Err(Fault::ChannelNotOnTimer);
        }
        if self.channel.is_complementary() && !caps.complementary.contains(cc) {
            return Err(Fault::NoComplementaryOutput);
        }

        Ok(Checked { pin_index, af, cc })
    }
}
