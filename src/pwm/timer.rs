use crate::regs::rcc::{Bus, ClockGate};
use crate::regs::tim::CcChannel;

/// Timer peripherals the engine can drive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    Tim1,
    Tim2,
    Tim3,
    Tim14,
    Tim15,
    Tim16,
    Tim17,
}

/// Set of compare channels, bit n = channel n + 1.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub const NONE: Self = Self(0);
    pub const CH1: Self = Self(0b0001);
    pub const CH1_CH2: Self = Self(0b0011);
    pub const CH1_TO_CH3: Self = Self(0b0111);
    pub const ALL: Self = Self(0b1111);

    pub const fn contains(self, ch: CcChannel) -> bool {
        self.0 & (1 << ch.offset()) != 0
    }
}

/// What a timer can do, as far as PWM generation is concerned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    pub channels: ChannelSet,
    pub complementary: ChannelSet,
    /// Break/dead-time unit present: outputs stay off until BDTR.MOE is set.
    pub break_dead_time: bool,
    pub clock: ClockGate,
}

impl TimerId {
    pub const COUNT: usize = 7;

    pub const fn offset(self) -> usize {
        self as usize
    }

    pub const fn capabilities(self) -> Capabilities {
        const fn caps(
            channels: ChannelSet,
            complementary: ChannelSet,
            break_dead_time: bool,
            bus: Bus,
            bit: u8,
        ) -> Capabilities {
            Capabilities {
                channels,
                complementary,
                break_dead_time,
                clock: ClockGate { bus, bit },
            }
        }

        match self {
            Self::Tim1 => caps(ChannelSet::ALL, ChannelSet::CH1_TO_CH3, true, Bus::Apb2, 11),
            Self::Tim2 => caps(ChannelSet::ALL, ChannelSet::NONE, false, Bus::Apb1, 0),
            Self::Tim3 => caps(ChannelSet::ALL, ChannelSet::NONE, false, Bus::Apb1, 1),
            Self::Tim14 => caps(ChannelSet::CH1, ChannelSet::NONE, false, Bus::Apb1, 8),
            Self::Tim15 => caps(ChannelSet::CH1_CH2, ChannelSet::CH1, true, Bus::Apb2, 16),
            Self::Tim16 => caps(ChannelSet::CH1, ChannelSet::CH1, true, Bus::Apb2, 17),
            Self::Tim17 => caps(ChannelSet::CH1, ChannelSet::CH1, true, Bus::Apb2, 18),
        }
    }
}
