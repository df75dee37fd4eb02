//! Where the register blocks live.

use crate::pwm::{Port, TimerId};
use crate::regs::{gpio, rcc, tim};

/// Access to the RCC, GPIO and timer register blocks the engine programs.
pub trait Mcu {
    fn rcc(&self) -> &rcc::RegisterBlock;
    fn gpio(&self, port: Port) -> &gpio::RegisterBlock;
    fn tim(&self, timer: TimerId) -> &tim::RegisterBlock;
}

const RCC: usize = 0x4002_1000;
const GPIOA: usize = 0x4800_0000;
const GPIO_STRIDE: usize = 0x400;

/// The peripherals of a real STM32F0 at their fixed addresses.
pub struct Stm32f0 {
    _private: (),
}

impl Stm32f0 {
    /// # Safety
    ///
    /// The caller must make sure nothing else programs the timers and GPIO
    /// pins named in the tables handed to the engine.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }

    const fn tim_base(timer: TimerId) -> usize {
        match timer {
            TimerId::Tim1 => 0x4001_2C00,
            TimerId::Tim2 => 0x4000_0000,
            TimerId::Tim3 => 0x4000_0400,
            TimerId::Tim14 => 0x4000_2000,
            TimerId::Tim15 => 0x4001_4000,
            TimerId::Tim16 => 0x4001_4400,
            TimerId::Tim17 => 0x4001_4800,
        }
    }
}

impl Mcu for Stm32f0 {
    fn rcc(&self) -> &rcc::RegisterBlock {
        unsafe { &*(RCC as *const rcc::RegisterBlock) }
    }

    fn gpio(&self, port: Port) -> &gpio::RegisterBlock {
        let addr = GPIOA + GPIO_STRIDE * port.offset();
        unsafe { &*(addr as *const gpio::RegisterBlock) }
    }

    fn tim(&self, timer: TimerId) -> &tim::RegisterBlock {
        unsafe { &*(Self::tim_base(timer) as *const tim::RegisterBlock) }
    }
}

impl<T: Mcu> Mcu for &T {
    fn rcc(&self) -> &rcc::RegisterBlock {
        T::rcc(self)
    }

    fn gpio(&self, port: Port) -> &gpio::RegisterBlock {
        T::gpio(self, port)
    }

    fn tim(&self, timer: TimerId) -> &tim::RegisterBlock {
        T::tim(self, timer)
    }
}

/// Register blocks in RAM, starting from their reset images.
#[cfg(test)]
pub(crate) struct FakeMcu {
    pub rcc: rcc::RegisterBlock,
    pub gpio: [gpio::RegisterBlock; Port::COUNT],
    pub tim: [tim::RegisterBlock; TimerId::COUNT],
}

#[cfg(test)]
impl FakeMcu {
    pub fn new() -> Self {
        Self {
            rcc: rcc::RegisterBlock::RESET,
            gpio: [
                gpio::RegisterBlock::RESET_A,
                gpio::RegisterBlock::RESET,
                gpio::RegisterBlock::RESET,
                gpio::RegisterBlock::RESET,
                gpio::RegisterBlock::RESET,
                gpio::RegisterBlock::RESET,
            ],
            tim: core::array::from_fn(|_| tim::RegisterBlock::RESET),
        }
    }

    /// Every register of every block, for whole-state comparisons.
    pub fn snapshot(&self) -> std::vec::Vec<u32> {
        fn words<T>(block: &T) -> impl Iterator<Item = u32> + '_ {
            let n = core::mem::size_of::<T>() / 4;
            let base = block as *const T as *const crate::regs::Reg;
            (0..n).map(move |i| unsafe { (*base.add(i)).read() })
        }

        let mut out = std::vec::Vec::new();
        out.extend(words(&self.rcc));
        self.gpio.iter().for_each(|g| out.extend(words(g)));
        self.tim.iter().for_each(|t| out.extend(words(t)));
        out
    }
}

#[cfg(test)]
impl Mcu for FakeMcu {
    fn rcc(&self) -> &rcc::RegisterBlock {
        &self.rcc
    }

    fn gpio(&self, port: Port) -> &gpio::RegisterBlock {
        &self.gpio[port.offset()]
    }

    fn tim(&self, timer: TimerId) -> &tim::RegisterBlock {
        &self.tim[timer.offset()]
    }
}
