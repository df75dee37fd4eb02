use super::Reg;

#[repr(C)]
pub struct RegisterBlock {
    pub moder: Reg,
    pub otyper: Reg,
    pub ospeedr: Reg,
    pub pupdr: Reg,
    pub idr: Reg,
    pub odr: Reg,
    pub bsrr: Reg,
    pub lckr: Reg,
    /// AFRL (pins 0..7) and AFRH (pins 8..15).
    pub afr: [Reg; 2],
    pub brr: Reg,
}

/// MODER encodings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u32)]
pub enum Mode {
    Input = 0b00,
    Output = 0b01,
    Alternate = 0b10,
    Analog = 0b11,
}

impl RegisterBlock {
    /// Reset image of ports B..F.
    pub const RESET: Self = Self {
        moder: Reg::new(0),
        otyper: Reg::new(0),
        ospeedr: Reg::new(0),
        pupdr: Reg::new(0),
        idr: Reg::new(0),
        odr: Reg::new(0),
        bsrr: Reg::new(0),
        lckr: Reg::new(0),
        afr: [Reg::new(0), Reg::new(0)],
        brr: Reg::new(0),
    };

    /// Port A comes out of reset with PA13/PA14 on SWD.
    pub const RESET_A: Self = Self {
        moder: Reg::new(0x2800_0000),
        ospeedr: Reg::new(0x0C00_0000),
        pupdr: Reg::new(0x2400_0000),
        ..Self::RESET
    };

    pub fn set_mode(&self, index: u8, mode: Mode) {
        self.moder.write_field(2 * index as u32, 2, mode as u32);
    }

    pub fn mode(&self, index: u8) -> u32 {
        self.moder.read_field(2 * index as u32, 2)
    }

    pub fn set_push_pull(&self, index: u8) {
        self.otyper.clear_bits(1 << index);
    }

    /// Low speed.
    pub fn set_default_speed(&self, index: u8) {
        self.ospeedr.write_field(2 * index as u32, 2, 0);
    }

    /// No pull-up, no pull-down.
    pub fn set_floating(&self, index: u8) {
        self.pupdr.write_field(2 * index as u32, 2, 0);
    }

    /// Route pin `index` to alternate function `af`.
    pub fn set_alternate_function(&self, index: u8, af: u8) {
        let reg = &self.afr[(index / 8) as usize];
        reg.write_field(4 * (index % 8) as u32, 4, af as u32);
    }

    pub fn alternate_function(&self, index: u8) -> u8 {
        self.afr[(index / 8) as usize].read_field(4 * (index % 8) as u32, 4) as u8
    }

    /// Drive the masked pins low through BRR.
    pub fn reset_pins(&self, mask: u16) {
        self.brr.write(mask as u32);
    }
}
