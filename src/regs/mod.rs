//! Memory-mapped register blocks of the peripherals the PWM engine touches.
//!
//! Each block is `#[repr(C)]` and matches the reference manual layout, so a
//! `&RegisterBlock` can point either at the real peripheral or at a plain
//! value in RAM holding the `RESET` image.

use vcell::VolatileCell;

pub mod gpio;
pub mod rcc;
pub mod tim;

/// One 32-bit hardware register.
#[repr(transparent)]
pub struct Reg {
    cell: VolatileCell<u32>,
}

impl Reg {
    pub const fn new(reset: u32) -> Self {
        Self {
            cell: VolatileCell::new(reset),
        }
    }

    #[inline(always)]
    pub fn read(&self) -> u32 {
        self.cell.get()
    }

    #[inline(always)]
    pub fn write(&self, value: u32) {
        self.cell.set(value)
    }

    /// Read-modify-write.
    #[inline(always)]
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        self.write(f(self.read()))
    }

    #[inline(always)]
    pub fn set_bits(&self, mask: u32) {
        self.modify(|r| r | mask)
    }

    #[inline(always)]
    pub fn clear_bits(&self, mask: u32) {
        self.modify(|r| r & !mask)
    }

    /// Replace the `width`-bit field at `offset` with `value`.
    #[inline(always)]
    pub fn write_field(&self, offset: u32, width: u32, value: u32) {
        let mask = ((1u32 << width) - 1) << offset;
        self.modify(|r| (r & !mask) | ((value << offset) & mask))
    }

    #[inline(always)]
    pub fn read_field(&self, offset: u32, width: u32) -> u32 {
        (self.read() >> offset) & ((1u32 << width) - 1)
    }
}
