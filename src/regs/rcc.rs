use super::Reg;

/// RCC, only the part up to the peripheral clock-enable registers.
#[repr(C)]
pub struct RegisterBlock {
    pub cr: Reg,
    pub cfgr: Reg,
    pub cir: Reg,
    pub apb2rstr: Reg,
    pub apb1rstr: Reg,
    pub ahbenr: Reg,
    pub apb2enr: Reg,
    pub apb1enr: Reg,
}

/// Peripheral clock-enable register selector.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    Ahb,
    Apb1,
    Apb2,
}

/// Bus plus bit position of one peripheral's clock gate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockGate {
    pub bus: Bus,
    pub bit: u8,
}

impl RegisterBlock {
    pub const RESET: Self = Self {
        cr: Reg::new(0x0000_0083),
        cfgr: Reg::new(0),
        cir: Reg::new(0),
        apb2rstr: Reg::new(0),
        apb1rstr: Reg::new(0),
        ahbenr: Reg::new(0x0000_0014),
        apb2enr: Reg::new(0),
        apb1enr: Reg::new(0),
    };

    fn enable_register(&self, bus: Bus) -> &Reg {
        match bus {
            Bus::Ahb => &self.ahbenr,
            Bus::Apb1 => &self.apb1enr,
            Bus::Apb2 => &self.apb2enr,
        }
    }

    /// Ungate a peripheral clock. Enabling an already running clock is a no-op.
    pub fn enable(&self, gate: ClockGate) {
        self.enable_register(gate.bus).set_bits(1 << gate.bit);
    }

    pub fn is_enabled(&self, gate: ClockGate) -> bool {
        self.enable_register(gate.bus).read() & (1 << gate.bit) != 0
    }
}
