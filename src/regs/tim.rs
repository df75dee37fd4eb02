use super::Reg;

/// Advanced, general purpose and basic timers share this layout; registers a
/// given timer lacks read as zero and ignore writes.
#[repr(C)]
pub struct RegisterBlock {
    pub cr1: Reg,
    pub cr2: Reg,
    pub smcr: Reg,
    pub dier: Reg,
    pub sr: Reg,
    pub egr: Reg,
    /// CCMR1 (channels 1, 2) and CCMR2 (channels 3, 4).
    pub ccmr: [Reg; 2],
    pub ccer: Reg,
    pub cnt: Reg,
    pub psc: Reg,
    pub arr: Reg,
    pub rcr: Reg,
    pub ccr: [Reg; 4],
    pub bdtr: Reg,
    pub dcr: Reg,
    pub dmar: Reg,
}

/// Capture/compare unit of a timer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcChannel {
    C1,
    C2,
    C3,
    C4,
}

impl CcChannel {
    /// Zero-based position, 0 for channel 1.
    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// OCxM encodings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u32)]
pub enum OcMode {
    Frozen = 0b000,
    ActiveOnMatch = 0b001,
    InactiveOnMatch = 0b010,
    Toggle = 0b011,
    ForceInactive = 0b100,
    ForceActive = 0b101,
    /// Output active while CNT < CCRx.
    PwmMode1 = 0b110,
    PwmMode2 = 0b111,
}

pub const CR1_CEN: u32 = 1 << 0;
pub const BDTR_MOE: u32 = 1 << 15;

const CCER_CCE: u32 = 1 << 0;
const CCER_CCNE: u32 = 1 << 2;
/// CCxE, CCxP, CCxNE, CCxNP of one channel.
const CCER_CHANNEL: u32 = 0xF;

impl RegisterBlock {
    pub const RESET: Self = Self {
        cr1: Reg::new(0),
        cr2: Reg::new(0),
        smcr: Reg::new(0),
        dier: Reg::new(0),
        sr: Reg::new(0),
        egr: Reg::new(0),
        ccmr: [Reg::new(0), Reg::new(0)],
        ccer: Reg::new(0),
        cnt: Reg::new(0),
        psc: Reg::new(0),
        arr: Reg::new(0xFFFF),
        rcr: Reg::new(0),
        ccr: [Reg::new(0), Reg::new(0), Reg::new(0), Reg::new(0)],
        bdtr: Reg::new(0),
        dcr: Reg::new(0),
        dmar: Reg::new(0),
    };

    pub fn ccr(&self, ch: CcChannel) -> &Reg {
        &self.ccr[ch.offset()]
    }

    /// Channel 1 and 3 own the low byte of their CCMR, channel 2 and 4 the
    /// high byte. The whole byte is rewritten, so input capture settings,
    /// preload and fast enable go back to zero.
    pub fn set_output_compare_mode(&self, ch: CcChannel, mode: OcMode) {
        let reg = &self.ccmr[ch.offset() / 2];
        let shift = 8 * (ch.offset() as u32 % 2);
        reg.write_field(shift, 8, (mode as u32) << 4);
    }

    pub fn output_compare_mode(&self, ch: CcChannel) -> u32 {
        let shift = 8 * (ch.offset() as u32 % 2);
        self.ccmr[ch.offset() / 2].read_field(shift + 4, 3)
    }

    /// Enable either the primary (CCxE) or the complementary (CCxNE) output of
    /// `ch`, never both. Both polarities go back to active high.
    pub fn enable_output(&self, ch: CcChannel, complementary: bool) {
        let shift = 4 * ch.offset() as u32;
        let bit = if complementary { CCER_CCNE } else { CCER_CCE };
        self.ccer
            .modify(|r| (r & !(CCER_CHANNEL << shift)) | (bit << shift));
    }

    pub fn output_enabled(&self, ch: CcChannel, complementary: bool) -> bool {
        let shift = 4 * ch.offset() as u32;
        let bit = if complementary { CCER_CCNE } else { CCER_CCE };
        self.ccer.read() & (bit << shift) != 0
    }

    /// BDTR gets MOE alone: break input, dead time and off-state selection
    /// are all switched off.
    pub fn enable_main_output(&self) {
        self.bdtr.write(BDTR_MOE);
    }

    /// Clear CR1 entirely, stopping the counter.
    pub fn stop(&self) {
        self.cr1.write(0);
    }

    pub fn start(&self) {
        self.cr1.set_bits(CR1_CEN);
    }

    pub fn is_running(&self) -> bool {
        self.cr1.read() & CR1_CEN != 0
    }

    pub fn set_prescaler(&self, psc: u16) {
        self.psc.write(psc as u32);
    }

    pub fn set_auto_reload(&self, arr: u16) {
        self.arr.write(arr as u32);
    }

    pub fn reset_counter(&self) {
        self.cnt.write(0);
    }
}
