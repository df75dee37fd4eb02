use fugit_timer::HertzU32;

use super::Fault;

/// Prescaler and counter top shared by every timer the engine drives.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingBase {
    pub prescaler: u16,
    /// Auto-reload value; one PWM cycle is `period + 1` counter ticks.
    pub period: u16,
}

impl Default for TimingBase {
    fn default() -> Self {
        Self {
            prescaler: crate::config::DEFAULT_PRESCALER,
            period: crate::config::DEFAULT_PERIOD,
        }
    }
}

impl TimingBase {
    /// Prescaler that brings a `timer_clock` driven counter with top `period`
    /// closest to `freq`. Rounds to the nearest divider. `freq` has to lie in
    /// `MIN_PWM_FREQ_HZ..=MAX_PWM_FREQ_HZ`.
    pub fn for_frequency(
        timer_clock: HertzU32,
        freq: HertzU32,
        period: u16,
    ) -> Result<Self, Fault> {
        let freq = freq.to_Hz();
        if !(crate::config::MIN_PWM_FREQ_HZ..=crate::config::MAX_PWM_FREQ_HZ).contains(&freq) {
            return Err(Fault::FrequencyOutOfRange);
        }
        let freq = freq as u64;

        let counts = (period as u64 + 1) * freq;
        let divider = (timer_clock.to_Hz() as u64 + (counts >> 1)) / counts;
        if divider == 0 || divider > u16::MAX as u64 + 1 {
            return Err(Fault::FrequencyOutOfRange);
        }

        Ok(Self {
            prescaler: (divider - 1) as u16,
            period,
        })
    }

    /// PWM cycle rate this base produces from `timer_clock`.
    pub fn output_frequency(&self, timer_clock: HertzU32) -> HertzU32 {
        let counts = (self.prescaler as u32 + 1) * (self.period as u32 + 1);
        HertzU32::from_raw(timer_clock.to_Hz() / counts)
    }
}
