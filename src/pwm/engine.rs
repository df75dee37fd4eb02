use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use fugit_timer::HertzU32;
use heapless::Vec;

use super::{init, Descriptor, Fault, TimerId, TimingBase};
use crate::mcu::Mcu;
use crate::util::{debug, info, warn};

/// PWM output engine.
///
/// Borrows the registered descriptor table for `'t`; index `n` into that
/// table is channel `n` for [`PwmOut::set_duty`]. Prescaler and period are
/// shared by every timer the table references.
pub struct PwmOut<'t, M: Mcu> {
    mcu: M,
    table: Option<&'t [Descriptor]>,
    timers: Vec<TimerId, { TimerId::COUNT }>,
    timing: TimingBase,
}

impl<'t, M: Mcu> PwmOut<'t, M> {
    pub fn new(mcu: M) -> Self {
        Self::with_timing(mcu, TimingBase::default())
    }

    pub fn with_timing(mcu: M, timing: TimingBase) -> Self {
        Self {
            mcu,
            table: None,
            timers: Vec::new(),
            timing,
        }
    }

    /// Configure every output of `table` and make it the active table.
    ///
    /// Descriptors are brought up in order with the current timing base. The
    /// first invalid one aborts registration; outputs configured before it
    /// keep running, but no table is active afterwards.
    pub fn register(&mut self, table: &'t [Descriptor]) -> Result<usize, Fault> {
        if table.is_empty() {
            warn!("refusing empty descriptor table");
            return Err(Fault::EmptyTable);
        }

        self.table = None;
        self.timers.clear();

        for (i, desc) in table.iter().enumerate() {
            let checked = desc.validate().map_err(|e| {
                warn!("descriptor {} rejected: {}", i, e);
                e
            })?;

            init::enable_clocks(&self.mcu, desc);
            init::configure_pin(self.mcu.gpio(desc.port), desc, &checked);
            init::init_tim(self.mcu.tim(desc.timer), desc, &checked, self.timing);

            if !self.timers.contains(&desc.timer) {
                let pushed = self.timers.push(desc.timer);
                debug_assert!(pushed.is_ok(), "one entry per TimerId");
            }
        }

        self.table = Some(table);
        info!(
            "{} PWM outputs on {} timers, psc={} arr={}",
            table.len(),
            self.timers.len(),
            self.timing.prescaler,
            self.timing.period
        );
        Ok(table.len())
    }

    /// Number of addressable channels, 0 when nothing is registered.
    pub fn channels(&self) -> usize {
        self.table.map_or(0, |t| t.len())
    }

    pub fn timing(&self) -> TimingBase {
        self.timing
    }

    pub fn prescaler(&self) -> u16 {
        self.timing.prescaler
    }

    pub fn period(&self) -> u16 {
        self.timing.period
    }

    /// Largest compare value that still gives a low phase each cycle.
    pub fn max_duty(&self) -> u16 {
        self.timing.period
    }

    /// Rewrite PSC of every timer in use. Counters keep running, the cycle
    /// in flight may come out at the wrong length.
    pub fn set_prescaler(&mut self, prescaler: u16) {
        self.timing.prescaler = prescaler;
        for &t in &self.timers {
            self.mcu.tim(t).set_prescaler(prescaler);
        }
        debug!("prescaler set to {}", prescaler);
    }

    /// Rewrite ARR of every timer in use. Each counter is paused and reset to
    /// zero around the write so it never sits above the new top.
    pub fn set_period(&mut self, period: u16) {
        self.timing.period = period;
        for &t in &self.timers {
            let tim = self.mcu.tim(t);
            let cr1 = tim.cr1.read();
            tim.stop();
            tim.set_auto_reload(period);
            tim.reset_counter();
            tim.cr1.write(cr1);
        }
        debug!("period set to {}", period);
    }

    /// Keep the period and pick the prescaler closest to `freq`.
    pub fn set_frequency(&mut self, timer_clock: HertzU32, freq: HertzU32) -> Result<(), Fault> {
        let timing = TimingBase::for_frequency(timer_clock, freq, self.timing.period)
            .map_err(|e| {
                warn!("{} Hz unreachable with period {}", freq.to_Hz(), self.timing.period);
                e
            })?;
        self.set_prescaler(timing.prescaler);
        Ok(())
    }

    fn descriptor(&self, index: usize) -> Result<&'t Descriptor, Fault> {
        self.table
            .ok_or(Fault::NotRegistered)?
            .get(index)
            .ok_or(Fault::IndexOutOfRange)
    }

    /// Write the compare value of channel `index`.
    ///
    /// Values above the period are accepted and keep the output permanently
    /// active.
    pub fn set_duty(&self, index: usize, value: u16) -> Result<(), Fault> {
        let desc = self.descriptor(index)?;
        let cc = desc.channel.compare_channel()?;
        self.mcu.tim(desc.timer).ccr(cc).write(value as u32);
        Ok(())
    }

    /// Compare value currently in hardware for channel `index`.
    pub fn duty(&self, index: usize) -> Result<u16, Fault> {
        let desc = self.descriptor(index)?;
        let cc = desc.channel.compare_channel()?;
        Ok(self.mcu.tim(desc.timer).ccr(cc).read() as u16)
    }

    pub fn set_duty_percent(&self, index: usize, percent: f32) -> Result<(), Fault> {
        self.set_duty(
            index,
            crate::support::duty_for_percent(percent, self.timing.period),
        )
    }

    /// Handle to a single output.
    pub fn channel(&self, index: usize) -> Result<PwmChannel<'_, 't, M>, Fault> {
        self.descriptor(index)?;
        Ok(PwmChannel {
            engine: self,
            index,
        })
    }
}

/// One output of a [`PwmOut`], usable wherever an `embedded-hal` PWM pin is
/// expected.
pub struct PwmChannel<'e, 't, M: Mcu> {
    engine: &'e PwmOut<'t, M>,
    index: usize,
}

impl<M: Mcu> PwmChannel<'_, '_, M> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<M: Mcu> ErrorType for PwmChannel<'_, '_, M> {
    type Error = Fault;
}

impl<M: Mcu> SetDutyCycle for PwmChannel<'_, '_, M> {
    /// `period + 1` is the first compare value that keeps the output high for
    /// the whole cycle. Saturates for the maximum period.
    fn max_duty_cycle(&self) -> u16 {
        self.engine.period().saturating_add(1)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.engine.set_duty(self.index, duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards;
    use crate::mcu::FakeMcu;
    use crate::pwm::{AltFunction, Channel, Pin, Port};
    use crate::regs::tim::{self, CcChannel, OcMode};
    use fugit_timer::RateExtU32;

    fn ccr(mcu: &FakeMcu, t: TimerId, ch: CcChannel) -> u32 {
        mcu.tim[t.offset()].ccr(ch).read()
    }

    #[test]
    fn empty_table_is_refused() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        assert_eq!(pwm.register(&[]), Err(Fault::EmptyTable));
        assert_eq!(pwm.channels(), 0);
    }

    #[test]
    fn duty_before_registration() {
        let mcu = FakeMcu::new();
        let pwm = PwmOut::new(&mcu);
        assert_eq!(pwm.set_duty(0, 10), Err(Fault::NotRegistered));
        assert_eq!(pwm.duty(0), Err(Fault::NotRegistered));
        assert!(pwm.channel(0).is_err());
    }

    #[test]
    fn two_channel_product() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);

        assert_eq!(pwm.register(&boards::TWO_CHANNEL), Ok(2));
        pwm.set_prescaler(500);
        pwm.set_period(500);
        pwm.set_duty(0, 20).unwrap();
        pwm.set_duty(1, 40).unwrap();

        let tim1 = &mcu.tim[TimerId::Tim1.offset()];
        assert_eq!(tim1.ccr(CcChannel::C3).read(), 20);
        assert_eq!(tim1.ccr(CcChannel::C4).read(), 40);
        assert_eq!(tim1.psc.read(), 500);
        assert_eq!(tim1.arr.read(), 500);
        assert!(tim1.is_running());
        assert_eq!(tim1.output_compare_mode(CcChannel::C3), OcMode::PwmMode1 as u32);
        assert_eq!(tim1.output_compare_mode(CcChannel::C4), OcMode::PwmMode1 as u32);
    }

    #[test]
    fn eight_channel_product() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);

        assert_eq!(pwm.register(&boards::EIGHT_CHANNEL), Ok(8));
        pwm.set_prescaler(500);
        pwm.set_period(500);
        for i in 0..8 {
            pwm.set_duty(i, 20 * (i as u16 + 1)).unwrap();
        }

        for (i, d) in boards::EIGHT_CHANNEL.iter().enumerate() {
            let cc = d.channel.compare_channel().unwrap();
            assert_eq!(ccr(&mcu, d.timer, cc), 20 * (i as u32 + 1));
            let tim = &mcu.tim[d.timer.offset()];
            assert_eq!(tim.psc.read(), 500);
            assert_eq!(tim.arr.read(), 500);
            assert!(tim.is_running());
            assert!(tim.output_enabled(cc, d.channel.is_complementary()));
        }

        // PB7 drives TIM17 CH1N
        let tim17 = &mcu.tim[TimerId::Tim17.offset()];
        assert!(tim17.output_enabled(CcChannel::C1, true));
        assert!(!tim17.output_enabled(CcChannel::C1, false));
        assert_eq!(tim17.bdtr.read(), tim::BDTR_MOE);
        // TIM2 is not in the table
        assert_eq!(mcu.tim[TimerId::Tim2.offset()].psc.read(), 0);
    }

    #[test]
    fn registration_ungates_clocks() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::EIGHT_CHANNEL).unwrap();

        for d in &boards::EIGHT_CHANNEL {
            assert!(mcu.rcc.is_enabled(d.port.clock()));
            assert!(mcu.rcc.is_enabled(d.timer.capabilities().clock));
        }
        assert_eq!(mcu.rcc.apb2enr.read(), (1 << 11) | (1 << 16) | (1 << 17) | (1 << 18));
        assert_eq!(mcu.rcc.apb1enr.read(), (1 << 1) | (1 << 8));
    }

    #[test]
    fn every_index_is_addressable() {
        for table in [&boards::TWO_CHANNEL[..], &boards::FOUR_CHANNEL[..], &boards::EIGHT_CHANNEL[..]] {
            for n in 1..=table.len() {
                let mcu = FakeMcu::new();
                let mut pwm = PwmOut::new(&mcu);
                assert_eq!(pwm.register(&table[..n]), Ok(n));
                for i in 0..n {
                    assert_eq!(pwm.set_duty(i, 1), Ok(()));
                }
                assert_eq!(pwm.set_duty(n, 1), Err(Fault::IndexOutOfRange));
            }
        }
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::EIGHT_CHANNEL).unwrap();
        let once = mcu.snapshot();
        pwm.register(&boards::EIGHT_CHANNEL).unwrap();
        assert_eq!(mcu.snapshot(), once);
    }

    #[test]
    fn registration_ignores_leftover_polarity_and_break_bits() {
        let clean = FakeMcu::new();
        PwmOut::new(&clean).register(&boards::TWO_CHANNEL).unwrap();

        let dirty = FakeMcu::new();
        let tim1 = &dirty.tim[TimerId::Tim1.offset()];
        // CC3P and BKE
        tim1.ccer.write(1 << 9);
        tim1.bdtr.write(1 << 12);
        PwmOut::new(&dirty).register(&boards::TWO_CHANNEL).unwrap();

        assert_eq!(tim1.ccer.read(), 0x1100);
        assert_eq!(tim1.bdtr.read(), tim::BDTR_MOE);
        assert_eq!(dirty.snapshot(), clean.snapshot());
    }

    #[test]
    fn invalid_channel_aborts_without_rollback() {
        static TABLE: [Descriptor; 2] = [
            Descriptor::new(Pin::P6, AltFunction::AF1, Port::A, Channel::CH1, TimerId::Tim3),
            Descriptor::new(Pin::P8, AltFunction::AF2, Port::A, Channel::new(5), TimerId::Tim1),
        ];

        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::TWO_CHANNEL).unwrap();

        assert_eq!(pwm.register(&TABLE), Err(Fault::InvalidChannel));
        assert_eq!(pwm.channels(), 0);
        assert_eq!(pwm.set_duty(0, 10), Err(Fault::NotRegistered));
        // first descriptor stays configured
        assert!(mcu.tim[TimerId::Tim3.offset()].is_running());
    }

    #[test]
    fn wrong_channel_on_single_channel_timer() {
        static TABLE: [Descriptor; 1] = [Descriptor::new(
            Pin::P4,
            AltFunction::AF4,
            Port::A,
            Channel::CH2,
            TimerId::Tim14,
        )];

        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        assert_eq!(pwm.register(&TABLE), Err(Fault::ChannelNotOnTimer));
        assert!(!mcu.tim[TimerId::Tim14.offset()].is_running());
    }

    #[test]
    fn out_of_range_duty_writes_nothing() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::FOUR_CHANNEL).unwrap();
        let before = mcu.snapshot();
        assert_eq!(pwm.set_duty(4, 100), Err(Fault::IndexOutOfRange));
        assert_eq!(pwm.set_duty(usize::MAX, 100), Err(Fault::IndexOutOfRange));
        assert_eq!(mcu.snapshot(), before);
    }

    #[test]
    fn duty_above_period_is_accepted() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::TWO_CHANNEL).unwrap();
        pwm.set_period(100);
        assert_eq!(pwm.set_duty(0, 5000), Ok(()));
        assert_eq!(pwm.duty(0), Ok(5000));
    }

    #[test]
    fn timing_base_round_trips() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        for v in (0..=u16::MAX).step_by(257).chain([u16::MAX]) {
            pwm.set_prescaler(v);
            assert_eq!(pwm.prescaler(), v);
            pwm.set_period(v);
            assert_eq!(pwm.period(), v);
        }
    }

    #[test]
    fn period_change_resets_running_counter() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::FOUR_CHANNEL).unwrap();

        let tim3 = &mcu.tim[TimerId::Tim3.offset()];
        tim3.cnt.write(900);
        pwm.set_period(500);

        assert_eq!(tim3.cnt.read(), 0);
        assert_eq!(tim3.arr.read(), 500);
        assert!(tim3.is_running());
    }

    #[test]
    fn prescaler_change_keeps_counter_running() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::FOUR_CHANNEL).unwrap();

        let tim3 = &mcu.tim[TimerId::Tim3.offset()];
        tim3.cnt.write(900);
        pwm.set_prescaler(12);

        assert_eq!(tim3.cnt.read(), 900);
        assert_eq!(tim3.psc.read(), 12);
        assert!(tim3.is_running());
    }

    #[test]
    fn default_timing_base() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        assert_eq!(pwm.prescaler(), 0xFFFF);
        assert_eq!(pwm.period(), 0xFFFF);

        pwm.register(&boards::TWO_CHANNEL).unwrap();
        let tim1 = &mcu.tim[TimerId::Tim1.offset()];
        assert_eq!(tim1.psc.read(), 0xFFFF);
        assert_eq!(tim1.arr.read(), 0xFFFF);
    }

    #[test]
    fn max_duty_follows_period() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.set_period(500);
        assert_eq!(pwm.max_duty(), 500);
        pwm.set_period(1);
        assert_eq!(pwm.max_duty(), 1);
    }

    #[test]
    fn timing_base_is_used_at_registration() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::with_timing(&mcu, TimingBase { prescaler: 47, period: 999 });
        pwm.register(&boards::TWO_CHANNEL).unwrap();

        let tim1 = &mcu.tim[TimerId::Tim1.offset()];
        assert_eq!(tim1.psc.read(), 47);
        assert_eq!(tim1.arr.read(), 999);
    }

    #[test]
    fn frequency_keeps_period() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::TWO_CHANNEL).unwrap();
        pwm.set_period(999);

        assert_eq!(pwm.set_frequency(48.MHz(), 1.kHz()), Ok(()));
        assert_eq!(pwm.timing(), TimingBase { prescaler: 47, period: 999 });
        assert_eq!(mcu.tim[TimerId::Tim1.offset()].psc.read(), 47);

        assert_eq!(
            pwm.set_frequency(48.MHz(), 0.Hz()),
            Err(Fault::FrequencyOutOfRange)
        );
        assert_eq!(pwm.prescaler(), 47);
    }

    #[test]
    fn percent_duty() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::TWO_CHANNEL).unwrap();
        pwm.set_period(999);
        pwm.set_duty_percent(1, 25.0).unwrap();
        assert_eq!(pwm.duty(1), Ok(250));
    }

    #[test]
    fn channel_handle_drives_its_output() {
        let mcu = FakeMcu::new();
        let mut pwm = PwmOut::new(&mcu);
        pwm.register(&boards::FOUR_CHANNEL).unwrap();
        pwm.set_period(99);

        // PA8, TIM1 CH1
        let mut ch = pwm.channel(2).unwrap();
        assert_eq!(ch.index(), 2);
        assert_eq!(ch.max_duty_cycle(), 100);
        ch.set_duty_cycle_percent(50).unwrap();
        assert_eq!(ccr(&mcu, TimerId::Tim1, CcChannel::C1), 50);
        ch.set_duty_cycle_fully_on().unwrap();
        assert_eq!(ccr(&mcu, TimerId::Tim1, CcChannel::C1), 100);
        ch.set_duty_cycle_fraction(1, 4).unwrap();
        assert_eq!(ccr(&mcu, TimerId::Tim1, CcChannel::C1), 25);

        assert_eq!(pwm.channel(4).err(), Some(Fault::IndexOutOfRange));
    }
}
