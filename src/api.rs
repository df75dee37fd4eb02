//! Flat call surface with integer status codes, for code written against the
//! `init_pwm_out`/`pwm_out_set` style interface. `0` is success, every fault
//! is [`FAULT`].

use crate::mcu::Mcu;
use crate::pwm::{Descriptor, Fault, PwmOut};

pub const OK: i32 = 0;
pub const FAULT: i32 = Fault::CODE;

fn status(r: Result<(), Fault>) -> i32 {
    match r {
        Ok(()) => OK,
        Err(e) => e.code(),
    }
}

/// Register the first `count` entries of `table`.
pub fn init_pwm_out<'t, M: Mcu>(
    pwm: &mut PwmOut<'t, M>,
    table: Option<&'t [Descriptor]>,
    count: u8,
) -> i32 {
    let registered = table.ok_or(Fault::NoTable).and_then(|t| {
        let t = t.get(..count as usize).ok_or(Fault::ShortTable)?;
        pwm.register(t)
    });
    status(registered.map(|_| ()))
}

pub fn set_pwm_prescaler<M: Mcu>(pwm: &mut PwmOut<'_, M>, value: u16) {
    pwm.set_prescaler(value)
}

pub fn get_pwm_prescaler<M: Mcu>(pwm: &PwmOut<'_, M>) -> u16 {
    pwm.prescaler()
}

pub fn set_pwm_max<M: Mcu>(pwm: &mut PwmOut<'_, M>, value: u16) {
    pwm.set_period(value)
}

pub fn get_pwm_max<M: Mcu>(pwm: &PwmOut<'_, M>) -> u16 {
    pwm.period()
}

pub fn pwm_out_set<M: Mcu>(pwm: &PwmOut<'_, M>, index: u8, value: u16) -> i32 {
    status(pwm.set_duty(index as usize, value))
}
