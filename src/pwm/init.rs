//! Bringing one descriptor's pin and timer channel up.

use super::descriptor::Checked;
use super::{Descriptor, TimingBase};
use crate::mcu::Mcu;
use crate::regs::gpio::{self, Mode};
use crate::regs::tim::{self, OcMode};

/// Ungate the port and timer clocks of `desc`.
pub(crate) fn enable_clocks<M: Mcu>(mcu: &M, desc: &Descriptor) {
    let rcc = mcu.rcc();
    rcc.enable(desc.port.clock());
    rcc.enable(desc.timer.capabilities().clock);
}

/// Hand the pin over to the timer: push-pull, low speed, no pulls.
///
/// The output is forced low first so the switch to the alternate function
/// does not glitch high.
pub(crate) fn configure_pin(port: &gpio::RegisterBlock, desc: &Descriptor, checked: &Checked) {
    let idx = checked.pin_index;

    port.reset_pins(desc.pin.mask());
    port.set_mode(idx, Mode::Alternate);
    port.set_push_pull(idx);
    port.set_default_speed(idx);
    port.set_floating(idx);
    port.set_alternate_function(idx, checked.af);
}

/// Put the descriptor's compare channel in PWM mode 1 and (re)start the
/// timer with `timing`.
pub(crate) fn init_tim(
    tim: &tim::RegisterBlock,
    desc: &Descriptor,
    checked: &Checked,
    timing: TimingBase,
) {
    let cc = checked.cc;

    tim.stop();
    tim.ccr(cc).write(0);
    tim.set_output_compare_mode(cc, OcMode::PwmMode1);
    tim.enable_output(cc, desc.channel.is_complementary());
    if desc.timer.capabilities().break_dead_time {
        tim.enable_main_output();
    }
    tim.set_prescaler(timing.prescaler);
    tim.set_auto_reload(timing.period);
    tim.start();
}
