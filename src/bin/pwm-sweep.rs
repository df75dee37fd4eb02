#![no_main]
#![no_std]

use panic_abort as _;
use rtic::app;

use stm32f0_pwm_out::util::warn;
use stm32f0_pwm_out::{boards, config, PwmOut, Stm32f0};

//-----------------------------------------------------------------------------

#[app(device = stm32f0xx_hal::pac, peripherals = true, dispatchers = [USART2])]
mod app {
    use super::*;

    use fugit_timer::HertzU32;
    use systick_monotonic::Systick;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        pwm: PwmOut<'static, Stm32f0>,
    }

    #[monotonic(binds = SysTick, default = true)]
    type MonoTimer = Systick<{ config::SYSTICK_RATE_HZ }>;

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        use stm32f0xx_hal::prelude::*;

        let mut flash = ctx.device.FLASH;
        let rcc = ctx
            .device
            .RCC
            .configure()
            .sysclk(config::SYSCLK_HZ.hz())
            .freeze(&mut flash);

        let mono = Systick::new(ctx.core.SYST, rcc.clocks.sysclk().0);

        //---------------------------------------------------------------------

        // APB prescaler is 1, so the timers run from PCLK
        let timer_clock = HertzU32::from_raw(rcc.clocks.pclk().0);

        let mut pwm = PwmOut::new(unsafe { Stm32f0::steal() });
        pwm.set_period(config::SWEEP_PERIOD);
        pwm.register(&boards::EIGHT_CHANNEL).unwrap();
        pwm.set_frequency(timer_clock, HertzU32::from_raw(config::SWEEP_PWM_FREQ_HZ))
            .unwrap();

        sweep::spawn().unwrap();

        (Shared {}, Local { pwm }, init::Monotonics(mono))
    }

    //-------------------------------------------------------------------------

    #[idle]
    fn idle(_ctx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    //-------------------------------------------------------------------------

    /// Ramp every output, each one shifted by an eighth of the range.
    #[task(local = [pwm, step: u8 = 0])]
    fn sweep(ctx: sweep::Context) {
        use systick_monotonic::*;

        let pwm = ctx.local.pwm;
        let step = ctx.local.step;

        for i in 0..pwm.channels() {
            let percent = (*step as usize + i * 100 / 8) % 100;
            if let Err(e) = pwm.set_duty_percent(i, percent as f32) {
                warn!("output {}: {}", i, e);
            }
        }
        *step = (*step + 1) % 100;

        sweep::spawn_after(config::SWEEP_STEP_MS.millis()).unwrap();
    }
}
