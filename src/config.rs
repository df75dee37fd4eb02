/// Timing base applied before anything calls `set_prescaler`/`set_period`:
/// the slowest one the timers can run.
pub const DEFAULT_PRESCALER: u16 = 0xFFFF;
pub const DEFAULT_PERIOD: u16 = 0xFFFF;

/// Range accepted when the timing base is picked from a frequency.
pub const MIN_PWM_FREQ_HZ: u32 = 1;
pub const MAX_PWM_FREQ_HZ: u32 = 100_000;

//-----------------------------------------------------------------------------

pub const SYSCLK_HZ: u32 = 48_000_000;
pub const SYSTICK_RATE_HZ: u32 = 1_000;

//-----------------------------------------------------------------------------

pub const SWEEP_PWM_FREQ_HZ: u32 = 1_000;
pub const SWEEP_PERIOD: u16 = 1_000 - 1;
pub const SWEEP_STEP_MS: u64 = 20;
