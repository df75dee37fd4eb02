use derive_more::{Display, Error};

/// Everything that can go wrong while configuring or driving PWM outputs.
///
/// Every variant is terminal for the call that produced it. The flat call
/// surface in [`crate::api`] folds them all into [`Fault::CODE`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    #[display("no descriptor table given")]
    NoTable,
    #[display("descriptor table is empty")]
    EmptyTable,
    #[display("table holds fewer descriptors than requested")]
    ShortTable,
    #[display("pin mask must have exactly one bit set")]
    InvalidPin,
    #[display("alternate function code does not fit in 4 bits")]
    InvalidAlternateFunction,
    #[display("channel is not one of 1..=4")]
    InvalidChannel,
    #[display("timer has no such compare channel")]
    ChannelNotOnTimer,
    #[display("timer has no complementary output on this channel")]
    NoComplementaryOutput,
    #[display("no descriptor table registered")]
    NotRegistered,
    #[display("channel index out of range")]
    IndexOutOfRange,
    #[display("requested PWM frequency cannot be reached")]
    FrequencyOutOfRange,
}

impl Fault {
    pub const CODE: i32 = -1;

    pub const fn code(self) -> i32 {
        Self::CODE
    }
}

impl embedded_hal::pwm::Error for Fault {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}
