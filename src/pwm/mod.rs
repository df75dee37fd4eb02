mod descriptor;
mod engine;
mod error;
mod init;
mod timer;
mod timing;

pub use descriptor::{AltFunction, Channel, Descriptor, Pin, Port};
pub use engine::{PwmChannel, PwmOut};
pub use error::Fault;
pub use timer::{Capabilities, ChannelSet, TimerId};
pub use timing::TimingBase;

pub use crate::regs::tim::CcChannel;
