mod map;
pub use map::{duty_for_percent, map};
