/// Range mapping
/// *-------x-------*
/// ^min    ^v      ^max
/// percent = (v - min) / (max - min)
///
/// *-------x-------*
/// ^left   ^res    ^right
/// res = left + (right - left) * percent
pub fn map(v: f32, min: f32, max: f32, left: f32, right: f32) -> f32 {
    let percent = (v - min) / (max - min);

    let mapped_len = num::abs(right - left) * percent;
    if left < right {
        left + mapped_len
    } else {
        right + mapped_len
    }
}

/// Compare value giving `percent` % duty with counter top `period`.
/// Percent is clamped to 0..=100.
pub fn duty_for_percent(percent: f32, period: u16) -> u16 {
    let percent = percent.clamp(0.0, 100.0);
    libm::roundf(map(percent, 0.0, 100.0, 0.0, period as f32 + 1.0)) as u16
}
