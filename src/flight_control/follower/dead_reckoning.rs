use crate::flight_control::common::Vec3D;

/// How far the leader has moved since its last broadcast, assuming constant velocity.
///
/// Extrapolation stops growing after `max_missing` ticks without a broadcast.
#[allow(clippy::cast_precision_loss)]
pub fn dead_reckoning_shift(
    velocity: Vec3D<f64>,
    missing_ticks: u64,
    max_missing: u32,
    seconds_per_tick: f64,
) -> Vec3D<f64> {
    let ticks = missing_ticks.min(u64::from(max_missing));
    if ticks == 0 {
        return Vec3D::zero();
    }
    velocity * (ticks as f64 * seconds_per_tick)
}
