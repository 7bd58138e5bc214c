use crate::flight_control::common::Vec3D;
use crate::flight_control::devices::RangingDevice;

/// Hits closer to the probing device than this are the vehicle's own geometry.
pub const MIN_HIT_DISTANCE: f64 = 0.1;

/// Probes the straight path towards `target` with every device able to reach it.
///
/// Returns the distance to the nearest foreign hit, `f64::INFINITY` for a clear path, or
/// `None` when no device could probe the target at all.
pub fn probe_path(
    rangers: &mut [Box<dyn RangingDevice>],
    target: Vec3D<f64>,
    own_grid: i64,
) -> Option<f64> {
    let mut probed = false;
    let mut nearest = f64::INFINITY;
    for ranger in rangers.iter_mut().filter(|r| r.can_scan(target)) {
        probed = true;
        let origin = ranger.position();
        let hit = ranger.range_scan(target);
        if hit.is_empty() || hit.entity_id == own_grid {
            continue;
        }
        if let Some(distance) = hit.hit_distance(origin).filter(|d| *d > MIN_HIT_DISTANCE) {
            nearest = nearest.min(distance);
        }
    }
    probed.then_some(nearest)
}
