//! Interfaces of the hardware a vehicle drives: the controller it reads its own pose
//! from, motion control, ranging devices, passive detectors and triggerable actions.
//! Implementations live outside this crate; the tracker and coordinator only see these
//! traits.

use super::common::{Vec3D, WorldMatrix};
use super::tick_rate::TickRate;

/// One entity reported by a ranging probe or a passive detector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectionResult {
    /// Unique entity identifier, `0` for an empty result.
    pub entity_id: i64,
    pub name: String,
    pub position: Vec3D<f64>,
    pub velocity: Vec3D<f64>,
    pub forward: Vec3D<f64>,
    pub up: Vec3D<f64>,
    /// World position where a ranging probe hit, if it hit anything.
    pub hit_position: Option<Vec3D<f64>>,
}

impl DetectionResult {
    pub fn empty() -> Self { Self::default() }

    pub fn is_empty(&self) -> bool { self.entity_id == 0 }

    /// Distance between `origin` and the hit point, if there was a hit.
    pub fn hit_distance(&self, origin: Vec3D<f64>) -> Option<f64> {
        self.hit_position.map(|hit| hit.euclid_distance(&origin))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControllerKind {
    Cockpit,
    RemoteControl,
    Other,
}

/// A seat or remote control the vehicle's own pose is read from.
pub trait ShipController: Send {
    fn name(&self) -> &str;
    fn kind(&self) -> ControllerKind;
    fn world_matrix(&self) -> WorldMatrix;
    fn position(&self) -> Vec3D<f64> { self.world_matrix().translation() }
    fn linear_velocity(&self) -> Vec3D<f64>;
    fn natural_gravity(&self) -> Vec3D<f64>;
    /// Whether a pilot is currently in manual control.
    fn is_under_control(&self) -> bool;
}

/// Translates a desired position, velocity or orientation into actuator commands.
pub trait MotionControl: Send {
    /// Returns the acceleration needed to reach `target` while matching `target_velocity`.
    fn control_position(
        &mut self,
        target: Vec3D<f64>,
        target_velocity: Vec3D<f64>,
        max_speed: f64,
    ) -> Vec3D<f64>;
    fn apply_acceleration(&mut self, acceleration: Vec3D<f64>);
    fn control_velocity(&mut self, target_velocity: Vec3D<f64>);
    fn face_vectors(&mut self, forward: Vec3D<f64>, up: Vec3D<f64>);
    /// Releases all actuators.
    fn reset(&mut self);
}

/// A device able to fire a directed range probe.
pub trait RangingDevice: Send {
    fn position(&self) -> Vec3D<f64>;
    fn forward(&self) -> Vec3D<f64>;
    fn can_scan(&self, point: Vec3D<f64>) -> bool;
    fn range_scan(&mut self, point: Vec3D<f64>) -> DetectionResult;
    /// Whether a probe straight ahead up to `distance` metres is possible.
    fn can_scan_distance(&self, distance: f64) -> bool;
    fn scan_distance(&mut self, distance: f64) -> DetectionResult;
}

/// A passive detector enumerating the entities in its field.
pub trait Detector: Send {
    fn detected_entities(&self) -> Vec<DetectionResult>;
}

/// An externally owned timer-like actuator addressed by name.
pub trait ActionBlock: Send {
    fn name(&self) -> &str;
    fn trigger(&mut self);
}

/// Device discovery on the vehicle. `subgrids` widens the search to devices on
/// mechanically connected sub-structures.
pub trait DeviceRegistry: Send {
    /// Identity of the vehicle's own structure; used as the pose source id.
    fn grid_id(&self) -> i64;
    fn controllers(&mut self, subgrids: bool) -> Vec<Box<dyn ShipController>>;
    fn motion_control(&mut self, subgrids: bool, rate: TickRate) -> Option<Box<dyn MotionControl>>;
    fn ranging_devices(&mut self, subgrids: bool) -> Vec<Box<dyn RangingDevice>>;
    /// Passive detectors, restricted to `group` when one is given.
    fn detectors(&mut self, group: Option<&str>, subgrids: bool) -> Vec<Box<dyn Detector>>;
    fn find_action(&mut self, name: &str, subgrids: bool) -> Option<Box<dyn ActionBlock>>;
}

/// One step of the controller lookup.
#[derive(Debug, Clone, Copy)]
enum ControllerProbe<'a> {
    Named(&'a str),
    Kind(ControllerKind),
}

impl ControllerProbe<'_> {
    fn matches(&self, controller: &dyn ShipController) -> bool {
        match self {
            ControllerProbe::Named(name) => controller.name() == *name,
            ControllerProbe::Kind(kind) => controller.kind() == *kind,
        }
    }
}

/// Picks the controller to fly from: the one named `preferred`, else any cockpit,
/// else any remote control.
pub fn select_controller(
    mut candidates: Vec<Box<dyn ShipController>>,
    preferred: &str,
) -> Option<Box<dyn ShipController>> {
    let probes = [
        ControllerProbe::Named(preferred),
        ControllerProbe::Kind(ControllerKind::Cockpit),
        ControllerProbe::Kind(ControllerKind::RemoteControl),
    ];
    let index = probes
        .iter()
        .find_map(|probe| candidates.iter().position(|c| probe.matches(c.as_ref())))?;
    Some(candidates.swap_remove(index))
}
