//! Scriptable in-memory hardware shared by the leader and follower tests.

use super::common::{Vec3D, WorldMatrix};
use super::devices::{
    ActionBlock, ControllerKind, DetectionResult, Detector, DeviceRegistry, MotionControl,
    RangingDevice, ShipController,
};
use super::tick_rate::TickRate;
use crate::console_communication::Transmitter;
use crate::keychain::Keychain;
use crate::settings::MemoryStore;
use std::sync::{Arc, Mutex};

pub struct ControllerState {
    pub matrix: WorldMatrix,
    pub velocity: Vec3D<f64>,
    pub gravity: Vec3D<f64>,
    pub under_control: bool,
}

#[derive(Default)]
pub struct MotionLog {
    pub targets: Vec<(Vec3D<f64>, Vec3D<f64>, f64)>,
    pub accelerations: Vec<Vec3D<f64>>,
    pub velocities: Vec<Vec3D<f64>>,
    pub facings: Vec<(Vec3D<f64>, Vec3D<f64>)>,
    pub resets: usize,
}

impl MotionLog {
    pub fn last_target(&self) -> Option<Vec3D<f64>> { self.targets.last().map(|t| t.0) }
}

pub struct RangerState {
    pub position: Vec3D<f64>,
    pub forward: Vec3D<f64>,
    pub reach: f64,
    pub result: DetectionResult,
    pub probes: Vec<Vec3D<f64>>,
    pub distance_scans: usize,
}

impl RangerState {
    pub fn new(position: Vec3D<f64>, forward: Vec3D<f64>, reach: f64) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            position,
            forward,
            reach,
            result: DetectionResult::empty(),
            probes: Vec::new(),
            distance_scans: 0,
        }))
    }
}

/// Handles to every piece of mocked hardware and both stores of one vehicle.
#[derive(Clone)]
pub struct Rig {
    pub grid_id: i64,
    pub has_controller: bool,
    pub has_motion: bool,
    pub controller: Arc<Mutex<ControllerState>>,
    pub motion: Arc<Mutex<MotionLog>>,
    pub rangers: Vec<Arc<Mutex<RangerState>>>,
    pub entities: Arc<Mutex<Vec<DetectionResult>>>,
    pub actions: Vec<String>,
    pub triggered: Arc<Mutex<Vec<String>>>,
    pub settings: MemoryStore,
    pub scratch: MemoryStore,
}

impl Rig {
    pub fn new(grid_id: i64, settings: &str) -> Self {
        Self {
            grid_id,
            has_controller: true,
            has_motion: true,
            controller: Arc::new(Mutex::new(ControllerState {
                matrix: WorldMatrix::identity(),
                velocity: Vec3D::zero(),
                gravity: Vec3D::zero(),
                under_control: false,
            })),
            motion: Arc::new(Mutex::new(MotionLog::default())),
            rangers: Vec::new(),
            entities: Arc::new(Mutex::new(Vec::new())),
            actions: Vec::new(),
            triggered: Arc::new(Mutex::new(Vec::new())),
            settings: MemoryStore::new(settings),
            scratch: MemoryStore::default(),
        }
    }

    pub fn keychain(&self) -> Keychain {
        Keychain::new(
            Box::new(RigRegistry(self.clone())),
            Box::new(self.settings.clone()),
            Box::new(self.scratch.clone()),
        )
    }

    pub fn set_position(&self, position: Vec3D<f64>) {
        let mut state = self.controller.lock().unwrap();
        state.matrix = state.matrix.with_translation(position);
    }

    pub fn set_entities(&self, entities: Vec<DetectionResult>) {
        *self.entities.lock().unwrap() = entities;
    }
}

pub fn entity(id: i64, name: &str, position: Vec3D<f64>) -> DetectionResult {
    DetectionResult {
        entity_id: id,
        name: name.to_string(),
        position,
        velocity: Vec3D::zero(),
        forward: Vec3D::new(0.0, 0.0, -1.0),
        up: Vec3D::new(0.0, 1.0, 0.0),
        hit_position: Some(position),
    }
}

struct RigRegistry(Rig);

impl DeviceRegistry for RigRegistry {
    fn grid_id(&self) -> i64 { self.0.grid_id }

    fn controllers(&mut self, _subgrids: bool) -> Vec<Box<dyn ShipController>> {
        if !self.0.has_controller {
            return Vec::new();
        }
        vec![Box::new(MockController(Arc::clone(&self.0.controller)))]
    }

    fn motion_control(&mut self, _subgrids: bool, _rate: TickRate) -> Option<Box<dyn MotionControl>> {
        self.0
            .has_motion
            .then(|| Box::new(MockMotion(Arc::clone(&self.0.motion))) as Box<dyn MotionControl>)
    }

    fn ranging_devices(&mut self, _subgrids: bool) -> Vec<Box<dyn RangingDevice>> {
        self.0
            .rangers
            .iter()
            .map(|state| Box::new(MockRanger(Arc::clone(state))) as Box<dyn RangingDevice>)
            .collect()
    }

    fn detectors(&mut self, _group: Option<&str>, _subgrids: bool) -> Vec<Box<dyn Detector>> {
        vec![Box::new(MockDetector(Arc::clone(&self.0.entities)))]
    }

    fn find_action(&mut self, name: &str, _subgrids: bool) -> Option<Box<dyn ActionBlock>> {
        self.0.actions.iter().any(|a| a == name).then(|| {
            Box::new(MockAction { name: name.to_string(), log: Arc::clone(&self.0.triggered) })
                as Box<dyn ActionBlock>
        })
    }
}

pub struct MockController(pub Arc<Mutex<ControllerState>>);

impl ShipController for MockController {
    fn name(&self) -> &str { "Cockpit" }

    fn kind(&self) -> ControllerKind { ControllerKind::Cockpit }

    fn world_matrix(&self) -> WorldMatrix { self.0.lock().unwrap().matrix }

    fn linear_velocity(&self) -> Vec3D<f64> { self.0.lock().unwrap().velocity }

    fn natural_gravity(&self) -> Vec3D<f64> { self.0.lock().unwrap().gravity }

    fn is_under_control(&self) -> bool { self.0.lock().unwrap().under_control }
}

/// Named controller of a fixed kind, for the controller lookup tests.
pub struct NamedController(pub &'static str, pub ControllerKind);

impl ShipController for NamedController {
    fn name(&self) -> &str { self.0 }

    fn kind(&self) -> ControllerKind { self.1 }

    fn world_matrix(&self) -> WorldMatrix { WorldMatrix::identity() }

    fn linear_velocity(&self) -> Vec3D<f64> { Vec3D::zero() }

    fn natural_gravity(&self) -> Vec3D<f64> { Vec3D::zero() }

    fn is_under_control(&self) -> bool { false }
}

struct MockMotion(Arc<Mutex<MotionLog>>);

impl MotionControl for MockMotion {
    fn control_position(
        &mut self,
        target: Vec3D<f64>,
        target_velocity: Vec3D<f64>,
        max_speed: f64,
    ) -> Vec3D<f64> {
        self.0.lock().unwrap().targets.push((target, target_velocity, max_speed));
        target
    }

    fn apply_acceleration(&mut self, acceleration: Vec3D<f64>) {
        self.0.lock().unwrap().accelerations.push(acceleration);
    }

    fn control_velocity(&mut self, target_velocity: Vec3D<f64>) {
        self.0.lock().unwrap().velocities.push(target_velocity);
    }

    fn face_vectors(&mut self, forward: Vec3D<f64>, up: Vec3D<f64>) {
        self.0.lock().unwrap().facings.push((forward, up));
    }

    fn reset(&mut self) { self.0.lock().unwrap().resets += 1; }
}

pub struct MockRanger(pub Arc<Mutex<RangerState>>);

impl RangingDevice for MockRanger {
    fn position(&self) -> Vec3D<f64> { self.0.lock().unwrap().position }

    fn forward(&self) -> Vec3D<f64> { self.0.lock().unwrap().forward }

    fn can_scan(&self, point: Vec3D<f64>) -> bool {
        let state = self.0.lock().unwrap();
        state.position.euclid_distance(&point) <= state.reach
    }

    fn range_scan(&mut self, point: Vec3D<f64>) -> DetectionResult {
        let mut state = self.0.lock().unwrap();
        state.probes.push(point);
        state.result.clone()
    }

    fn can_scan_distance(&self, distance: f64) -> bool { distance <= self.0.lock().unwrap().reach }

    fn scan_distance(&mut self, _distance: f64) -> DetectionResult {
        let mut state = self.0.lock().unwrap();
        state.distance_scans += 1;
        state.result.clone()
    }
}

struct MockDetector(Arc<Mutex<Vec<DetectionResult>>>);

impl Detector for MockDetector {
    fn detected_entities(&self) -> Vec<DetectionResult> { self.0.lock().unwrap().clone() }
}

struct MockAction {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl ActionBlock for MockAction {
    fn name(&self) -> &str { &self.name }

    fn trigger(&mut self) { self.log.lock().unwrap().push(self.name.clone()); }
}

/// Records every broadcast instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingTransmitter {
    pub sent: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl RecordingTransmitter {
    pub fn on_topic(&self, topic: &str) -> Vec<Vec<u8>> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl Transmitter for RecordingTransmitter {
    fn broadcast(&mut self, topic: &str, payload: Vec<u8>) {
        self.sent.lock().unwrap().push((topic.to_string(), payload));
    }
}
