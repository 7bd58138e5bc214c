use super::target_lock::{LeaderState, TargetLock};
use crate::console_communication::{
    codec, command_topic, pose_topic, ConsoleInput, LeaderCommand, PoseFrame, Transmitter,
};
use crate::flight_control::common::{Vec3D, WorldMatrix};
use crate::flight_control::devices::{
    select_controller, DetectionResult, Detector, RangingDevice, ShipController,
};
use crate::flight_control::tick_rate::TickRate;
use crate::keychain::Keychain;
use crate::mode_control::{InitOutcome, StartupError, Vehicle};
use crate::settings::{load_settings, LeaderScratch, LeaderSettings, TextStore};
use crate::{cmd, error, event, info, warn};

/// Tolerance on the dot product between a ranging device's and the controller's forward
/// axes for the device to count as forward-facing.
const FORWARD_TOLERANCE: f64 = 0.01;

/// The leader's control loop: tracks a designated target (or itself) and broadcasts its
/// pose as the formation's reference frame once per tick.
pub struct LeaderTracker {
    settings: LeaderSettings,
    grid_id: i64,
    controller: Box<dyn ShipController>,
    detectors: Vec<Box<dyn Detector>>,
    rangers: Vec<Box<dyn RangingDevice>>,
    /// Indices into `rangers` of the devices facing the controller's forward axis.
    forward_rangers: Vec<usize>,
    transmitter: Box<dyn Transmitter>,
    scratch: Box<dyn TextStore>,
    pose_topic: String,
    command_topic: String,
    lock: TargetLock,
    disabled: bool,
    runtime: u64,
    schedule: Option<TickRate>,
}

impl LeaderTracker {
    /// Loads the settings, discovers the hardware and restores the persisted target.
    ///
    /// # Errors
    /// [`StartupError::ConfigurationMalformed`] for an unreadable settings table and
    /// [`StartupError::NoActuationHardwareFound`] when no controller is available.
    pub fn new(
        keychain: Keychain,
        transmitter: Box<dyn Transmitter>,
    ) -> Result<InitOutcome<Self>, StartupError> {
        let (mut registry, mut settings_store, scratch) = keychain.into_parts();
        let InitOutcome::Ready(settings) = load_settings::<LeaderSettings>(settings_store.as_mut())?
        else {
            info!("Wrote default leader settings. Review them and start again.");
            return Ok(InitOutcome::DefaultsWritten);
        };
        let subgrids = settings.use_subgrid_blocks;
        let detectors = registry.detectors(settings.detector_group(), subgrids);
        let controller = select_controller(registry.controllers(subgrids), &settings.cockpit_name)
            .ok_or(StartupError::NoActuationHardwareFound)?;
        let rangers = registry.ranging_devices(subgrids);
        let forward = controller.world_matrix().forward();
        let forward_rangers = rangers
            .iter()
            .enumerate()
            .filter(|(_, r)| (forward.dot(r.forward()) - 1.0).abs() < FORWARD_TOLERANCE)
            .map(|(i, _)| i)
            .collect();

        let mut tracker = Self {
            grid_id: registry.grid_id(),
            controller,
            detectors,
            rangers,
            forward_rangers,
            transmitter,
            scratch,
            pose_topic: pose_topic(&settings.system_id),
            command_topic: command_topic(&settings.system_id),
            settings,
            lock: TargetLock::default(),
            disabled: false,
            runtime: 0,
            schedule: None,
        };
        tracker.restore();
        tracker.refresh_schedule();
        info!(
            "Leader ready on {} with {} detectors and {} ranging devices.",
            tracker.pose_topic,
            tracker.detectors.len(),
            tracker.rangers.len()
        );
        Ok(InitOutcome::Ready(tracker))
    }

    pub fn state(&self) -> LeaderState { self.lock.state(self.settings.allow_follow_self) }

    pub fn lock(&self) -> &TargetLock { &self.lock }

    pub fn is_disabled(&self) -> bool { self.disabled }

    pub fn settings(&self) -> &LeaderSettings { &self.settings }

    /// Rate the loop currently runs at, or would run at once started.
    fn current_rate(&self) -> TickRate { self.schedule.unwrap_or(self.settings.tick_speed) }

    fn active_rate(&self) -> TickRate {
        match self.state() {
            LeaderState::Searching | LeaderState::PredictiveHold => {
                self.settings.tick_speed.search_rate()
            }
            _ => self.settings.tick_speed,
        }
    }

    fn refresh_schedule(&mut self) {
        self.schedule = (!self.disabled).then(|| self.active_rate());
    }

    fn track(&mut self) {
        let mut detection = self.sweep_detectors();
        if detection.is_none() && self.settings.active_ranging && self.lock.id() != 0 {
            detection = self.predictive_probe();
        }
        match detection {
            Some(hit) => {
                self.lock.set_held(false);
                self.broadcast_target(&hit);
                if self.settings.active_ranging {
                    self.lock.record_hit(hit);
                }
            }
            None if self.lock.id() != 0 => {
                if self.state() == LeaderState::Locked {
                    event!("Lost sight of {}.", self.lock.name().unwrap_or_default());
                }
                self.lock.set_held(true);
            }
            None => {}
        }
    }

    /// Looks for the target among all detections.
    ///
    /// An exact id match wins. Otherwise the first entity carrying the target's name is
    /// adopted and its id persisted.
    fn sweep_detectors(&mut self) -> Option<DetectionResult> {
        let id = self.lock.id();
        let mut candidate = None;
        for entity in self.detectors.iter().flat_map(|d| d.detected_entities()) {
            if entity.is_empty() {
                continue;
            }
            if id != 0 && entity.entity_id == id {
                return Some(entity);
            }
            if candidate.is_none() && self.lock.name() == Some(entity.name.as_str()) {
                candidate = Some(entity);
            }
        }
        let found = candidate?;
        info!("Resolved {} to id {}.", found.name, found.entity_id);
        self.lock.lock_on(&found);
        self.persist();
        Some(found)
    }

    /// Fires a range probe at where the target should be by now.
    fn predictive_probe(&mut self) -> Option<DetectionResult> {
        let (hit, elapsed) = self.lock.last_hit()?;
        let prediction = hit.position + hit.velocity * elapsed;
        let id = self.lock.id();
        let ranger = self.rangers.iter_mut().find(|r| r.can_scan(prediction))?;
        let probe = ranger.range_scan(prediction);
        (probe.entity_id == id).then_some(probe)
    }

    fn broadcast_target(&mut self, hit: &DetectionResult) {
        let gravity = self.controller.natural_gravity();
        let up = if self.settings.align_to_gravity && !gravity.is_zero() {
            -gravity.normalize()
        } else {
            hit.up
        };
        let matrix = WorldMatrix::create_world(hit.position, hit.forward, up);
        self.broadcast_frame(matrix, hit.velocity, hit.entity_id);
    }

    fn broadcast_self(&mut self) {
        let mut matrix = self.controller.world_matrix();
        if self.settings.align_to_gravity {
            matrix = matrix.aligned_to_gravity(self.controller.natural_gravity());
        }
        let velocity = self.controller.linear_velocity();
        self.broadcast_frame(matrix, velocity, self.grid_id);
    }

    fn broadcast_frame(&mut self, matrix: WorldMatrix, velocity: Vec3D<f64>, source: i64) {
        let payload = codec::encode_pose(&PoseFrame { matrix, velocity, source });
        self.transmitter.broadcast(&self.pose_topic, payload);
    }

    fn apply(&mut self, command: LeaderCommand) {
        match command {
            LeaderCommand::Stop => self.disabled = true,
            LeaderCommand::Start => self.disabled = false,
            LeaderCommand::Reset => {
                self.disabled = false;
                self.lock.clear();
            }
            LeaderCommand::Scan => {
                self.disabled = false;
                match self.forward_scan() {
                    Some(hit) => {
                        info!("Scan locked on {} ({}).", hit.name, hit.entity_id);
                        self.lock.lock_on(&hit);
                        if self.settings.active_ranging {
                            self.lock.record_hit(hit);
                        }
                    }
                    None => event!("Scan found nothing."),
                }
            }
            LeaderCommand::Find(name) => {
                self.disabled = false;
                self.lock.search(name);
            }
        }
        self.refresh_schedule();
        self.persist();
    }

    /// Fires the first forward-facing ranging device able to reach `scan_distance`.
    fn forward_scan(&mut self) -> Option<DetectionResult> {
        let distance = self.settings.scan_distance;
        let index = self
            .forward_rangers
            .iter()
            .copied()
            .find(|&i| self.rangers[i].can_scan_distance(distance))?;
        let hit = self.rangers[index].scan_distance(distance);
        (!hit.is_empty()).then_some(hit)
    }

    /// Splits `data` with the leader's separator and broadcasts it to `addressees`.
    fn transmit(&mut self, addressees: &str, data: &str) {
        let args = self.settings.separator().split(data);
        let payload = codec::encode_command(addressees, &args);
        self.transmitter.broadcast(&self.command_topic, payload);
        let to = if addressees.trim().is_empty() { "all" } else { addressees };
        cmd!("Sent '{data}' to {to}.");
    }

    fn persist(&mut self) {
        let scratch = LeaderScratch {
            disabled: self.disabled,
            target_id: self.lock.id(),
            target_name: self.lock.name().map(str::to_string),
        };
        if let Err(e) = self.scratch.write(&scratch.encode()) {
            error!("Could not persist leader state: {e}");
        }
    }

    /// Restores the persisted target, re-validating it against live detections when
    /// reconnection is enabled.
    fn restore(&mut self) {
        let line = self.scratch.read().unwrap_or_else(|e| {
            error!("Could not read leader state: {e}");
            String::new()
        });
        if line.trim().is_empty() {
            self.persist();
            return;
        }
        let Some(scratch) = LeaderScratch::decode(&line) else {
            warn!("Discarding unreadable leader state '{}'.", line.trim());
            self.persist();
            return;
        };
        self.disabled = scratch.disabled;
        let Some(name) = scratch.target_name else {
            return;
        };
        self.lock = TargetLock::restored(scratch.target_id, name);
        if !self.settings.attempt_reconnection {
            return;
        }
        if self.sweep_detectors().is_none() {
            warn!("Target {} not in sight, searching by name.", self.lock.name().unwrap_or_default());
            self.lock.release();
        }
        self.persist();
    }
}

impl Vehicle for LeaderTracker {
    fn tick(&mut self) {
        if self.runtime % self.current_rate().report_every() == 0 {
            event!("{}", self.status_report());
        }
        self.runtime += 1;
        self.lock.advance(self.current_rate().seconds_per_tick());
        if self.lock.is_set() {
            self.track();
        } else if self.settings.allow_follow_self {
            self.broadcast_self();
        }
        self.refresh_schedule();
    }

    fn run_command(&mut self, argument: &str) {
        match ConsoleInput::parse(argument, self.settings.separator()) {
            Some(ConsoleInput::Addressed { addressees, payload }) => self.transmit(&addressees, &payload),
            Some(ConsoleInput::Relay(line)) => self.transmit("", &line),
            Some(ConsoleInput::Local(command)) => {
                cmd!("Leader {command:?}.");
                self.apply(command);
            }
            None => event!("Ignoring console input '{argument}'."),
        }
    }

    fn schedule(&self) -> Option<TickRate> { self.schedule }

    fn status_report(&self) -> String {
        if self.disabled {
            return "Stopped.".to_string();
        }
        let name = self.lock.name().unwrap_or_default();
        match self.state() {
            LeaderState::Idle => "Running.\nNo target.".to_string(),
            LeaderState::SelfBroadcasting => "Running.\nFollowing me.".to_string(),
            LeaderState::Searching => format!("Running.\nSearching for {name}..."),
            LeaderState::Locked => format!("Running.\nFollowing {name} ({}).", self.lock.id()),
            LeaderState::PredictiveHold => {
                format!("Running.\nLost {name} ({}), waiting for contact.", self.lock.id())
            }
        }
    }
}
