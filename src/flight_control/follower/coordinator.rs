use super::collision::probe_path;
use super::dead_reckoning::dead_reckoning_shift;
use crate::console_communication::{
    codec, command_topic, pose_topic, FollowerCommand, LeaderUpdate, RoutedCommand,
};
use crate::flight_control::common::{current_offset, Vec3D, WorldMatrix};
use crate::flight_control::devices::{
    select_controller, DeviceRegistry, MotionControl, RangingDevice, ShipController,
};
use crate::flight_control::tick_rate::TickRate;
use crate::keychain::Keychain;
use crate::mode_control::{InitOutcome, StartupError, Vehicle};
use crate::settings::{load_settings, save_settings, FollowerScratch, FollowerSettings, TextStore};
use crate::{cmd, error, event, info, warn};

/// Most recent leader frame a follower steers against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderFix {
    pub matrix: WorldMatrix,
    pub velocity: Vec3D<f64>,
}

/// The follower's control loop: holds a station at `offset` inside the leader's frame.
pub struct FollowerCoordinator {
    settings: FollowerSettings,
    grid_id: i64,
    registry: Box<dyn DeviceRegistry>,
    controller: Box<dyn ShipController>,
    motion: Box<dyn MotionControl>,
    /// Only populated with collision avoidance enabled.
    rangers: Vec<Box<dyn RangingDevice>>,
    settings_store: Box<dyn TextStore>,
    scratch: Box<dyn TextStore>,
    pose_topic: String,
    command_topic: String,
    offset: Vec3D<f64>,
    current_config: String,
    disabled: bool,
    leader: Option<LeaderFix>,
    /// Tick of the last leader frame.
    updated: u64,
    runtime: u64,
    /// Leader-frame offset the follower is held at while the path is blocked.
    obstacle: Option<Vec3D<f64>>,
    under_control: bool,
    schedule: Option<TickRate>,
}

impl FollowerCoordinator {
    /// Loads the settings, discovers the hardware and restores the persisted station.
    ///
    /// # Errors
    /// [`StartupError::ConfigurationMalformed`] for an unreadable settings table and
    /// [`StartupError::NoActuationHardwareFound`] without a controller or motion control.
    pub fn new(keychain: Keychain) -> Result<InitOutcome<Self>, StartupError> {
        let (mut registry, mut settings_store, scratch) = keychain.into_parts();
        let InitOutcome::Ready(settings) =
            load_settings::<FollowerSettings>(settings_store.as_mut())?
        else {
            info!("Wrote default follower settings. Review them and start again.");
            return Ok(InitOutcome::DefaultsWritten);
        };
        let subgrids = settings.use_subgrid_blocks;
        let controller = select_controller(registry.controllers(subgrids), &settings.cockpit_name)
            .ok_or(StartupError::NoActuationHardwareFound)?;
        let motion = registry
            .motion_control(subgrids, settings.tick_speed)
            .ok_or(StartupError::NoActuationHardwareFound)?;
        let rangers = if settings.collision_avoidance {
            registry.ranging_devices(subgrids)
        } else {
            Vec::new()
        };
        let (config, offset) = settings.configs.first();
        let current_config = config.to_string();

        let mut coordinator = Self {
            grid_id: registry.grid_id(),
            registry,
            controller,
            motion,
            rangers,
            settings_store,
            scratch,
            pose_topic: pose_topic(&settings.system_id),
            command_topic: command_topic(&settings.system_id),
            offset,
            current_config,
            disabled: false,
            leader: None,
            updated: 0,
            runtime: 0,
            obstacle: None,
            under_control: false,
            schedule: None,
            settings,
        };
        coordinator.restore();
        coordinator.schedule = (!coordinator.disabled).then_some(coordinator.settings.tick_speed);
        info!("Follower {} listening on {}.", coordinator.settings.follower_id, coordinator.pose_topic);
        Ok(InitOutcome::Ready(coordinator))
    }

    pub fn offset(&self) -> Vec3D<f64> { self.offset }

    pub fn current_config(&self) -> &str { &self.current_config }

    pub fn is_disabled(&self) -> bool { self.disabled }

    pub fn leader(&self) -> Option<&LeaderFix> { self.leader.as_ref() }

    pub fn obstacle(&self) -> Option<Vec3D<f64>> { self.obstacle }

    pub fn settings(&self) -> &FollowerSettings { &self.settings }

    pub fn receive_pose(&mut self, update: LeaderUpdate) {
        match update {
            LeaderUpdate::Framed(frame) if frame.source == self.grid_id => {
                event!("Dropping a frame sourced from this vehicle.");
                self.leader = None;
                return;
            }
            LeaderUpdate::Framed(frame) => {
                self.leader = Some(LeaderFix { matrix: frame.matrix, velocity: frame.velocity });
            }
            LeaderUpdate::Anonymous { matrix, velocity } => {
                self.leader = Some(LeaderFix { matrix, velocity });
            }
        }
        self.updated = self.runtime;
    }

    pub fn receive_command(&mut self, command: &RoutedCommand) {
        if command.addressees.includes(&self.settings.follower_id) {
            self.handle_args(&command.args);
        }
    }

    fn handle_args(&mut self, args: &[String]) {
        match FollowerCommand::parse(args, self.settings.separator()) {
            Some(command) => {
                cmd!("{} {command:?}.", self.settings.follower_id);
                self.apply(command);
            }
            None => event!("Ignoring malformed command {args:?}."),
        }
    }

    /// Where this vehicle currently sits in the leader's frame, if a frame is known.
    fn position_offset(&self) -> Option<Vec3D<f64>> {
        self.leader.map(|fix| current_offset(&fix.matrix, self.controller.position()))
    }

    fn start(&mut self) {
        self.disabled = false;
        self.schedule = Some(self.settings.tick_speed);
    }

    fn apply(&mut self, command: FollowerCommand) {
        match command {
            FollowerCommand::SetOffset([x, y, z]) => {
                let o = self.offset;
                self.offset = Vec3D::new(x.unwrap_or(o.x()), y.unwrap_or(o.y()), z.unwrap_or(o.z()));
            }
            FollowerCommand::AddOffset(delta) => self.offset += delta,
            FollowerCommand::Stop => {
                self.schedule = None;
                self.motion.reset();
                self.disabled = true;
            }
            FollowerCommand::Start => self.start(),
            FollowerCommand::StartHere => {
                match self.position_offset() {
                    Some(here) => self.offset = here,
                    None => warn!("No leader frame yet, keeping the current offset."),
                }
                self.start();
            }
            FollowerCommand::Reset => {
                self.offset = self
                    .settings
                    .configs
                    .get(&self.current_config)
                    .unwrap_or_else(|| self.settings.configs.first().1);
            }
            FollowerCommand::Save(name) => {
                let key = name.unwrap_or_else(|| self.current_config.clone());
                self.settings.configs.insert(&key, self.offset);
                self.persist_settings();
                return;
            }
            FollowerCommand::SaveHere(name) => {
                let Some(here) = self.position_offset() else {
                    event!("No leader frame yet, savehere dropped.");
                    return;
                };
                let key = name.unwrap_or_else(|| self.current_config.clone());
                self.settings.configs.insert(&key, here);
                self.persist_settings();
                self.offset = here;
            }
            FollowerCommand::Load(name) => {
                let Some(offset) = self.settings.configs.get(&name) else {
                    event!("No config named {name}.");
                    return;
                };
                self.offset = offset;
                self.current_config = name;
                self.start();
            }
            FollowerCommand::Action(name) => {
                match self.registry.find_action(&name, self.settings.use_subgrid_blocks) {
                    Some(mut action) => action.trigger(),
                    None => event!("No action named {name}."),
                }
                return;
            }
            FollowerCommand::Clear => {
                self.leader = None;
                return;
            }
        }
        self.persist();
    }

    fn steer(&mut self, fix: LeaderFix) {
        self.motion.face_vectors(fix.matrix.forward(), fix.matrix.up());
        if self.offset.is_zero() {
            self.motion.control_velocity(fix.velocity);
            return;
        }
        let mut target = fix.matrix.transform(self.offset);
        if self.settings.dead_reckoning {
            target += dead_reckoning_shift(
                fix.velocity,
                self.runtime.saturating_sub(self.updated),
                self.settings.max_missing_ticks,
                self.settings.tick_speed.seconds_per_tick(),
            );
        }
        if self.settings.collision_avoidance {
            self.check_path(&fix, target);
            if let Some(obstacle) = self.obstacle {
                target = fix.matrix.transform(obstacle);
            }
        }
        let acceleration = self.motion.control_position(target, fix.velocity, self.settings.max_speed);
        self.motion.apply_acceleration(acceleration);
    }

    /// Holds the follower at its current station while the path to `target` is blocked.
    /// The held offset is taken anew on every blocked tick.
    fn check_path(&mut self, fix: &LeaderFix, target: Vec3D<f64>) {
        let Some(nearest) = probe_path(&mut self.rangers, target, self.grid_id) else {
            return;
        };
        if nearest.is_infinite() {
            if self.obstacle.take().is_some() {
                event!("Path clear again.");
            }
            return;
        }
        let held = current_offset(&fix.matrix, self.controller.position());
        if self.obstacle.replace(held).is_none() {
            event!("Obstacle {nearest:.1} m ahead, holding position.");
        }
    }

    /// Handles the pilot taking or leaving manual control. Returns whether steering is
    /// suspended.
    fn manual_override(&mut self, fix: &LeaderFix) -> bool {
        let controlled = self.controller.is_under_control();
        if controlled != self.under_control {
            self.under_control = controlled;
            if controlled {
                self.motion.reset();
            } else if self.settings.auto_start_here {
                self.offset = current_offset(&fix.matrix, self.controller.position());
                self.persist();
            }
        }
        controlled
    }

    fn persist(&mut self) {
        let scratch = FollowerScratch {
            disabled: self.disabled,
            offset: self.offset,
            current_config: self.current_config.clone(),
        };
        if let Err(e) = self.scratch.write(&scratch.encode()) {
            error!("Could not persist follower state: {e}");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = save_settings(self.settings_store.as_mut(), &self.settings) {
            error!("Could not persist follower settings: {e}");
        }
    }

    fn restore(&mut self) {
        let line = self.scratch.read().unwrap_or_else(|e| {
            error!("Could not read follower state: {e}");
            String::new()
        });
        if line.trim().is_empty() {
            self.persist();
            return;
        }
        match FollowerScratch::decode(&line) {
            Some(scratch) => {
                self.disabled = scratch.disabled;
                self.offset = scratch.offset;
                self.current_config = scratch.current_config;
            }
            None => {
                warn!("Discarding unreadable follower state '{}'.", line.trim());
                self.persist();
            }
        }
    }
}

impl Vehicle for FollowerCoordinator {
    fn tick(&mut self) {
        if self.runtime % self.settings.tick_speed.report_every() == 0 {
            event!("{}", self.status_report());
        }
        if let Some(fix) = self.leader {
            let suspended = self.settings.auto_stop && self.manual_override(&fix);
            if !suspended {
                self.steer(fix);
            }
        }
        self.runtime += 1;
    }

    fn run_command(&mut self, argument: &str) {
        let args = self.settings.separator().split(argument);
        self.handle_args(&args);
    }

    fn handle_message(&mut self, topic: &str, payload: &[u8]) {
        if topic == self.pose_topic {
            match codec::decode_pose(payload) {
                Ok(update) => self.receive_pose(update),
                Err(e) => event!("Dropping undecodable pose: {e}"),
            }
        } else if topic == self.command_topic {
            match codec::decode_command(payload) {
                Ok(command) => self.receive_command(&command),
                Err(e) => event!("Dropping undecodable command: {e}"),
            }
        }
    }

    fn subscriptions(&self) -> Vec<String> { vec![self.pose_topic.clone(), self.command_topic.clone()] }

    fn schedule(&self) -> Option<TickRate> { self.schedule }

    fn status_report(&self) -> String {
        let o = self.offset;
        let mut lines = vec![
            if self.disabled { "Stopped." } else { "Running." }.to_string(),
            format!("{}.{}", self.settings.system_id, self.settings.follower_id),
            format!("Offset {o:.2}"),
        ];
        if o.is_zero() {
            lines.push("Offset is zero, use commands to give it a value.".to_string());
        }
        let missing = self.runtime.saturating_sub(self.updated);
        if self.leader.is_none() {
            lines.push("No messages received.".to_string());
        } else if self.settings.dead_reckoning && missing > u64::from(self.settings.max_missing_ticks) {
            lines.push(format!("Weak signal, message received {missing} ticks ago."));
        }
        if self.settings.auto_stop && self.under_control {
            lines.push("Cockpit is under control.".to_string());
        }
        if self.obstacle.is_some() {
            lines.push("Obstacle detected, holding position.".to_string());
        }
        lines.push(String::new());
        lines.push("Configs:".to_string());
        for name in self.settings.configs.names() {
            let star = if name == self.current_config { "*" } else { "" };
            lines.push(format!(" {name}{star}"));
        }
        lines.join("\n")
    }
}
