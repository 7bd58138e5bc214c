use super::{configs::ConfigSet, store::StoreError, store::TextStore};
use crate::console_communication::CommandSeparator;
use crate::flight_control::tick_rate::TickRate;
use crate::mode_control::InitOutcome;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum_macros::Display;

/// Options of one role, persisted as a TOML table named [`RoleSettings::SECTION`].
///
/// Keys missing from an existing table keep their default values.
pub trait RoleSettings: Serialize + DeserializeOwned + Default {
    const SECTION: &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderSettings {
    /// Suffix of the broadcast topics; formations with different ids never hear each other.
    pub system_id: String,
    /// Preferred controller; any cockpit or remote control is used when it is missing.
    pub cockpit_name: String,
    pub use_subgrid_blocks: bool,
    pub auto_stop: bool,
    pub tick_speed: TickRate,
    /// Detector group used for tracking, `-` for all detectors.
    pub sensor_group: String,
    /// Reach of the forward probe fired by `scan`, in metres.
    pub scan_distance: f64,
    /// Re-validate the persisted target against live detections on start-up.
    pub attempt_reconnection: bool,
    /// Broadcast the leader's own pose while no target is set.
    pub allow_follow_self: bool,
    /// Re-acquire a lost target with range probes at its predicted position.
    pub active_ranging: bool,
    pub align_to_gravity: bool,
    pub space_separators: bool,
}

impl Default for LeaderSettings {
    fn default() -> Self {
        Self {
            system_id: "System1".to_string(),
            cockpit_name: "Cockpit".to_string(),
            use_subgrid_blocks: false,
            auto_stop: true,
            tick_speed: TickRate::Fast,
            sensor_group: "-".to_string(),
            scan_distance: 1000.0,
            attempt_reconnection: true,
            allow_follow_self: true,
            active_ranging: false,
            align_to_gravity: false,
            space_separators: false,
        }
    }
}

impl LeaderSettings {
    pub fn separator(&self) -> CommandSeparator { CommandSeparator::from_space_flag(self.space_separators) }

    pub fn detector_group(&self) -> Option<&str> {
        (self.sensor_group != "-").then_some(self.sensor_group.as_str())
    }
}

impl RoleSettings for LeaderSettings {
    const SECTION: &'static str = "formation-leader";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerSettings {
    pub system_id: String,
    /// Name remote commands are addressed to.
    pub follower_id: String,
    pub cockpit_name: String,
    pub use_subgrid_blocks: bool,
    /// Hold still while a pilot is in the controller.
    pub auto_stop: bool,
    /// Adopt the current position as offset when the pilot leaves.
    pub auto_start_here: bool,
    pub tick_speed: TickRate,
    /// Extrapolate the leader pose between broadcasts.
    pub dead_reckoning: bool,
    /// Ticks without a broadcast after which extrapolation stops growing.
    pub max_missing_ticks: u32,
    pub space_separators: bool,
    pub collision_avoidance: bool,
    /// Speed limit handed to motion control, in m/s.
    pub max_speed: f64,
    /// Named offsets, one `name x y z` line each (`x` right, `y` up, `z` backward).
    pub configs: ConfigSet,
}

impl Default for FollowerSettings {
    fn default() -> Self {
        Self {
            system_id: "System1".to_string(),
            follower_id: "Drone1".to_string(),
            cockpit_name: "Cockpit".to_string(),
            use_subgrid_blocks: false,
            auto_stop: true,
            auto_start_here: false,
            tick_speed: TickRate::Fast,
            dead_reckoning: true,
            max_missing_ticks: 100,
            space_separators: false,
            collision_avoidance: false,
            max_speed: 100.0,
            configs: ConfigSet::default(),
        }
    }
}

impl FollowerSettings {
    pub fn separator(&self) -> CommandSeparator { CommandSeparator::from_space_flag(self.space_separators) }
}

impl RoleSettings for FollowerSettings {
    const SECTION: &'static str = "formation-follower";
}

#[derive(Debug, Display)]
pub enum SettingsError {
    Malformed(String),
    Store(StoreError),
}

impl std::error::Error for SettingsError {}

impl From<StoreError> for SettingsError {
    fn from(value: StoreError) -> Self { SettingsError::Store(value) }
}

/// Reads the role's settings from `store`.
///
/// When the document is empty or lacks the role's table, the defaults are written back
/// and [`InitOutcome::DefaultsWritten`] is returned: the operator has to review them and
/// restart.
///
/// # Errors
/// [`SettingsError::Malformed`] when the document or the role's table does not parse.
pub fn load_settings<S: RoleSettings>(
    store: &mut dyn TextStore,
) -> Result<InitOutcome<S>, SettingsError> {
    let mut document = parse_document(&store.read()?)?;
    match document.remove(S::SECTION) {
        Some(section) => section
            .try_into::<S>()
            .map(InitOutcome::Ready)
            .map_err(|e| SettingsError::Malformed(format!("[{}]: {e}", S::SECTION))),
        None => {
            save_settings(store, &S::default())?;
            Ok(InitOutcome::DefaultsWritten)
        }
    }
}

/// Writes `settings` into the role's table, keeping any other table of the document.
///
/// # Errors
/// [`SettingsError::Malformed`] when the stored document no longer parses.
pub fn save_settings<S: RoleSettings>(
    store: &mut dyn TextStore,
    settings: &S,
) -> Result<(), SettingsError> {
    let mut document = parse_document(&store.read()?)?;
    let section =
        toml::Value::try_from(settings).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    document.insert(S::SECTION.to_string(), section);
    let text = toml::to_string(&document).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    store.write(&text)?;
    Ok(())
}

fn parse_document(text: &str) -> Result<toml::Table, SettingsError> {
    text.parse::<toml::Table>().map_err(|e| SettingsError::Malformed(e.to_string()))
}
