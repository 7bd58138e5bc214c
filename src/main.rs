#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

use formation_ob::settings::{
    load_settings, FileStore, FollowerSettings, LeaderSettings, RoleSettings, TextStore,
};
use formation_ob::{fatal, info, mode_control::InitOutcome};
use std::env;
use std::fmt::Debug;

const DEFAULT_SETTINGS_PATH: &str = "./formation.toml";

/// Runs the settings start-up sequence of a role against a settings file: writes the
/// defaults when the role's table is missing and validates it otherwise.
fn main() {
    let role = env::args().nth(1).unwrap_or_else(|| "follower".to_string());
    let path_var = env::var("FORMATION_SETTINGS");
    let path = path_var.as_ref().map_or(DEFAULT_SETTINGS_PATH, String::as_str);
    let mut store = FileStore::new(path);
    match role.as_str() {
        "leader" => check::<LeaderSettings>(&mut store, path),
        "follower" => check::<FollowerSettings>(&mut store, path),
        other => fatal!("Unknown role '{other}', expected 'leader' or 'follower'."),
    }
}

fn check<S: RoleSettings + Debug>(store: &mut dyn TextStore, path: &str) {
    match load_settings::<S>(store) {
        Ok(InitOutcome::Ready(settings)) => {
            info!("[{}] in {path} is valid.", S::SECTION);
            info!("{settings:#?}");
        }
        Ok(InitOutcome::DefaultsWritten) => {
            info!("Wrote default [{}] to {path}. Review it and run again.", S::SECTION);
        }
        Err(e) => fatal!("Settings in {path} unusable: {e}"),
    }
}
