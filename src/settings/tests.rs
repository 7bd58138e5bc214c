use super::{
    load_settings, save_settings, ConfigSet, FileStore, FollowerScratch, FollowerSettings,
    LeaderScratch, LeaderSettings, MemoryStore, SettingsError, TextStore,
};
use crate::flight_control::common::Vec3D;
use crate::flight_control::tick_rate::TickRate;
use crate::mode_control::InitOutcome;

fn load<S: super::RoleSettings>(store: &mut MemoryStore) -> Result<InitOutcome<S>, SettingsError> {
    load_settings::<S>(store)
}

#[test]
fn test_defaults_written_for_empty_store() {
    let mut store = MemoryStore::default();
    assert!(matches!(load::<FollowerSettings>(&mut store), Ok(InitOutcome::DefaultsWritten)));
    let written = store.contents();
    assert!(written.contains("[formation-follower]"));
    assert!(written.contains("default-preset 50 0 0"));

    let settings = load::<FollowerSettings>(&mut store).unwrap().ready().unwrap();
    assert_eq!(settings, FollowerSettings::default());
}

#[test]
fn test_missing_table_keeps_other_roles() {
    let mut store = MemoryStore::new("[formation-leader]\nsystem_id = \"Wing\"\n");
    assert!(matches!(load::<FollowerSettings>(&mut store), Ok(InitOutcome::DefaultsWritten)));
    let leader = load::<LeaderSettings>(&mut store).unwrap().ready().unwrap();
    assert_eq!(leader.system_id, "Wing");
    assert!(load::<FollowerSettings>(&mut store).unwrap().ready().is_some());
}

#[test]
fn test_partial_table_uses_defaults() {
    let mut store = MemoryStore::new(
        "[formation-leader]\ntick_speed = \"slow\"\nsensor_group = \"Trackers\"\nactive_ranging = true\n",
    );
    let leader = load::<LeaderSettings>(&mut store).unwrap().ready().unwrap();
    assert_eq!(leader.tick_speed, TickRate::Slow);
    assert_eq!(leader.detector_group(), Some("Trackers"));
    assert!(leader.active_ranging);
    assert_eq!(leader.scan_distance, 1000.0);
    assert!(leader.attempt_reconnection);
    assert_eq!(LeaderSettings::default().detector_group(), None);
}

#[test]
fn test_malformed_settings() {
    let mut bad_type = MemoryStore::new("[formation-follower]\nmax_speed = \"fast\"\n");
    assert!(matches!(load::<FollowerSettings>(&mut bad_type), Err(SettingsError::Malformed(_))));

    let mut bad_configs = MemoryStore::new("[formation-follower]\nconfigs = \"alpha 1 2\"\n");
    assert!(matches!(load::<FollowerSettings>(&mut bad_configs), Err(SettingsError::Malformed(_))));

    let mut empty_configs = MemoryStore::new("[formation-follower]\nconfigs = \"\"\n");
    assert!(matches!(load::<FollowerSettings>(&mut empty_configs), Err(SettingsError::Malformed(_))));

    let mut not_toml = MemoryStore::new("[formation-follower\n");
    assert!(matches!(load::<FollowerSettings>(&mut not_toml), Err(SettingsError::Malformed(_))));
    assert_eq!(not_toml.contents(), "[formation-follower\n");
}

#[test]
fn test_configs_text() {
    let set = ConfigSet::parse("left -30 0 10\n\n  right 30 0 10  \nleft -40 0 10\n").unwrap();
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["left", "right"]);
    assert_eq!(set.get("left"), Some(Vec3D::new(-40.0, 0.0, 10.0)));
    assert_eq!(set.first(), ("left", Vec3D::new(-40.0, 0.0, 10.0)));
    assert_eq!(set.get("Left"), None);
    assert_eq!(set.encode(), "left -40 0 10\nright 30 0 10");
    assert!(ConfigSet::parse("left -30 zero 10").is_err());
}

#[test]
fn test_saved_configs_survive_reload() {
    let mut store = MemoryStore::default();
    let mut settings = FollowerSettings::default();
    settings.configs.insert("Alpha", Vec3D::new(0.1, -2.75, 1e-3));
    save_settings(&mut store, &settings).unwrap();
    let reloaded = load::<FollowerSettings>(&mut store).unwrap().ready().unwrap();
    assert_eq!(reloaded.configs.get("Alpha"), Some(Vec3D::new(0.1, -2.75, 1e-3)));
    assert_eq!(reloaded, settings);
}

#[test]
fn test_leader_scratch() {
    let locked = LeaderScratch { disabled: false, target_id: 42, target_name: Some("Scout".into()) };
    assert_eq!(locked.encode(), "0;42;Scout");
    assert_eq!(LeaderScratch::decode("0;42;Scout"), Some(locked));
    assert_eq!(LeaderScratch::decode("1"), Some(LeaderScratch { disabled: true, ..Default::default() }));
    assert_eq!(LeaderScratch::default().encode(), "0");
    assert_eq!(
        LeaderScratch::decode("0;0;Scout;Two").map(|s| s.target_name),
        Some(Some("Scout;Two".to_string()))
    );
    assert_eq!(LeaderScratch::decode("0;abc;Scout"), None);
    assert_eq!(LeaderScratch::decode("0;42"), None);
}

#[test]
fn test_follower_scratch() {
    let state = FollowerScratch {
        disabled: true,
        offset: Vec3D::new(-30.0, 5.5, 12.0),
        current_config: "left".into(),
    };
    assert_eq!(state.encode(), "1;-30;5.5;12;left");
    assert_eq!(FollowerScratch::decode("1;-30;5.5;12;left"), Some(state));
    assert_eq!(FollowerScratch::decode("0;1;2;left"), None);
    assert_eq!(FollowerScratch::decode("0;1;two;3;left"), None);
}

#[test]
fn test_file_store() {
    let path = std::env::temp_dir().join(format!("formation-ob-store-{}.toml", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let mut store = FileStore::new(&path);
    assert_eq!(store.read().unwrap(), "");
    store.write("0;42;Scout").unwrap();
    assert_eq!(FileStore::new(&path).read().unwrap(), "0;42;Scout");
    std::fs::remove_file(&path).unwrap();
}
