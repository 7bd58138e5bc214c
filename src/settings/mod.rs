//! Persistent state of a vehicle: the role's settings document with the named offset
//! presets, the single-line runtime scratch state, and the text stores both live in.

pub mod configs;
pub mod role_settings;
pub mod scratch;
pub mod store;
#[cfg(test)]
mod tests;

pub use configs::ConfigSet;
pub use role_settings::{
    load_settings, save_settings, FollowerSettings, LeaderSettings, RoleSettings, SettingsError,
};
pub use scratch::{FollowerScratch, LeaderScratch};
pub use store::{FileStore, MemoryStore, StoreError, TextStore};
