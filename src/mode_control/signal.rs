use crate::settings::{SettingsError, StoreError};
use strum_macros::Display;

/// Result of bringing up a vehicle's control loop.
pub enum InitOutcome<T> {
    Ready(T),
    /// The settings table was missing and defaults were written; the operator has to
    /// review them before the vehicle is started again.
    DefaultsWritten,
}

impl<T> InitOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            InitOutcome::Ready(value) => Some(value),
            InitOutcome::DefaultsWritten => None,
        }
    }
}

/// Start-up failures that leave the vehicle inert.
#[derive(Debug, Display)]
pub enum StartupError {
    ConfigurationMalformed(String),
    NoActuationHardwareFound,
    Store(StoreError),
}

impl std::error::Error for StartupError {}

impl From<SettingsError> for StartupError {
    fn from(value: SettingsError) -> Self {
        match value {
            SettingsError::Malformed(reason) => StartupError::ConfigurationMalformed(reason),
            SettingsError::Store(e) => StartupError::Store(e),
        }
    }
}
