use crate::flight_control::devices::DeviceRegistry;
use crate::settings::TextStore;

/// Struct bundling what a vehicle is built from: the device registry it discovers its
/// hardware through and the two stores its settings document and scratch line live in.
pub struct Keychain {
    /// Device discovery on the vehicle.
    registry: Box<dyn DeviceRegistry>,
    /// Store of the TOML settings document.
    settings: Box<dyn TextStore>,
    /// Store of the single-line runtime state.
    scratch: Box<dyn TextStore>,
}

impl Keychain {
    pub fn new(
        registry: Box<dyn DeviceRegistry>,
        settings: Box<dyn TextStore>,
        scratch: Box<dyn TextStore>,
    ) -> Self {
        Self { registry, settings, scratch }
    }

    /// Splits the keychain into registry, settings store and scratch store.
    pub fn into_parts(self) -> (Box<dyn DeviceRegistry>, Box<dyn TextStore>, Box<dyn TextStore>) {
        (self.registry, self.settings, self.scratch)
    }
}
