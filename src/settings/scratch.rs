//! Single-line runtime state, rewritten after every mutating command.

use crate::flight_control::common::Vec3D;

/// Leader line: `disabled` alone, or `disabled;targetId;targetName` once a target name
/// is known. `disabled` is `0` or `1`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeaderScratch {
    pub disabled: bool,
    pub target_id: i64,
    pub target_name: Option<String>,
}

impl LeaderScratch {
    pub fn encode(&self) -> String {
        let disabled = flag(self.disabled);
        match &self.target_name {
            Some(name) => format!("{disabled};{};{name}", self.target_id),
            None => disabled.to_string(),
        }
    }

    /// Parses a stored line. `None` for a line that cannot be read back.
    pub fn decode(line: &str) -> Option<Self> {
        let mut fields = line.trim().splitn(3, ';');
        let disabled = fields.next()? == "1";
        let Some(target_id) = fields.next() else {
            return Some(Self { disabled, ..Self::default() });
        };
        Some(Self {
            disabled,
            target_id: target_id.parse().ok()?,
            target_name: Some(fields.next()?.to_string()),
        })
    }
}

/// Follower line: `disabled;x;y;z;currentConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowerScratch {
    pub disabled: bool,
    pub offset: Vec3D<f64>,
    pub current_config: String,
}

impl FollowerScratch {
    pub fn encode(&self) -> String {
        let o = self.offset;
        format!("{};{};{};{};{}", flag(self.disabled), o.x(), o.y(), o.z(), self.current_config)
    }

    pub fn decode(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().splitn(5, ';').collect();
        let [disabled, x, y, z, config] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            disabled: *disabled == "1",
            offset: Vec3D::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?),
            current_config: (*config).to_string(),
        })
    }
}

fn flag(value: bool) -> char { if value { '1' } else { '0' } }
