use crate::flight_control::common::Vec3D;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

static CONFIG_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s*$").unwrap());

/// Named offset presets of a follower, kept in the order they were written.
///
/// Names are unique and case-sensitive. The set is never empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigSet {
    entries: Vec<(String, Vec3D<f64>)>,
}

impl ConfigSet {
    pub const DEFAULT_NAME: &'static str = "default-preset";

    /// Parses one `name x y z` entry per line; blank lines are skipped.
    ///
    /// # Errors
    /// A line that does not have exactly four fields, a non-numeric component, or a
    /// text without any entry.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut set = Self { entries: Vec::new() };
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let captures = CONFIG_LINE_REGEX
                .captures(line)
                .ok_or_else(|| format!("config line '{line}' is not 'name x y z'"))?;
            let component = |i: usize| {
                captures[i]
                    .parse::<f64>()
                    .map_err(|e| format!("config line '{line}': {e}"))
            };
            let offset = Vec3D::new(component(2)?, component(3)?, component(4)?);
            set.insert(&captures[1], offset);
        }
        if set.entries.is_empty() {
            return Err("there must be at least one config".to_string());
        }
        Ok(set)
    }

    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(name, o)| format!("{name} {} {} {}", o.x(), o.y(), o.z()))
            .join("\n")
    }

    pub fn get(&self, name: &str) -> Option<Vec3D<f64>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, offset)| *offset)
    }

    pub fn first(&self) -> (&str, Vec3D<f64>) {
        let (name, offset) = &self.entries[0];
        (name, *offset)
    }

    /// Stores `offset` under `name`, replacing an existing entry in place.
    pub fn insert(&mut self, name: &str, offset: Vec3D<f64>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = offset,
            None => self.entries.push((name.to_string(), offset)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(|(n, _)| n.as_str()) }
}

impl Default for ConfigSet {
    fn default() -> Self {
        Self { entries: vec![(Self::DEFAULT_NAME.to_string(), Vec3D::new(50.0, 0.0, 0.0))] }
    }
}

impl TryFrom<String> for ConfigSet {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<ConfigSet> for String {
    fn from(value: ConfigSet) -> Self { value.encode() }
}
