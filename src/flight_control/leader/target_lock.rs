use crate::flight_control::devices::DetectionResult;
use strum_macros::Display;

/// Observable state of a leader's tracking.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum LeaderState {
    /// No target and self-broadcast disabled; nothing is sent.
    Idle,
    /// No target; the leader broadcasts its own pose.
    SelfBroadcasting,
    /// Only a target name is known; detections are swept for it.
    Searching,
    /// The target was detected on the last tick.
    Locked,
    /// The target was not detected on the last tick; no frame is sent until it reappears.
    PredictiveHold,
}

/// Identity of the tracked target and the last sighting used for prediction.
///
/// A non-zero id always comes with the name it was resolved from.
#[derive(Debug, Clone, Default)]
pub struct TargetLock {
    id: i64,
    name: Option<String>,
    last_hit: Option<DetectionResult>,
    /// Seconds flown since `last_hit`, summed tick by tick at each tick's own rate.
    since_hit: f64,
    held: bool,
}

impl TargetLock {
    /// A lock restored from persisted state, not yet confirmed by a detection.
    pub fn restored(id: i64, name: String) -> Self {
        Self { id, name: Some(name), ..Self::default() }
    }

    pub fn id(&self) -> i64 { self.id }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    pub fn is_set(&self) -> bool { self.id != 0 || self.name.is_some() }

    pub fn state(&self, allow_follow_self: bool) -> LeaderState {
        match (self.id, &self.name) {
            (0, Some(_)) => LeaderState::Searching,
            (0, None) if allow_follow_self => LeaderState::SelfBroadcasting,
            (0, None) => LeaderState::Idle,
            _ if self.held => LeaderState::PredictiveHold,
            _ => LeaderState::Locked,
        }
    }

    pub fn clear(&mut self) { *self = Self::default(); }

    /// Searches by name; any previous id is forgotten.
    pub fn search(&mut self, name: String) {
        *self = Self { name: Some(name), ..Self::default() };
    }

    /// Adopts the identity of `detection`.
    pub fn lock_on(&mut self, detection: &DetectionResult) {
        self.id = detection.entity_id;
        self.name = Some(detection.name.clone());
        self.held = false;
    }

    /// Drops the id but keeps searching for the name.
    pub fn release(&mut self) {
        self.id = 0;
        self.held = false;
        self.last_hit = None;
    }

    pub fn record_hit(&mut self, detection: DetectionResult) {
        self.last_hit = Some(detection);
        self.since_hit = 0.0;
    }

    /// Accounts for one tick of `seconds` passing since the last hit.
    pub fn advance(&mut self, seconds: f64) { self.since_hit += seconds; }

    /// The last confirmed sighting and the seconds elapsed since.
    pub fn last_hit(&self) -> Option<(&DetectionResult, f64)> {
        self.last_hit.as_ref().map(|hit| (hit, self.since_hit))
    }

    pub fn set_held(&mut self, held: bool) { self.held = held; }
}
