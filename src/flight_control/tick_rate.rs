use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use strum_macros::{Display, EnumIter};

/// Scheduling rate of a vehicle's control loop.
///
/// One simulation step lasts 1/60 s; `Fast` runs every step, `Medium` every 10th and
/// `Slow` every 100th. [`TickRate::seconds_per_tick`] is what dead reckoning multiplies
/// elapsed ticks with, so it has to match the rate the loop actually runs at.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, EnumIter, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TickRate {
    Fast,
    Medium,
    Slow,
}

struct TickRateProfile {
    seconds_per_tick: f64,
    steps_per_tick: u32,
    report_every: u64,
}

const STEP: Duration = Duration::from_nanos(16_666_667);

static TICK_RATE_LOOKUP: LazyLock<HashMap<TickRate, TickRateProfile>> = LazyLock::new(|| {
    let mut lookup = HashMap::new();
    let profiles = vec![
        (TickRate::Fast, 1.0 / 60.0, 1, 100),
        (TickRate::Medium, 1.0 / 6.0, 10, 10),
        (TickRate::Slow, 5.0 / 3.0, 100, 1),
    ];

    for (rate, seconds_per_tick, steps_per_tick, report_every) in profiles {
        lookup.insert(rate, TickRateProfile { seconds_per_tick, steps_per_tick, report_every });
    }
    lookup
});

impl TickRate {
    pub fn seconds_per_tick(self) -> f64 { TICK_RATE_LOOKUP[&self].seconds_per_tick }

    /// Wall-clock interval between two scheduled ticks.
    pub fn period(self) -> Duration { STEP * TICK_RATE_LOOKUP[&self].steps_per_tick }

    /// Number of ticks between two status reports.
    pub fn report_every(self) -> u64 { TICK_RATE_LOOKUP[&self].report_every }

    /// Rate used while a target is being (re-)acquired.
    pub fn search_rate(self) -> Self {
        match self {
            TickRate::Slow => TickRate::Medium,
            rate => rate,
        }
    }
}
