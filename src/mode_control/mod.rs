//! This module drives the vehicles: the `Vehicle` interface shared by leader and follower,
//! the `VehicleRunner` scheduling ticks and delivering messages and console input, and the
//! start-up signals both roles report.

mod runner;
mod signal;
mod vehicle;

pub use runner::VehicleRunner;
pub use signal::{InitOutcome, StartupError};
pub use vehicle::Vehicle;
