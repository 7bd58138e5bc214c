//! The follower side of a formation: the coordinator holding a station in the leader's
//! frame, the dead-reckoning extrapolation between broadcasts and the path probe behind
//! the obstacle veto.

mod collision;
mod coordinator;
mod dead_reckoning;

pub use collision::{probe_path, MIN_HIT_DISTANCE};
pub use coordinator::{FollowerCoordinator, LeaderFix};
pub use dead_reckoning::dead_reckoning_shift;
