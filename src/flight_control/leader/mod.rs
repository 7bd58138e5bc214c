//! The leader side of a formation: target identity and tracking state, and the tracker
//! broadcasting the reference frame and routing console commands to the followers.

mod target_lock;
mod tracker;

pub use target_lock::{LeaderState, TargetLock};
pub use tracker::LeaderTracker;
