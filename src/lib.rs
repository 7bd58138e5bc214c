//! Leader/follower formation flight.
//!
//! A leader tracks a designated target (or itself) and broadcasts its pose as the
//! formation's reference frame; followers hold stations at named offsets inside that frame
//! and obey commands routed to them by id.
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

pub mod console_communication;
pub mod flight_control;
pub mod keychain;
#[doc(hidden)]
pub mod logger;
pub mod mode_control;
pub mod settings;
