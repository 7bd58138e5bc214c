//! This module provides everything that travels over the shared broadcast channel:
//! the `formation_messages` wire definitions, the `codec` turning them into pose frames
//! and routed commands, the `command` router parsing command strings for both roles,
//! and the `broadcast_bus` carrying encoded messages between vehicles.

pub mod broadcast_bus;
pub mod codec;
pub mod command;
mod formation_messages;

pub use broadcast_bus::{command_topic, pose_topic, BroadcastBus, BusTransmitter, Transmitter};
pub use codec::{LeaderUpdate, PoseFrame, RoutedCommand};
pub use command::{Addressees, CommandSeparator, ConsoleInput, FollowerCommand, LeaderCommand};
