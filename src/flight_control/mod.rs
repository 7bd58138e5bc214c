pub mod common;
pub mod devices;
pub mod follower;
pub mod leader;
pub mod tick_rate;
#[cfg(test)]
pub(crate) mod test_devices;
