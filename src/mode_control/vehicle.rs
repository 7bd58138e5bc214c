use crate::flight_control::tick_rate::TickRate;

/// A control loop driven by a [`super::VehicleRunner`].
///
/// The runner never calls two of these methods concurrently, so implementations keep
/// their state without locking.
pub trait Vehicle: Send {
    /// One scheduled control step.
    fn tick(&mut self);

    /// A console command typed on this vehicle.
    fn run_command(&mut self, argument: &str);

    /// An encoded broadcast received on one of [`Vehicle::subscriptions`].
    fn handle_message(&mut self, _topic: &str, _payload: &[u8]) {}

    /// Broadcast topics this vehicle listens on.
    fn subscriptions(&self) -> Vec<String> { Vec::new() }

    /// Rate the loop should run at, `None` while unscheduled.
    fn schedule(&self) -> Option<TickRate>;

    /// Human-readable state summary.
    fn status_report(&self) -> String;
}
