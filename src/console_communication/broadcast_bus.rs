use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

/// Per-topic fan-out of encoded messages shared by every vehicle of a session.
///
/// Delivery is fire-and-forget: a send without subscribers is dropped and a slow
/// subscriber loses the oldest messages once its buffer of [`BroadcastBus::CAPACITY`]
/// fills up.
#[derive(Default)]
pub struct BroadcastBus {
    topics: Mutex<HashMap<String, broadcast::Sender<Arc<[u8]>>>>,
}

impl BroadcastBus {
    pub const CAPACITY: usize = 16;

    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    fn sender(&self, topic: &str) -> broadcast::Sender<Arc<[u8]>> {
        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        topics.entry(topic.to_string()).or_insert_with(|| broadcast::Sender::new(Self::CAPACITY)).clone()
    }

    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Arc<[u8]>> {
        self.sender(topic).subscribe()
    }

    /// Publishes `payload` on `topic` and returns how many subscribers got it.
    pub fn publish(&self, topic: &str, payload: Vec<u8>) -> usize {
        self.sender(topic).send(Arc::from(payload)).unwrap_or(0)
    }
}

/// Outbound side of the broadcast channel as seen by a vehicle.
pub trait Transmitter: Send {
    fn broadcast(&mut self, topic: &str, payload: Vec<u8>);
}

/// [`Transmitter`] publishing onto a shared [`BroadcastBus`].
pub struct BusTransmitter {
    bus: Arc<BroadcastBus>,
}

impl BusTransmitter {
    pub fn new(bus: Arc<BroadcastBus>) -> Self { Self { bus } }
}

impl Transmitter for BusTransmitter {
    fn broadcast(&mut self, topic: &str, payload: Vec<u8>) { self.bus.publish(topic, payload); }
}

/// Topic carrying the leader's pose frames for system `system_id`.
pub fn pose_topic(system_id: &str) -> String { format!("{POSE_TAG}{system_id}") }

/// Topic carrying routed commands for system `system_id`.
pub fn command_topic(system_id: &str) -> String { format!("{COMMAND_TAG}{system_id}") }

const POSE_TAG: &str = "FSLeader";
const COMMAND_TAG: &str = "FSCommand";
