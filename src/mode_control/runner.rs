use super::Vehicle;
use crate::console_communication::BroadcastBus;
use crate::flight_control::tick_rate::TickRate;
use crate::{info, warn};
use futures::future::select_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

type Inbox = Vec<(String, broadcast::Receiver<Arc<[u8]>>)>;

/// Runs one [`Vehicle`] as a single task.
///
/// Ticks, broadcasts and console input are handled one at a time. Before each tick every
/// subscribed topic is drained, so a tick always sees the newest pose.
pub struct VehicleRunner<V: Vehicle> {
    vehicle: V,
    inbox: Inbox,
    console: mpsc::Receiver<String>,
    c_tok: CancellationToken,
    _bus: Arc<BroadcastBus>,
}

impl<V: Vehicle + 'static> VehicleRunner<V> {
    /// Interval used while the vehicle is unscheduled; the tick branch is disabled then.
    const IDLE_PERIOD: Duration = Duration::from_secs(3600);

    pub fn new(
        vehicle: V,
        bus: Arc<BroadcastBus>,
        console: mpsc::Receiver<String>,
        c_tok: CancellationToken,
    ) -> Self {
        let inbox = vehicle
            .subscriptions()
            .into_iter()
            .map(|topic| {
                let rx = bus.subscribe(&topic);
                (topic, rx)
            })
            .collect();
        Self { vehicle, inbox, console, c_tok, _bus: bus }
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<V> { tokio::spawn(self.run()) }

    /// Drives the vehicle until the token is cancelled and hands it back.
    pub async fn run(mut self) -> V {
        let mut schedule = self.vehicle.schedule();
        let mut ticker = Self::ticker(schedule);
        info!("Vehicle loop running at {}.", Self::describe(schedule));
        loop {
            tokio::select! {
                biased;
                () = self.c_tok.cancelled() => break,
                Some(argument) = self.console.recv() => self.vehicle.run_command(&argument),
                (index, received) = Self::recv_any(&mut self.inbox) => {
                    self.deliver(index, received);
                    self.drain();
                }
                _ = ticker.tick(), if schedule.is_some() => {
                    self.drain();
                    self.vehicle.tick();
                }
            }
            let next = self.vehicle.schedule();
            if next != schedule {
                info!("Vehicle loop rescheduled to {}.", Self::describe(next));
                schedule = next;
                ticker = Self::ticker(schedule);
            }
        }
        self.vehicle
    }

    fn ticker(schedule: Option<TickRate>) -> Interval {
        let period = schedule.map_or(Self::IDLE_PERIOD, TickRate::period);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    fn describe(schedule: Option<TickRate>) -> String {
        schedule.map_or_else(|| "no rate (stopped)".to_string(), |rate| format!("rate {rate}"))
    }

    /// Waits for the next message on any subscribed topic; pends forever without topics.
    async fn recv_any(inbox: &mut Inbox) -> (usize, Result<Arc<[u8]>, RecvError>) {
        if inbox.is_empty() {
            return std::future::pending().await;
        }
        let pending = inbox.iter_mut().map(|(_, rx)| Box::pin(rx.recv()));
        let (received, index, _) = select_all(pending).await;
        (index, received)
    }

    fn deliver(&mut self, index: usize, received: Result<Arc<[u8]>, RecvError>) {
        let topic = &self.inbox[index].0;
        match received {
            Ok(payload) => self.vehicle.handle_message(topic, &payload),
            Err(RecvError::Lagged(missed)) => warn!("Missed {missed} messages on {topic}."),
            Err(RecvError::Closed) => {}
        }
    }

    fn drain(&mut self) {
        for (topic, rx) in &mut self.inbox {
            loop {
                match rx.try_recv() {
                    Ok(payload) => self.vehicle.handle_message(topic, &payload),
                    Err(TryRecvError::Lagged(missed)) => warn!("Missed {missed} messages on {topic}."),
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
    }
}
