//! # Simulation Actor
//!
//! The task that owns the [`OrderRegistry`] and is the only writer of order
//! state. It multiplexes two inputs in one loop:
//!
//! - requests from [`SimulationClient`]s (create, get, list, tick),
//! - the scheduler interval, polled only while at least one order is active.
//!
//! Because both arms run on the same task, every transition is sequential:
//! there is no locking around the registry and no two ticks overlap.
//! Observers are notified from inside the loop, right after each committed
//! change, so callbacks must return quickly.

use crate::config::SimulationConfig;
use crate::framework::{Clock, ObserverList};
use crate::model::OrderEvent;
use crate::simulation::client::SimulationClient;
use crate::simulation::message::SimulationRequest;
use crate::simulation::registry::OrderRegistry;
use crate::simulation::roster::Roster;
use crate::simulation::SimulationError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

pub struct SimulationActor {
    receiver: mpsc::Receiver<SimulationRequest>,
    registry: OrderRegistry,
    observers: ObserverList<OrderEvent>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
}

impl SimulationActor {
    /// Creates a new `SimulationActor` and its associated `SimulationClient`.
    ///
    /// The actor does nothing until [`SimulationActor::run`] is spawned.
    /// A zero tick interval is raised to one millisecond.
    pub fn new(config: &SimulationConfig, clock: Arc<dyn Clock>) -> (Self, SimulationClient) {
        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
        let observers = ObserverList::new();
        let actor = Self {
            receiver,
            registry: OrderRegistry::new(Roster::new(config.seed), config.eviction_grace()),
            observers: observers.clone(),
            clock,
            tick_interval: config.tick_interval().max(MIN_TICK_INTERVAL),
        };
        let client = SimulationClient::new(sender, observers);
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(tick_ms = self.tick_interval.as_millis() as u64, "Simulation actor started");

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => {
                        if self.handle(msg) {
                            // First order after an idle period: start counting from now.
                            interval.reset();
                            info!("Scheduler started");
                        }
                    }
                    None => break,
                },
                _ = interval.tick(), if !self.registry.is_empty() => {
                    self.tick();
                }
            }
        }

        info!(active = self.registry.len(), "Simulation actor shutdown");
    }

    /// Handles one request. Returns `true` when it woke the scheduler up.
    fn handle(&mut self, msg: SimulationRequest) -> bool {
        match msg {
            SimulationRequest::Create {
                cart,
                user,
                respond_to,
            } => {
                debug!(lines = cart.len(), user_id = %user.id, "Create");
                let was_idle = self.registry.is_empty();
                match self.registry.create(&cart, user, self.clock.now()) {
                    Ok(order) => {
                        self.observers.notify(&OrderEvent::Created(order.clone()));
                        let _ = respond_to.send(Ok(order));
                        was_idle
                    }
                    Err(e) => {
                        let _ = respond_to.send(Err(e));
                        false
                    }
                }
            }
            SimulationRequest::Get { id, respond_to } => {
                let order = self.registry.get(id);
                debug!(order_id = %id, found = order.is_some(), "Get");
                let _ = respond_to.send(order.ok_or(SimulationError::NotFound(id)));
                false
            }
            SimulationRequest::List { respond_to } => {
                debug!(active = self.registry.len(), "List");
                let _ = respond_to.send(Ok(self.registry.list()));
                false
            }
            SimulationRequest::Tick { respond_to } => {
                let events = self.tick();
                let _ = respond_to.send(Ok(events));
                false
            }
        }
    }

    fn tick(&mut self) -> usize {
        let events = self.registry.tick(self.clock.now());
        for event in &events {
            self.observers.notify(event);
        }
        if !events.is_empty() && self.registry.is_empty() {
            info!("Scheduler idle");
        }
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ManualClock;
    use crate::model::{CartLine, ItemType, OrderId, SellableItem, StatusKey, UserRef};
    use crate::simulation::timeline::total_duration;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn config() -> SimulationConfig {
        SimulationConfig {
            seed: Some(3),
            ..SimulationConfig::default()
        }
    }

    fn cart() -> Vec<CartLine> {
        vec![CartLine {
            item: SellableItem::new("d1", "Dumplings", 10.0),
            item_type: ItemType::Dish,
            quantity: 2,
        }]
    }

    #[tokio::test]
    async fn test_actor_create_get_and_tick() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        let clock = ManualClock::new(t0);
        let (actor, client) = SimulationActor::new(&config(), Arc::new(clock.clone()));
        let handle = tokio::spawn(actor.run());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = client.subscribe_all(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let order = client
            .create_fake_order(cart(), UserRef::new("u1", "Ada"))
            .await
            .unwrap();
        assert_eq!(order.id, OrderId(1));

        clock.set(t0 + total_duration());
        for _ in 0..7 {
            client.tick_now().await.unwrap();
        }
        let delivered = client.get_order(order.id).await.unwrap();
        assert_eq!(delivered.status(), StatusKey::Delivered);

        // One Created plus seven Advanced events.
        let events = seen.lock().unwrap().clone();
        assert_eq!(events.len(), 8);
        assert!(matches!(events[0], OrderEvent::Created(_)));

        assert!(sub.unsubscribe());
        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_subscriber_keeps_actor_alive() {
        let clock = ManualClock::new(Utc::now());
        let (actor, client) = SimulationActor::new(&config(), Arc::new(clock));
        let handle = tokio::spawn(actor.run());

        let _faulty = client.subscribe_all(|_| panic!("view bug"));

        let order = client
            .create_fake_order(cart(), UserRef::new("u1", "Ada"))
            .await
            .unwrap();
        let active = client.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, order.id);
        assert_eq!(client.tick_now().await, Ok(0));

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_tick_interval_is_clamped() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        let clock = ManualClock::new(t0);
        let zero = SimulationConfig {
            tick_interval_ms: 0,
            ..config()
        };
        let (actor, client) = SimulationActor::new(&zero, Arc::new(clock.clone()));
        assert_eq!(actor.tick_interval, MIN_TICK_INTERVAL);
        let handle = tokio::spawn(actor.run());

        let order = client
            .create_fake_order(cart(), UserRef::new("u1", "Ada"))
            .await
            .unwrap();
        clock.set(t0 + chrono::Duration::minutes(3));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(client.get_order(order.id).await.unwrap().current_step(), 1);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let clock = ManualClock::new(Utc::now());
        let (actor, client) = SimulationActor::new(&config(), Arc::new(clock));
        let handle = tokio::spawn(actor.run());

        assert_eq!(
            client.get_order(OrderId(99)).await,
            Err(SimulationError::NotFound(OrderId(99)))
        );

        drop(client);
        handle.await.unwrap();
    }
}
