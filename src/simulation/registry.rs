//! # Order Registry
//!
//! The synchronous core of the simulation: the set of active orders and the
//! tick that moves them forward. It has no timers and no I/O, so the actor
//! and the tests drive it the same way: call [`OrderRegistry::tick`] with the
//! current instant and publish the returned events.
//!
//! ## Tick rules
//!
//! - Orders are visited in registration order.
//! - An order advances by **at most one** step per tick, toward the stage its
//!   timeline says `now` belongs to. `current_step` never decreases.
//! - An order that reached `delivered` stays queryable until the grace window
//!   has passed, then it is evicted.

use crate::model::{CartLine, Order, OrderEvent, OrderId, OrderItem, UserRef};
use crate::simulation::roster::Roster;
use crate::simulation::timeline::generate_timeline;
use crate::simulation::SimulationError;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub struct OrderRegistry {
    // Ids are handed out in increasing order, so key order is registration order.
    orders: BTreeMap<OrderId, Order>,
    next_id: u32,
    roster: Roster,
    grace: Duration,
}

impl OrderRegistry {
    pub fn new(roster: Roster, grace: Duration) -> Self {
        Self {
            orders: BTreeMap::new(),
            next_id: 1,
            roster,
            grace,
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Registers a new order built from `cart` at step 0.
    pub fn create(
        &mut self,
        cart: &[CartLine],
        user: UserRef,
        now: DateTime<Utc>,
    ) -> Result<Order, SimulationError> {
        let items: Vec<OrderItem> = cart
            .iter()
            .filter(|line| {
                if line.quantity == 0 {
                    warn!(line = %line.key(), "Skipping zero-quantity line");
                }
                line.quantity > 0
            })
            .map(OrderItem::from)
            .collect();

        if items.is_empty() {
            warn!(user_id = %user.id, "Refusing to create an order from an empty cart");
            return Err(SimulationError::EmptyOrder);
        }

        let id = OrderId(self.next_id);
        self.next_id += 1;

        let cast = self.roster.assign();
        let order = Order::new(id, user, now, items, cast, generate_timeline(now));
        info!(
            order_id = %id,
            items = order.items.len(),
            total = order.total,
            chef = %order.chef.name,
            driver = %order.driver.name,
            active = self.orders.len() + 1,
            "Order created"
        );
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).cloned()
    }

    /// Snapshot of every order still in the registry, in registration order.
    pub fn list(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    /// Runs one scheduler pass at `now` and returns the resulting events in
    /// the order they happened.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<OrderEvent> {
        let mut events = Vec::new();

        for order in self.orders.values_mut() {
            if let Some(from_step) = order.advance(now) {
                info!(
                    order_id = %order.id,
                    from = from_step,
                    to = order.current_step(),
                    status = %order.status(),
                    "Stage advanced"
                );
                if order.is_delivered() {
                    info!(order_id = %order.id, "Delivered");
                }
                events.push(OrderEvent::Advanced {
                    order: order.clone(),
                    from_step,
                });
            }
        }

        let grace = self.grace;
        let expired: Vec<OrderId> = self
            .orders
            .values()
            .filter(|order| {
                order
                    .delivered_at()
                    .is_some_and(|delivered| now - delivered >= grace)
            })
            .map(|order| order.id)
            .collect();

        for id in expired {
            self.orders.remove(&id);
            info!(order_id = %id, active = self.orders.len(), "Evicted");
            events.push(OrderEvent::Evicted { id });
        }

        debug!(events = events.len(), active = self.orders.len(), "Tick");
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemType, SellableItem, StatusKey};
    use crate::simulation::timeline::total_duration;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap()
    }

    fn registry() -> OrderRegistry {
        OrderRegistry::new(Roster::new(Some(1)), Duration::seconds(60))
    }

    fn cart() -> Vec<CartLine> {
        vec![
            CartLine {
                item: SellableItem::new("d1", "Dumplings", 10.0),
                item_type: ItemType::Dish,
                quantity: 2,
            },
            CartLine {
                item: SellableItem::new("c1", "Knife skills", 25.5),
                item_type: ItemType::Class,
                quantity: 1,
            },
        ]
    }

    fn user() -> UserRef {
        UserRef::new("u1", "Ada")
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let mut registry = registry();
        assert_eq!(
            registry.create(&[], user(), t0()),
            Err(SimulationError::EmptyOrder)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_snapshots_items_and_total() {
        let mut registry = registry();
        let order = registry.create(&cart(), user(), t0()).unwrap();

        assert_eq!(order.id, OrderId(1));
        assert_eq!(order.current_step(), 0);
        assert_eq!(order.status(), StatusKey::Confirmed);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, 45.5);
        assert_eq!(registry.get(order.id), Some(order));
    }

    #[test]
    fn test_one_step_per_tick_even_when_far_behind() {
        let mut registry = registry();
        let order = registry.create(&cart(), user(), t0()).unwrap();
        let late = t0() + total_duration();

        let mut steps = Vec::new();
        for _ in 0..10 {
            registry.tick(late);
            if let Some(snapshot) = registry.get(order.id) {
                steps.push(snapshot.current_step());
            }
        }
        assert_eq!(&steps[..7], &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(&steps[7..], &[7, 7, 7]);
    }

    #[test]
    fn test_step_never_decreases_when_clock_goes_back() {
        let mut registry = registry();
        let order = registry.create(&cart(), user(), t0()).unwrap();

        registry.tick(t0() + Duration::minutes(3));
        assert_eq!(registry.get(order.id).unwrap().current_step(), 1);

        registry.tick(t0());
        assert_eq!(registry.get(order.id).unwrap().current_step(), 1);
    }

    #[test]
    fn test_delivered_order_evicted_after_grace() {
        let mut registry = registry();
        let order = registry.create(&cart(), user(), t0()).unwrap();
        let done = t0() + total_duration();

        for _ in 0..7 {
            registry.tick(done);
        }
        let delivered = registry.get(order.id).unwrap();
        assert_eq!(delivered.status(), StatusKey::Delivered);
        assert_eq!(delivered.delivered_at(), Some(done));

        let events = registry.tick(done + Duration::seconds(59));
        assert!(events.is_empty());
        assert!(registry.get(order.id).is_some());

        let events = registry.tick(done + Duration::seconds(60));
        assert_eq!(events, vec![OrderEvent::Evicted { id: order.id }]);
        assert!(registry.get(order.id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_orders_advance_independently() {
        let mut registry = registry();
        let first = registry.create(&cart(), user(), t0()).unwrap();
        let second = registry
            .create(&cart(), user(), t0() + Duration::minutes(4))
            .unwrap();

        let events = registry.tick(t0() + Duration::minutes(6));
        let advanced: Vec<OrderId> = events.iter().map(OrderEvent::order_id).collect();
        assert_eq!(advanced, vec![first.id, second.id]);

        let listed = registry.list();
        assert_eq!(listed[0].current_step(), 1);
        assert_eq!(listed[1].current_step(), 1);

        registry.tick(t0() + Duration::minutes(6));
        let listed = registry.list();
        assert_eq!(listed[0].status(), StatusKey::Cooking);
        // Second order is only two minutes old: still preparing.
        assert_eq!(listed[1].status(), StatusKey::Preparing);
    }
}
