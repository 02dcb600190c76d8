use crate::model::{CartLine, ItemType, SellableItem, StatusKey, TimelineStage};
use crate::simulation::RouteParams;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// The customer placing an order. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Fixed geography of an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderLocation {
    pub restaurant: GeoPoint,
    pub customer: GeoPoint,
}

/// The simulated cook preparing the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chef {
    pub name: String,
    pub avatar: String,
    pub rating: f32,
    pub specialty: String,
}

/// The simulated courier. The live position is derived on demand with
/// [`Order::driver_location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    pub avatar: String,
    pub rating: f32,
    pub vehicle: String,
}

/// A line of an order, copied from the cart at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item: SellableItem,
    pub item_type: ItemType,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            item: line.item.clone(),
            item_type: line.item_type,
            quantity: line.quantity,
        }
    }
}

/// Represents a simulated customer order.
///
/// # Simulation
/// An `Order` is owned by the simulation actor's registry. Callers only ever
/// see clones, so nothing outside the actor can move an order forward.
///
/// See [`OrderRegistry`](crate::simulation::OrderRegistry) for the only code
/// path that advances [`Order::current_step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user: UserRef,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    /// Computed once from `items` at creation.
    pub total: f64,
    pub chef: Chef,
    pub driver: Driver,
    pub location: OrderLocation,
    pub timeline: Vec<TimelineStage>,
    current_step: usize,
    delivered_at: Option<DateTime<Utc>>,
}

/// Parts assigned to a new order by the roster.
#[derive(Debug, Clone)]
pub struct OrderCast {
    pub chef: Chef,
    pub driver: Driver,
    pub location: OrderLocation,
}

impl Order {
    /// Builds a new order at step 0.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the registry
    /// * `user` - Customer placing the order
    /// * `created_at` - Placement instant
    /// * `items` - Snapshot of the cart
    /// * `cast` - Chef, driver and geography
    /// * `timeline` - Stage sequence, must be non-empty and time-ordered
    pub fn new(
        id: OrderId,
        user: UserRef,
        created_at: DateTime<Utc>,
        items: Vec<OrderItem>,
        cast: OrderCast,
        timeline: Vec<TimelineStage>,
    ) -> Self {
        debug_assert!(!timeline.is_empty(), "order timeline must not be empty");
        debug_assert!(
            timeline.windows(2).all(|w| w[0].time <= w[1].time),
            "timeline stages must be time-ordered"
        );
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            id,
            user,
            created_at,
            items,
            total,
            chef: cast.chef,
            driver: cast.driver,
            location: cast.location,
            timeline,
            current_step: 0,
            delivered_at: None,
        }
    }

    /// Index into `timeline` of the stage the order is currently at.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn last_step(&self) -> usize {
        self.timeline.len().saturating_sub(1)
    }

    pub fn current_stage(&self) -> Option<&TimelineStage> {
        self.timeline.get(self.current_step)
    }

    /// Always derived from `current_step`.
    pub fn status(&self) -> StatusKey {
        self.current_stage()
            .map(|stage| stage.status)
            .unwrap_or(StatusKey::Confirmed)
    }

    pub fn is_delivered(&self) -> bool {
        !self.timeline.is_empty() && self.current_step >= self.last_step()
    }

    /// Instant the order reached its terminal stage, if it has.
    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    /// Time from placement to the scheduled start of the last stage.
    pub fn total_duration(&self) -> Duration {
        self.timeline
            .last()
            .map(|stage| stage.time - self.created_at)
            .unwrap_or_else(Duration::zero)
    }

    /// Index of the latest stage whose start time is at or before `now`.
    pub fn target_step(&self, now: DateTime<Utc>) -> usize {
        self.timeline
            .iter()
            .rposition(|stage| stage.time <= now)
            .unwrap_or(0)
    }

    /// Moves one step toward the stage `now` corresponds to.
    ///
    /// Returns the previous step when the order advanced.
    pub(crate) fn advance(&mut self, now: DateTime<Utc>) -> Option<usize> {
        if self.is_delivered() || self.target_step(now) <= self.current_step {
            return None;
        }
        let from = self.current_step;
        self.current_step += 1;
        if self.is_delivered() {
            self.delivered_at = Some(now);
        }
        Some(from)
    }

    /// Driver coordinate at `now`. See [`crate::simulation::geo::driver_position`].
    pub fn driver_location(&self, now: DateTime<Utc>, params: &RouteParams) -> GeoPoint {
        crate::simulation::geo::driver_position(self, now, params)
    }
}

/// Change notifications published by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    /// A new order was registered at step 0.
    Created(Order),
    /// `current_step` moved forward by exactly one, from `from_step`.
    Advanced { order: Order, from_step: usize },
    /// The order left the active registry after its grace window.
    Evicted { id: OrderId },
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::Created(order) => order.id,
            OrderEvent::Advanced { order, .. } => order.id,
            OrderEvent::Evicted { id } => *id,
        }
    }

    /// Snapshot carried by the event, if any.
    pub fn order(&self) -> Option<&Order> {
        match self {
            OrderEvent::Created(order) | OrderEvent::Advanced { order, .. } => Some(order),
            OrderEvent::Evicted { .. } => None,
        }
    }
}
