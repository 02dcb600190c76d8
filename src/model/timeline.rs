use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The ordered, closed set of order stages.
///
/// Variant order is the life-cycle order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKey {
    Confirmed,
    Preparing,
    Cooking,
    Ready,
    PickedUp,
    OutForDelivery,
    Nearby,
    Delivered,
}

impl StatusKey {
    /// All stages in life-cycle order.
    pub const ALL: [StatusKey; 8] = [
        StatusKey::Confirmed,
        StatusKey::Preparing,
        StatusKey::Cooking,
        StatusKey::Ready,
        StatusKey::PickedUp,
        StatusKey::OutForDelivery,
        StatusKey::Nearby,
        StatusKey::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::Confirmed => "confirmed",
            StatusKey::Preparing => "preparing",
            StatusKey::Cooking => "cooking",
            StatusKey::Ready => "ready",
            StatusKey::PickedUp => "picked_up",
            StatusKey::OutForDelivery => "out_for_delivery",
            StatusKey::Nearby => "nearby",
            StatusKey::Delivered => "delivered",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusKey::Delivered)
    }
}

impl Display for StatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, time-anchored step of an order's life cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStage {
    pub status: StatusKey,
    pub title: String,
    pub subtitle: String,
    /// Instant the stage is scheduled to start.
    pub time: DateTime<Utc>,
}
