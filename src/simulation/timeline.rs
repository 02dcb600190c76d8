//! # Timeline Generator
//!
//! Turns an order's creation instant into its fixed stage sequence. Pure and
//! deterministic: the same `created_at` always yields the same stages.

use crate::model::{StatusKey, TimelineStage};
use chrono::{DateTime, Duration, Utc};

struct StagePlan {
    status: StatusKey,
    offset_secs: i64,
    title: &'static str,
    subtitle: &'static str,
}

const STAGE_PLAN: [StagePlan; 8] = [
    StagePlan {
        status: StatusKey::Confirmed,
        offset_secs: 0,
        title: "Order confirmed",
        subtitle: "Your chef has received the order",
    },
    StagePlan {
        status: StatusKey::Preparing,
        offset_secs: 2 * 60,
        title: "Preparing ingredients",
        subtitle: "Fresh ingredients are being prepped",
    },
    StagePlan {
        status: StatusKey::Cooking,
        offset_secs: 5 * 60,
        title: "Cooking",
        subtitle: "Your meal is on the stove",
    },
    StagePlan {
        status: StatusKey::Ready,
        offset_secs: 15 * 60,
        title: "Ready for pickup",
        subtitle: "Packed and waiting for the driver",
    },
    StagePlan {
        status: StatusKey::PickedUp,
        offset_secs: 18 * 60,
        title: "Picked up",
        subtitle: "The driver has collected your order",
    },
    StagePlan {
        status: StatusKey::OutForDelivery,
        offset_secs: 20 * 60,
        title: "On the way",
        subtitle: "The driver is heading to you",
    },
    StagePlan {
        status: StatusKey::Nearby,
        offset_secs: 27 * 60,
        title: "Almost there",
        subtitle: "The driver is a few minutes away",
    },
    StagePlan {
        status: StatusKey::Delivered,
        offset_secs: 30 * 60,
        title: "Delivered",
        subtitle: "Enjoy your meal!",
    },
];

/// Time from confirmation to delivery for every generated timeline.
pub fn total_duration() -> Duration {
    Duration::seconds(STAGE_PLAN[STAGE_PLAN.len() - 1].offset_secs)
}

/// Produces the stage sequence for an order created at `created_at`.
pub fn generate_timeline(created_at: DateTime<Utc>) -> Vec<TimelineStage> {
    STAGE_PLAN
        .iter()
        .map(|plan| TimelineStage {
            status: plan.status,
            title: plan.title.to_string(),
            subtitle: plan.subtitle.to_string(),
            time: created_at + Duration::seconds(plan.offset_secs),
        })
        .collect()
}
