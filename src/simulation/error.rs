//! Error types for the order simulation.

use crate::model::OrderId;
use thiserror::Error;

/// Errors that can occur during simulation operations.
///
/// `EmptyOrder` and `NotFound` are the two user-visible outcomes; callers are
/// expected to match on them to show "could not place order" and "order not
/// found" respectively.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// The cart snapshot had no lines.
    #[error("Cannot place an order from an empty cart")]
    EmptyOrder,

    /// The order is unknown or has already been evicted.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The simulation actor is no longer running.
    #[error("Simulation actor closed")]
    ActorClosed,

    /// The simulation actor dropped the response channel.
    #[error("Simulation actor dropped response channel")]
    ActorDropped,
}
