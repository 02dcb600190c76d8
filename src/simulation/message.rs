//! # Simulation Messages
//!
//! Requests sent from [`SimulationClient`](super::SimulationClient) to the
//! [`SimulationActor`](super::SimulationActor). Each carries a one-shot
//! channel for the reply.

use crate::model::{CartLine, Order, OrderId, UserRef};
use crate::simulation::SimulationError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, SimulationError>>;

#[derive(Debug)]
pub enum SimulationRequest {
    Create {
        cart: Vec<CartLine>,
        user: UserRef,
        respond_to: Response<Order>,
    },
    Get {
        id: OrderId,
        respond_to: Response<Order>,
    },
    List {
        respond_to: Response<Vec<Order>>,
    },
    /// Run one scheduler pass right away. Replies with the number of events.
    Tick { respond_to: Response<usize> },
}
