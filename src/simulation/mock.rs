//! # Mock Simulation
//!
//! Utilities for testing code that depends on a [`SimulationClient`] without
//! spawning the actor.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! channel, then use [`expect_create`], [`expect_get`] or [`expect_list`] to
//! assert the request and answer it by hand.

use crate::framework::ObserverList;
use crate::model::{CartLine, Order, OrderId, UserRef};
use crate::simulation::message::{Response, SimulationRequest};
use crate::simulation::SimulationClient;
use tokio::sync::mpsc;

/// Creates a client whose requests land in the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (SimulationClient, mpsc::Receiver<SimulationRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (SimulationClient::new(sender, ObserverList::new()), receiver)
}

/// Waits for the next request and returns it if it is a `Create`.
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<SimulationRequest>,
) -> Option<(Vec<CartLine>, UserRef, Response<Order>)> {
    match receiver.recv().await {
        Some(SimulationRequest::Create {
            cart,
            user,
            respond_to,
        }) => Some((cart, user, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `Get`.
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<SimulationRequest>,
) -> Option<(OrderId, Response<Order>)> {
    match receiver.recv().await {
        Some(SimulationRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `List`.
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<SimulationRequest>,
) -> Option<Response<Vec<Order>>> {
    match receiver.recv().await {
        Some(SimulationRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}
