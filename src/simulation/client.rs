//! # Simulation Client
//!
//! The handle that views (checkout completion, order tracking, live map) use
//! to talk to the simulation. Cheap to clone: it holds a channel sender and a
//! handle to the shared observer list.

use crate::framework::{ObserverList, Subscription};
use crate::model::{CartLine, Order, OrderEvent, OrderId, UserRef};
use crate::simulation::message::SimulationRequest;
use crate::simulation::SimulationError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct SimulationClient {
    sender: mpsc::Sender<SimulationRequest>,
    observers: ObserverList<OrderEvent>,
}

impl SimulationClient {
    pub fn new(
        sender: mpsc::Sender<SimulationRequest>,
        observers: ObserverList<OrderEvent>,
    ) -> Self {
        Self { sender, observers }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, SimulationError>>) -> SimulationRequest,
    ) -> Result<T, SimulationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SimulationError::ActorClosed)?;
        response.await.map_err(|_| SimulationError::ActorDropped)?
    }

    /// Registers a new simulated order built from `cart`.
    ///
    /// Fails with [`SimulationError::EmptyOrder`] when `cart` has no lines.
    #[instrument(skip(self, cart, user), fields(user_id = %user.id))]
    pub async fn create_fake_order(
        &self,
        cart: Vec<CartLine>,
        user: UserRef,
    ) -> Result<Order, SimulationError> {
        debug!(?cart, "create_fake_order called");
        self.request(|respond_to| SimulationRequest::Create {
            cart,
            user,
            respond_to,
        })
        .await
    }

    /// Snapshot of one order, or [`SimulationError::NotFound`] once it is
    /// unknown or evicted.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, SimulationError> {
        self.request(|respond_to| SimulationRequest::Get { id, respond_to })
            .await
    }

    /// Snapshots of every order that has not been evicted yet.
    pub async fn list_active(&self) -> Result<Vec<Order>, SimulationError> {
        self.request(|respond_to| SimulationRequest::List { respond_to })
            .await
    }

    /// Runs one scheduler pass immediately, e.g. after the process resumed
    /// from a suspension. Returns the number of events it produced.
    pub async fn tick_now(&self) -> Result<usize, SimulationError> {
        self.request(|respond_to| SimulationRequest::Tick { respond_to })
            .await
    }

    /// Observes every event concerning order `id`.
    pub fn subscribe(
        &self,
        id: OrderId,
        callback: impl Fn(&OrderEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.observers.subscribe(move |event: &OrderEvent| {
            if event.order_id() == id {
                callback(event);
            }
        })
    }

    /// Observes events for all orders.
    pub fn subscribe_all(
        &self,
        callback: impl Fn(&OrderEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.observers.subscribe(callback)
    }
}
