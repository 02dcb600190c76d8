use crate::cart::{CartStore, FileStore, KeyValueStore, MemoryStore, StorageError};
use crate::config::AppConfig;
use crate::framework::{Clock, ScaledClock, SystemClock};
use crate::model::{Order, UserRef};
use crate::simulation::{RouteParams, SimulationActor, SimulationClient, SimulationError};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Checkout failed: {0}")]
    Simulation(#[from] SimulationError),
}

/// The runtime orchestrator: owns the cart and the simulation actor.
///
/// `MarketplaceSystem` is responsible for:
/// - **Lifecycle Management**: spawning the simulation actor and stopping it
/// - **Wiring**: picking the cart's storage backend and the clock from config
/// - **Checkout**: turning the cart into a simulated order
///
/// # Example
///
/// ```ignore
/// let system = MarketplaceSystem::new(&AppConfig::default())?;
///
/// system.cart.add_item(item, 2, ItemType::Dish);
/// let order = system.checkout(user).await?;
///
/// system.shutdown().await?;
/// ```
pub struct MarketplaceSystem {
    pub cart: CartStore,

    pub simulation: SimulationClient,

    clock: Arc<dyn Clock>,
    route: RouteParams,

    /// Task handles for running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketplaceSystem {
    /// Starts the system on the wall clock, accelerated by
    /// `simulation.clock_speed` when it is not 1.
    pub fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let speed = config.simulation.clock_speed;
        let clock: Arc<dyn Clock> = if (speed - 1.0).abs() > f64::EPSILON {
            Arc::new(ScaledClock::new(Utc::now(), speed))
        } else {
            Arc::new(SystemClock)
        };
        Self::start(config, clock)
    }

    /// Starts the system with an explicit clock. Must be called inside a
    /// tokio runtime.
    pub fn start(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let storage: Arc<dyn KeyValueStore> = match &config.cart.storage_dir {
            Some(dir) => {
                let store = FileStore::open(dir)?;
                info!(dir = %store.dir().display(), "Cart persisted to disk");
                Arc::new(store)
            }
            None => Arc::new(MemoryStore::new()),
        };
        let cart = CartStore::open(storage, config.cart.storage_key.clone());

        let (actor, simulation) = SimulationActor::new(&config.simulation, Arc::clone(&clock));
        let handle = tokio::spawn(actor.run());

        Ok(Self {
            cart,
            simulation,
            clock,
            route: config.simulation.route(),
            handles: vec![handle],
        })
    }

    /// Assembles a system from existing parts without spawning anything.
    ///
    /// Used with [`crate::simulation::mock::create_mock_client`] to script
    /// the simulation's replies.
    pub fn from_parts(
        cart: CartStore,
        simulation: SimulationClient,
        clock: Arc<dyn Clock>,
        route: RouteParams,
    ) -> Self {
        Self {
            cart,
            simulation,
            clock,
            route,
            handles: Vec::new(),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn route(&self) -> &RouteParams {
        &self.route
    }

    /// Places an order with the current cart contents.
    ///
    /// The cart is cleared only once the order exists; on failure it is left
    /// untouched so the user can retry.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn checkout(&self, user: UserRef) -> Result<Order, CheckoutError> {
        let lines = self.cart.lines();
        match self.simulation.create_fake_order(lines, user).await {
            Ok(order) => {
                self.cart.clear();
                info!(order_id = %order.id, total = order.total, "Checkout complete");
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "Checkout failed, cart kept");
                Err(e.into())
            }
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// This method:
    /// 1. Drops the simulation client, which closes the actor's request channel
    /// 2. Waits for the actor task to finish its loop
    /// 3. Returns the join error if the task panicked
    ///
    /// # Shutdown Process
    ///
    /// When the last `SimulationClient` is dropped the actor's receiver yields
    /// `None`, it logs the number of orders still active and exits. Clones of
    /// the client held elsewhere (a view, a test) keep the actor alive until
    /// they are dropped too. The cart needs no shutdown: every committed
    /// mutation has already been persisted.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor shut down cleanly
    /// - `Err(JoinError)` if the actor task failed or panicked
    ///
    /// # Example
    ///
    /// ```ignore
    /// let system = MarketplaceSystem::new(&config)?;
    /// // ... use the system ...
    /// system.shutdown().await?;
    /// ```
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Shutting down system...");

        // =====================================================================
        // Step 1: Close the request channel by dropping the client
        // =====================================================================

        // Observers registered through the client live in the actor's list and
        // are dropped with it.
        drop(self.simulation);

        // =====================================================================
        // Step 2: Wait for the actor task to complete
        // =====================================================================

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
