//! # Order Lifecycle Simulation
//!
//! Manufactures and drives a realistic order life cycle on the client:
//! confirmation, preparation, pickup, delivery, arrival.
//!
//! ## Layers
//!
//! 1. **Pure helpers** - [`timeline::generate_timeline`] and the [`geo`]
//!    interpolators. No state, safe to call from any renderer.
//! 2. **State machine** - [`OrderRegistry`], the synchronous registry and tick.
//! 3. **Runtime** - [`SimulationActor`] owns the registry on one task and
//!    drives it from a single interval; [`SimulationClient`] is the handle
//!    views hold.
//!
//! ```rust,ignore
//! let (actor, client) = SimulationActor::new(&config, Arc::new(SystemClock));
//! tokio::spawn(actor.run());
//!
//! let order = client.create_fake_order(cart.lines(), user).await?;
//! let sub = client.subscribe(order.id, |event| println!("{event:?}"));
//! // ...
//! sub.unsubscribe();
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod geo;
pub mod message;
pub mod mock;
pub mod registry;
pub mod roster;
pub mod timeline;

pub use actor::SimulationActor;
pub use client::SimulationClient;
pub use error::*;
pub use geo::{driver_position, eta_minutes, RouteParams};
pub use registry::OrderRegistry;
pub use timeline::generate_timeline;
