//! # Order Simulation
//!
//! > **A client-side food-marketplace cart and a simulated order life cycle.**
//!
//! There is no backend. Orders are fabricated locally from the cart and
//! driven through a fixed timeline (confirmed, preparing, cooking, ready,
//! picked up, out for delivery, nearby, delivered) by a single scheduler,
//! while views observe the cart and the orders and derive the driver's
//! position and ETA on demand.
//!
//! ## 🏗️ Design
//!
//! ### Single Writer
//! The [`SimulationActor`](simulation::SimulationActor) owns every order and
//! runs on its own Tokio task. Requests and scheduler ticks are handled in the
//! same loop, so transitions never interleave and no lock guards order state.
//!
//! ### Derived, Not Stored
//! An order stores only its timeline and the index of its current stage.
//! Status, driver position and ETA are computed from those plus the clock, so
//! they can never disagree with each other.
//!
//! ### Observers
//! Both the cart and the simulation notify subscribers synchronously after
//! each committed change. `subscribe` returns a
//! [`Subscription`](framework::Subscription) whose `unsubscribe` is idempotent.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Plumbing ([`framework`])
//! - **Key items**: [`ObserverList`](framework::ObserverList),
//!   [`Clock`](framework::Clock), [`ManualClock`](framework::ManualClock).
//!
//! ### 2. Data ([`model`])
//! - **Key items**: [`CartLine`](model::CartLine), [`Order`](model::Order),
//!   [`StatusKey`](model::StatusKey), [`OrderEvent`](model::OrderEvent).
//!
//! ### 3. The Cart ([`cart`])
//! - **Role**: Persisted, observable cart with one line per `(id, type)`.
//! - **Key items**: [`CartStore`](cart::CartStore),
//!   [`KeyValueStore`](cart::KeyValueStore).
//!
//! ### 4. The Simulation ([`simulation`])
//! - **Role**: Timeline generation, geo interpolation and the order scheduler.
//! - **Key items**: [`SimulationClient`](simulation::SimulationClient),
//!   [`generate_timeline`](simulation::generate_timeline),
//!   [`driver_position`](simulation::driver_position),
//!   [`eta_minutes`](simulation::eta_minutes).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`MarketplaceSystem`](lifecycle::MarketplaceSystem),
//!   [`checkout`](lifecycle::MarketplaceSystem::checkout),
//!   [`shutdown`](lifecycle::MarketplaceSystem::shutdown).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run an accelerated order end to end
//! RUST_LOG=info cargo run
//!
//! # With a config file
//! ORDER_SIM_CONFIG=sim.json RUST_LOG=debug cargo run
//! ```

pub mod cart;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod simulation;
