//! Orchestration: wiring the cart and the simulation together, checkout,
//! shutdown, and the tracing subscriber used by the binary.

pub mod marketplace;
pub mod tracing;

pub use marketplace::{CheckoutError, MarketplaceSystem};
pub use self::tracing::setup_tracing;
