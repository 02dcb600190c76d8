//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate. The format is compact and hides the module prefix
//! (`with_target(false)`); levels come from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup, shutdown, scheduler started / idle
//! - **Orders**: created (id, items, total), each stage advance, delivery, eviction
//! - **Cart**: every mutation at `debug`, persistence failures at `warn`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and stage transitions
//! RUST_LOG=info cargo run
//!
//! # Cart mutations and request payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the simulation
//! RUST_LOG=order_sim::simulation=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Simulation actor started tick_ms=1000
//! INFO Order created order_id=order_1 items=2 total=38.5 chef=Maria Rossi driver=Sam Carter active=1
//! INFO Scheduler started
//! INFO Stage advanced order_id=order_1 from=0 to=1 status=preparing
//! ...
//! INFO Delivered order_id=order_1
//! INFO Evicted order_id=order_1 active=0
//! INFO Scheduler idle
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
