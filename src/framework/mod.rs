//! Shared plumbing used by both the cart store and the order simulation.
//!
//! # Main Components
//!
//! - [`ObserverList`] / [`Subscription`] - synchronous observer lists with idempotent unsubscribe
//! - [`Clock`] - injectable wall clock ([`SystemClock`], [`ManualClock`], [`ScaledClock`])

pub mod clock;
pub mod observer;

pub use clock::*;
pub use observer::*;
