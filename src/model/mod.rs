//! Pure data structures shared by the cart store and the order simulation.

pub mod cart;
pub mod order;
pub mod timeline;

pub use cart::*;
pub use order::*;
pub use timeline::*;
