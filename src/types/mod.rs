//! Core data types for lobcore
//!
//! All value types implement SSZ serialization for deterministic encoding.
//! All numeric values use fixed-point representation (scaled by 10^8).
//!
//! ## Types
//!
//! - [`Order`]: an order handle consumed by the book
//! - [`Side`]: Buy or Sell
//! - [`OrderType`]: Limit or Stop

mod order;
pub mod price;

// Re-export all types at module level
pub use order::{Order, OrderType, Side};
