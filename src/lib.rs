//! # lobcore
//!
//! Single-symbol limit order book core for a matching venue.
//!
//! ## Architecture
//!
//! The crate provides the book DATA STRUCTURE, not the matching engine:
//! - **Types**: Order, Side, OrderType, fixed-point price utilities
//! - **Book**: four price ladders (bids, asks, buy stops, sell stops), a
//!   level pool, O(1) best bid/ask caches, and the add/reduce/delete
//!   operations that report how the top of book changed
//!
//! Matching, stop triggering, market data fan-out and persistence are
//! collaborators layered above; the book hands them [`LevelUpdate`]s,
//! level iteration and ladder navigation.
//!
//! ## Design Principles
//!
//! 1. **Caller-owned orders**: orders live in an [`OrderArena`] owned by
//!    the matching layer and are passed to the book by stable key
//! 2. **No floating point**: prices and quantities are u64 scaled by 10^8
//! 3. **Pre-allocated memory**: slab storage for orders and levels keeps
//!    per-order heap churn off the hot path
//! 4. **Single-threaded**: no internal locking; the caller serializes
//!
//! ## Example
//!
//! ```
//! use lobcore::{Order, OrderArena, OrderBook, Side, UpdateKind};
//!
//! let mut arena = OrderArena::with_capacity(1024);
//! let mut book = OrderBook::with_capacity(256);
//!
//! let key = arena.insert(Order::limit(1, Side::Buy, 5_000_000_000_000, 100_000_000, 0));
//! let update = book.add_order(&mut arena, key);
//!
//! assert_eq!(update.kind, UpdateKind::Add);
//! assert!(update.top);
//! assert_eq!(book.best_bid_price(), Some(5_000_000_000_000));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Side, OrderType, fixed-point utilities
pub mod types;

/// Order book: ladders, levels, pool, arena, operations
pub mod book;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use book::{
    Level, LevelKey, LevelKind, LevelPool, LevelSnapshot, LevelUpdate, OrderArena, OrderBook,
    OrderKey, OrderNode, UpdateKind,
};
pub use types::{Order, OrderType, Side};
