//! The order book: four price ladders, best-of-book caches, level pool.
//!
//! ## Architecture
//!
//! One `OrderBook` per symbol, single-threaded, no internal locking. The
//! caller serializes operations (single-writer discipline). Four ladders
//! share one level pool:
//!
//! | Ladder    | Ordering                 | Role                |
//! |-----------|--------------------------|---------------------|
//! | bids      | descending by price      | resting buy limits  |
//! | asks      | ascending by price       | resting sell limits |
//! | buy_stop  | ascending by stop price  | pending buy stops   |
//! | sell_stop | descending by stop price | pending sell stops  |
//!
//! `best_bid` / `best_ask` cache the front of the resting ladders so top
//! queries stay O(1). The stop ladders carry no best cache; stop triggering
//! is driven by last-trade price in the layer above.
//!
//! ## Contract
//!
//! Orders live in a caller-owned [`OrderArena`] and are passed in by key.
//! For reduce/delete, the caller has ALREADY applied the quantity decrement
//! to the order ([`Order::reduce`]) and passes the same deltas here.
//! Precondition violations are programming errors, asserted in debug
//! builds, undefined in release.
//!
//! ## Example
//!
//! ```
//! use lobcore::book::{OrderArena, OrderBook, UpdateKind};
//! use lobcore::types::{Order, Side};
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
//!
//! [`Order::reduce`]: crate::types::Order::reduce

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::book::ladder::{AscendingPrice, DescendingPrice, Ladder};
use crate::book::level::{Level, LevelKind};
use crate::book::node::{OrderArena, OrderKey};
use crate::book::pool::{LevelKey, LevelPool};
use crate::book::update::{LevelUpdate, UpdateKind};
use crate::types::Side;

/// Single-symbol limit order book.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Resting buy levels, best = highest price
    bids: Ladder<DescendingPrice>,

    /// Resting sell levels, best = lowest price
    asks: Ladder<AscendingPrice>,

    /// Pending buy stops, ordered by ascending stop price
    buy_stop: Ladder<AscendingPrice>,

    /// Pending sell stops, ordered by descending stop price
    sell_stop: Ladder<DescendingPrice>,

    /// Cached front of the bid ladder
    best_bid: Option<LevelKey>,

    /// Cached front of the ask ladder
    best_ask: Option<LevelKey>,

    /// Freelist of level records, owned by the book
    pool: LevelPool,
}

impl OrderBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self {
            bids: Ladder::new(),
            asks: Ladder::new(),
            buy_stop: Ladder::new(),
            sell_stop: Ladder::new(),
            best_bid: None,
            best_ask: None,
            pool: LevelPool::new(),
        }
    }

    /// Create a book with pre-allocated level capacity
    pub fn with_capacity(levels: usize) -> Self {
        Self {
            bids: Ladder::new(),
            asks: Ladder::new(),
            buy_stop: Ladder::new(),
            sell_stop: Ladder::new(),
            best_bid: None,
            best_ask: None,
            pool: LevelPool::with_capacity(levels),
        }
    }

    // ========================================================================
    // Resting book operations
    // ========================================================================

    /// Add a resting order to its side's ladder.
    ///
    /// Joins the existing level at the order's price or creates a fresh one.
    /// The order must not currently be a member (`node.level == None`), its
    /// quantity must be positive, and `hidden + visible == quantity`.
    pub fn add_order(&mut self, orders: &mut OrderArena, key: OrderKey) -> LevelUpdate {
        let (side, price, quantity, hidden, visible) = {
            let node = orders.get(key).expect("invalid order key");
            debug_assert!(node.level.is_none(), "order is already resting");
            debug_assert!(node.order.quantity > 0, "adding an empty order");
            debug_assert_eq!(
                node.order.hidden + node.order.visible,
                node.order.quantity,
                "iceberg partition must sum to quantity"
            );
            let o = &node.order;
            (o.side(), o.price, o.quantity, o.hidden, o.visible)
        };

        // Join the existing level or open the price
        let found = match side {
            Side::Buy => self.bids.get(price),
            Side::Sell => self.asks.get(price),
        };
        let (level_key, kind) = match found {
            Some(level_key) => (level_key, UpdateKind::Update),
            None => (self.add_level(side, price), UpdateKind::Add),
        };

        let snapshot = {
            let level = self.pool.get_mut(level_key).expect("invalid level key");
            level.total_volume += quantity;
            level.hidden_volume += hidden;
            level.visible_volume += visible;
            level.push_back(key, orders);
            level.snapshot()
        };
        orders.get_mut(key).expect("invalid order key").level = Some(level_key);

        let best = self.side_best(side);
        trace!(price, quantity, ?side, ?kind, "order added");
        LevelUpdate {
            kind,
            level: snapshot,
            top: Some(level_key) == best,
        }
    }

    /// Reduce a resting order's level by the given deltas.
    ///
    /// The caller has already decremented the order's quantities; when the
    /// order reached zero it is unlinked, and when the level reaches zero
    /// volume the level is deleted. The returned snapshot is taken after
    /// the decrement and unlink, before any level destruction.
    pub fn reduce_order(
        &mut self,
        orders: &mut OrderArena,
        key: OrderKey,
        quantity: u64,
        hidden: u64,
        visible: u64,
    ) -> LevelUpdate {
        let (side, level_key, remaining) = {
            let node = orders.get(key).expect("invalid order key");
            (
                node.order.side(),
                node.level.expect("order is not resting"),
                node.order.quantity,
            )
        };

        {
            let level = self.pool.get_mut(level_key).expect("invalid level key");
            debug_assert!(quantity <= level.total_volume, "reduce exceeds level volume");
            debug_assert!(hidden <= level.hidden_volume, "reduce exceeds hidden volume");
            debug_assert!(visible <= level.visible_volume, "reduce exceeds visible volume");
            level.total_volume -= quantity;
            level.hidden_volume -= hidden;
            level.visible_volume -= visible;

            if remaining == 0 {
                level.unlink(key, orders);
            }
        }

        let snapshot = self.pool.get(level_key).expect("invalid level key").snapshot();

        let mut kind = UpdateKind::Update;
        if snapshot.total_volume == 0 {
            self.delete_level(orders, key, level_key, side);
            kind = UpdateKind::Delete;
        }

        // Evaluated after a delete has cleared the back-pointer: on Delete,
        // top is true only when the side became empty.
        let top = orders.get(key).expect("invalid order key").level == self.side_best(side);
        trace!(price = snapshot.price, quantity, ?side, ?kind, "order reduced");
        LevelUpdate {
            kind,
            level: snapshot,
            top,
        }
    }

    /// Delete a resting order outright.
    ///
    /// Equivalent to a reduce by the order's full remaining components;
    /// always unlinks the order from its level queue.
    pub fn delete_order(&mut self, orders: &mut OrderArena, key: OrderKey) -> LevelUpdate {
        let (side, level_key, quantity, hidden, visible) = {
            let node = orders.get(key).expect("invalid order key");
            let o = &node.order;
            (
                o.side(),
                node.level.expect("order is not resting"),
                o.quantity,
                o.hidden,
                o.visible,
            )
        };

        {
            let level = self.pool.get_mut(level_key).expect("invalid level key");
            debug_assert!(quantity <= level.total_volume, "delete exceeds level volume");
            level.total_volume -= quantity;
            level.hidden_volume -= hidden;
            level.visible_volume -= visible;
            level.unlink(key, orders);
        }

        let snapshot = self.pool.get(level_key).expect("invalid level key").snapshot();

        let mut kind = UpdateKind::Update;
        if snapshot.total_volume == 0 {
            self.delete_level(orders, key, level_key, side);
            kind = UpdateKind::Delete;
        }

        let top = orders.get(key).expect("invalid order key").level == self.side_best(side);
        trace!(price = snapshot.price, quantity, ?side, ?kind, "order deleted");
        LevelUpdate {
            kind,
            level: snapshot,
            top,
        }
    }

    /// Open a fresh level for `price` and advance the best cache if the new
    /// price improves it.
    fn add_level(&mut self, side: Side, price: u64) -> LevelKey {
        match side {
            Side::Buy => {
                let key = self.pool.create(LevelKind::Bid, price);
                self.bids.insert(price, key);
                let improves = match self.best_bid {
                    None => true,
                    Some(best) => price > self.pool.get(best).expect("stale best bid").price,
                };
                if improves {
                    self.best_bid = Some(key);
                }
                key
            }
            Side::Sell => {
                let key = self.pool.create(LevelKind::Ask, price);
                self.asks.insert(price, key);
                let improves = match self.best_ask {
                    None => true,
                    Some(best) => price < self.pool.get(best).expect("stale best ask").price,
                };
                if improves {
                    self.best_ask = Some(key);
                }
                key
            }
        }
    }

    /// Erase an empty level, re-derive the best cache when it was the best,
    /// release the record and clear the order's back-pointer.
    fn delete_level(
        &mut self,
        orders: &mut OrderArena,
        order_key: OrderKey,
        level_key: LevelKey,
        side: Side,
    ) {
        let price = self.pool.get(level_key).expect("invalid level key").price;
        match side {
            Side::Buy => {
                self.bids.remove(price);
                if self.best_bid == Some(level_key) {
                    self.best_bid = self.bids.best();
                }
            }
            Side::Sell => {
                self.asks.remove(price);
                if self.best_ask == Some(level_key) {
                    self.best_ask = self.asks.best();
                }
            }
        }
        self.pool.release(level_key);
        orders.get_mut(order_key).expect("invalid order key").level = None;
    }

    #[inline]
    fn side_best(&self, side: Side) -> Option<LevelKey> {
        match side {
            Side::Buy => self.best_bid,
            Side::Sell => self.best_ask,
        }
    }

    // ========================================================================
    // Stop book operations
    // ========================================================================

    /// Park a stop order on its side's stop ladder.
    ///
    /// Same volume and queue discipline as [`add_order`](Self::add_order)
    /// but no level update is produced and no best cache is maintained.
    pub fn add_stop_order(&mut self, orders: &mut OrderArena, key: OrderKey) {
        let (side, price, quantity, hidden, visible) = {
            let node = orders.get(key).expect("invalid order key");
            debug_assert!(node.level.is_none(), "order is already resting");
            debug_assert!(node.order.quantity > 0, "adding an empty order");
            let o = &node.order;
            (o.side(), o.price, o.quantity, o.hidden, o.visible)
        };

        let found = match side {
            Side::Buy => self.buy_stop.get(price),
            Side::Sell => self.sell_stop.get(price),
        };
        let level_key = match found {
            Some(level_key) => level_key,
            None => self.add_stop_level(side, price),
        };

        {
            let level = self.pool.get_mut(level_key).expect("invalid level key");
            level.total_volume += quantity;
            level.hidden_volume += hidden;
            level.visible_volume += visible;
            level.push_back(key, orders);
        }
        orders.get_mut(key).expect("invalid order key").level = Some(level_key);
        trace!(stop_price = price, quantity, ?side, "stop order added");
    }

    /// Reduce a pending stop order's level by the given deltas.
    pub fn reduce_stop_order(
        &mut self,
        orders: &mut OrderArena,
        key: OrderKey,
        quantity: u64,
        hidden: u64,
        visible: u64,
    ) {
        let (side, level_key, remaining) = {
            let node = orders.get(key).expect("invalid order key");
            (
                node.order.side(),
                node.level.expect("order is not pending"),
                node.order.quantity,
            )
        };

        let empty = {
            let level = self.pool.get_mut(level_key).expect("invalid level key");
            debug_assert!(quantity <= level.total_volume, "reduce exceeds level volume");
            level.total_volume -= quantity;
            level.hidden_volume -= hidden;
            level.visible_volume -= visible;
            if remaining == 0 {
                level.unlink(key, orders);
            }
            level.total_volume == 0
        };

        if empty {
            self.delete_stop_level(orders, key, level_key, side);
        }
    }

    /// Remove a pending stop order outright.
    pub fn delete_stop_order(&mut self, orders: &mut OrderArena, key: OrderKey) {
        let (side, level_key, quantity, hidden, visible) = {
            let node = orders.get(key).expect("invalid order key");
            let o = &node.order;
            (
                o.side(),
                node.level.expect("order is not pending"),
                o.quantity,
                o.hidden,
                o.visible,
            )
        };

        let empty = {
            let level = self.pool.get_mut(level_key).expect("invalid level key");
            debug_assert!(quantity <= level.total_volume, "delete exceeds level volume");
            level.total_volume -= quantity;
            level.hidden_volume -= hidden;
            level.visible_volume -= visible;
            level.unlink(key, orders);
            level.total_volume == 0
        };

        if empty {
            self.delete_stop_level(orders, key, level_key, side);
        }
        trace!(quantity, ?side, "stop order deleted");
    }

    /// Open a stop level. Stop levels carry the OPPOSITE side's kind tag
    /// (buy stops tagged Ask, sell stops tagged Bid), a quirk kept from the
    /// original venue semantics.
    fn add_stop_level(&mut self, side: Side, price: u64) -> LevelKey {
        match side {
            Side::Buy => {
                let key = self.pool.create(LevelKind::Ask, price);
                self.buy_stop.insert(price, key);
                key
            }
            Side::Sell => {
                let key = self.pool.create(LevelKind::Bid, price);
                self.sell_stop.insert(price, key);
                key
            }
        }
    }

    /// Erase an empty stop level and clear the order's back-pointer.
    fn delete_stop_level(
        &mut self,
        orders: &mut OrderArena,
        order_key: OrderKey,
        level_key: LevelKey,
        side: Side,
    ) {
        let price = self.pool.get(level_key).expect("invalid level key").price;
        match side {
            Side::Buy => {
                self.buy_stop.remove(price);
            }
            Side::Sell => {
                self.sell_stop.remove(price);
            }
        }
        self.pool.release(level_key);
        orders.get_mut(order_key).expect("invalid order key").level = None;
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Best bid level (highest price), or None when no bids rest
    #[inline]
    pub fn best_bid(&self) -> Option<&Level> {
        self.best_bid.and_then(|key| self.pool.get(key))
    }

    /// Best ask level (lowest price), or None when no asks rest
    #[inline]
    pub fn best_ask(&self) -> Option<&Level> {
        self.best_ask.and_then(|key| self.pool.get(key))
    }

    /// Price of the best bid level
    #[inline]
    pub fn best_bid_price(&self) -> Option<u64> {
        self.best_bid().map(|level| level.price)
    }

    /// Price of the best ask level
    #[inline]
    pub fn best_ask_price(&self) -> Option<u64> {
        self.best_ask().map(|level| level.price)
    }

    /// Spread between best ask and best bid, when both sides rest
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    // ========================================================================
    // Lookup and navigation
    // ========================================================================

    /// Bid level at an exact price
    pub fn get_bid(&self, price: u64) -> Option<&Level> {
        self.bids.get(price).and_then(|key| self.pool.get(key))
    }

    /// Ask level at an exact price
    pub fn get_ask(&self, price: u64) -> Option<&Level> {
        self.asks.get(price).and_then(|key| self.pool.get(key))
    }

    /// Buy stop level at an exact stop price
    pub fn get_buy_stop_level(&self, price: u64) -> Option<&Level> {
        self.buy_stop.get(price).and_then(|key| self.pool.get(key))
    }

    /// Sell stop level at an exact stop price
    pub fn get_sell_stop_level(&self, price: u64) -> Option<&Level> {
        self.sell_stop.get(price).and_then(|key| self.pool.get(key))
    }

    /// Next bid level below `price`
    pub fn next_bid(&self, price: u64) -> Option<&Level> {
        self.bids.next_after(price).and_then(|key| self.pool.get(key))
    }

    /// Next ask level above `price`
    pub fn next_ask(&self, price: u64) -> Option<&Level> {
        self.asks.next_after(price).and_then(|key| self.pool.get(key))
    }

    /// Resolve a level key to its level (for layers holding keys from
    /// order back-pointers)
    #[inline]
    pub fn level(&self, key: LevelKey) -> Option<&Level> {
        self.pool.get(key)
    }

    // ========================================================================
    // Iteration (best-first)
    // ========================================================================

    /// Iterate bid levels from best (highest) to worst
    pub fn bids(&self) -> impl Iterator<Item = &Level> + '_ {
        self.bids.iter().map(move |key| self.pool.get(key).expect("stale ladder entry"))
    }

    /// Iterate ask levels from best (lowest) to worst
    pub fn asks(&self) -> impl Iterator<Item = &Level> + '_ {
        self.asks.iter().map(move |key| self.pool.get(key).expect("stale ladder entry"))
    }

    /// Iterate buy stop levels by ascending stop price
    pub fn buy_stops(&self) -> impl Iterator<Item = &Level> + '_ {
        self.buy_stop.iter().map(move |key| self.pool.get(key).expect("stale ladder entry"))
    }

    /// Iterate sell stop levels by descending stop price
    pub fn sell_stops(&self) -> impl Iterator<Item = &Level> + '_ {
        self.sell_stop.iter().map(move |key| self.pool.get(key).expect("stale ladder entry"))
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Number of buy stop price levels
    #[inline]
    pub fn buy_stop_levels(&self) -> usize {
        self.buy_stop.len()
    }

    /// Number of sell stop price levels
    #[inline]
    pub fn sell_stop_levels(&self) -> usize {
        self.sell_stop.len()
    }

    /// Check if no levels rest anywhere in the book
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
            && self.asks.is_empty()
            && self.buy_stop.is_empty()
            && self.sell_stop.is_empty()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release every remaining level in all four ladders.
    ///
    /// Orders are not owned by the book, so their linkage and back-pointers
    /// are cleared rather than the orders destroyed; the orders stay live in
    /// the arena.
    pub fn clear(&mut self, orders: &mut OrderArena) {
        let level_keys: Vec<LevelKey> = self
            .bids
            .drain()
            .into_iter()
            .chain(self.asks.drain())
            .chain(self.buy_stop.drain())
            .chain(self.sell_stop.drain())
            .collect();

        for level_key in level_keys {
            self.release_level(orders, level_key);
        }
        self.best_bid = None;
        self.best_ask = None;
    }

    /// Unlink every member of a level, zero its aggregates and return the
    /// record to the pool.
    fn release_level(&mut self, orders: &mut OrderArena, level_key: LevelKey) {
        let mut cursor = self.pool.get(level_key).expect("invalid level key").head;
        while let Some(key) = cursor {
            let node = orders.get_mut(key).expect("broken level queue");
            cursor = node.next;
            node.prev = None;
            node.next = None;
            node.level = None;
        }

        let level = self.pool.get_mut(level_key).expect("invalid level key");
        level.head = None;
        level.tail = None;
        level.order_count = 0;
        level.total_volume = 0;
        level.hidden_volume = 0;
        level.visible_volume = 0;
        self.pool.release(level_key);
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every level snapshot, in
    /// deterministic ladder order.
    ///
    /// Two books with identical per-level aggregates produce identical
    /// roots; the tests use this to compare book states structurally.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for level in self
            .bids()
            .chain(self.asks())
            .chain(self.buy_stops())
            .chain(self.sell_stops())
        {
            let bytes =
                ssz_rs::serialize(&level.snapshot()).expect("level snapshot serialization");
            hasher.update(&bytes);
        }

        let digest = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&digest);
        root
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
