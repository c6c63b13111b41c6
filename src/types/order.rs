//! Order types for the lobcore book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs for deterministic encoding.
//! Enum-valued fields (side, order type) are stored as raw `u8` so the struct
//! remains a fixed-size SSZ container.
//!
//! ## Iceberg Accounting
//!
//! The remaining quantity of an order is partitioned into a `visible` part
//! (displayed to market data) and a `hidden` reserve. The invariant
//! `hidden + visible == quantity` holds for every order the book touches.
//!
//! ## Ownership
//!
//! Orders are owned by the caller (typically an [`OrderArena`]) and handed to
//! the book by key. The book never mutates order quantities; the caller applies
//! decrements via [`Order::reduce`] before invoking the book's reduce/delete
//! operations, passing the same deltas.
//!
//! [`OrderArena`]: crate::book::OrderArena

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid)
    #[default]
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// Order type enumeration
///
/// The book keeps limit orders in the resting bid/ask ladders and stop
/// orders in the pending stop ladders. Stop triggering itself is driven by
/// an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderType {
    /// Limit order - rests on the book at its limit price
    #[default]
    Limit,
    /// Stop order - pending until the market crosses its stop price
    Stop,
}

impl OrderType {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::Limit => 0,
            OrderType::Stop => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderType::Limit),
            1 => Some(OrderType::Stop),
            _ => None,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order handle consumed by the book.
///
/// All price/quantity fields use fixed-point representation (scaled by 10^8,
/// see [`crate::types::price::SCALE`]). `quantity` is the REMAINING quantity;
/// for a stop order, `price` carries the stop price.
///
/// ## SSZ Layout
///
/// Fixed-size container: 8+1+8+8+8+8+8+1 = 50 bytes.
///
/// ## Example
///
/// ```
/// use lobcore::types::{Order, Side};
///
/// // Fully visible buy for 1.0 at 50000.0
/// let order = Order::limit(1, Side::Buy, 5_000_000_000_000, 100_000_000, 0);
/// assert_eq!(order.visible, order.quantity);
/// assert_eq!(order.hidden, 0);
///
/// // Iceberg: 10.0 total, 3.0 displayed
/// let berg = Order::iceberg(2, Side::Buy, 5_000_000_000_000, 1_000_000_000, 300_000_000, 0);
/// assert_eq!(berg.hidden + berg.visible, berg.quantity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier (assigned by the caller)
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price, or stop price for a stop order (fixed-point, 10^8)
    pub price: u64,

    /// Remaining quantity (fixed-point, 10^8)
    pub quantity: u64,

    /// Hidden part of the remaining quantity (iceberg reserve)
    pub hidden: u64,

    /// Visible part of the remaining quantity
    pub visible: u64,

    /// Unix timestamp in milliseconds when the order was created
    pub timestamp: u64,

    /// Order type as u8 (0=Limit, 1=Stop)
    pub order_type_raw: u8,
}

impl Order {
    /// Create a fully visible limit order
    pub fn limit(id: u64, side: Side, price: u64, quantity: u64, timestamp: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
            hidden: 0,
            visible: quantity,
            timestamp,
            order_type_raw: OrderType::Limit.to_u8(),
        }
    }

    /// Create an iceberg limit order displaying `visible` out of `quantity`
    ///
    /// The hidden reserve is `quantity - visible`.
    pub fn iceberg(
        id: u64,
        side: Side,
        price: u64,
        quantity: u64,
        visible: u64,
        timestamp: u64,
    ) -> Self {
        debug_assert!(visible <= quantity, "visible part exceeds quantity");
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
            hidden: quantity - visible,
            visible,
            timestamp,
            order_type_raw: OrderType::Limit.to_u8(),
        }
    }

    /// Create a fully visible stop order pending at `stop_price`
    pub fn stop(id: u64, side: Side, stop_price: u64, quantity: u64, timestamp: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price: stop_price,
            quantity,
            hidden: 0,
            visible: quantity,
            timestamp,
            order_type_raw: OrderType::Stop.to_u8(),
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Get the order type
    pub fn order_type(&self) -> OrderType {
        OrderType::from_u8(self.order_type_raw).unwrap_or(OrderType::Limit)
    }

    /// Check if the order has no remaining quantity
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Apply the caller-side decrement for a reduce/delete operation.
    ///
    /// The book expects quantities to reflect the post-operation state BEFORE
    /// the corresponding book call; pass the same deltas to the book.
    ///
    /// # Example
    ///
    /// ```
    /// use lobcore::types::{Order, Side};
    ///
    /// let mut order = Order::iceberg(1, Side::Buy, 100, 10, 3, 0);
    /// order.reduce(3, 2, 1);
    /// assert_eq!(order.quantity, 7);
    /// assert_eq!(order.hidden, 5);
    /// assert_eq!(order.visible, 2);
    /// ```
    pub fn reduce(&mut self, quantity: u64, hidden: u64, visible: u64) {
        debug_assert!(quantity <= self.quantity, "reduce exceeds remaining quantity");
        debug_assert!(hidden <= self.hidden, "reduce exceeds hidden quantity");
        debug_assert!(visible <= self.visible, "reduce exceeds visible quantity");
        debug_assert_eq!(hidden + visible, quantity, "iceberg deltas must sum to quantity delta");
        self.quantity -= quantity;
        self.hidden -= hidden;
        self.visible -= visible;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Buy.to_u8(), 0);
        assert_eq!(Side::Sell.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Buy));
        assert_eq!(Side::from_u8(1), Some(Side::Sell));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_type_conversion() {
        assert_eq!(OrderType::Limit.to_u8(), 0);
        assert_eq!(OrderType::Stop.to_u8(), 1);
        assert_eq!(OrderType::from_u8(0), Some(OrderType::Limit));
        assert_eq!(OrderType::from_u8(1), Some(OrderType::Stop));
        assert_eq!(OrderType::from_u8(2), None);
    }

    #[test]
    fn test_limit_order() {
        let order = Order::limit(1, Side::Buy, 5_000_000_000_000, 100_000_000, 1703577600000);

        assert_eq!(order.id, 1);
        assert_eq!(order.side(), Side::Buy);
        assert_eq!(order.order_type(), OrderType::Limit);
        assert_eq!(order.price, 5_000_000_000_000);
        assert_eq!(order.quantity, 100_000_000);
        assert_eq!(order.hidden, 0);
        assert_eq!(order.visible, 100_000_000);
        assert!(!order.is_filled());
    }

    #[test]
    fn test_iceberg_order() {
        let order = Order::iceberg(2, Side::Sell, 5_000_000_000_000, 1_000_000_000, 300_000_000, 0);

        assert_eq!(order.visible, 300_000_000);
        assert_eq!(order.hidden, 700_000_000);
        assert_eq!(order.hidden + order.visible, order.quantity);
    }

    #[test]
    fn test_stop_order() {
        let order = Order::stop(3, Side::Buy, 5_100_000_000_000, 50_000_000, 0);

        assert_eq!(order.order_type(), OrderType::Stop);
        assert_eq!(order.price, 5_100_000_000_000);
        assert_eq!(order.visible, order.quantity);
    }

    #[test]
    fn test_order_reduce() {
        let mut order = Order::iceberg(1, Side::Buy, 100, 1_000_000_000, 300_000_000, 0);

        order.reduce(300_000_000, 200_000_000, 100_000_000);
        assert_eq!(order.quantity, 700_000_000);
        assert_eq!(order.hidden, 500_000_000);
        assert_eq!(order.visible, 200_000_000);
        assert!(!order.is_filled());

        order.reduce(700_000_000, 500_000_000, 200_000_000);
        assert!(order.is_filled());
        assert_eq!(order.hidden, 0);
        assert_eq!(order.visible, 0);
    }

    #[test]
    fn test_order_ssz_roundtrip() {
        let order = Order::iceberg(
            7,
            Side::Sell,
            5_000_012_345_678,
            200_000_000,
            50_000_000,
            1703577600000,
        );

        let serialized = ssz_rs::serialize(&order).expect("Failed to serialize");
        let deserialized: Order = ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(order, deserialized);
    }

    #[test]
    fn test_order_deterministic_serialization() {
        let order = Order::limit(1, Side::Buy, 5_000_000_000_000, 100_000_000, 1703577600000);

        let bytes1 = ssz_rs::serialize(&order).expect("Failed to serialize");
        let bytes2 = ssz_rs::serialize(&order).expect("Failed to serialize");

        assert_eq!(bytes1, bytes2, "SSZ serialization must be deterministic");
    }

    #[test]
    fn test_order_ssz_size() {
        let order = Order::limit(1, Side::Buy, 5_000_000_000_000, 100_000_000, 0);
        let bytes = ssz_rs::serialize(&order).expect("Failed to serialize");

        // id + side_raw + price + quantity + hidden + visible + timestamp + order_type_raw
        assert_eq!(bytes.len(), 50, "Order should serialize to 50 bytes");
    }
}
