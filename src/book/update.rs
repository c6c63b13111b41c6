//! Level updates: the value returned from resting-book mutations.
//!
//! Every add/reduce/delete on the resting book answers three questions for
//! the layer above (market data, matching): did the level get created,
//! modified, or destroyed; what did it look like at the semantically
//! relevant moment; and was the side's top of book touched.
//!
//! `LevelSnapshot` is SSZ-serializable so the book can fold snapshots into
//! its deterministic state root.

use ssz_rs::prelude::*;

use crate::book::level::LevelKind;

// ============================================================================
// UpdateKind
// ============================================================================

/// How a mutation changed the affected price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// The level was created by this operation
    Add,
    /// The level was modified by this operation
    Update,
    /// The level was removed by this operation
    Delete,
}

// ============================================================================
// LevelSnapshot
// ============================================================================

/// By-value view of a level at a point in time.
///
/// On a Delete update the snapshot is taken after the volume decrement and
/// list unlink but before the level is released, so callers receive the
/// final zeroed view of the level.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct LevelSnapshot {
    /// Level kind as u8 (0=Bid, 1=Ask)
    pub kind_raw: u8,

    /// Level price (fixed-point, 10^8)
    pub price: u64,

    /// Sum of remaining quantity on the level
    pub total_volume: u64,

    /// Sum of hidden quantity on the level
    pub hidden_volume: u64,

    /// Sum of visible quantity on the level
    pub visible_volume: u64,

    /// Number of orders on the level
    pub order_count: u64,
}

impl LevelSnapshot {
    /// Get the level kind
    pub fn kind(&self) -> LevelKind {
        LevelKind::from_u8(self.kind_raw).unwrap_or(LevelKind::Bid)
    }
}

// ============================================================================
// LevelUpdate
// ============================================================================

/// Result of a resting-book mutation.
///
/// `top` reports whether the operation touched the side's best level. It is
/// computed as `order.level == side_best` AFTER any level deletion has
/// cleared the order's back-pointer, so on a Delete it is true only when
/// the side became empty. Callers wanting "did the top change" compare
/// best-before against best-after themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpdate {
    /// Whether the level was created, modified, or removed
    pub kind: UpdateKind,

    /// Snapshot of the level at the semantically correct moment
    pub level: LevelSnapshot,

    /// Whether the side's best level was touched
    pub top: bool,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_kind() {
        let snap = LevelSnapshot {
            kind_raw: 1,
            price: 100,
            ..Default::default()
        };
        assert_eq!(snap.kind(), LevelKind::Ask);

        let snap = LevelSnapshot::default();
        assert_eq!(snap.kind(), LevelKind::Bid);
    }

    #[test]
    fn test_snapshot_ssz_roundtrip() {
        let snap = LevelSnapshot {
            kind_raw: 0,
            price: 5_000_000_000_000,
            total_volume: 1_500_000_000,
            hidden_volume: 500_000_000,
            visible_volume: 1_000_000_000,
            order_count: 3,
        };

        let bytes = ssz_rs::serialize(&snap).expect("Failed to serialize");
        let back: LevelSnapshot = ssz_rs::deserialize(&bytes).expect("Failed to deserialize");

        assert_eq!(snap, back);
    }

    #[test]
    fn test_snapshot_ssz_size() {
        let snap = LevelSnapshot::default();
        let bytes = ssz_rs::serialize(&snap).expect("Failed to serialize");

        // kind_raw + price + total + hidden + visible + order_count
        assert_eq!(bytes.len(), 41, "LevelSnapshot should serialize to 41 bytes");
    }
}
