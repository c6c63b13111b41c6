//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! Every price and quantity in lobcore is a `u64` scaled by 10^8. Integer
//! ticks keep the book deterministic across platforms; floating point never
//! touches the hot path. These helpers convert between human-readable decimal
//! strings and the fixed-point representation at the edges (demo binary,
//! tests, display).
//!
//! ## Tick Grid
//!
//! A decimal value that does not land on the 10^-8 tick grid is REJECTED,
//! not rounded: silently rounding a client price onto the grid would change
//! the level it rests on.
//!
//! ## Examples
//!
//! ```
//! use lobcore::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//!
//! // Sub-tick precision is rejected
//! assert_eq!(to_fixed("0.000000001"), None);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

/// Largest whole-unit value representable after scaling
pub const MAX_VALUE: u64 = u64::MAX / SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string into fixed-point u64.
///
/// Returns `None` if parsing fails, the value is negative, the value does
/// not land on the 10^-8 tick grid, or it overflows u64 after scaling.
///
/// # Example
///
/// ```
/// use lobcore::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1.0"), None);
/// assert_eq!(to_fixed("1.000000005"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    if decimal.is_sign_negative() {
        return None;
    }

    let scaled = decimal.checked_mul(Decimal::from(SCALE))?;
    // Off-grid values are rejected rather than rounded
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_u64()
}

/// Render fixed-point u64 as a string with 8 decimal places
///
/// # Example
///
/// ```
/// use lobcore::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// assert_eq!(from_fixed(1), "0.00000001");
/// ```
pub fn from_fixed(value: u64) -> String {
    format!("{}.{:08}", value / SCALE, value % SCALE)
}

// ============================================================================
// Unit Tests
// ============================================================================
