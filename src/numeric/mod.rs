// ============================================================================
// Numeric Module
// Fixed-point arithmetic for venue price calculations
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: Fixed-point decimal with compile-time precision
// - NumericError: Error types for arithmetic operations
// - Price: the venue-wide 4-decimal price type
//
// Design principles:
// - No floating-point operations
// - All arithmetic returns Result (no panics)
// - Round half-up applied at every computed price (spread addition,
//   corridor bounds, weighted average)

mod errors;
mod fixed_decimal;

pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{FixedDecimal, Price};
