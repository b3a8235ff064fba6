// ============================================================================
// Venue Settings
// Global constants shared by the matching engine components
// ============================================================================

use crate::numeric::Price;
use crate::quotation::QuotationCalculation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settlement currency of every order on the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Currency {
    Usd,
}

/// Every order is denominated in this currency.
pub const GLOBAL_CURRENCY: Currency = Currency::Usd;

/// Maximum relative deviation from the current quote accepted by the
/// pre-trade price-corridor check (15%).
pub const PRICE_TOLERANCE: Price = Price::from_raw(1_500);

/// Spread applied when synthesizing a price for a market order submitted
/// without one (0.0100).
pub const MARKET_SPREAD: Price = Price::from_raw(100);

/// Capacity bound of a single book side. Inserting beyond this bound fails
/// the order registration rather than growing without limit.
pub const MAX_RESTING_ORDERS_PER_SIDE: usize = 1_000_000;

/// Pricing formula the venue publishes quotes with.
pub const QUOTATION_CALCULATION: QuotationCalculation = QuotationCalculation::WeightedAverage;
