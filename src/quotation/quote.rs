// ============================================================================
// Quote Records
// Value objects produced and served by the quotation aggregator
// ============================================================================

use crate::numeric::Price;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A quotation computed from one batch of executions against a ticker.
///
/// `volume` is the total traded volume the quotation was derived from; a
/// seeded initial quotation carries volume zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quotation {
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub volume: i64,
    pub price: Price,
}

impl Quotation {
    pub fn new(ticker: impl Into<String>, volume: i64, price: Price) -> Self {
        Self {
            ticker: ticker.into(),
            timestamp: Utc::now(),
            volume,
            price,
        }
    }

    /// Projection served to quote queries.
    pub fn as_current_quote(&self) -> CurrentQuote {
        CurrentQuote {
            timestamp: self.timestamp,
            price: self.price,
        }
    }
}

/// The most recent price of a ticker together with when it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentQuote {
    pub timestamp: DateTime<Utc>,
    pub price: Price,
}

/// A ticker paired with its latest quoted price.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickerQuote {
    pub ticker: String,
    pub price: Price,
}
