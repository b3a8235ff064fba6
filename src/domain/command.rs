// ============================================================================
// Commands
// Immutable value inputs accepted by the engine
// ============================================================================

use crate::numeric::{NumericResult, Price};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side of an order relative to the book.
///
/// An `Ask` is a resting sell order; a `Bid` is a request to buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderDirection {
    Ask,
    Bid,
}

/// Order types accepted at the API boundary.
///
/// Only `Market` and `Limit` are implemented by the matching algorithm; the
/// remaining variants are rejected with `UnsupportedOrderType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderType {
    /// Executed immediately at the best available price
    Market,
    /// Executed only at the specified price or better
    Limit,
    /// Triggered when the stop price is reached
    Stop,
    /// Becomes a limit order once the stop price is reached
    StopLimit,
    /// Only part of the volume is visible, rest is hidden
    Iceberg,
    /// Must be executed immediately in full or cancelled
    FillOrKill,
    /// Execute as much as possible immediately, cancel the rest
    ImmediateOrCancel,
    /// Remains active until explicitly cancelled
    GoodTillCancelled,
    /// Remains active until a specified date
    GoodTillDate,
    /// Executed only if the entire order can be filled
    AllOrNone,
}

/// Command to register a buy or sell order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegisterOrderCommand {
    pub direction: OrderDirection,
    pub order_type: OrderType,
    pub ticker: String,
    /// Limit price; absent for pure market orders
    pub price: Option<Price>,
    pub volume: i64,
}

impl RegisterOrderCommand {
    pub fn new(
        direction: OrderDirection,
        order_type: OrderType,
        ticker: impl Into<String>,
        price: Option<Price>,
        volume: i64,
    ) -> Self {
        Self {
            direction,
            order_type,
            ticker: ticker.into(),
            price,
            volume,
        }
    }

    /// Derive a copy of this command priced off the current quote.
    ///
    /// Asks sell at `quote + spread`, bids buy at `quote - spread`. Used to
    /// synthesize a price for market orders submitted without one.
    pub fn with_synthesized_price(&self, quote: Price, spread: Price) -> NumericResult<Self> {
        let price = match self.direction {
            OrderDirection::Ask => quote.checked_add(spread)?,
            OrderDirection::Bid => quote.checked_sub(spread)?,
        };
        Ok(Self {
            price: Some(price),
            ticker: self.ticker.clone(),
            ..*self
        })
    }
}

/// Command to register a tradeable instrument at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickerRegistrationCommand {
    pub ticker: String,
    pub initial_price: Price,
}

impl TickerRegistrationCommand {
    pub fn new(ticker: impl Into<String>, initial_price: Price) -> Self {
        Self {
            ticker: ticker.into(),
            initial_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_ask_price_adds_spread() {
        let command = RegisterOrderCommand::new(
            OrderDirection::Ask,
            OrderType::Market,
            "NVDA.US",
            None,
            10,
        );
        let quote: Price = "145.00".parse().unwrap();
        let spread: Price = "0.0100".parse().unwrap();

        let priced = command.with_synthesized_price(quote, spread).unwrap();
        assert_eq!(priced.price, Some("145.0100".parse().unwrap()));
        assert_eq!(priced.volume, 10);
        assert_eq!(priced.ticker, "NVDA.US");
    }

    #[test]
    fn test_synthesized_bid_price_subtracts_spread() {
        let command = RegisterOrderCommand::new(
            OrderDirection::Bid,
            OrderType::Market,
            "NVDA.US",
            None,
            10,
        );
        let quote: Price = "145.00".parse().unwrap();
        let spread: Price = "0.0100".parse().unwrap();

        let priced = command.with_synthesized_price(quote, spread).unwrap();
        assert_eq!(priced.price, Some("144.9900".parse().unwrap()));
    }
}
