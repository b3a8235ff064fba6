// ============================================================================
// Matchvenue Library
// Single-instrument-per-ticker order matching with post-trade quotations
// ============================================================================

//! # Matchvenue
//!
//! A trading-venue core: per-ticker order books with price-time priority,
//! a pre-trade price corridor, and volume-weighted quotations recomputed
//! asynchronously after every finished buy.
//!
//! ## Features
//!
//! - **Fixed-point prices** at 4 decimal places with half-up rounding
//! - **Per-ticker book shards** so matching on one ticker never blocks another
//! - **Price-time priority** for resting orders at equal prices
//! - **Decoupled quote updates** applied in match order per ticker
//!
//! ## Example
//!
//! ```rust
//! use matchvenue::prelude::*;
//!
//! let engine = MatchingEngine::new();
//! engine.initialize(vec![TickerRegistrationCommand::new(
//!     "NVDA.US",
//!     "171.9434".parse().unwrap(),
//! )]);
//!
//! // Rest a sell order
//! let ask = RegisterOrderCommand::new(
//!     OrderDirection::Ask,
//!     OrderType::Limit,
//!     "NVDA.US",
//!     Some("171.9434".parse().unwrap()),
//!     100,
//! );
//! engine.register_order(&ask).unwrap();
//!
//! // Buy against it at the best available price
//! let bid = RegisterOrderCommand::new(
//!     OrderDirection::Bid,
//!     OrderType::Market,
//!     "NVDA.US",
//!     None,
//!     40,
//! );
//! let result = engine.register_order(&bid).unwrap();
//! assert_eq!(result.filled_volume(), 40);
//! ```

pub mod book;
pub mod domain;
pub mod engine;
pub mod numeric;
pub mod quotation;

// Re-exports for convenience
pub mod prelude {
    pub use crate::book::{OrderBook, RegistrationValidator};
    pub use crate::domain::{
        BookResult, OrderBookError, OrderDirection, OrderInformation, OrderRegistrationResult,
        OrderType, Page, Pagination, RegisterOrderCommand, RegistrationState, SortOrder,
        TickerRegistrationCommand, TradeExecution,
    };
    pub use crate::engine::{EngineState, MatchingEngine};
    pub use crate::numeric::Price;
    pub use crate::quotation::{CurrentQuote, QuotationAggregator, TickerQuote};
}
