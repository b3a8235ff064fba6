// ============================================================================
// Quotation Module
// Quotation calculation, aggregation and quote queries
// ============================================================================

pub mod aggregator;
pub mod calculation;
pub mod quote;

pub use aggregator::QuotationAggregator;
pub use calculation::QuotationCalculation;
pub use quote::{CurrentQuote, Quotation, TickerQuote};
