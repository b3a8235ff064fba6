// ============================================================================
// Engine Module
// The matching engine façade and its quote-update worker
// ============================================================================

pub mod matching_engine;
pub mod quote_updater;

pub use matching_engine::{EngineState, MatchingEngine};
pub use quote_updater::{QuoteUpdate, QuoteUpdater};
