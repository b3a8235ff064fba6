// ============================================================================
// Matching Engine
// Façade composing the order book, validator and quotation aggregator
// ============================================================================

use crate::book::{OrderBook, RegistrationValidator};
use crate::domain::error::{BookResult, OrderBookError};
use crate::domain::settings::{MARKET_SPREAD, MAX_RESTING_ORDERS_PER_SIDE, QUOTATION_CALCULATION};
use crate::domain::{
    OrderDirection, OrderInformation, OrderRegistrationResult, OrderType, Page, Pagination,
    RegisterOrderCommand, RegistrationState, SortOrder, TickerRegistrationCommand,
};
use crate::engine::quote_updater::{QuoteUpdate, QuoteUpdater};
use crate::numeric::Price;
use crate::quotation::{CurrentQuote, QuotationAggregator, TickerQuote};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Created,
    Running,
}

/// The engine's public surface: order registration, quote queries and book
/// snapshots over a set of tickers registered at startup.
///
/// Matching itself is synchronous; the post-trade quote recomputation is
/// handed to a dedicated updater thread, so `get_current_quote` may briefly
/// serve the pre-trade price after `register_order` returns. Updates for a
/// ticker always apply in the order their trades matched.
pub struct MatchingEngine {
    order_book: RwLock<OrderBook>,
    aggregator: Arc<RwLock<QuotationAggregator>>,
    validator: RegistrationValidator,
    updater: QuoteUpdater,
    state: RwLock<EngineState>,
    spread: Price,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::with_side_capacity(MAX_RESTING_ORDERS_PER_SIDE)
    }

    pub fn with_side_capacity(side_capacity: usize) -> Self {
        let aggregator = Arc::new(RwLock::new(QuotationAggregator::new(QUOTATION_CALCULATION)));
        let updater = QuoteUpdater::spawn(Arc::clone(&aggregator));
        Self {
            order_book: RwLock::new(OrderBook::with_side_capacity(side_capacity)),
            aggregator,
            validator: RegistrationValidator::default(),
            updater,
            state: RwLock::new(EngineState::Created),
            spread: MARKET_SPREAD,
        }
    }

    /// Register every ticker in the book and seed its initial quotation.
    pub fn initialize(&self, commands: Vec<TickerRegistrationCommand>) -> EngineState {
        {
            let mut order_book = self.order_book.write();
            let mut aggregator = self.aggregator.write();
            for command in &commands {
                order_book.register_ticker(&command.ticker);
                aggregator.init_ticker(&command.ticker, command.initial_price);
            }
        }
        info!(tickers = commands.len(), "matching engine initialized");
        *self.state.write() = EngineState::Running;
        EngineState::Running
    }

    pub fn state(&self) -> EngineState {
        *self.state.read()
    }

    /// Register an order and return the matching outcome.
    ///
    /// A market order submitted without a price gets one synthesized off the
    /// current quote (ask: quote + spread, bid: quote - spread) and bypasses
    /// the corridor check; the quote itself defines the synthesized price, so
    /// there is nothing to validate it against. Every other order must price
    /// inside the corridor or the call fails before reaching the book.
    pub fn register_order(
        &self,
        command: &RegisterOrderCommand,
    ) -> BookResult<OrderRegistrationResult> {
        if command.ticker.trim().is_empty() {
            return Err(OrderBookError::MissingTicker);
        }
        if command.volume <= 0 {
            return Err(OrderBookError::NonPositiveVolume(command.volume));
        }

        let quote = self.get_current_quote(&command.ticker)?;
        let effective = if command.order_type == OrderType::Market && command.price.is_none() {
            command.with_synthesized_price(quote.price, self.spread)?
        } else {
            if let Some(proposed) = command.price {
                let corridor = self.validator.price_corridor(quote.price)?;
                if !corridor.contains(proposed) {
                    return Err(OrderBookError::PriceOutOfCorridor {
                        proposed,
                        floor: corridor.floor,
                        ceiling: corridor.ceiling,
                    });
                }
            }
            command.clone()
        };

        let shard = self.order_book.read().shard(&effective.ticker)?;
        let mut book = shard.lock();
        let result = book.register_order(&effective)?;

        // Submitted while the shard is still locked: same-ticker updates
        // reach the channel in match order. The caller never waits for the
        // aggregator write. A failed registration never moves the quote.
        if result.state != RegistrationState::Failure {
            self.updater.submit(QuoteUpdate {
                command: effective,
                executions: result.executions.clone(),
            });
        }

        Ok(result)
    }

    pub fn get_current_quote(&self, ticker: &str) -> BookResult<CurrentQuote> {
        self.aggregator.read().get_current_quote(ticker)
    }

    pub fn get_last_quotes(
        &self,
        ticker: &str,
        limit: usize,
        sort: SortOrder,
    ) -> BookResult<Vec<CurrentQuote>> {
        self.aggregator.read().get_last_quotes(ticker, limit, sort)
    }

    pub fn get_all_tickers_with_quotation(&self) -> Vec<TickerQuote> {
        self.aggregator.read().get_all_tickers_with_quotation()
    }

    pub fn get_order_book_snapshot(
        &self,
        ticker: &str,
        direction: OrderDirection,
        pagination: Pagination,
    ) -> BookResult<Page<OrderInformation>> {
        self.order_book
            .read()
            .get_order_book_snapshot(ticker, direction, pagination)
    }

    /// Resting ask volume for a ticker.
    pub fn get_volume(&self, ticker: &str) -> i64 {
        self.order_book.read().get_volume(ticker)
    }

    /// Drain the quote-update queue and stop the updater thread. Every quote
    /// update submitted before the call is applied before it returns.
    pub fn shutdown(&mut self) {
        self.updater.shutdown();
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
