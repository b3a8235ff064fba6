// ============================================================================
// Order Book
// Per-ticker ask/bid structures and the matching algorithm
// ============================================================================

use crate::book::side::BookSide;
use crate::domain::error::{BookResult, OrderBookError};
use crate::domain::settings::MAX_RESTING_ORDERS_PER_SIDE;
use crate::domain::{
    ExecutionBatch, Order, OrderDirection, OrderInformation, OrderRegistrationResult, OrderType,
    Page, Pagination, RegisterOrderCommand, SortOrder,
};
use parking_lot::Mutex;
use smallvec::smallvec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Ticker Book
// ============================================================================

/// The ask and bid structures of a single ticker.
///
/// Matching is synchronous and single-pass: each `register_order` call fully
/// resolves before returning. The structures are not internally
/// synchronized; the owning shard serializes access per ticker.
#[derive(Debug)]
pub struct TickerBook {
    asks: BookSide,
    bids: BookSide,
}

impl TickerBook {
    pub fn new(side_capacity: usize) -> Self {
        Self {
            asks: BookSide::new(OrderDirection::Ask, side_capacity),
            bids: BookSide::new(OrderDirection::Bid, side_capacity),
        }
    }

    /// Total volume resting on the ask side.
    pub fn ask_volume(&self) -> i64 {
        self.asks.resting_volume()
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    /// Register an order against this ticker's book.
    pub fn register_order(
        &mut self,
        command: &RegisterOrderCommand,
    ) -> BookResult<OrderRegistrationResult> {
        match command.direction {
            OrderDirection::Ask => self.register_ask(command),
            OrderDirection::Bid => match command.order_type {
                OrderType::Market => self.match_market_bid(command),
                OrderType::Limit => self.rest_limit_bid(command),
                other => Err(OrderBookError::UnsupportedOrderType(other)),
            },
        }
    }

    /// A sell order always goes to rest at its limit price.
    fn register_ask(&mut self, command: &RegisterOrderCommand) -> BookResult<OrderRegistrationResult> {
        let mut order = Order::factorize(command);

        if self.asks.can_accept() {
            order.offer_successfully_registered()?;
            let execution = order.execution_snapshot()?;
            self.asks.insert(order)?;
            Ok(OrderRegistrationResult::success(smallvec![execution]))
        } else {
            order.offer_registration_failed()?;
            let execution = order.execution_snapshot()?;
            Ok(OrderRegistrationResult::failure(
                smallvec![execution],
                format!("ask side for ticker {} is at capacity", command.ticker),
            ))
        }
    }

    /// Walk the best resting asks until the requested volume is satisfied or
    /// the side runs dry. An exhausted side yields a partial-fill result,
    /// never an error: already-matched work is preserved and reported.
    fn match_market_bid(
        &mut self,
        command: &RegisterOrderCommand,
    ) -> BookResult<OrderRegistrationResult> {
        let requested = command.volume;
        let mut executions = ExecutionBatch::new();
        let mut filled: i64 = 0;

        while filled < requested {
            let available = match self.asks.peek_best() {
                Some(best) => best.volume(),
                None => break,
            };
            let still_needed = requested - filled;

            if available <= still_needed {
                // Best ask is fully consumed: remove it and close it out
                let mut order = match self.asks.pop_best() {
                    Some(order) => order,
                    None => break,
                };
                let execution = order.bought()?;
                debug!(order_id = %order.id(), volume = execution.volume, "resting ask fully filled");
                filled += execution.volume;
                executions.push(execution);
            } else {
                // Best ask survives with the remainder; it keeps its position
                let execution = self.asks.reduce_best(still_needed)?;
                debug!(order_id = %execution.order_id, volume = execution.volume, "resting ask partially filled");
                filled += still_needed;
                executions.push(execution);
            }
        }

        if filled == requested {
            Ok(OrderRegistrationResult::success(executions))
        } else {
            Ok(OrderRegistrationResult::partially_filled(executions, command))
        }
    }

    /// A limit bid rests in the bid structure without a matching attempt.
    fn rest_limit_bid(&mut self, command: &RegisterOrderCommand) -> BookResult<OrderRegistrationResult> {
        let mut order = Order::factorize(command);

        if self.bids.can_accept() {
            order.offer_successfully_registered()?;
            self.bids.insert(order)?;
            Ok(OrderRegistrationResult::limit_order_resting(command))
        } else {
            order.offer_registration_failed()?;
            let execution = order.execution_snapshot()?;
            Ok(OrderRegistrationResult::failure(
                smallvec![execution],
                format!("bid side for ticker {} is at capacity", command.ticker),
            ))
        }
    }

    /// Paginated view over one side in its natural (best-first) order.
    pub fn snapshot(
        &self,
        direction: OrderDirection,
        pagination: Pagination,
    ) -> BookResult<Page<OrderInformation>> {
        let side = match direction {
            OrderDirection::Ask => &self.asks,
            OrderDirection::Bid => &self.bids,
        };
        let natural: Vec<OrderInformation> = side
            .sorted_orders()
            .into_iter()
            .map(|order| order.order_information())
            .collect::<BookResult<_>>()?;

        let elements = match pagination.sort {
            SortOrder::Asc => {
                if pagination.size == 0 {
                    return Err(OrderBookError::NonPositiveLimit);
                }
                natural
                    .into_iter()
                    .skip(pagination.offset())
                    .take(pagination.size)
                    .collect()
            },
            SortOrder::Desc => natural
                .into_iter()
                .rev()
                .skip(pagination.offset())
                .take(pagination.size)
                .collect(),
        };

        Ok(Page::of(elements, pagination))
    }
}

// ============================================================================
// Order Book (ticker registry)
// ============================================================================

/// Owned table of per-ticker book shards.
///
/// Each shard carries its own lock so that matching on one ticker never
/// blocks matching on another; a shard's lock is the linearization point
/// required by the matching algorithm.
pub struct OrderBook {
    shards: HashMap<String, Arc<Mutex<TickerBook>>>,
    side_capacity: usize,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::with_side_capacity(MAX_RESTING_ORDERS_PER_SIDE)
    }

    pub fn with_side_capacity(side_capacity: usize) -> Self {
        Self {
            shards: HashMap::new(),
            side_capacity,
        }
    }

    /// Create empty ask/bid structures for a ticker. Idempotent: an already
    /// registered ticker keeps its resting orders.
    pub fn register_ticker(&mut self, ticker: &str) {
        let side_capacity = self.side_capacity;
        self.shards
            .entry(ticker.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TickerBook::new(side_capacity))));
        info!(ticker, "ticker registered");
    }

    /// The shard owning a ticker's book.
    pub fn shard(&self, ticker: &str) -> BookResult<Arc<Mutex<TickerBook>>> {
        self.shards
            .get(ticker)
            .cloned()
            .ok_or_else(|| OrderBookError::UnknownTicker(ticker.to_string()))
    }

    /// Register an order, locking only the targeted ticker's shard.
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
        let shard = self.shard(&command.ticker)?;
        let mut book = shard.lock();
        book.register_order(command)
    }

    pub fn get_order_book_snapshot(
        &self,
        ticker: &str,
        direction: OrderDirection,
        pagination: Pagination,
    ) -> BookResult<Page<OrderInformation>> {
        let shard = self.shard(ticker)?;
        let book = shard.lock();
        book.snapshot(direction, pagination)
    }

    /// All registered tickers, sorted by symbol.
    pub fn get_all_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.shards.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    /// Whether the ask side of a ticker carries at least `requested` volume.
    pub fn is_volume_available(&self, ticker: &str, requested: i64) -> BookResult<bool> {
        if ticker.trim().is_empty() {
            return Err(OrderBookError::MissingTicker);
        }
        if requested <= 0 {
            return Err(OrderBookError::NonPositiveVolume(requested));
        }
        match self.shards.get(ticker) {
            Some(shard) => Ok(shard.lock().ask_volume() >= requested),
            None => Ok(false),
        }
    }

    /// Resting ask volume for a ticker, zero when unknown.
    pub fn get_volume(&self, ticker: &str) -> i64 {
        self.shards
            .get(ticker)
            .map(|shard| shard.lock().ask_volume())
            .unwrap_or(0)
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegistrationState;

    const TICKER: &str = "NVDA.US";

    fn ask(price: &str, volume: i64) -> RegisterOrderCommand {
        RegisterOrderCommand::new(
            OrderDirection::Ask,
            OrderType::Limit,
            TICKER,
            Some(price.parse().unwrap()),
            volume,
        )
    }

    fn market_bid(volume: i64) -> RegisterOrderCommand {
        RegisterOrderCommand::new(OrderDirection::Bid, OrderType::Market, TICKER, None, volume)
    }

    fn book_with_ticker() -> OrderBook {
        let mut book = OrderBook::new();
        book.register_ticker(TICKER);
        book
    }

    #[test]
    fn test_ask_rests_and_reports_registration() {
        let book = book_with_ticker();

        let result = book.register_order(&ask("171.9434", 10)).unwrap();

        assert_eq!(result.state, RegistrationState::Success);
        assert_eq!(result.executions.len(), 1);
        assert_eq!(result.executions[0].volume, 10);
        assert_eq!(result.executions[0].price, "171.9434".parse().unwrap());
        assert_eq!(book.get_volume(TICKER), 10);
    }

    #[test]
    fn test_ask_for_unknown_ticker_fails() {
        let book = book_with_ticker();
        let command = RegisterOrderCommand::new(
            OrderDirection::Ask,
            OrderType::Limit,
            "DUPA.US",
            Some("171.9434".parse().unwrap()),
            1,
        );

        assert_eq!(
            book.register_order(&command),
            Err(OrderBookError::UnknownTicker("DUPA.US".to_string()))
        );
    }

    #[test]
    fn test_market_bid_consumes_cheapest_asks_first() {
        let book = book_with_ticker();
        book.register_order(&ask("171.9733", 10)).unwrap();
        book.register_order(&ask("171.1442", 5)).unwrap();
        book.register_order(&ask("171.8431", 30)).unwrap();

        let result = book.register_order(&market_bid(15)).unwrap();

        assert_eq!(result.state, RegistrationState::Success);
        assert_eq!(result.filled_volume(), 15);
        // Cheapest ask fully consumed, next-cheapest partially
        assert_eq!(result.executions[0].price, "171.1442".parse().unwrap());
        assert_eq!(result.executions[0].volume, 5);
        assert_eq!(result.executions[1].price, "171.8431".parse().unwrap());
        assert_eq!(result.executions[1].volume, 10);
        assert_eq!(book.get_volume(TICKER), 30);
    }

    #[test]
    fn test_market_bid_exact_fill_closes_resting_ask() {
        let book = book_with_ticker();
        book.register_order(&ask("171.9434", 10)).unwrap();

        let result = book.register_order(&market_bid(10)).unwrap();

        assert_eq!(result.state, RegistrationState::Success);
        assert_eq!(result.filled_volume(), 10);
        assert_eq!(book.get_volume(TICKER), 0);
        let shard = book.shard(TICKER).unwrap();
        assert!(shard.lock().asks().is_empty());
    }

    #[test]
    fn test_market_bid_partial_fill_when_asks_exhausted() {
        let book = book_with_ticker();
        book.register_order(&ask("171.9733", 10)).unwrap();
        book.register_order(&ask("171.1442", 25)).unwrap();

        let result = book.register_order(&market_bid(50)).unwrap();

        assert!(result.is_partially_filled());
        let details = result.fill_details.as_ref().unwrap();
        assert_eq!(details.requested, 50);
        assert_eq!(details.filled, 35);
        assert_eq!(details.pending, 15);
        assert_eq!(book.get_volume(TICKER), 0);
    }

    #[test]
    fn test_market_bid_on_empty_book_fills_nothing() {
        let book = book_with_ticker();

        let result = book.register_order(&market_bid(10)).unwrap();

        assert!(result.is_partially_filled());
        let details = result.fill_details.as_ref().unwrap();
        assert_eq!(details.filled, 0);
        assert_eq!(details.pending, 10);
        assert!(result.executions.is_empty());
    }

    #[test]
    fn test_market_bid_unknown_ticker() {
        let book = book_with_ticker();
        let command =
            RegisterOrderCommand::new(OrderDirection::Bid, OrderType::Market, "DUPA.US", None, 1);

        assert_eq!(
            book.register_order(&command),
            Err(OrderBookError::UnknownTicker("DUPA.US".to_string()))
        );
    }

    #[test]
    fn test_limit_bid_rests_without_matching() {
        let book = book_with_ticker();
        book.register_order(&ask("171.9434", 10)).unwrap();

        let command = RegisterOrderCommand::new(
            OrderDirection::Bid,
            OrderType::Limit,
            TICKER,
            Some("171.9434".parse().unwrap()),
            5,
        );
        let result = book.register_order(&command).unwrap();

        assert!(result.is_partially_filled());
        assert!(result.executions.is_empty());
        let details = result.fill_details.as_ref().unwrap();
        assert_eq!(details.requested, 5);
        assert_eq!(details.filled, 0);
        assert_eq!(details.pending, 5);

        // Ask side untouched, bid resting
        assert_eq!(book.get_volume(TICKER), 10);
        let shard = book.shard(TICKER).unwrap();
        assert_eq!(shard.lock().bids().len(), 1);
    }

    #[test]
    fn test_unsupported_order_type() {
        let book = book_with_ticker();
        let command = RegisterOrderCommand::new(
            OrderDirection::Bid,
            OrderType::Iceberg,
            TICKER,
            Some("171.9434".parse().unwrap()),
            5,
        );

        assert_eq!(
            book.register_order(&command),
            Err(OrderBookError::UnsupportedOrderType(OrderType::Iceberg))
        );
    }

    #[test]
    fn test_register_ticker_is_idempotent() {
        let mut book = OrderBook::new();
        book.register_ticker(TICKER);
        book.register_order(&ask("171.9434", 10)).unwrap();

        book.register_ticker(TICKER);

        assert_eq!(book.get_volume(TICKER), 10);
        let shard = book.shard(TICKER).unwrap();
        assert_eq!(shard.lock().asks().len(), 1);
    }

    #[test]
    fn test_capacity_failure_closes_order_and_reports() {
        let mut book = OrderBook::with_side_capacity(1);
        book.register_ticker(TICKER);
        book.register_order(&ask("171.9434", 10)).unwrap();

        let result = book.register_order(&ask("171.9435", 5)).unwrap();

        assert_eq!(result.state, RegistrationState::Failure);
        assert!(result.error_message.as_deref().unwrap().contains("capacity"));
        assert_eq!(book.get_volume(TICKER), 10);
    }

    #[test]
    fn test_argument_validation() {
        let book = book_with_ticker();

        let blank =
            RegisterOrderCommand::new(OrderDirection::Bid, OrderType::Market, "  ", None, 1);
        assert_eq!(book.register_order(&blank), Err(OrderBookError::MissingTicker));

        assert_eq!(
            book.register_order(&market_bid(0)),
            Err(OrderBookError::NonPositiveVolume(0))
        );
        assert_eq!(
            book.is_volume_available(TICKER, -3),
            Err(OrderBookError::NonPositiveVolume(-3))
        );
        assert_eq!(book.is_volume_available("UNKNOWN", 5), Ok(false));
    }

    #[test]
    fn test_volume_conservation_across_fills() {
        let book = book_with_ticker();
        let registered: i64 = [10, 25, 5, 30, 35]
            .iter()
            .enumerate()
            .map(|(i, volume)| {
                let price = format!("171.{:04}", 1000 + i);
                book.register_order(&ask(&price, *volume)).unwrap();
                *volume
            })
            .sum();
        assert_eq!(book.get_volume(TICKER), registered);
        assert!(book.is_volume_available(TICKER, registered).unwrap());
        assert!(!book.is_volume_available(TICKER, registered + 1).unwrap());

        let result = book.register_order(&market_bid(40)).unwrap();
        assert_eq!(result.filled_volume(), 40);
        assert_eq!(book.get_volume(TICKER), registered - 40);
    }

    #[test]
    fn test_snapshot_pagination() {
        let book = book_with_ticker();
        book.register_order(&ask("171.9733", 10)).unwrap();
        book.register_order(&ask("171.1442", 5)).unwrap();
        book.register_order(&ask("171.8431", 30)).unwrap();

        let asc = book
            .get_order_book_snapshot(TICKER, OrderDirection::Ask, Pagination::new(0, 2, SortOrder::Asc))
            .unwrap();
        let asc_prices: Vec<String> =
            asc.elements.iter().map(|info| info.price.to_string()).collect();
        assert_eq!(asc_prices, vec!["171.1442", "171.8431"]);

        let desc = book
            .get_order_book_snapshot(TICKER, OrderDirection::Ask, Pagination::new(0, 2, SortOrder::Desc))
            .unwrap();
        let desc_prices: Vec<String> =
            desc.elements.iter().map(|info| info.price.to_string()).collect();
        assert_eq!(desc_prices, vec!["171.9733", "171.8431"]);
    }

    #[test]
    fn test_snapshot_clamps_and_empty_pages() {
        let book = book_with_ticker();
        book.register_order(&ask("171.9733", 10)).unwrap();

        // Size beyond available clamps silently
        let page = book
            .get_order_book_snapshot(TICKER, OrderDirection::Ask, Pagination::new(0, 50, SortOrder::Asc))
            .unwrap();
        assert_eq!(page.len(), 1);

        // Page index beyond available yields an empty page, not an error
        let beyond = book
            .get_order_book_snapshot(TICKER, OrderDirection::Ask, Pagination::new(5, 10, SortOrder::Asc))
            .unwrap();
        assert!(beyond.is_empty());

        // Empty bid side yields an empty page
        let bids = book
            .get_order_book_snapshot(TICKER, OrderDirection::Bid, Pagination::new(0, 10, SortOrder::Desc))
            .unwrap();
        assert!(bids.is_empty());

        // Asc requires a positive size
        assert_eq!(
            book.get_order_book_snapshot(TICKER, OrderDirection::Ask, Pagination::new(0, 0, SortOrder::Asc)),
            Err(OrderBookError::NonPositiveLimit)
        );
    }

    #[test]
    fn test_get_all_tickers_sorted() {
        let mut book = OrderBook::new();
        book.register_ticker("TSLA.US");
        book.register_ticker("AAPL.US");
        book.register_ticker("NVDA.US");

        assert_eq!(book.get_all_tickers(), vec!["AAPL.US", "NVDA.US", "TSLA.US"]);
    }
}
