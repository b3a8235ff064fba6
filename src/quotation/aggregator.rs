// ============================================================================
// Quotation Aggregator
// Per-ticker quotation history fed by finished bid executions
// ============================================================================

use crate::domain::error::{BookResult, OrderBookError};
use crate::domain::{OrderDirection, RegisterOrderCommand, SortOrder, TradeExecution};
use crate::numeric::Price;
use crate::quotation::calculation::QuotationCalculation;
use crate::quotation::quote::{CurrentQuote, Quotation, TickerQuote};
use std::collections::HashMap;
use tracing::debug;

/// Accumulates quotations per ticker as bid orders finish.
///
/// Every registered ticker carries at least one quotation (the seeded
/// initial price), so the current quote of a known ticker always exists.
#[derive(Debug, Default)]
pub struct QuotationAggregator {
    calculation: QuotationCalculation,
    quotations: HashMap<String, Vec<Quotation>>,
}

impl QuotationAggregator {
    pub fn new(calculation: QuotationCalculation) -> Self {
        Self {
            calculation,
            quotations: HashMap::new(),
        }
    }

    /// Seed a ticker with its initial price at volume zero. Idempotent: an
    /// already seeded ticker keeps its quotation history.
    pub fn init_ticker(&mut self, ticker: &str, initial_price: Price) {
        self.quotations
            .entry(ticker.to_string())
            .or_insert_with(|| vec![Quotation::new(ticker, 0, initial_price)]);
    }

    /// Fold a finished registration into the quotation history.
    ///
    /// Only bid orders move the quote; ask registrations and empty execution
    /// batches leave the history untouched.
    pub fn handle(
        &mut self,
        command: &RegisterOrderCommand,
        executions: &[TradeExecution],
    ) -> BookResult<()> {
        if command.direction != OrderDirection::Bid || executions.is_empty() {
            return Ok(());
        }
        let quotation = self.calculation.calculate(&command.ticker, executions)?;
        debug!(ticker = %command.ticker, price = %quotation.price, volume = quotation.volume, "quotation updated");
        self.quotations
            .entry(command.ticker.clone())
            .or_default()
            .push(quotation);
        Ok(())
    }

    /// Latest quotation for a ticker.
    pub fn get_current_quote(&self, ticker: &str) -> BookResult<CurrentQuote> {
        self.quotations
            .get(ticker)
            .and_then(|history| history.last())
            .map(Quotation::as_current_quote)
            .ok_or_else(|| OrderBookError::UnknownTicker(ticker.to_string()))
    }

    /// Quotation history slice for a ticker.
    ///
    /// `Asc` serves the oldest `limit` quotations in chronological order and
    /// rejects a zero limit; `Desc` serves the newest `limit` quotations,
    /// newest first. An unknown ticker yields an empty list.
    pub fn get_last_quotes(
        &self,
        ticker: &str,
        limit: usize,
        sort: SortOrder,
    ) -> BookResult<Vec<CurrentQuote>> {
        let history = match self.quotations.get(ticker) {
            Some(history) if !history.is_empty() => history,
            _ => return Ok(Vec::new()),
        };
        match sort {
            SortOrder::Asc => {
                if limit == 0 {
                    return Err(OrderBookError::NonPositiveLimit);
                }
                Ok(history
                    .iter()
                    .take(limit)
                    .map(Quotation::as_current_quote)
                    .collect())
            },
            SortOrder::Desc => Ok(history
                .iter()
                .rev()
                .take(limit)
                .map(Quotation::as_current_quote)
                .collect()),
        }
    }

    /// Every seeded ticker with its latest price, sorted by ticker.
    pub fn get_all_tickers_with_quotation(&self) -> Vec<TickerQuote> {
        let mut tickers: Vec<TickerQuote> = self
            .quotations
            .iter()
            .filter_map(|(ticker, history)| {
                history.last().map(|quotation| TickerQuote {
                    ticker: ticker.clone(),
                    price: quotation.price,
                })
            })
            .collect();
        tickers.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        tickers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, OrderType};

    const TICKER: &str = "NVDA.US";

    fn execution(volume: i64, price: &str) -> TradeExecution {
        TradeExecution {
            order_id: OrderId::new(),
            ticker: TICKER.to_string(),
            volume,
            price: price.parse().unwrap(),
        }
    }

    fn bid_command() -> RegisterOrderCommand {
        RegisterOrderCommand::new(OrderDirection::Bid, OrderType::Market, TICKER, None, 1)
    }

    fn seeded_aggregator(initial_price: &str) -> QuotationAggregator {
        let mut aggregator = QuotationAggregator::default();
        aggregator.init_ticker(TICKER, initial_price.parse().unwrap());
        aggregator
    }

    #[test]
    fn test_handle_moves_current_quote() {
        let mut aggregator = seeded_aggregator("170.9434");

        let before = aggregator.get_current_quote(TICKER).unwrap();
        assert_eq!(before.price, "170.9434".parse().unwrap());

        let executions = vec![
            execution(10, "171.734"),
            execution(10, "171.256"),
            execution(10, "171.334"),
            execution(10, "171.634"),
        ];
        aggregator.handle(&bid_command(), &executions).unwrap();

        let after = aggregator.get_current_quote(TICKER).unwrap();
        assert_eq!(after.price, "171.4895".parse().unwrap());
    }

    #[test]
    fn test_handle_ignores_asks_and_empty_batches() {
        let mut aggregator = seeded_aggregator("170.9434");

        let ask = RegisterOrderCommand::new(
            OrderDirection::Ask,
            OrderType::Limit,
            TICKER,
            Some("171.9434".parse().unwrap()),
            1,
        );
        aggregator.handle(&ask, &[execution(10, "171.9434")]).unwrap();
        aggregator.handle(&bid_command(), &[]).unwrap();

        let quote = aggregator.get_current_quote(TICKER).unwrap();
        assert_eq!(quote.price, "170.9434".parse().unwrap());
    }

    #[test]
    fn test_current_quote_for_unknown_ticker() {
        let aggregator = QuotationAggregator::default();

        assert_eq!(
            aggregator.get_current_quote("DUPA.US"),
            Err(OrderBookError::UnknownTicker("DUPA.US".to_string()))
        );
    }

    #[test]
    fn test_last_quotes_for_unknown_ticker_is_empty() {
        let aggregator = QuotationAggregator::default();

        let quotes = aggregator.get_last_quotes(TICKER, 10, SortOrder::Asc).unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_last_quotes_clamp_when_fewer_than_requested() {
        let aggregator = seeded_aggregator("171.9434");

        assert_eq!(aggregator.get_last_quotes(TICKER, 2, SortOrder::Asc).unwrap().len(), 1);
        assert_eq!(aggregator.get_last_quotes(TICKER, 2, SortOrder::Desc).unwrap().len(), 1);
    }

    #[test]
    fn test_last_quotes_asc_serves_oldest_first() {
        let mut aggregator = seeded_aggregator("1.0000");
        aggregator.handle(&bid_command(), &[execution(1, "2.0000")]).unwrap();
        aggregator.handle(&bid_command(), &[execution(1, "3.0000")]).unwrap();

        let quotes = aggregator.get_last_quotes(TICKER, 2, SortOrder::Asc).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, "1.0000".parse().unwrap());
        assert_eq!(quotes[1].price, "2.0000".parse().unwrap());
    }

    #[test]
    fn test_last_quotes_desc_serves_newest_first() {
        let mut aggregator = seeded_aggregator("1.0000");
        aggregator.handle(&bid_command(), &[execution(1, "2.0000")]).unwrap();
        aggregator.handle(&bid_command(), &[execution(1, "3.0000")]).unwrap();

        let quotes = aggregator.get_last_quotes(TICKER, 2, SortOrder::Desc).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, "3.0000".parse().unwrap());
        assert_eq!(quotes[1].price, "2.0000".parse().unwrap());
    }

    #[test]
    fn test_asc_requires_positive_limit() {
        let aggregator = seeded_aggregator("171.9434");

        assert_eq!(
            aggregator.get_last_quotes(TICKER, 0, SortOrder::Asc),
            Err(OrderBookError::NonPositiveLimit)
        );
        // Desc tolerates a zero limit and simply serves nothing
        assert!(aggregator.get_last_quotes(TICKER, 0, SortOrder::Desc).unwrap().is_empty());
    }

    #[test]
    fn test_init_ticker_is_idempotent() {
        let mut aggregator = seeded_aggregator("170.0000");
        aggregator.handle(&bid_command(), &[execution(1, "171.0000")]).unwrap();

        aggregator.init_ticker(TICKER, "999.0000".parse().unwrap());

        let quote = aggregator.get_current_quote(TICKER).unwrap();
        assert_eq!(quote.price, "171.0000".parse().unwrap());
    }

    #[test]
    fn test_all_tickers_with_quotation_sorted() {
        let mut aggregator = QuotationAggregator::default();
        aggregator.init_ticker("TSLA.US", "240.0000".parse().unwrap());
        aggregator.init_ticker("AAPL.US", "190.0000".parse().unwrap());
        aggregator.init_ticker("NVDA.US", "171.9434".parse().unwrap());

        let tickers = aggregator.get_all_tickers_with_quotation();

        let symbols: Vec<&str> = tickers.iter().map(|entry| entry.ticker.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL.US", "NVDA.US", "TSLA.US"]);
        assert_eq!(tickers[1].price, "171.9434".parse().unwrap());
    }

    #[test]
    fn test_handle_without_seed_creates_history() {
        let mut aggregator = QuotationAggregator::default();

        aggregator.handle(&bid_command(), &[execution(5, "171.9434")]).unwrap();

        let quote = aggregator.get_current_quote(TICKER).unwrap();
        assert_eq!(quote.price, "171.9434".parse().unwrap());
    }
}
