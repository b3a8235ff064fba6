// ============================================================================
// Quotation Calculation
// Pricing formulas applied to execution batches
// ============================================================================

use crate::domain::error::BookResult;
use crate::domain::TradeExecution;
use crate::numeric::Price;
use crate::quotation::quote::Quotation;

/// Formula used to derive a quotation from an execution batch.
///
/// A closed set rather than a trait object: the engine is built around fixed
/// pricing rules, and a closed enum keeps the calculation dispatch free of
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuotationCalculation {
    /// Volume-weighted average price of the batch.
    #[default]
    WeightedAverage,
}

impl QuotationCalculation {
    /// Derive a quotation for `ticker` from a non-empty execution batch.
    ///
    /// An empty batch has no meaningful price; it surfaces as a
    /// division-by-zero numeric error.
    pub fn calculate(&self, ticker: &str, executions: &[TradeExecution]) -> BookResult<Quotation> {
        match self {
            Self::WeightedAverage => {
                let mut notional = Price::from_raw(0);
                let mut total_volume: i64 = 0;
                for execution in executions {
                    notional = notional.checked_add(execution.price.checked_mul_int(execution.volume)?)?;
                    total_volume += execution.volume;
                }
                let price = notional.checked_div_int(total_volume)?;
                Ok(Quotation::new(ticker, total_volume, price))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::OrderBookError;
    use crate::domain::OrderId;
    use crate::numeric::NumericError;

    fn execution(volume: i64, price: &str) -> TradeExecution {
        TradeExecution {
            order_id: OrderId::new(),
            ticker: "NVDA.US".to_string(),
            volume,
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_weighted_average() {
        let executions = vec![execution(100, "10.50"), execution(200, "10.80")];

        let quotation = QuotationCalculation::WeightedAverage
            .calculate("NVDA.US", &executions)
            .unwrap();

        assert_eq!(quotation.price, "10.70".parse().unwrap());
        assert_eq!(quotation.volume, 300);
        assert_eq!(quotation.ticker, "NVDA.US");
    }

    #[test]
    fn test_weighted_average_uneven_batch() {
        let executions = vec![
            execution(10, "171.734"),
            execution(10, "171.256"),
            execution(10, "171.334"),
            execution(10, "171.634"),
        ];

        let quotation = QuotationCalculation::WeightedAverage
            .calculate("NVDA.US", &executions)
            .unwrap();

        assert_eq!(quotation.price, "171.4895".parse().unwrap());
        assert_eq!(quotation.volume, 40);
    }

    #[test]
    fn test_single_execution_keeps_its_price() {
        let executions = vec![execution(7, "171.9434")];

        let quotation = QuotationCalculation::WeightedAverage
            .calculate("NVDA.US", &executions)
            .unwrap();

        assert_eq!(quotation.price, "171.9434".parse().unwrap());
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let result = QuotationCalculation::WeightedAverage.calculate("NVDA.US", &[]);

        assert_eq!(
            result,
            Err(OrderBookError::Numeric(NumericError::DivisionByZero))
        );
    }
}
