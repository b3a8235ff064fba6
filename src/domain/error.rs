// ============================================================================
// Order Book Errors
// Error taxonomy for order registration and quote queries
// ============================================================================

use crate::domain::command::OrderType;
use crate::domain::order::{OrderLifecycle, RegistrationState};
use crate::numeric::{NumericError, Price};
use std::fmt;

/// Errors surfaced by the order book, quotation aggregator and engine façade.
///
/// All errors are raised synchronously on the calling path and never retried
/// internally; the transport layer maps them to protocol failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    /// Operation referenced a ticker with no registered book or quote history
    UnknownTicker(String),
    /// A required ticker argument was absent or blank
    MissingTicker,
    /// A volume argument was <= 0 where strictly positive is required
    NonPositiveVolume(i64),
    /// A query limit was <= 0 where strictly positive is required
    NonPositiveLimit,
    /// A resting order was offered without a limit price
    MissingPrice,
    /// Requested volume exceeds what a resting order still carries
    VolumeNotAvailable { requested: i64, available: i64 },
    /// Order type not implemented by the matching algorithm
    UnsupportedOrderType(OrderType),
    /// Proposed limit price violates the price-corridor check
    PriceOutOfCorridor {
        proposed: Price,
        floor: Price,
        ceiling: Price,
    },
    /// A lifecycle operation was applied to an order in the wrong state
    IllegalTransition {
        operation: &'static str,
        registration: RegistrationState,
        lifecycle: OrderLifecycle,
    },
    /// Fixed-point arithmetic failure
    Numeric(NumericError),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::UnknownTicker(ticker) => {
                write!(f, "no order book exists for ticker: {}", ticker)
            },
            OrderBookError::MissingTicker => write!(f, "ticker must not be blank"),
            OrderBookError::NonPositiveVolume(volume) => {
                write!(f, "volume {} must be strictly positive", volume)
            },
            OrderBookError::NonPositiveLimit => {
                write!(f, "cannot query quotations with limit less or equal to 0")
            },
            OrderBookError::MissingPrice => {
                write!(f, "a resting order must carry a limit price")
            },
            OrderBookError::VolumeNotAvailable {
                requested,
                available,
            } => {
                write!(
                    f,
                    "requested volume {} exceeds available volume {}",
                    requested, available
                )
            },
            OrderBookError::UnsupportedOrderType(order_type) => {
                write!(f, "order type {:?} not available yet", order_type)
            },
            OrderBookError::PriceOutOfCorridor {
                proposed,
                floor,
                ceiling,
            } => {
                write!(
                    f,
                    "proposed price {} is outside the corridor [{}, {}]",
                    proposed, floor, ceiling
                )
            },
            OrderBookError::IllegalTransition {
                operation,
                registration,
                lifecycle,
            } => {
                write!(
                    f,
                    "illegal {} transition from registration {:?} / lifecycle {:?}",
                    operation, registration, lifecycle
                )
            },
            OrderBookError::Numeric(err) => write!(f, "numeric failure: {}", err),
        }
    }
}

impl std::error::Error for OrderBookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderBookError::Numeric(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NumericError> for OrderBookError {
    fn from(err: NumericError) -> Self {
        OrderBookError::Numeric(err)
    }
}

/// Result type alias for order book operations
pub type BookResult<T> = Result<T, OrderBookError>;
