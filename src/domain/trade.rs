// ============================================================================
// Trade Results
// Immutable execution records and the order registration result envelope
// ============================================================================

use crate::domain::command::RegisterOrderCommand;
use crate::domain::order::{OrderId, RegistrationState};
use crate::numeric::Price;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A finished transaction produced by a matching pass.
///
/// Produced once per matched or partially matched order and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TradeExecution {
    pub order_id: OrderId,
    pub ticker: String,
    pub volume: i64,
    pub price: Price,
}

/// A market order typically consumes only a handful of resting asks, so the
/// batch stays inline in the common case.
pub type ExecutionBatch = SmallVec<[TradeExecution; 4]>;

/// Fill accounting attached to partial or resting registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderFillDetails {
    pub requested: i64,
    pub filled: i64,
    pub pending: i64,
    pub message: String,
}

/// Outcome of a `register_order` call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderRegistrationResult {
    pub state: RegistrationState,
    pub executions: ExecutionBatch,
    pub error_message: Option<String>,
    pub fill_details: Option<OrderFillDetails>,
}

impl OrderRegistrationResult {
    /// A fully completed registration or match.
    pub fn success(executions: ExecutionBatch) -> Self {
        Self {
            state: RegistrationState::Success,
            executions,
            error_message: None,
            fill_details: None,
        }
    }

    /// A registration the book could not accept.
    pub fn failure(executions: ExecutionBatch, error_message: impl Into<String>) -> Self {
        Self {
            state: RegistrationState::Failure,
            executions,
            error_message: Some(error_message.into()),
            fill_details: None,
        }
    }

    /// A market order that consumed every resting ask without being fully
    /// satisfied. Already-matched executions are preserved in the result.
    pub fn partially_filled(executions: ExecutionBatch, command: &RegisterOrderCommand) -> Self {
        let filled: i64 = executions.iter().map(|execution| execution.volume).sum();
        let fill_details = OrderFillDetails {
            requested: command.volume,
            filled,
            pending: command.volume - filled,
            message: "could not fill complete requested volume, partially filled transaction"
                .to_string(),
        };
        Self {
            state: RegistrationState::Pending,
            executions,
            error_message: None,
            fill_details: Some(fill_details),
        }
    }

    /// A limit bid that went to rest without matching.
    pub fn limit_order_resting(command: &RegisterOrderCommand) -> Self {
        let fill_details = OrderFillDetails {
            requested: command.volume,
            filled: 0,
            pending: command.volume,
            message: "limit order registered successfully".to_string(),
        };
        Self {
            state: RegistrationState::Pending,
            executions: ExecutionBatch::new(),
            error_message: None,
            fill_details: Some(fill_details),
        }
    }

    pub fn is_partially_filled(&self) -> bool {
        self.state == RegistrationState::Pending
    }

    /// Total volume carried by the execution batch.
    pub fn filled_volume(&self) -> i64 {
        self.executions.iter().map(|execution| execution.volume).sum()
    }
}
