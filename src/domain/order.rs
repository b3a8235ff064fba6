// ============================================================================
// Order Domain Model
// Trade-lifecycle entity with an append-only transition history
// ============================================================================

use crate::domain::command::RegisterOrderCommand;
use crate::domain::error::{BookResult, OrderBookError};
use crate::domain::settings::{Currency, GLOBAL_CURRENCY};
use crate::domain::trade::TradeExecution;
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Process-unique order identifier, generated at creation and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// State Machine
// ============================================================================

/// Registration axis: UNKNOWN -> PENDING -> {SUCCESS, FAILURE}.
///
/// Driven by book events, never by the client directly. Also doubles as the
/// result state of a `register_order` call, where PENDING marks a partial
/// fill or a resting limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RegistrationState {
    Unknown,
    Pending,
    Success,
    Failure,
}

/// Lifecycle axis: UNKNOWN -> PENDING -> {OPEN, CLOSED}.
///
/// Once CLOSED the remaining volume is frozen and no further transition is
/// legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderLifecycle {
    Unknown,
    Pending,
    Open,
    Closed,
}

/// One entry of the append-only audit trail. Records both state axes and the
/// volume before/after the change. Consumed by diagnostics, never by
/// matching logic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderStateChange {
    pub changed_at: DateTime<Utc>,
    pub previous_registration: RegistrationState,
    pub next_registration: RegistrationState,
    pub previous_lifecycle: OrderLifecycle,
    pub next_lifecycle: OrderLifecycle,
    pub volume_before: i64,
    pub volume_after: i64,
}

/// Snapshot view of a resting order for order book queries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderInformation {
    pub created_at: DateTime<Utc>,
    pub price: Price,
    pub volume: i64,
}

// ============================================================================
// Order Entity
// ============================================================================

/// A mutable trade-lifecycle entity.
///
/// Exclusively owned by the ticker's book side it rests in; never shared
/// across tickers. Remaining volume is monotonically non-increasing once the
/// order is resting.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    created_at: DateTime<Utc>,
    ticker: String,
    price: Option<Price>,
    currency: Currency,
    volume: i64,
    registration_state: RegistrationState,
    lifecycle: OrderLifecycle,
    history: Vec<OrderStateChange>,
}

impl Order {
    /// Create a new order from a command: fresh identifier and timestamp,
    /// both axes move UNKNOWN -> PENDING, recorded as the first history
    /// entry.
    pub fn factorize(command: &RegisterOrderCommand) -> Self {
        let mut order = Self {
            id: OrderId::new(),
            created_at: Utc::now(),
            ticker: command.ticker.clone(),
            price: command.price,
            currency: GLOBAL_CURRENCY,
            volume: command.volume,
            registration_state: RegistrationState::Pending,
            lifecycle: OrderLifecycle::Pending,
            history: Vec::new(),
        };
        order.history.push(OrderStateChange {
            changed_at: Utc::now(),
            previous_registration: RegistrationState::Unknown,
            next_registration: RegistrationState::Pending,
            previous_lifecycle: OrderLifecycle::Unknown,
            next_lifecycle: OrderLifecycle::Pending,
            volume_before: command.volume,
            volume_after: command.volume,
        });
        order
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn price(&self) -> Option<Price> {
        self.price
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn volume(&self) -> i64 {
        self.volume
    }

    pub fn registration_state(&self) -> RegistrationState {
        self.registration_state
    }

    pub fn lifecycle(&self) -> OrderLifecycle {
        self.lifecycle
    }

    pub fn history(&self) -> &[OrderStateChange] {
        &self.history
    }

    pub fn order_information(&self) -> BookResult<OrderInformation> {
        Ok(OrderInformation {
            created_at: self.created_at,
            price: self.price.ok_or(OrderBookError::MissingPrice)?,
            volume: self.volume,
        })
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// The book accepted this order: registration -> SUCCESS, lifecycle ->
    /// OPEN. Legal only from registration PENDING.
    pub fn offer_successfully_registered(&mut self) -> BookResult<()> {
        if self.registration_state != RegistrationState::Pending {
            return Err(self.illegal_transition("offer_successfully_registered"));
        }
        self.record(RegistrationState::Success, OrderLifecycle::Open, self.volume);
        Ok(())
    }

    /// The book rejected this order: registration -> FAILURE, lifecycle ->
    /// CLOSED. Terminal.
    pub fn offer_registration_failed(&mut self) -> BookResult<()> {
        if self.registration_state != RegistrationState::Pending {
            return Err(self.illegal_transition("offer_registration_failed"));
        }
        self.record(RegistrationState::Failure, OrderLifecycle::Closed, self.volume);
        Ok(())
    }

    /// Full fill: lifecycle -> CLOSED, remaining volume goes to zero and is
    /// frozen. Returns the execution record for the full remaining volume.
    /// Legal only from lifecycle OPEN.
    pub fn bought(&mut self) -> BookResult<TradeExecution> {
        if self.lifecycle != OrderLifecycle::Open {
            return Err(self.illegal_transition("bought"));
        }
        let price = self.price.ok_or(OrderBookError::MissingPrice)?;
        let volume_sold = self.volume;

        self.record(self.registration_state, OrderLifecycle::Closed, 0);
        self.volume = 0;

        Ok(TradeExecution {
            order_id: self.id,
            ticker: self.ticker.clone(),
            volume: volume_sold,
            price,
        })
    }

    /// Partial fill: `amount` must be strictly smaller than the remaining
    /// volume; the order stays OPEN with the remainder.
    pub fn bought_partially(&mut self, amount: i64) -> BookResult<TradeExecution> {
        if self.lifecycle != OrderLifecycle::Open {
            return Err(self.illegal_transition("bought_partially"));
        }
        if amount <= 0 {
            return Err(OrderBookError::NonPositiveVolume(amount));
        }
        if amount >= self.volume {
            return Err(OrderBookError::VolumeNotAvailable {
                requested: amount,
                available: self.volume,
            });
        }
        let price = self.price.ok_or(OrderBookError::MissingPrice)?;
        let volume_left = self.volume - amount;

        self.record(self.registration_state, OrderLifecycle::Open, volume_left);
        self.volume = volume_left;

        Ok(TradeExecution {
            order_id: self.id,
            ticker: self.ticker.clone(),
            volume: amount,
            price,
        })
    }

    /// Execution record reflecting the order's current volume and price,
    /// used to report a registration in the result envelope.
    pub fn execution_snapshot(&self) -> BookResult<TradeExecution> {
        Ok(TradeExecution {
            order_id: self.id,
            ticker: self.ticker.clone(),
            volume: self.volume,
            price: self.price.ok_or(OrderBookError::MissingPrice)?,
        })
    }

    /// Emit the audit trail through the tracing subscriber.
    pub fn log_history(&self) {
        tracing::info!(order_id = %self.id, "=== order history begin ===");
        for change in &self.history {
            tracing::info!(order_id = %self.id, ?change, "state change");
        }
        tracing::info!(order_id = %self.id, "=== order history end ===");
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn record(
        &mut self,
        next_registration: RegistrationState,
        next_lifecycle: OrderLifecycle,
        volume_after: i64,
    ) {
        self.history.push(OrderStateChange {
            changed_at: Utc::now(),
            previous_registration: self.registration_state,
            next_registration,
            previous_lifecycle: self.lifecycle,
            next_lifecycle,
            volume_before: self.volume,
            volume_after,
        });
        self.registration_state = next_registration;
        self.lifecycle = next_lifecycle;
    }

    fn illegal_transition(&self, operation: &'static str) -> OrderBookError {
        OrderBookError::IllegalTransition {
            operation,
            registration: self.registration_state,
            lifecycle: self.lifecycle,
        }
    }
}

// Orders are identified by their UUID alone.
impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}
