// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod command;
pub mod error;
pub mod order;
pub mod page;
pub mod settings;
pub mod trade;

pub use command::{OrderDirection, OrderType, RegisterOrderCommand, TickerRegistrationCommand};
pub use error::{BookResult, OrderBookError};
pub use order::{Order, OrderId, OrderInformation, OrderLifecycle, OrderStateChange, RegistrationState};
pub use page::{Page, Pagination, SortOrder};
pub use settings::Currency;
pub use trade::{ExecutionBatch, OrderFillDetails, OrderRegistrationResult, TradeExecution};
