// ============================================================================
// Order Book Module
// Book sides, per-ticker shards and pre-trade validation
// ============================================================================

pub mod order_book;
pub mod side;
pub mod validator;

pub use order_book::{OrderBook, TickerBook};
pub use side::BookSide;
pub use validator::{PriceCorridor, RegistrationValidator};
