//! craes-core
//!
//! Pure order domain for the CRAES gateway client:
//! - order side and execution condition
//! - validated, immutable orders
//! - trade fills and per-order execution results

pub mod side;
pub mod condition;
pub mod order;
pub mod trade;
pub mod error;

pub use side::Side;
pub use condition::Condition;
pub use order::{check_price, Order};
pub use trade::{TradeExecutionResult, TradeFill};
pub use error::OrderError;
