//! How the sink answers an order.
//!
//! The sink does not match anything; it only has to produce one
//! well-formed response per order so clients can be exercised.

use std::fmt;
use std::str::FromStr;

use craes_core::{Order, TradeExecutionResult, TradeFill};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ResponsePolicy {
    /// Answer every order with zero fills.
    #[default]
    Empty,

    /// Answer with one fill for the full volume at the limit price
    /// (`0.0` for orders without a limit).
    Fill,
}

impl ResponsePolicy {
    pub fn respond(&self, order: &Order) -> TradeExecutionResult {
        match self {
            ResponsePolicy::Empty => TradeExecutionResult::empty(),
            ResponsePolicy::Fill => TradeExecutionResult::new(vec![TradeFill::new(
                order.limit_price().unwrap_or(0.0),
                order.volume(),
            )]),
        }
    }
}

impl FromStr for ResponsePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(ResponsePolicy::Empty),
            "fill" => Ok(ResponsePolicy::Fill),
            other => Err(format!("unknown response policy `{}`", other)),
        }
    }
}

impl fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponsePolicy::Empty => write!(f, "empty"),
            ResponsePolicy::Fill => write!(f, "fill"),
        }
    }
}
