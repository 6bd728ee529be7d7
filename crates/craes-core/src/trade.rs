//! Trade fills returned by the gateway.
//!
//! Each submitted order gets exactly one [`TradeExecutionResult`]: the
//! fills executed for it, in the order the response message lists them.

use std::fmt;

use serde::Serialize;

/// One executed portion of an order.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TradeFill {
    pub price: f64,
    pub volume: u64,
}

impl TradeFill {
    pub fn new(price: f64, volume: u64) -> Self {
        TradeFill { price, volume }
    }
}

/// All fills for one order. May be empty (nothing executed).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TradeExecutionResult {
    fills: Vec<TradeFill>,
}

impl TradeExecutionResult {
    pub fn new(fills: Vec<TradeFill>) -> Self {
        TradeExecutionResult { fills }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fills(&self) -> &[TradeFill] {
        &self.fills
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeFill> {
        self.fills.iter()
    }

    /// Sum of executed volume over all fills.
    pub fn total_volume(&self) -> u64 {
        self.fills
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.volume))
    }

    /// Volume-weighted average price, `None` when nothing was executed.
    pub fn average_price(&self) -> Option<f64> {
        let total = self.total_volume();
        if total == 0 {
            return None;
        }
        let notional: f64 = self.fills.iter().map(|f| f.price * f.volume as f64).sum();
        Some(notional / total as f64)
    }

    pub fn into_fills(self) -> Vec<TradeFill> {
        self.fills
    }
}

impl From<Vec<TradeFill>> for TradeExecutionResult {
    fn from(fills: Vec<TradeFill>) -> Self {
        TradeExecutionResult { fills }
    }
}

impl<'a> IntoIterator for &'a TradeExecutionResult {
    type Item = &'a TradeFill;
    type IntoIter = std::slice::Iter<'a, TradeFill>;

    fn into_iter(self) -> Self::IntoIter {
        self.fills.iter()
    }
}

/// Renders as `[(price, volume), ...]`.
impl fmt::Display for TradeExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, fill) in self.fills.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({:?}, {})", fill.price, fill.volume)?;
        }
        write!(f, "]")
    }
}
