//! Side (Buy / Sell) of an order.

use serde::Serialize;

/// Order side: Buy or Sell.
///
/// On the input file this is the `buy` column (`true` / `false`),
/// on the wire a single flag byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `true` for Buy, matching the `buy` flag of the order message.
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Build from the `buy` flag.
    pub fn from_buy_flag(buy: bool) -> Self {
        if buy {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}
