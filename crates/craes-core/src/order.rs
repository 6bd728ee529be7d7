//! Validated order instruction.
//!
//! An `Order` is built once (from a file row or a decoded order message),
//! never mutated, and consumed by the codec.
//!
//! Invariants enforced by [`Order::new`]:
//! - `volume >= 1`
//! - `asset_id >= 1`
//! - a present limit price or trigger price is finite and `>= 0`

use serde::Serialize;

use crate::condition::Condition;
use crate::error::OrderError;
use crate::side::Side;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    side: Side,
    volume: u64,
    limit_price: Option<f64>, // None = market order
    condition: Condition,
    asset_id: u64,
}

impl Order {
    pub fn new(
        side: Side,
        volume: u64,
        limit_price: Option<f64>,
        condition: Condition,
        asset_id: u64,
    ) -> Result<Self, OrderError> {
        if volume == 0 {
            return Err(OrderError::NonPositiveVolume);
        }
        if let Some(price) = limit_price {
            check_price("limit price", price)?;
        }
        if let Some(trigger) = condition.trigger() {
            check_price("trigger price", trigger)?;
        }
        if asset_id == 0 {
            return Err(OrderError::NonPositiveAssetId);
        }

        Ok(Order {
            side,
            volume,
            limit_price,
            condition,
            asset_id,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    /// Limit price; `None` means the order carries no limit.
    pub fn limit_price(&self) -> Option<f64> {
        self.limit_price
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn asset_id(&self) -> u64 {
        self.asset_id
    }
}

/// Price rule shared by limit and trigger prices: finite and `>= 0`.
pub fn check_price(field: &'static str, value: f64) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::NonFinitePrice { field });
    }
    if value < 0.0 {
        return Err(OrderError::NegativePrice { field, value });
    }
    Ok(())
}
