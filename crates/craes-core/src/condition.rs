//! Execution condition attached to an order.
//!
//! ```text
//! Unconditional            no trigger
//! StopLoss { trigger }     trigger price required
//! StopAndReverse { .. }    trigger price required
//! ```

use serde::Serialize;

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub enum Condition {
    /// Plain order, executed as soon as the gateway can.
    #[default]
    Unconditional,

    /// Activated once the market crosses `trigger`.
    StopLoss { trigger: f64 },

    /// Like a stop-loss, but reverses the position when triggered.
    StopAndReverse { trigger: f64 },
}

impl Condition {
    /// Trigger price, if this condition carries one.
    pub fn trigger(&self) -> Option<f64> {
        match *self {
            Condition::Unconditional => None,
            Condition::StopLoss { trigger } | Condition::StopAndReverse { trigger } => {
                Some(trigger)
            }
        }
    }

    /// Token used for this condition in the order file.
    pub fn as_token(&self) -> &'static str {
        match self {
            Condition::Unconditional => "None",
            Condition::StopLoss { .. } => "stoploss",
            Condition::StopAndReverse { .. } => "stopandreverse",
        }
    }
}
