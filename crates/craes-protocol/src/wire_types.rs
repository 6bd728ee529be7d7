//! Low-level wire types and constants.
//!
//! This module defines:
//! - Message type IDs for the order and response messages.
//! - Protocol versioning.
//! - Tag values for the optional limit price and the condition union.
//!
//! The actual encode/decode logic lives in `binary_codec`.

/// Current protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// `msg_type`, `version`, two reserved bytes.
pub const HEADER_LEN: usize = 4;

/// Encoded size of one fill in a response: price (f64) + volume (u64).
pub const FILL_LEN: usize = 16;

/// Message types. Used in the first byte of each binary payload.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WireMessageType {
    /// Client → gateway order.
    Order = 1,

    /// Gateway → client trade-execution response.
    Response = 2,
}

impl WireMessageType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(WireMessageType::Order),
            2 => Some(WireMessageType::Response),
            _ => None,
        }
    }
}

/// Tag byte of the `limitprice` union.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LimitPriceTag {
    None = 0,
    Some = 1,
}

impl LimitPriceTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(LimitPriceTag::None),
            1 => Some(LimitPriceTag::Some),
            _ => None,
        }
    }
}

/// Tag byte of the `condition` union. Every tag but
/// `Unconditional` is followed by an f64 trigger.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConditionTag {
    Unconditional = 0,
    StopLoss = 1,
    StopAndReverse = 2,
}

impl ConditionTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(ConditionTag::Unconditional),
            1 => Some(ConditionTag::StopLoss),
            2 => Some(ConditionTag::StopAndReverse),
            _ => None,
        }
    }
}
