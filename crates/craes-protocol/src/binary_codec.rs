//! Binary encoding/decoding of CRAES messages.
//!
//! This module converts between:
//! - raw binary payloads (`&[u8]`)
//! - `craes_core::Order` and `craes_core::TradeExecutionResult`
//!
//! Layout (one message per buffer, all integers big-endian):
//!
//! ```text
//! Header
//! ------
//! [0]    : msg_type (WireMessageType as u8)
//! [1]    : version  (PROTOCOL_VERSION)
//! [2..4] : reserved = 0
//!
//! OrderMsg (type=1, client → gateway):
//!   [4]      buy (0=Sell, 1=Buy)
//!   [5..13]  volume (u64)
//!   [13]     limitprice tag (0=none, 1=some)
//!   [+8]     limitprice (f64 bits)            only when tag=1
//!   [+1]     condition tag (0=unconditional, 1=stoploss, 2=stopandreverse)
//!   [+8]     trigger price (f64 bits)         only when tag!=0
//!   [+8]     asset id (u64)
//!
//! ResponseMsg (type=2, gateway → client):
//!   [4..8]   fill count (u32)
//!   [+16]*   fills: price (f64 bits), volume (u64)
//! ```
//!
//! The transport carries one payload per WebSocket binary message, so no
//! length prefix is added here. Trailing bytes after a message are an error.

use craes_core::{Condition, Order, OrderError, Side, TradeExecutionResult, TradeFill};
use thiserror::Error;

use crate::wire_types::{
    ConditionTag, LimitPriceTag, WireMessageType, FILL_LEN, HEADER_LEN, PROTOCOL_VERSION,
};

/// Errors that can arise when decoding a binary payload, or when a
/// response is too large to encode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    /// Buffer too short for the expected fields.
    #[error("buffer truncated")]
    Truncated,

    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// A valid message type, but not the one this decoder handles.
    #[error("unexpected message type: got {got:?}, expected {expected:?}")]
    UnexpectedMessageType {
        expected: WireMessageType,
        got: WireMessageType,
    },

    #[error("protocol version mismatch: got {0}")]
    VersionMismatch(u8),

    /// Unknown discriminant in a union or flag field.
    #[error("invalid tag {tag} for field {field}")]
    InvalidTag { field: &'static str, tag: u8 },

    /// Fields decoded but do not form a valid order.
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),

    /// More fills than the u32 count field can carry.
    #[error("{0} fills do not fit in one response")]
    TooManyFills(usize),
}

// ============================================================================
// ORDER: client → gateway
// ============================================================================

/// Encode an order message. The bytes are appended to `out`.
///
/// Infallible: every `Order` already satisfies the schema's constraints.
pub fn encode_order(order: &Order, out: &mut Vec<u8>) {
    write_header(WireMessageType::Order, out);

    out.push(u8::from(order.side().is_buy()));
    out.extend_from_slice(&order.volume().to_be_bytes());

    match order.limit_price() {
        None => out.push(LimitPriceTag::None as u8),
        Some(price) => {
            out.push(LimitPriceTag::Some as u8);
            out.extend_from_slice(&price.to_be_bytes());
        }
    }

    match order.condition() {
        Condition::Unconditional => out.push(ConditionTag::Unconditional as u8),
        Condition::StopLoss { trigger } => {
            out.push(ConditionTag::StopLoss as u8);
            out.extend_from_slice(&trigger.to_be_bytes());
        }
        Condition::StopAndReverse { trigger } => {
            out.push(ConditionTag::StopAndReverse as u8);
            out.extend_from_slice(&trigger.to_be_bytes());
        }
    }

    out.extend_from_slice(&order.asset_id().to_be_bytes());
}

/// Decode a single order message.
///
/// This is the gateway-side counterpart of [`encode_order`]; the decoded
/// order is re-validated.
pub fn decode_order(buf: &[u8]) -> Result<Order, ProtocolError> {
    let mut r = Reader::new(buf);
    read_header(&mut r, WireMessageType::Order)?;

    let side = match r.u8()? {
        0 => Side::Sell,
        1 => Side::Buy,
        tag => return Err(ProtocolError::InvalidTag { field: "buy", tag }),
    };
    let volume = r.u64()?;

    let limit_tag = r.u8()?;
    let limit_price = match LimitPriceTag::from_u8(limit_tag) {
        Some(LimitPriceTag::None) => None,
        Some(LimitPriceTag::Some) => Some(r.f64()?),
        None => {
            return Err(ProtocolError::InvalidTag {
                field: "limitprice",
                tag: limit_tag,
            })
        }
    };

    let condition_tag = r.u8()?;
    let condition = match ConditionTag::from_u8(condition_tag) {
        Some(ConditionTag::Unconditional) => Condition::Unconditional,
        Some(ConditionTag::StopLoss) => Condition::StopLoss { trigger: r.f64()? },
        Some(ConditionTag::StopAndReverse) => Condition::StopAndReverse { trigger: r.f64()? },
        None => {
            return Err(ProtocolError::InvalidTag {
                field: "condition",
                tag: condition_tag,
            })
        }
    };

    let asset_id = r.u64()?;
    r.finish()?;

    Ok(Order::new(side, volume, limit_price, condition, asset_id)?)
}

// ============================================================================
// RESPONSE: gateway → client
// ============================================================================

/// Encode a response message listing `result`'s fills in order.
///
/// `out` is left untouched when the fill count does not fit the wire field.
pub fn encode_response(
    result: &TradeExecutionResult,
    out: &mut Vec<u8>,
) -> Result<(), ProtocolError> {
    let count = fill_count(result.len())?;
    write_header(WireMessageType::Response, out);

    out.extend_from_slice(&count.to_be_bytes());
    for fill in result {
        out.extend_from_slice(&fill.price.to_be_bytes());
        out.extend_from_slice(&fill.volume.to_be_bytes());
    }
    Ok(())
}

/// Decode a single response message into its ordered fills.
///
/// A response with zero fills decodes to an empty result.
pub fn decode_response(buf: &[u8]) -> Result<TradeExecutionResult, ProtocolError> {
    let mut r = Reader::new(buf);
    read_header(&mut r, WireMessageType::Response)?;

    let count = r.u32()? as usize;
    // Check before allocating so a bogus count cannot blow up memory.
    if r.remaining() < count.saturating_mul(FILL_LEN) {
        return Err(ProtocolError::Truncated);
    }

    let mut fills = Vec::with_capacity(count);
    for _ in 0..count {
        let price = r.f64()?;
        let volume = r.u64()?;
        fills.push(TradeFill { price, volume });
    }
    r.finish()?;

    Ok(TradeExecutionResult::new(fills))
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn fill_count(len: usize) -> Result<u32, ProtocolError> {
    u32::try_from(len).map_err(|_| ProtocolError::TooManyFills(len))
}

fn write_header(msg_type: WireMessageType, out: &mut Vec<u8>) {
    out.push(msg_type as u8);
    out.push(PROTOCOL_VERSION);
    out.extend_from_slice(&[0, 0]); // reserved
}

fn read_header(r: &mut Reader<'_>, expected: WireMessageType) -> Result<(), ProtocolError> {
    let header = r.take(HEADER_LEN)?;
    let msg_type = header[0];
    let version = header[1];

    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::VersionMismatch(version));
    }

    let got =
        WireMessageType::from_u8(msg_type).ok_or(ProtocolError::UnknownMessageType(msg_type))?;
    if got != expected {
        return Err(ProtocolError::UnexpectedMessageType { expected, got });
    }

    Ok(())
}

/// Forward-only cursor over a payload.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::Truncated);
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    fn u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, ProtocolError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, ProtocolError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    fn f64(&mut self) -> Result<f64, ProtocolError> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    fn finish(self) -> Result<(), ProtocolError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ProtocolError::TrailingBytes(n)),
        }
    }
}
