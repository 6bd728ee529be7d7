//! Schema object and opaque payload types.
//!
//! [`OrderCodec`] is constructed explicitly and handed to whoever needs to
//! encode orders or decode responses. It holds no mutable state, so one
//! value can be shared freely.

use bytes::Bytes;
use craes_core::{Order, TradeExecutionResult};

use crate::binary_codec::{self, ProtocolError};

/// Binary payload of one order message. Cheap to clone, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOrder(Bytes);

impl EncodedOrder {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hand the payload to the transport.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Binary payload received in reply to one [`EncodedOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResponse(Bytes);

impl EncodedResponse {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Bytes> for EncodedResponse {
    fn from(bytes: Bytes) -> Self {
        EncodedResponse(bytes)
    }
}

impl From<Vec<u8>> for EncodedResponse {
    fn from(bytes: Vec<u8>) -> Self {
        EncodedResponse(Bytes::from(bytes))
    }
}

/// The CRAES message schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCodec {
    _private: (),
}

impl OrderCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one order. Deterministic: equal orders give equal bytes.
    pub fn encode(&self, order: &Order) -> EncodedOrder {
        let mut out = Vec::with_capacity(64);
        binary_codec::encode_order(order, &mut out);
        EncodedOrder(Bytes::from(out))
    }

    pub fn encode_batch(&self, orders: &[Order]) -> Vec<EncodedOrder> {
        orders.iter().map(|o| self.encode(o)).collect()
    }

    pub fn decode(&self, response: &EncodedResponse) -> Result<TradeExecutionResult, ProtocolError> {
        binary_codec::decode_response(response.as_bytes())
    }

    /// Decode every response in order; fails on the first malformed one
    /// with its index.
    pub fn decode_batch(
        &self,
        responses: &[EncodedResponse],
    ) -> Result<Vec<TradeExecutionResult>, (usize, ProtocolError)> {
        responses
            .iter()
            .enumerate()
            .map(|(i, r)| self.decode(r).map_err(|e| (i, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craes_core::{Condition, Side, TradeFill};

    #[test]
    fn encoding_is_deterministic() {
        let codec = OrderCodec::new();
        let orders = vec![
            Order::new(Side::Buy, 3, Some(5.0), Condition::Unconditional, 1).unwrap(),
            Order::new(Side::Sell, 10, Some(1.0), Condition::StopLoss { trigger: 2.0 }, 2)
                .unwrap(),
        ];

        assert_eq!(codec.encode_batch(&orders), codec.encode_batch(&orders));
        assert_eq!(
            OrderCodec::new().encode(&orders[1]),
            codec.encode(&orders[1])
        );
    }

    #[test]
    fn decode_batch_reports_failing_index() {
        let codec = OrderCodec::new();
        let mut good = Vec::new();
        binary_codec::encode_response(
            &TradeExecutionResult::new(vec![TradeFill::new(1.0, 1)]),
            &mut good,
        )
        .unwrap();

        let responses = vec![
            EncodedResponse::from(good.clone()),
            EncodedResponse::from(vec![2u8, 1]),
        ];

        let (index, err) = codec.decode_batch(&responses).unwrap_err();
        assert_eq!(index, 1);
        assert_eq!(err, ProtocolError::Truncated);

        let ok = codec
            .decode_batch(&[EncodedResponse::from(good)])
            .unwrap();
        assert_eq!(ok[0].fills(), &[TradeFill::new(1.0, 1)]);
    }
}
