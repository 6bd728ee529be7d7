//! craes-protocol
//!
//! Wire-level encoding/decoding for the CRAES gateway client.
//!
//! - [`binary_codec`] : binary order / response messages
//! - [`codec`]        : [`OrderCodec`] schema object and payload types
//! - [`csv_codec`]    : order file validation

pub mod wire_types;
pub mod binary_codec;
pub mod codec;
pub mod csv_codec;

pub use binary_codec::{
    ProtocolError,
    decode_order,
    encode_order,
    decode_response,
    encode_response,
};

pub use codec::{EncodedOrder, EncodedResponse, OrderCodec};
pub use csv_codec::{CsvError, FieldError};
