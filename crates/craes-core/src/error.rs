//! Error types for the order domain.
//!
//! These are invariant violations caught when an [`Order`](crate::Order)
//! is constructed. Row parsing and wire decoding wrap them with their own
//! context.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("volume must be at least 1")]
    NonPositiveVolume,

    #[error("asset id must be at least 1")]
    NonPositiveAssetId,

    /// Price or trigger below zero.
    #[error("{field} must not be negative, got {value}")]
    NegativePrice { field: &'static str, value: f64 },

    /// NaN or infinity in a price or trigger.
    #[error("{field} must be a finite number")]
    NonFinitePrice { field: &'static str },
}
