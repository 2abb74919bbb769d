//! Error types shared across crates.

use thiserror::Error;

/// Errors raised while parsing or validating fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown network id: {0}")]
    UnknownNetwork(String),

    #[error("invalid address id: {0}")]
    InvalidAddress(String),

    #[error("invalid wallet id: {0}")]
    InvalidWallet(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}

/// Errors raised converting between human and atomic amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("asset decimals {0} exceed the supported precision")]
    DecimalsTooLarge(u32),

    #[error("amount {amount} with {decimals} decimals overflows the atomic range")]
    Overflow { amount: String, decimals: u32 },

    #[error("negative amount {0} has no atomic representation")]
    Negative(String),

    #[error("invalid atomic amount: {0}")]
    InvalidAtomic(String),
}
