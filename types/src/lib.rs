//! Fundamental types for Tally.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! network ids, address and wallet ids, assets with their decimal metadata,
//! atomic/human amount conversion, and key/signature newtypes.

pub mod address;
pub mod amount;
pub mod asset;
pub mod error;
pub mod keys;
pub mod network;

pub use address::{AddressId, WalletId};
pub use amount::{parse_atomic, to_atomic, to_atomic_ceil, to_human, AtomicAmount};
pub use asset::Asset;
pub use error::{ConversionError, TypesError};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;

pub use ethers::types::U256;
pub use rust_decimal::Decimal;
