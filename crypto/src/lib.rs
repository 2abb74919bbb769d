//! Cryptographic primitives for Tally.
//!
//! - **secp256k1 ECDSA** (recoverable) for signing transaction payloads
//! - **Keccak-256** for payload digests and address derivation
//! - EVM address derivation (`0x` + last 20 bytes of the public key hash)

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_address;
pub use error::CryptoError;
pub use hash::keccak256;
pub use keys::{generate_keypair, public_from_private};
pub use sign::{recover_public_key, sign_message, verify_signature};
