//! Wallet core library for Tally.
//!
//! Provides the client side of a platform-hosted address:
//! - Optional, write-once local signing key ([`SigningKey`])
//! - Balance queries with asset-decimal conversion ([`BalanceOracle`])
//! - Transfer and trade orchestration under local or server-signer custody
//! - The [`Address`] façade tying them together
//! - Client configuration ([`ClientConfig`])

pub mod address;
pub mod balance;
pub mod config;
pub mod custody;
pub mod error;
pub mod signing_key;
pub mod trade;
pub mod transfer;

pub use address::{Address, Destination};
pub use balance::{BalanceMap, BalanceOracle, BalanceSnapshot};
pub use config::ClientConfig;
pub use custody::{ensure_authority, CustodyMode, Origin};
pub use error::WalletError;
pub use signing_key::SigningKey;
pub use trade::TradeOrchestrator;
pub use transfer::TransferOrchestrator;
