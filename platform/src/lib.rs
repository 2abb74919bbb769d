//! Platform boundary for Tally.
//!
//! Everything the wallet core knows about the hosted custody-and-trading
//! platform goes through the [`Platform`] trait:
//! - balance queries (single asset and all assets)
//! - transfer and trade resource creation and broadcast
//! - listing of historical transfers and trades
//! - testnet faucet requests
//!
//! [`PlatformClient`] implements the trait over the platform's REST API.

pub mod api;
pub mod client;
pub mod error;
pub mod model;
pub mod pagination;

pub use api::Platform;
pub use client::PlatformClient;
pub use error::PlatformError;
pub use model::{
    AddressModel, Balance, FaucetTransaction, Trade, TradeRequest, Transaction,
    TransactionStatus, Transfer, TransferRequest,
};
