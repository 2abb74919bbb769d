//! The collaborator boundary between the wallet core and the platform.

use async_trait::async_trait;
use tally_types::{AddressId, NetworkId, WalletId};

use crate::error::PlatformError;
use crate::model::{
    Balance, FaucetTransaction, Trade, TradeRequest, Transfer, TransferRequest,
};

/// Operations the hosted platform provides to an address.
///
/// Implementations must not retry or translate failures; errors surface to
/// the caller exactly as the platform reported them. Broadcast is idempotent
/// per resource id on the platform side.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Balance of one (primary-denomination) asset held by an address.
    async fn get_balance(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
    ) -> Result<Balance, PlatformError>;

    /// Balances of every asset held by an address.
    async fn list_balances(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<Vec<Balance>, PlatformError>;

    /// Create a pending transfer resource.
    async fn create_transfer(&self, request: TransferRequest) -> Result<Transfer, PlatformError>;

    /// Submit a locally signed transfer for broadcast.
    async fn broadcast_transfer(&self, transfer: &Transfer) -> Result<Transfer, PlatformError>;

    /// Create a pending trade resource.
    async fn create_trade(&self, request: TradeRequest) -> Result<Trade, PlatformError>;

    /// Submit a locally signed trade (every transaction signed) for broadcast.
    async fn broadcast_trade(&self, trade: &Trade) -> Result<Trade, PlatformError>;

    /// All transfers originated by an address.
    async fn list_transfers(
        &self,
        wallet_id: &WalletId,
        address_id: &AddressId,
    ) -> Result<Vec<Transfer>, PlatformError>;

    /// All trades originated by an address.
    async fn list_trades(
        &self,
        wallet_id: &WalletId,
        address_id: &AddressId,
    ) -> Result<Vec<Trade>, PlatformError>;

    /// Ask the platform faucet to fund an address on a test network.
    async fn request_faucet_funds(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<FaucetTransaction, PlatformError>;
}
