//! The address façade: one on-chain address, its optional local key, and
//! the operations it originates.

use std::fmt;
use std::sync::Arc;
use tally_platform::{AddressModel, FaucetTransaction, Platform, Trade, Transfer};
use tally_types::{AddressId, Decimal, NetworkId, PrivateKey, WalletId};

use crate::balance::{BalanceMap, BalanceOracle};
use crate::custody::{CustodyMode, Origin};
use crate::error::WalletError;
use crate::signing_key::SigningKey;
use crate::trade::TradeOrchestrator;
use crate::transfer::TransferOrchestrator;

/// Where a transfer goes: an address string or another [`Address`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination(String);

impl Destination {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Destination {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Destination {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&AddressId> for Destination {
    fn from(id: &AddressId) -> Self {
        Self(id.to_string())
    }
}

impl From<&Address> for Destination {
    fn from(address: &Address) -> Self {
        Self(address.id().to_string())
    }
}

/// An address in a platform wallet.
///
/// The local key is optional and write-once; see [`SigningKey`]. The custody
/// mode decides whether transfers and trades are signed here or left to the
/// platform's server signer.
pub struct Address {
    network_id: NetworkId,
    id: AddressId,
    wallet_id: WalletId,
    key: SigningKey,
    platform: Arc<dyn Platform>,
    custody: CustodyMode,
}

impl Address {
    pub fn new(
        network_id: NetworkId,
        id: AddressId,
        wallet_id: WalletId,
        key: Option<PrivateKey>,
        platform: Arc<dyn Platform>,
        custody: CustodyMode,
    ) -> Self {
        Self {
            network_id,
            id,
            wallet_id,
            key: SigningKey::from_option(key),
            platform,
            custody,
        }
    }

    /// Build an address from the platform's description of it. A supplied
    /// key must derive to the model's address.
    pub fn from_model(
        model: AddressModel,
        key: Option<PrivateKey>,
        platform: Arc<dyn Platform>,
        custody: CustodyMode,
    ) -> Result<Self, WalletError> {
        if let Some(key) = &key {
            ensure_key_matches(&model.address_id, key)?;
        }
        Ok(Self::new(
            model.network_id,
            model.address_id,
            model.wallet_id,
            key,
            platform,
            custody,
        ))
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub fn id(&self) -> &AddressId {
        &self.id
    }

    pub fn wallet_id(&self) -> &WalletId {
        &self.wallet_id
    }

    pub fn custody(&self) -> CustodyMode {
        self.custody
    }

    pub fn can_sign(&self) -> bool {
        self.key.can_sign()
    }

    /// The local private key as hex. Fails with
    /// [`WalletError::NoSigningKey`] when none is loaded.
    pub fn export(&self) -> Result<String, WalletError> {
        self.key.export()
    }

    /// Hydrate an address loaded without a key. Allowed exactly once; a
    /// second call fails with [`WalletError::KeyAlreadySet`] and keeps the
    /// original key.
    pub fn set_key(&self, key: PrivateKey) -> Result<(), WalletError> {
        if self.key.can_sign() {
            return Err(WalletError::KeyAlreadySet);
        }
        ensure_key_matches(&self.id, &key)?;
        self.key.assign(key)?;
        tracing::debug!(address = %self.id, "signing key loaded");
        Ok(())
    }

    pub async fn transfer(
        &self,
        amount: Decimal,
        asset_id: &str,
        destination: impl Into<Destination>,
    ) -> Result<Transfer, WalletError> {
        let destination = destination.into();
        TransferOrchestrator::new(self.platform.as_ref(), &self.key, self.custody)
            .execute(self.origin(), amount, asset_id, destination.as_str())
            .await
    }

    pub async fn trade(
        &self,
        amount: Decimal,
        from_asset_id: &str,
        to_asset_id: &str,
    ) -> Result<Trade, WalletError> {
        TradeOrchestrator::new(self.platform.as_ref(), &self.key, self.custody)
            .execute(self.origin(), amount, from_asset_id, to_asset_id)
            .await
    }

    pub async fn balance(&self, asset_id: &str) -> Result<Decimal, WalletError> {
        BalanceOracle::new(self.platform.as_ref())
            .balance_of(self.network_id, &self.id, asset_id)
            .await
    }

    pub async fn balances(&self) -> Result<BalanceMap, WalletError> {
        BalanceOracle::new(self.platform.as_ref())
            .all_balances(self.network_id, &self.id)
            .await
    }

    pub async fn transfers(&self) -> Result<Vec<Transfer>, WalletError> {
        Ok(self
            .platform
            .list_transfers(&self.wallet_id, &self.id)
            .await?)
    }

    pub async fn trades(&self) -> Result<Vec<Trade>, WalletError> {
        Ok(self.platform.list_trades(&self.wallet_id, &self.id).await?)
    }

    /// Request testnet funds for this address.
    pub async fn faucet(&self) -> Result<FaucetTransaction, WalletError> {
        let tx = self
            .platform
            .request_faucet_funds(self.network_id, &self.id)
            .await?;
        tracing::info!(address = %self.id, tx = %tx.transaction_hash, "faucet funds requested");
        Ok(tx)
    }

    fn origin(&self) -> Origin<'_> {
        Origin {
            network_id: self.network_id,
            address_id: &self.id,
            wallet_id: &self.wallet_id,
        }
    }
}

/// EVM addresses must be the ones `key` derives to; other address formats
/// are not checked.
fn ensure_key_matches(address_id: &AddressId, key: &PrivateKey) -> Result<(), WalletError> {
    if !address_id.is_evm() {
        return Ok(());
    }
    let public = tally_crypto::public_from_private(key)?;
    let derived = tally_crypto::derive_address(&public)?;
    if derived.matches(address_id.as_str()) {
        Ok(())
    } else {
        Err(WalletError::KeyMismatch(address_id.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address{{address_id: '{}', network_id: '{}', wallet_id: '{}'}}",
            self.id, self.network_id, self.wallet_id
        )
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_crypto::generate_keypair;
    use tally_nullables::NullPlatform;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    fn model() -> AddressModel {
        AddressModel {
            network_id: NetworkId::BaseSepolia,
            address_id: AddressId::new(KEY_ONE_ADDRESS).unwrap(),
            wallet_id: WalletId::new("wallet-1").unwrap(),
            public_key: None,
        }
    }

    fn platform() -> Arc<dyn Platform> {
        Arc::new(NullPlatform::new())
    }

    #[test]
    fn renders_identity_verbatim() {
        let address = Address::from_model(model(), None, platform(), CustodyMode::Local).unwrap();
        let expected = format!(
            "Address{{address_id: '{KEY_ONE_ADDRESS}', network_id: 'base_sepolia', wallet_id: 'wallet-1'}}"
        );
        assert_eq!(address.to_string(), expected);
        assert_eq!(format!("{address:?}"), expected);
    }

    #[test]
    fn from_model_accepts_matching_key() {
        let key = PrivateKey::from_hex(KEY_ONE).unwrap();
        let address = Address::from_model(model(), Some(key), platform(), CustodyMode::Local).unwrap();
        assert!(address.can_sign());
        assert_eq!(address.export().unwrap(), KEY_ONE);
    }

    #[test]
    fn from_model_rejects_foreign_key() {
        let err = Address::from_model(
            model(),
            Some(generate_keypair().private),
            platform(),
            CustodyMode::Local,
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::KeyMismatch(_)));
    }

    #[test]
    fn set_key_rejects_foreign_key_and_stays_empty() {
        let address = Address::from_model(model(), None, platform(), CustodyMode::Local).unwrap();
        let err = address.set_key(generate_keypair().private).unwrap_err();
        assert!(matches!(err, WalletError::KeyMismatch(_)));
        assert!(!address.can_sign());

        address.set_key(PrivateKey::from_hex(KEY_ONE).unwrap()).unwrap();
        assert!(address.can_sign());
    }

    #[test]
    fn destination_from_address() {
        let address = Address::from_model(model(), None, platform(), CustodyMode::Local).unwrap();
        assert_eq!(Destination::from(&address).as_str(), KEY_ONE_ADDRESS);
        assert_eq!(Destination::from("0xdef").as_str(), "0xdef");
    }
}
