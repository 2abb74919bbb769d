//! Transfer orchestration: authority check, sufficiency check, creation,
//! then local signing and broadcast or hand-off to the server signer.

use tally_platform::{Platform, Transfer, TransferRequest};
use tally_types::{Asset, Decimal};

use crate::balance::BalanceOracle;
use crate::custody::{ensure_authority, CustodyMode, Origin};
use crate::error::WalletError;
use crate::signing_key::SigningKey;

/// Reject zero and negative amounts before anything is queried.
pub(crate) fn ensure_positive(amount: Decimal, asset_id: &str) -> Result<(), WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::InvalidAmount(format!(
            "{amount} {asset_id}: amount must be positive"
        )));
    }
    Ok(())
}

pub struct TransferOrchestrator<'a> {
    platform: &'a dyn Platform,
    key: &'a SigningKey,
    custody: CustodyMode,
}

impl<'a> TransferOrchestrator<'a> {
    pub fn new(platform: &'a dyn Platform, key: &'a SigningKey, custody: CustodyMode) -> Self {
        Self {
            platform,
            key,
            custody,
        }
    }

    /// Transfer `amount` of `asset_id` from `origin` to `destination`.
    ///
    /// Fails before any platform call when the address cannot sign, and
    /// before resource creation when the balance does not cover `amount`.
    /// With local custody the returned transfer is signed and broadcast;
    /// with the server signer it is returned as created.
    ///
    /// The balance check and the broadcast are not atomic: a concurrent spend
    /// from the same address can still make the broadcast fail.
    pub async fn execute(
        &self,
        origin: Origin<'_>,
        amount: Decimal,
        asset_id: &str,
        destination: &str,
    ) -> Result<Transfer, WalletError> {
        ensure_authority(self.key, self.custody, origin.address_id)?;
        ensure_positive(amount, asset_id)?;

        let snapshot = BalanceOracle::new(self.platform)
            .snapshot(origin.network_id, origin.address_id, asset_id)
            .await?;
        let atomic = snapshot.require(amount)?;

        let request = TransferRequest {
            address_id: origin.address_id.clone(),
            wallet_id: origin.wallet_id.clone(),
            network_id: origin.network_id,
            asset_id: Asset::primary_denomination(asset_id),
            amount: atomic.to_string(),
            destination: destination.to_string(),
        };
        tracing::debug!(
            address = %origin.address_id,
            asset = %request.asset_id,
            amount = %request.amount,
            destination,
            "creating transfer"
        );
        let mut transfer = self.platform.create_transfer(request).await?;
        tracing::info!(transfer = %transfer.id, network = %origin.network_id, "transfer created");

        if self.custody.uses_server_signer() {
            tracing::debug!(transfer = %transfer.id, "left pending for server signer");
            return Ok(transfer);
        }

        let payload = transfer.transaction.payload_bytes()?;
        let signature = self.key.sign(&payload)?;
        transfer.transaction.attach_signature(&signature);

        let broadcast = self.platform.broadcast_transfer(&transfer).await?;
        tracing::info!(
            transfer = %broadcast.id,
            status = ?broadcast.status(),
            "transfer broadcast"
        );
        Ok(broadcast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tally_crypto::generate_keypair;
    use tally_nullables::{NullPlatform, PlatformCall};
    use tally_platform::TransactionStatus;
    use tally_types::{AddressId, NetworkId, WalletId};

    fn ids() -> (AddressId, WalletId) {
        (
            AddressId::new("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap(),
            WalletId::new("wallet-1").unwrap(),
        )
    }

    fn funded() -> NullPlatform {
        let platform = NullPlatform::new();
        platform.set_balance(NetworkId::BaseSepolia, &ids().0, "eth", Decimal::from(10));
        platform
    }

    #[tokio::test]
    async fn rejects_non_positive_amount_before_querying() {
        let platform = funded();
        let key = SigningKey::new(generate_keypair().private);
        let (address, wallet) = ids();
        let origin = Origin {
            network_id: NetworkId::BaseSepolia,
            address_id: &address,
            wallet_id: &wallet,
        };
        let err = TransferOrchestrator::new(&platform, &key, CustodyMode::Local)
            .execute(origin, Decimal::ZERO, "eth", "0xdef")
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn submits_denominated_amount_under_primary_asset() {
        let platform = funded();
        let key = SigningKey::new(generate_keypair().private);
        let (address, wallet) = ids();
        let origin = Origin {
            network_id: NetworkId::BaseSepolia,
            address_id: &address,
            wallet_id: &wallet,
        };
        let transfer = TransferOrchestrator::new(&platform, &key, CustodyMode::Local)
            .execute(origin, Decimal::from_str("2.5").unwrap(), "gwei", "0xdef")
            .await
            .unwrap();
        assert_eq!(transfer.asset_id, "eth");
        assert_eq!(transfer.amount, "2500000000");
        assert_eq!(transfer.status(), TransactionStatus::Broadcast);
    }

    #[tokio::test]
    async fn platform_errors_after_creation_propagate() {
        let platform = funded();
        platform.fail_broadcasts("node unavailable");
        let key = SigningKey::new(generate_keypair().private);
        let (address, wallet) = ids();
        let origin = Origin {
            network_id: NetworkId::BaseSepolia,
            address_id: &address,
            wallet_id: &wallet,
        };
        let err = TransferOrchestrator::new(&platform, &key, CustodyMode::Local)
            .execute(origin, Decimal::ONE, "eth", "0xdef")
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::Platform(_)));
        assert_eq!(platform.count(|c| matches!(c, PlatformCall::CreateTransfer(_))), 1);
    }
}
