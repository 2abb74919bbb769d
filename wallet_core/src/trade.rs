//! Trade orchestration.
//!
//! A trade carries several transactions (typically an approval followed by
//! the swap). With local custody they are signed strictly in the order the
//! platform declared; every signature is produced before any is attached, so
//! a signing failure leaves the trade untouched and never returns a
//! partially signed trade.

use tally_platform::{Platform, Trade, TradeRequest};
use tally_types::{Asset, Decimal, Signature};

use crate::balance::BalanceOracle;
use crate::custody::{ensure_authority, CustodyMode, Origin};
use crate::error::WalletError;
use crate::signing_key::SigningKey;
use crate::transfer::ensure_positive;

pub struct TradeOrchestrator<'a> {
    platform: &'a dyn Platform,
    key: &'a SigningKey,
    custody: CustodyMode,
}

impl<'a> TradeOrchestrator<'a> {
    pub fn new(platform: &'a dyn Platform, key: &'a SigningKey, custody: CustodyMode) -> Self {
        Self {
            platform,
            key,
            custody,
        }
    }

    /// Trade `amount` of `from_asset_id` for `to_asset_id`.
    pub async fn execute(
        &self,
        origin: Origin<'_>,
        amount: Decimal,
        from_asset_id: &str,
        to_asset_id: &str,
    ) -> Result<Trade, WalletError> {
        ensure_authority(self.key, self.custody, origin.address_id)?;
        ensure_positive(amount, from_asset_id)?;

        let snapshot = BalanceOracle::new(self.platform)
            .snapshot(origin.network_id, origin.address_id, from_asset_id)
            .await?;
        let atomic = snapshot.require(amount)?;

        let request = TradeRequest {
            address_id: origin.address_id.clone(),
            wallet_id: origin.wallet_id.clone(),
            network_id: origin.network_id,
            from_asset_id: Asset::primary_denomination(from_asset_id),
            to_asset_id: Asset::primary_denomination(to_asset_id),
            amount: atomic.to_string(),
        };
        tracing::debug!(
            address = %origin.address_id,
            from = %request.from_asset_id,
            to = %request.to_asset_id,
            amount = %request.amount,
            "creating trade"
        );
        let mut trade = self.platform.create_trade(request).await?;
        tracing::info!(
            trade = %trade.id,
            transactions = trade.transactions.len(),
            "trade created"
        );

        if self.custody.uses_server_signer() {
            tracing::debug!(trade = %trade.id, "left pending for server signer");
            return Ok(trade);
        }

        self.sign_all(&mut trade)?;
        let broadcast = self.platform.broadcast_trade(&trade).await?;
        tracing::info!(trade = %broadcast.id, status = ?broadcast.status(), "trade broadcast");
        Ok(broadcast)
    }

    fn sign_all(&self, trade: &mut Trade) -> Result<(), WalletError> {
        if trade.transactions.is_empty() {
            return Err(WalletError::EmptyTrade(trade.id.clone()));
        }

        let signatures = trade
            .transactions
            .iter()
            .map(|tx| self.key.sign(&tx.payload_bytes()?))
            .collect::<Result<Vec<Signature>, WalletError>>()?;

        for (tx, signature) in trade.transactions.iter_mut().zip(&signatures) {
            tx.attach_signature(signature);
        }
        tracing::debug!(trade = %trade.id, signed = signatures.len(), "trade signed");
        Ok(())
    }
}
