//! Balance queries against the platform.
//!
//! Every call re-queries the platform; nothing is cached. A
//! [`BalanceSnapshot`] keeps the asset metadata the balance was converted
//! with, so a sufficiency check and the atomic amount submitted afterwards
//! share one decimals snapshot.

use std::collections::BTreeMap;
use std::fmt;
use tally_platform::Platform;
use tally_types::{AddressId, Asset, AtomicAmount, Decimal, NetworkId};

use crate::error::WalletError;

/// A balance at one point in time, with the asset metadata used to convert it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// The asset in the requested denomination.
    pub asset: Asset,
    pub atomic: AtomicAmount,
}

impl BalanceSnapshot {
    /// The balance in the asset's human denomination.
    pub fn human(&self) -> Result<Decimal, WalletError> {
        Ok(self.asset.from_atomic_amount(self.atomic)?)
    }

    /// Check `amount` is covered and convert it with this snapshot's decimals.
    ///
    /// Returns the atomic amount to submit. Any `amount` above the balance is
    /// rejected, including amounts that would round down to it.
    pub fn require(&self, amount: Decimal) -> Result<AtomicAmount, WalletError> {
        if self.asset.covering_atomic_amount(amount)? > self.atomic {
            return Err(WalletError::InsufficientFunds {
                asset_id: self.asset.asset_id.clone(),
                requested: amount,
                available: self.human()?,
            });
        }
        let atomic = self.asset.to_atomic_amount(amount)?;
        if atomic.is_zero() {
            return Err(WalletError::InvalidAmount(format!(
                "{amount} {} is below the smallest unit",
                self.asset.asset_id
            )));
        }
        Ok(atomic)
    }
}

/// Human-denominated balances keyed by asset id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceMap(BTreeMap<String, Decimal>);

impl BalanceMap {
    pub fn get(&self, asset_id: &str) -> Option<Decimal> {
        self.0.get(asset_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(id, amount)| (id.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BalanceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .0
            .iter()
            .map(|(id, amount)| format!("{id}: {amount}"))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Queries balances through the platform.
pub struct BalanceOracle<'a> {
    platform: &'a dyn Platform,
}

impl<'a> BalanceOracle<'a> {
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self { platform }
    }

    /// Fetch the balance of `asset_id` together with the decimals it was
    /// converted with. Denominations (`wei`, `gwei`) are queried under their
    /// primary asset and converted with their own decimals.
    pub async fn snapshot(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
    ) -> Result<BalanceSnapshot, WalletError> {
        let primary = Asset::primary_denomination(asset_id);
        let balance = self
            .platform
            .get_balance(network_id, address_id, &primary)
            .await?;

        let atomic = balance.atomic()?;
        let asset = balance.asset.denominated_as(asset_id);
        tracing::debug!(
            network = %network_id,
            address = %address_id,
            asset = %asset.asset_id,
            decimals = asset.decimals,
            %atomic,
            "balance fetched"
        );

        Ok(BalanceSnapshot { asset, atomic })
    }

    /// Current human-denominated balance of `asset_id`.
    pub async fn balance_of(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
    ) -> Result<Decimal, WalletError> {
        self.snapshot(network_id, address_id, asset_id).await?.human()
    }

    /// Every asset balance held by the address.
    pub async fn all_balances(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<BalanceMap, WalletError> {
        let balances = self.platform.list_balances(network_id, address_id).await?;
        let mut map = BTreeMap::new();
        for balance in balances {
            map.insert(balance.asset.asset_id.clone(), balance.human()?);
        }
        Ok(BalanceMap(map))
    }
}
