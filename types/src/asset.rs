//! Assets and their decimal metadata.
//!
//! Some asset ids are denominations of another asset: `wei` and `gwei` are
//! both `eth` on the platform, only scaled differently. Balance queries and
//! resource creation always go out under the primary asset id, while amounts
//! are converted with the denomination's own decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::{to_atomic, to_atomic_ceil, to_human, AtomicAmount};
use crate::error::ConversionError;
use crate::network::NetworkId;

/// Primary asset id of ether.
pub const ETH: &str = "eth";
/// Smallest ether denomination.
pub const WEI: &str = "wei";
/// Ether denomination with 9 decimals.
pub const GWEI: &str = "gwei";
/// USD Coin.
pub const USDC: &str = "usdc";

const WEI_DECIMALS: u32 = 0;
const GWEI_DECIMALS: u32 = 9;

/// An asset on a network, as described by the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub network_id: NetworkId,
    pub asset_id: String,
    pub decimals: u32,
}

impl Asset {
    pub fn new(network_id: NetworkId, asset_id: impl Into<String>, decimals: u32) -> Self {
        Self {
            network_id,
            asset_id: normalize_asset_id(&asset_id.into()),
            decimals,
        }
    }

    /// The asset id the platform knows a (possibly denominated) id by.
    pub fn primary_denomination(asset_id: &str) -> String {
        match normalize_asset_id(asset_id).as_str() {
            WEI | GWEI => ETH.to_string(),
            other => other.to_string(),
        }
    }

    /// Re-express this (primary) asset in the denomination `asset_id`.
    ///
    /// `eth` viewed as `gwei` keeps the network but uses 9 decimals; ids that
    /// are not denominations of this asset leave it unchanged.
    pub fn denominated_as(&self, asset_id: &str) -> Asset {
        let id = normalize_asset_id(asset_id);
        let decimals = match (self.asset_id.as_str(), id.as_str()) {
            (ETH, WEI) => WEI_DECIMALS,
            (ETH, GWEI) => GWEI_DECIMALS,
            _ => return self.clone(),
        };
        Asset {
            network_id: self.network_id,
            asset_id: id,
            decimals,
        }
    }

    pub fn to_atomic_amount(&self, human: Decimal) -> Result<AtomicAmount, ConversionError> {
        to_atomic(human, self.decimals)
    }

    /// Fewest atomic units covering `human` (rounded up).
    pub fn covering_atomic_amount(&self, human: Decimal) -> Result<AtomicAmount, ConversionError> {
        to_atomic_ceil(human, self.decimals)
    }

    pub fn from_atomic_amount(&self, atomic: AtomicAmount) -> Result<Decimal, ConversionError> {
        to_human(atomic, self.decimals)
    }
}

/// Asset ids are case-insensitive; the platform uses lowercase.
pub fn normalize_asset_id(asset_id: &str) -> String {
    asset_id.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn eth() -> Asset {
        Asset::new(NetworkId::BaseSepolia, "eth", 18)
    }

    #[test]
    fn denominations_map_to_eth() {
        assert_eq!(Asset::primary_denomination("wei"), "eth");
        assert_eq!(Asset::primary_denomination("GWEI"), "eth");
        assert_eq!(Asset::primary_denomination("usdc"), "usdc");
    }

    #[test]
    fn denominated_decimals() {
        assert_eq!(eth().denominated_as("wei").decimals, 0);
        assert_eq!(eth().denominated_as("gwei").decimals, 9);
        assert_eq!(eth().denominated_as("eth"), eth());
        assert_eq!(eth().denominated_as("usdc"), eth());
    }

    #[test]
    fn converts_with_own_decimals() {
        let usdc = Asset::new(NetworkId::BaseSepolia, "USDC", 6);
        assert_eq!(usdc.asset_id, "usdc");
        let amount = AtomicAmount::from(2_500_000u64);
        assert_eq!(usdc.to_atomic_amount(Decimal::from_str("2.5").unwrap()).unwrap(), amount);
        assert_eq!(usdc.from_atomic_amount(amount).unwrap(), Decimal::from_str("2.5").unwrap());
        assert_eq!(
            usdc.covering_atomic_amount(Decimal::from_str("2.5000001").unwrap()).unwrap(),
            AtomicAmount::from(2_500_001u64)
        );
    }

    #[test]
    fn gwei_balance_from_wei() {
        let gwei = eth().denominated_as("gwei");
        assert_eq!(gwei.from_atomic_amount(AtomicAmount::from(3_000_000_000u64)).unwrap(), Decimal::from(3));
    }
}
