//! Network identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Identifies which chain network an address lives on.
///
/// The platform speaks the hyphenated wire form (`base-sepolia`); callers
/// usually see the underscored symbol (`base_sepolia`). Both parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    BaseSepolia,
    BaseMainnet,
    EthereumHolesky,
    EthereumMainnet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 4] = [
        Self::BaseSepolia,
        Self::BaseMainnet,
        Self::EthereumHolesky,
        Self::EthereumMainnet,
    ];

    /// Wire form used in platform requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseSepolia => "base-sepolia",
            Self::BaseMainnet => "base-mainnet",
            Self::EthereumHolesky => "ethereum-holesky",
            Self::EthereumMainnet => "ethereum-mainnet",
        }
    }

    /// Human-facing symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::BaseSepolia => "base_sepolia",
            Self::BaseMainnet => "base_mainnet",
            Self::EthereumHolesky => "ethereum_holesky",
            Self::EthereumMainnet => "ethereum_mainnet",
        }
    }

    /// Whether the network is a test network (faucet-eligible).
    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::BaseSepolia | Self::EthereumHolesky)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == normalized)
            .ok_or_else(|| TypesError::UnknownNetwork(s.to_string()))
    }
}
