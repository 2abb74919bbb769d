//! Custody mode and the signing-authority check.

use serde::{Deserialize, Serialize};
use tally_types::{AddressId, NetworkId, WalletId};

use crate::error::WalletError;
use crate::signing_key::SigningKey;

/// Who signs transactions originated by an address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustodyMode {
    /// Transactions are signed with the address's local key and broadcast by
    /// this process.
    #[default]
    Local,
    /// The platform's remote server signer signs and broadcasts; resources
    /// are returned pending.
    ServerSigner,
}

impl CustodyMode {
    pub fn from_server_signer_flag(use_server_signer: bool) -> Self {
        if use_server_signer {
            Self::ServerSigner
        } else {
            Self::Local
        }
    }

    pub fn uses_server_signer(&self) -> bool {
        matches!(self, Self::ServerSigner)
    }
}

/// Identity of the address originating a transfer or trade.
#[derive(Clone, Copy, Debug)]
pub struct Origin<'a> {
    pub network_id: NetworkId,
    pub address_id: &'a AddressId,
    pub wallet_id: &'a WalletId,
}

/// Fail with [`WalletError::AddressCannotSign`] unless the address has a
/// local key or signing is delegated to the server signer.
pub fn ensure_authority(
    key: &SigningKey,
    custody: CustodyMode,
    address_id: &AddressId,
) -> Result<(), WalletError> {
    if key.can_sign() || custody.uses_server_signer() {
        Ok(())
    } else {
        Err(WalletError::AddressCannotSign(address_id.to_string()))
    }
}
