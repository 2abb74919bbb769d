//! Resource models exchanged with the platform.
//!
//! The platform owns the lifecycle of transfers and trades; these types are
//! snapshots of its resources as returned by the last call.

use serde::{Deserialize, Serialize};
use tally_types::{
    parse_atomic, AddressId, Asset, AtomicAmount, ConversionError, Decimal, NetworkId, PublicKey,
    Signature, WalletId,
};

use crate::error::PlatformError;

/// An address as described by the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressModel {
    pub network_id: NetworkId,
    pub address_id: AddressId,
    pub wallet_id: WalletId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKey>,
}

/// A balance of one asset held by an address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Atomic amount as a base-10 integer string.
    pub amount: String,
    pub asset: Asset,
}

impl Balance {
    pub fn new(atomic: AtomicAmount, asset: Asset) -> Self {
        Self {
            amount: atomic.to_string(),
            asset,
        }
    }

    pub fn atomic(&self) -> Result<AtomicAmount, ConversionError> {
        parse_atomic(&self.amount)
    }

    /// Balance in the asset's human denomination.
    pub fn human(&self) -> Result<Decimal, ConversionError> {
        self.asset.from_atomic_amount(self.atomic()?)
    }
}

/// Lifecycle state of a single on-chain transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Signed,
    Broadcast,
    Complete,
    Failed,
}

/// An on-chain transaction that is part of a transfer or trade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub network_id: NetworkId,
    pub from_address_id: AddressId,
    /// Hex-encoded unsigned payload to sign.
    pub unsigned_payload: String,
    /// Hex-encoded signature, once signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Bytes of the unsigned payload (the message that gets signed).
    pub fn payload_bytes(&self) -> Result<Vec<u8>, PlatformError> {
        let raw = self
            .unsigned_payload
            .strip_prefix("0x")
            .unwrap_or(&self.unsigned_payload);
        hex::decode(raw).map_err(|e| PlatformError::Decode(format!("unsigned payload: {e}")))
    }

    /// Record a local signature over the unsigned payload.
    pub fn attach_signature(&mut self, signature: &Signature) {
        self.signed_payload = Some(signature.to_hex());
        self.status = TransactionStatus::Signed;
    }

    pub fn is_signed(&self) -> bool {
        self.signed_payload.is_some()
    }
}

/// A transfer of one asset from an address to a destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(rename = "transfer_id")]
    pub id: String,
    pub network_id: NetworkId,
    pub wallet_id: WalletId,
    pub address_id: AddressId,
    pub destination: String,
    pub asset_id: String,
    /// Atomic amount as a base-10 integer string.
    pub amount: String,
    pub transaction: Transaction,
}

impl Transfer {
    pub fn status(&self) -> TransactionStatus {
        self.transaction.status
    }

    pub fn is_signed(&self) -> bool {
        self.transaction.is_signed()
    }
}

/// A trade of one asset for another, made of one or more transactions
/// (e.g. an approval followed by the swap) in platform-declared order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(rename = "trade_id")]
    pub id: String,
    pub network_id: NetworkId,
    pub wallet_id: WalletId,
    pub address_id: AddressId,
    pub from_asset_id: String,
    pub to_asset_id: String,
    pub from_amount: String,
    #[serde(default)]
    pub to_amount: String,
    pub transactions: Vec<Transaction>,
}

impl Trade {
    /// Status of the trade: the status of its last transaction.
    pub fn status(&self) -> TransactionStatus {
        self.transactions
            .last()
            .map(|tx| tx.status)
            .unwrap_or(TransactionStatus::Pending)
    }

    /// True only when every constituent transaction carries a signature.
    pub fn is_fully_signed(&self) -> bool {
        !self.transactions.is_empty() && self.transactions.iter().all(Transaction::is_signed)
    }
}

/// Request to create a transfer. Built per call and consumed once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    #[serde(skip)]
    pub address_id: AddressId,
    #[serde(skip)]
    pub wallet_id: WalletId,
    pub network_id: NetworkId,
    pub asset_id: String,
    /// Atomic amount as a base-10 integer string.
    pub amount: String,
    pub destination: String,
}

/// Request to create a trade. Built per call and consumed once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TradeRequest {
    #[serde(skip)]
    pub address_id: AddressId,
    #[serde(skip)]
    pub wallet_id: WalletId,
    #[serde(skip)]
    pub network_id: NetworkId,
    pub from_asset_id: String,
    pub to_asset_id: String,
    /// Atomic amount as a base-10 integer string.
    pub amount: String,
}

/// Result of a testnet faucet request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetTransaction {
    pub transaction_hash: String,
}
