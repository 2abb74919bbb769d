use tally_crypto::CryptoError;
use tally_platform::PlatformError;
use tally_types::{ConversionError, Decimal, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("cannot sign or export without a private key loaded")]
    NoSigningKey,

    #[error("private key is already set")]
    KeyAlreadySet,

    #[error("address {0} cannot sign: no private key loaded and no server signer configured")]
    AddressCannotSign(String),

    #[error("insufficient funds: requested {requested} {asset_id}, available {available}")]
    InsufficientFunds {
        asset_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("private key does not belong to address {0}")]
    KeyMismatch(String),

    #[error("trade {0} has no transactions to sign")]
    EmptyTrade(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("amount conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
