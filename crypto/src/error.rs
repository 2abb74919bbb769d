use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid private key: not a valid secp256k1 scalar")]
    InvalidPrivateKey,

    #[error("invalid public key encoding")]
    InvalidPublicKey,

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("signing failed: {0}")]
    Signing(String),
}
