//! Address and wallet identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// An on-chain address string as known to the platform (`0x…` on EVM networks).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(String);

impl AddressId {
    /// The prefix of EVM addresses.
    pub const EVM_PREFIX: &'static str = "0x";

    /// Create an address id, rejecting empty or whitespace-bearing input.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a well-formed 20-byte EVM address.
    pub fn is_evm(&self) -> bool {
        self.0
            .strip_prefix(Self::EVM_PREFIX)
            .is_some_and(|body| body.len() == 40 && body.bytes().all(|b| b.is_ascii_hexdigit()))
    }

    /// Case-insensitive comparison (EVM checksum casing is not significant).
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AddressId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of the platform wallet (custody group) owning an address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(TypesError::InvalidWallet(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_address() {
        assert!(AddressId::new("").is_err());
        assert!(AddressId::new("0x12 34").is_err());
    }

    #[test]
    fn detects_evm_addresses() {
        let addr = AddressId::new("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        assert!(addr.is_evm());
        assert!(!AddressId::new("0x1234").unwrap().is_evm());
        assert!(!AddressId::new("bc1qxyz").unwrap().is_evm());
    }

    #[test]
    fn matches_ignores_case() {
        let addr = AddressId::new("0xAbCdEf0000000000000000000000000000000001").unwrap();
        assert!(addr.matches("0xabcdef0000000000000000000000000000000001"));
        assert!(!addr.matches("0xabcdef0000000000000000000000000000000002"));
    }

    #[test]
    fn rejects_blank_wallet() {
        assert!(WalletId::new("  ").is_err());
        assert_eq!(WalletId::new("w-1").unwrap().as_str(), "w-1");
    }
}
