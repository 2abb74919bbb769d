//! Optional, write-once local signing key.
//!
//! An address may be loaded without local custody and hydrated later. The key
//! lives in a write-once cell: it can be assigned exactly once and is never
//! replaced. Every sign/export goes through [`SigningKey`], so the presence
//! check lives in one place.

use once_cell::sync::OnceCell;
use std::fmt;
use tally_types::{PrivateKey, PublicKey, Signature};

use crate::error::WalletError;

/// Capability to sign payloads with a local private key, if one is loaded.
#[derive(Default)]
pub struct SigningKey {
    cell: OnceCell<PrivateKey>,
}

impl SigningKey {
    /// A signing key with no private key loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(key: PrivateKey) -> Self {
        Self {
            cell: OnceCell::with_value(key),
        }
    }

    pub fn from_option(key: Option<PrivateKey>) -> Self {
        key.map(Self::new).unwrap_or_default()
    }

    /// True iff a private key is loaded.
    pub fn can_sign(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Sign `keccak256(payload)` with the loaded key.
    pub fn sign(&self, payload: &[u8]) -> Result<Signature, WalletError> {
        let key = self.key()?;
        Ok(tally_crypto::sign_message(payload, key)?)
    }

    /// Raw private key material as lowercase hex.
    pub fn export(&self) -> Result<String, WalletError> {
        Ok(self.key()?.to_hex())
    }

    pub fn public_key(&self) -> Result<PublicKey, WalletError> {
        Ok(tally_crypto::public_from_private(self.key()?)?)
    }

    /// Load a key into an empty cell. Fails with [`WalletError::KeyAlreadySet`]
    /// if a key is present; the present key is left untouched.
    ///
    /// Concurrent first assignments race and exactly one of them wins.
    pub fn assign(&self, key: PrivateKey) -> Result<(), WalletError> {
        self.cell.set(key).map_err(|_rejected| WalletError::KeyAlreadySet)
    }

    fn key(&self) -> Result<&PrivateKey, WalletError> {
        self.cell.get().ok_or(WalletError::NoSigningKey)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("loaded", &self.can_sign())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_crypto::{generate_keypair, verify_signature};

    #[test]
    fn empty_key_cannot_sign() {
        let key = SigningKey::empty();
        assert!(!key.can_sign());
        assert!(matches!(key.sign(b"payload"), Err(WalletError::NoSigningKey)));
        assert!(matches!(key.export(), Err(WalletError::NoSigningKey)));
        assert!(matches!(key.public_key(), Err(WalletError::NoSigningKey)));
    }

    #[test]
    fn loaded_key_signs_verifiably() {
        let kp = generate_keypair();
        let key = SigningKey::new(PrivateKey(kp.private.0));
        let sig = key.sign(b"payload").unwrap();
        assert!(verify_signature(b"payload", &sig, &kp.public));
        assert_eq!(key.public_key().unwrap(), kp.public);
    }

    #[test]
    fn export_returns_hex_key() {
        let kp = generate_keypair();
        let key = SigningKey::new(PrivateKey(kp.private.0));
        assert_eq!(key.export().unwrap(), kp.private.to_hex());
    }

    #[test]
    fn assign_hydrates_empty_key() {
        let key = SigningKey::from_option(None);
        key.assign(generate_keypair().private).unwrap();
        assert!(key.can_sign());
    }

    #[test]
    fn second_assign_fails_and_keeps_original() {
        let original = generate_keypair();
        let key = SigningKey::new(PrivateKey(original.private.0));

        let err = key.assign(generate_keypair().private).unwrap_err();
        assert!(matches!(err, WalletError::KeyAlreadySet));
        assert_eq!(key.export().unwrap(), original.private.to_hex());
    }

    #[test]
    fn debug_never_prints_key() {
        let kp = generate_keypair();
        let hex = kp.private.to_hex();
        let key = SigningKey::new(kp.private);
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "SigningKey { loaded: true }");
        assert!(!rendered.contains(&hex));
    }
}
