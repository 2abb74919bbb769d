//! secp256k1 key generation.

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use tally_types::{KeyPair, PrivateKey, PublicKey};

use crate::error::CryptoError;

/// Generate a new secp256k1 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::random(&mut OsRng);
    let private = PrivateKey(signing_key.to_bytes().into());
    let public = encode_public(signing_key.verifying_key());
    KeyPair { public, private }
}

/// Derive the compressed public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let signing_key = signing_key(private)?;
    Ok(encode_public(signing_key.verifying_key()))
}

pub(crate) fn signing_key(private: &PrivateKey) -> Result<SigningKey, CryptoError> {
    SigningKey::from_slice(private.as_bytes()).map_err(|_| CryptoError::InvalidPrivateKey)
}

pub(crate) fn encode_public(verifying_key: &VerifyingKey) -> PublicKey {
    let point = verifying_key.to_encoded_point(true);
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(point.as_bytes());
    PublicKey(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = generate_keypair();
        assert_ne!(kp.private.0, [0u8; 32]);
        assert!(matches!(kp.public.0[0], 0x02 | 0x03));
    }

    #[test]
    fn public_from_private_is_deterministic() {
        let kp = generate_keypair();
        let pub2 = public_from_private(&kp.private).unwrap();
        assert_eq!(kp.public, pub2);
    }

    #[test]
    fn zero_scalar_is_rejected() {
        assert_eq!(
            public_from_private(&PrivateKey([0u8; 32])),
            Err(CryptoError::InvalidPrivateKey)
        );
    }

    #[test]
    fn different_keys_produce_different_publics() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let mut two = [0u8; 32];
        two[31] = 2;
        assert_ne!(
            public_from_private(&PrivateKey(one)).unwrap(),
            public_from_private(&PrivateKey(two)).unwrap()
        );
    }
}
