//! Recoverable secp256k1 signing over Keccak-256 digests.

use k256::ecdsa::{RecoveryId, VerifyingKey};
use tally_types::{PrivateKey, PublicKey, Signature};

use crate::error::CryptoError;
use crate::hash::keccak256;
use crate::keys::{encode_public, signing_key};

/// Sign `keccak256(message)` with a private key, returning `r ‖ s ‖ v`.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let signing_key = signing_key(private_key)?;
    let digest = keccak256(message);
    let (sig, recovery_id) = signing_key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = recovery_id.to_byte();
    Ok(Signature(out))
}

/// Recover the signer's public key from a message and signature.
pub fn recover_public_key(message: &[u8], signature: &Signature) -> Result<PublicKey, CryptoError> {
    let digest = keccak256(message);
    let sig = k256::ecdsa::Signature::from_slice(&signature.0[..64])
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(signature.0[64])
        .ok_or_else(|| CryptoError::InvalidSignature("bad recovery id".into()))?;
    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(encode_public(&verifying_key))
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature recovers to `public_key`, `false` otherwise.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    recover_public_key(message, signature).is_ok_and(|recovered| &recovered == public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;

    #[test]
    fn sign_and_verify() {
        let kp = generate_keypair();
        let msg = b"unsigned transfer payload";
        let sig = sign_message(msg, &kp.private).unwrap();
        assert!(verify_signature(msg, &sig, &kp.public));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = generate_keypair();
        let sig = sign_message(b"correct message", &kp.private).unwrap();
        assert!(!verify_signature(b"wrong message", &sig, &kp.public));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        let msg = b"test";
        let sig = sign_message(msg, &kp1.private).unwrap();
        assert!(!verify_signature(msg, &sig, &kp2.public));
    }

    #[test]
    fn signature_deterministic() {
        let kp = generate_keypair();
        let sig1 = sign_message(b"deterministic", &kp.private).unwrap();
        let sig2 = sign_message(b"deterministic", &kp.private).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn recovers_signer() {
        let kp = generate_keypair();
        let sig = sign_message(b"", &kp.private).unwrap();
        assert_eq!(recover_public_key(b"", &sig).unwrap(), kp.public);
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let sig = Signature([0u8; 65]);
        assert!(recover_public_key(b"test", &sig).is_err());
    }
}
