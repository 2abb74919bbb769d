//! EVM address derivation from public keys.
//!
//! Address format: `0x` + last 20 bytes of Keccak-256(uncompressed public key
//! without the `0x04` tag), rendered with the EIP-55 mixed-case checksum.

use k256::ecdsa::VerifyingKey;
use tally_types::{AddressId, PublicKey};

use crate::error::CryptoError;
use crate::hash::keccak256;

/// Derive the checksummed EVM address of a compressed public key.
pub fn derive_address(public_key: &PublicKey) -> Result<AddressId, CryptoError> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(public_key.as_bytes()).map_err(|_| CryptoError::InvalidPublicKey)?;
    let uncompressed = verifying_key.to_encoded_point(false);
    let hash = keccak256(&uncompressed.as_bytes()[1..]);
    let lower = hex::encode(&hash[12..]);
    AddressId::new(format!("0x{}", checksum(&lower))).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Apply EIP-55 casing to a lowercase 40-char hex address body.
fn checksum(lower: &str) -> String {
    let hash = keccak256(lower.as_bytes());
    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0F;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, public_from_private};
    use tally_types::PrivateKey;

    #[test]
    fn known_vector_private_key_one() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let public = public_from_private(&PrivateKey(bytes)).unwrap();
        let address = derive_address(&public).unwrap();
        assert_eq!(address.as_str(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn derived_addresses_are_evm() {
        let kp = generate_keypair();
        let address = derive_address(&kp.public).unwrap();
        assert!(address.is_evm());
    }

    #[test]
    fn eip55_reference_casing() {
        assert_eq!(
            checksum("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn invalid_public_key_is_rejected() {
        assert_eq!(
            derive_address(&PublicKey([0xFF; 33])),
            Err(CryptoError::InvalidPublicKey)
        );
    }
}
