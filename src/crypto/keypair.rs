//! Sender address derivation from a secp256k1 secret key.

use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

use super::{address_from_hash, keccak256, Address, CryptoError};

/// Derives the Ethereum address controlled by `secret`.
///
/// Process:
/// 1. Compute the public key and serialize it uncompressed (65 bytes)
/// 2. Remove the first byte (0x04 prefix)
/// 3. Hash the remaining 64 bytes with Keccak-256
/// 4. Take the last 20 bytes of the hash
///
/// The context is passed in so hot loops can reuse one per thread.
#[inline]
pub fn sender_address<C: Signing>(
    secp: &Secp256k1<C>,
    secret: &[u8; 32],
) -> Result<Address, CryptoError> {
    let secret_key = SecretKey::from_slice(secret).map_err(|_| CryptoError::InvalidSecretKey)?;
    let public_key = PublicKey::from_secret_key(secp, &secret_key);
    let public_key_bytes = public_key.serialize_uncompressed();

    Ok(address_from_hash(&keccak256(&public_key_bytes[1..])))
}
