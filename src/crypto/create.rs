//! CREATE contract address computation.
//!
//!   address = keccak256(rlp([sender, nonce]))[12:32]
//!
//! Only nonces that RLP-encode as a single byte are supported, so the list
//! is always 22 bytes long: `0xd6 0x94 || sender (20) || nonce (1)`.

use std::fmt;

use super::{address_from_hash, keccak256, Address, CryptoError};

/// Largest nonce whose RLP encoding is a single byte.
pub const MAX_LEGACY_NONCE: u8 = 0x7f;

/// RLP list header for a 22-byte payload.
const RLP_LIST_PREFIX: u8 = 0xd6;
/// RLP string header for a 20-byte address.
const RLP_ADDRESS_PREFIX: u8 = 0x94;
/// RLP encoding of the integer 0 (empty string).
const RLP_ZERO: u8 = 0x80;

/// An account nonce in `0..=MAX_LEGACY_NONCE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LegacyNonce(u8);

impl LegacyNonce {
    /// Nonce of an account's first transaction.
    pub const ZERO: Self = Self(0);

    /// Accepts nonces that RLP-encode as a single byte.
    pub const fn new(nonce: u8) -> Result<Self, CryptoError> {
        if nonce > MAX_LEGACY_NONCE {
            return Err(CryptoError::NonceTooLarge(nonce));
        }
        Ok(Self(nonce))
    }

    /// Returns the nonce value.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the single RLP byte for this nonce.
    #[inline]
    const fn rlp_byte(self) -> u8 {
        if self.0 == 0 {
            RLP_ZERO
        } else {
            self.0
        }
    }
}

impl TryFrom<u8> for LegacyNonce {
    type Error = CryptoError;

    fn try_from(nonce: u8) -> Result<Self, Self::Error> {
        Self::new(nonce)
    }
}

impl fmt::Display for LegacyNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the address of a contract created by `sender` at `nonce`.
#[inline]
pub fn legacy_contract_address(sender: &Address, nonce: LegacyNonce) -> Address {
    let mut preimage = [0u8; 23];
    preimage[0] = RLP_LIST_PREFIX;
    preimage[1] = RLP_ADDRESS_PREFIX;
    preimage[2..22].copy_from_slice(sender.as_bytes());
    preimage[22] = nonce.rlp_byte();

    address_from_hash(&keccak256(&preimage))
}
