//! Ethereum address representation and utilities.

use std::fmt;
use std::str::FromStr;

use super::keccak256;

/// An Ethereum address (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the address with 0x prefix.
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Returns the address with checksum encoding (EIP-55), 0x prefixed.
    pub fn to_checksum(&self) -> String {
        to_checksum_address(&self.to_hex())
    }
}

/// EIP-55 encoding of a lowercase hex address (no 0x prefix).
///
/// A letter is uppercased iff the matching nibble of
/// `keccak256(lowercase_hex)` is >= 8. Digits pass through unchanged.
pub fn to_checksum_address(lowercase_hex: &str) -> String {
    let hash = keccak256(lowercase_hex.as_bytes());

    let mut checksum = String::with_capacity(lowercase_hex.len() + 2);
    checksum.push_str("0x");

    for (i, c) in lowercase_hex.chars().enumerate() {
        let hash_byte = hash[i / 2];
        let hash_nibble = if i % 2 == 0 {
            hash_byte >> 4
        } else {
            hash_byte & 0x0f
        };

        if hash_nibble >= 8 {
            checksum.push(c.to_ascii_uppercase());
        } else {
            checksum.push(c);
        }
    }

    checksum
}

/// Error returned when parsing an address from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address must be 40 hex characters, got {0}")]
    BadLength(usize),
    #[error("address contains non-hex characters")]
    NotHex,
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parses 40 hex digits with or without a `0x` prefix. Case is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(AddressParseError::BadLength(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressParseError::NotHex)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}
