//! Address derivation for contract deployments.
//!
//! This module provides:
//! - Sender address derivation from a secp256k1 secret key
//! - Contract address derivation for CREATE (sender + nonce)
//! - Contract address derivation for CREATE2 (deployer + salt + init code hash)
//! - EIP-55 checksum encoding

mod address;
mod create;
mod create2;
mod keypair;

pub use address::{to_checksum_address, Address, AddressParseError};
pub use create::{legacy_contract_address, LegacyNonce, MAX_LEGACY_NONCE};
pub use create2::create2_contract_address;
pub use keypair::sender_address;

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
#[inline]
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Takes the low 20 bytes of a Keccak-256 digest.
#[inline]
pub(crate) fn address_from_hash(hash: &[u8; 32]) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

/// Errors raised while deriving addresses.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid secret key: not a valid secp256k1 scalar")]
    InvalidSecretKey,
    #[error("Nonce {0} does not encode as a single RLP byte (max 127)")]
    NonceTooLarge(u8),
}

/// Per-deployment parameters; the deployer address is supplied separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentParams {
    /// CREATE: sender address and account nonce.
    Legacy { nonce: LegacyNonce },
    /// CREATE2: salt and keccak256 of the init code.
    Create2 {
        salt: [u8; 32],
        init_code_hash: [u8; 32],
    },
}

impl DeploymentParams {
    /// Derives the address a contract deployed by `deployer` ends up at.
    #[inline]
    pub fn contract_address(&self, deployer: &Address) -> Address {
        match self {
            DeploymentParams::Legacy { nonce } => legacy_contract_address(deployer, *nonce),
            DeploymentParams::Create2 {
                salt,
                init_code_hash,
            } => create2_contract_address(deployer, salt, init_code_hash),
        }
    }
}
