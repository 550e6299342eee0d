//! CREATE2 contract address computation (EIP-1014).
//!
//! Preimage: 0xff (1) || deployer (20) || salt (32) || init_code_hash (32) = 85 bytes.
//! Address = keccak256(preimage)[12..32].

use super::{address_from_hash, keccak256, Address};

/// Computes the CREATE2 address for `deployer`, `salt` and `init_code_hash`.
#[inline]
pub fn create2_contract_address(
    deployer: &Address,
    salt: &[u8; 32],
    init_code_hash: &[u8; 32],
) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(salt);
    preimage[53..85].copy_from_slice(init_code_hash);

    address_from_hash(&keccak256(&preimage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create2_deterministic() {
        let deployer = Address::from_bytes([0u8; 20]);
        let salt = [1u8; 32];
        let init_hash = [2u8; 32];
        let a1 = create2_contract_address(&deployer, &salt, &init_hash);
        let a2 = create2_contract_address(&deployer, &salt, &init_hash);
        assert_eq!(a1, a2);
    }

    /// EIP-1014 example 0: zero deployer, zero salt, init code `0x00`.
    #[test]
    fn test_eip1014_example_0() {
        let deployer = Address::from_bytes([0u8; 20]);
        let addr = create2_contract_address(&deployer, &[0u8; 32], &keccak256(&[0x00]));
        assert_eq!(addr.to_checksum(), "0x4D1A2e2bB4F88F0250f26Ffff098B0b30B26BF38");
    }

    #[test]
    fn test_salt_changes_address() {
        let deployer = Address::from_bytes([0u8; 20]);
        let init_hash = [0u8; 32];
        let a = create2_contract_address(&deployer, &[0u8; 32], &init_hash);
        let b = create2_contract_address(&deployer, &[1u8; 32], &init_hash);
        assert_ne!(a, b);
    }
}
