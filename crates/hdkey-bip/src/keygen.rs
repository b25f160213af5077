//! Master key generation and BIP44 Ethereum paths.
//!
//! Path structure: m / purpose' / coin_type' / account' / change / address_index
//! For Ethereum: m/44'/60'/0'/0/i

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};
use hdkey_crypto::hmac::hmac_sha512;
use hdkey_crypto::secp256k1::scalar::Scalar;
use hdkey_crypto::KeyPair;
use zeroize::Zeroizing;

use crate::bip32::{HDNode, HARDENED};

/// HMAC key for master key generation.
pub const BITCOIN_SEED: &[u8] = b"Bitcoin seed";

/// BIP44 purpose constant.
pub const PURPOSE: u32 = 44;

/// Ethereum coin type (SLIP-0044).
pub const ETHEREUM_COIN_TYPE: u32 = 60;

/// External chain of the first Ethereum account.
pub const BIP44_PATH_ETHEREUM: &str = "m/44'/60'/0'/0";

pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

pub struct KeyGenerator;

impl KeyGenerator {
    /// Master node from a 16..=64 byte seed.
    pub fn master_node(seed: &[u8]) -> Result<HDNode> {
        if seed.len() < MIN_SEED_LEN || seed.len() > MAX_SEED_LEN {
            return Err(Error::InvalidSeedLength { got: seed.len() });
        }

        let i = Zeroizing::new(hmac_sha512(BITCOIN_SEED, &[seed])?);
        let mut il = Zeroizing::new([0u8; 32]);
        il.copy_from_slice(&i[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        let key = Scalar::from_bytes(&il)
            .filter(|k| !k.is_zero())
            .ok_or_else(|| Error::InvalidKey("seed produces an invalid master key".into()))?;

        tracing::debug!(seed_len = seed.len(), "derived master node");
        Ok(HDNode::new(
            KeyPair::from_private_scalar(key)?,
            chain_code,
            0,
            0,
            [0u8; 4],
        ))
    }

    /// Derive m/44'/60'/account'/change/address_index.
    pub fn derive_ethereum_key(
        master: &HDNode,
        account: u32,
        change: u32,
        address_index: u32,
    ) -> Result<HDNode> {
        if account >= HARDENED {
            return Err(Error::InvalidIndex(format!("account {account} is not below 2^31")));
        }
        let path = [
            HARDENED | PURPOSE,
            HARDENED | ETHEREUM_COIN_TYPE,
            HARDENED | account,
            change,
            address_index,
        ];
        let mut node = master.clone();
        for index in path {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_length_bounds() {
        assert_eq!(
            KeyGenerator::master_node(&[0u8; 15]).unwrap_err(),
            Error::InvalidSeedLength { got: 15 }
        );
        assert_eq!(
            KeyGenerator::master_node(&[0u8; 65]).unwrap_err(),
            Error::InvalidSeedLength { got: 65 }
        );
        assert!(KeyGenerator::master_node(&[1u8; 16]).is_ok());
        assert!(KeyGenerator::master_node(&[1u8; 64]).is_ok());
    }

    #[test]
    fn test_master_position() {
        let master = KeyGenerator::master_node(&[7u8; 32]).unwrap();
        assert_eq!(master.depth(), 0);
        assert_eq!(master.child_index(), 0);
        assert_eq!(master.parent_fingerprint(), [0u8; 4]);
        assert!(master.key_pair().has_private_key());
    }

    #[test]
    fn test_ethereum_key_matches_path() {
        let master = KeyGenerator::master_node(&[7u8; 32]).unwrap();
        let by_fn = KeyGenerator::derive_ethereum_key(&master, 0, 0, 3).unwrap();
        let by_path = master.derive("m/44'/60'/0'/0/3").unwrap();
        assert_eq!(by_fn, by_path);
        assert_eq!(by_fn.depth(), 5);
    }

    #[test]
    fn test_different_accounts_and_indices() {
        let master = KeyGenerator::master_node(&[7u8; 32]).unwrap();
        let key0 = KeyGenerator::derive_ethereum_key(&master, 0, 0, 0).unwrap();
        let key1 = KeyGenerator::derive_ethereum_key(&master, 1, 0, 0).unwrap();
        let key2 = KeyGenerator::derive_ethereum_key(&master, 0, 0, 1).unwrap();
        assert_ne!(key0.public_key(), key1.public_key());
        assert_ne!(key0.public_key(), key2.public_key());
    }

    #[test]
    fn test_account_out_of_range() {
        let master = KeyGenerator::master_node(&[7u8; 32]).unwrap();
        assert!(matches!(
            KeyGenerator::derive_ethereum_key(&master, HARDENED, 0, 0),
            Err(Error::InvalidIndex(_))
        ));
    }
}
