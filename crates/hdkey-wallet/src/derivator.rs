//! Seed-initialized façade answering address and key queries by index.
//!
//! The branch node (by default m/44'/60'/0'/0) is derived once in
//! `initialize` and every query derives a fresh child from it.

#![forbid(unsafe_code)]

use std::ops::RangeInclusive;

use hdkey_address::Address;
use hdkey_bip::{HDNode, KeyGenerator, HARDENED};
use hdkey_bip::keygen::BIP44_PATH_ETHEREUM;
use hdkey_core::{Error, Result};
use hdkey_crypto::EcdsaSignature;
use rayon::prelude::*;
use zeroize::Zeroizing;

#[derive(Debug, Default)]
pub struct AddressDerivator {
    branch: Option<HDNode>,
}

impl AddressDerivator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and cache the Ethereum external chain for `seed`.
    pub fn initialize(&mut self, seed: &[u8]) -> Result<()> {
        self.initialize_with_path(seed, BIP44_PATH_ETHEREUM)
    }

    /// Like [`initialize`](Self::initialize) with a custom branch path.
    pub fn initialize_with_path(&mut self, seed: &[u8], path: &str) -> Result<()> {
        let branch = KeyGenerator::master_node(seed)?.derive(path)?;
        tracing::debug!(
            depth = branch.depth(),
            child_index = branch.child_index(),
            "address derivator initialized"
        );
        self.branch = Some(branch);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.branch.is_some()
    }

    /// The cached branch node.
    pub fn branch(&self) -> Result<&HDNode> {
        self.branch.as_ref().ok_or(Error::NotInitialized)
    }

    fn child(&self, index: u32) -> Result<HDNode> {
        if index >= HARDENED {
            return Err(Error::InvalidIndex(format!(
                "address index {index} is not below 2^31"
            )));
        }
        self.branch()?.derive_child(index)
    }

    pub fn address_for_index(&self, index: u32) -> Result<Address> {
        Ok(Address::from_key_pair(self.child(index)?.key_pair()))
    }

    /// Addresses for every index in `range`, in ascending order.
    ///
    /// Children are derived in parallel on the rayon pool.
    pub fn addresses_for_range(&self, range: RangeInclusive<u32>) -> Result<Vec<Address>> {
        self.branch()?;
        if range.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(
            start = *range.start(),
            end = *range.end(),
            "deriving address range"
        );
        range
            .into_par_iter()
            .map(|index| self.address_for_index(index))
            .collect()
    }

    /// Addresses for `start ..= start + page_size - 1`. Empty when
    /// `page_size <= 0`.
    pub fn addresses_for_page(&self, start: u32, page_size: i64) -> Result<Vec<Address>> {
        self.branch()?;
        if page_size <= 0 {
            return Ok(Vec::new());
        }
        let end = i64::from(start) + page_size - 1;
        let end = u32::try_from(end)
            .map_err(|_| Error::InvalidIndex(format!("page end {end} out of range")))?;
        self.addresses_for_range(start..=end)
    }

    /// Private key at `index`. The buffer is wiped on drop.
    pub fn key_for_index(&self, index: u32) -> Result<Zeroizing<[u8; 32]>> {
        Ok(Zeroizing::new(
            self.child(index)?.key_pair().private_key_bytes()?,
        ))
    }

    /// Sign `digest` with the key at `index`.
    pub fn sign_for_index(&self, index: u32, digest: &[u8; 32]) -> Result<EcdsaSignature> {
        self.child(index)?.key_pair().sign(digest)
    }
}
