//! 20-byte Ethereum addresses.
//!
//! Rendering uses the EIP-55 mixed-case checksum: each hex letter is
//! upper-cased when the matching nibble of keccak256(lowercase hex) is >= 8.

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use hdkey_core::{Error, Result};
use hdkey_crypto::hash::keccak256;
use hdkey_crypto::KeyPair;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Address of a key pair's public point.
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        Self(key_pair.address())
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// `0x`-prefixed EIP-55 checksummed form.
    pub fn to_checksum(&self) -> String {
        to_checksum(&self.0)
    }
}

/// EIP-55 rendering of raw address bytes, `0x`-prefixed.
pub fn to_checksum(bytes: &[u8; ADDRESS_LEN]) -> String {
    let lower = hex::encode(bytes);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + 2 * ADDRESS_LEN);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Accepts 40 hex digits with an optional `0x` prefix.
    ///
    /// All-lowercase and all-uppercase input is taken as is; mixed case must
    /// carry a valid EIP-55 checksum.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 2 * ADDRESS_LEN {
            return Err(Error::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                2 * ADDRESS_LEN,
                digits.len()
            )));
        }

        let decoded = hex::decode(digits).map_err(|e| Error::InvalidHex(e.to_string()))?;
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&decoded);
        let address = Self(bytes);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(Error::InvalidAddress(format!("bad EIP-55 checksum: {s}")));
        }

        Ok(address)
    }
}
