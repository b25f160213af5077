//! BIP32 hierarchical deterministic key derivation.
//!
//! Implements private (CKDpriv) and public (CKDpub) child derivation,
//! extended key serialization (xprv / xpub), and the BIP32 rule that an
//! invalid child (IL >= n, or a zero / infinite result) is skipped in
//! favour of the next index.

#![forbid(unsafe_code)]

use std::fmt;

use hdkey_core::{Error, Result};
use hdkey_crypto::codec::ser32;
use hdkey_crypto::hash::hash160;
use hdkey_crypto::hmac::hmac_sha512;
use hdkey_crypto::secp256k1::point::Point;
use hdkey_crypto::secp256k1::scalar::Scalar;
use hdkey_crypto::KeyPair;
use zeroize::Zeroizing;

use crate::path::DerivationPath;

/// Hardened derivation flag.
pub const HARDENED: u32 = 0x8000_0000;

/// Mainnet private extended key version (`xprv`).
pub const VERSION_XPRV: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// Mainnet public extended key version (`xpub`).
pub const VERSION_XPUB: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

/// Serialized extended key length before Base58Check.
pub const EXTENDED_KEY_LEN: usize = 78;

/// The keyed hash behind child derivation: `I = HMAC-SHA512(chain_code, data)`.
///
/// Exists so tests can force invalid derivations.
pub trait ChildKeyHasher {
    fn hash(&self, chain_code: &[u8; 32], data: &[u8]) -> Result<[u8; 64]>;
}

/// The BIP32 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha512Hasher;

impl ChildKeyHasher for HmacSha512Hasher {
    fn hash(&self, chain_code: &[u8; 32], data: &[u8]) -> Result<[u8; 64]> {
        hmac_sha512(chain_code, &[data])
    }
}

/// Extended key: a key pair plus chain code and tree position.
///
/// Nodes are immutable; every derivation returns a new node.
#[derive(Clone, PartialEq, Eq)]
pub struct HDNode {
    key_pair: KeyPair,
    chain_code: [u8; 32],
    depth: u8,
    child_index: u32,
    parent_fingerprint: [u8; 4],
}

impl HDNode {
    pub fn new(
        key_pair: KeyPair,
        chain_code: [u8; 32],
        depth: u8,
        child_index: u32,
        parent_fingerprint: [u8; 4],
    ) -> Self {
        Self {
            key_pair,
            chain_code,
            depth,
            child_index,
            parent_fingerprint,
        }
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Compressed SEC1 public key.
    pub fn public_key(&self) -> [u8; 33] {
        self.key_pair.public_key().compressed_bytes()
    }

    /// Hash160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key())
    }

    /// First 4 bytes of the identifier.
    pub fn fingerprint(&self) -> [u8; 4] {
        let id = self.identifier();
        [id[0], id[1], id[2], id[3]]
    }

    /// Drop the private key, keeping chain code and position.
    pub fn neuter(&self) -> Self {
        Self {
            key_pair: KeyPair::from_public_key(*self.key_pair.public_key()),
            ..self.clone()
        }
    }

    /// Derive the child at `index` (hardened when `index >= 2^31`).
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        self.derive_child_with(index, &HmacSha512Hasher)
    }

    /// Derive the child at `index` using `hasher` for the HMAC step.
    ///
    /// An invalid child moves on to `index + 1`. The search stays inside the
    /// half (normal or hardened) that `index` belongs to.
    pub fn derive_child_with<H: ChildKeyHasher + ?Sized>(
        &self,
        index: u32,
        hasher: &H,
    ) -> Result<Self> {
        let depth = self.depth.checked_add(1).ok_or(Error::DepthExceeded)?;
        let hardened = index >= HARDENED;
        if hardened && !self.key_pair.has_private_key() {
            return Err(Error::MissingPrivateKey);
        }
        let last = if hardened { u32::MAX } else { HARDENED - 1 };

        let mut i = index;
        loop {
            if let Some(child) = self.try_derive(i, depth, hasher)? {
                return Ok(child);
            }
            if i == last {
                return Err(Error::InvalidIndex(format!(
                    "no valid child key at or after index {index}"
                )));
            }
            tracing::warn!(index = i, "invalid child key, deriving next index");
            i += 1;
        }
    }

    /// One derivation attempt. `Ok(None)` means this index yields no valid key.
    fn try_derive<H: ChildKeyHasher + ?Sized>(
        &self,
        index: u32,
        depth: u8,
        hasher: &H,
    ) -> Result<Option<Self>> {
        let mut data = Zeroizing::new([0u8; 37]);
        if index >= HARDENED {
            // 0x00 || k || ser32(i)
            data[1..33].copy_from_slice(&self.key_pair.private_key_bytes()?);
        } else {
            // serP(K) || ser32(i)
            data[..33].copy_from_slice(&self.public_key());
        }
        data[33..].copy_from_slice(&ser32(index));

        let i = Zeroizing::new(hasher.hash(&self.chain_code, &data[..])?);
        let mut il = Zeroizing::new([0u8; 32]);
        il.copy_from_slice(&i[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        let tweak = match Scalar::from_bytes(&il) {
            Some(tweak) => tweak,
            None => return Ok(None),
        };

        let key_pair = match self.key_pair.private_key() {
            Ok(parent) => {
                let child = tweak.add(parent);
                if child.is_zero() {
                    return Ok(None);
                }
                KeyPair::from_private_scalar(child)?
            }
            Err(_) => {
                let point = Point::mul_generator(&tweak).add(&self.key_pair.public_key().to_point());
                if point.is_infinity() {
                    return Ok(None);
                }
                KeyPair::from_public_point(&point, true)?
            }
        };

        Ok(Some(Self {
            key_pair,
            chain_code,
            depth,
            child_index: index,
            parent_fingerprint: self.fingerprint(),
        }))
    }

    /// Derive along a textual path such as `m/44'/60'/0'/0`.
    pub fn derive(&self, path: &str) -> Result<Self> {
        self.derive_path(&path.parse::<DerivationPath>()?)
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut node = self.clone();
        for &index in path.indices() {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }

    fn serialize(&self, version: [u8; 4], key: &[u8; 33]) -> Zeroizing<[u8; EXTENDED_KEY_LEN]> {
        let mut out = Zeroizing::new([0u8; EXTENDED_KEY_LEN]);
        out[..4].copy_from_slice(&version);
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint);
        out[9..13].copy_from_slice(&ser32(self.child_index));
        out[13..45].copy_from_slice(&self.chain_code);
        out[45..].copy_from_slice(key);
        out
    }

    /// Base58Check `xprv` serialization. Fails for public-only nodes.
    pub fn to_base58(&self) -> Result<String> {
        let mut key = Zeroizing::new([0u8; 33]);
        key[1..].copy_from_slice(&self.key_pair.private_key_bytes()?);
        let payload = self.serialize(VERSION_XPRV, &key);
        Ok(bs58::encode(&payload[..]).with_check().into_string())
    }

    /// Base58Check `xpub` serialization.
    pub fn to_base58_public(&self) -> String {
        let payload = self.serialize(VERSION_XPUB, &self.public_key());
        bs58::encode(&payload[..]).with_check().into_string()
    }

    /// Parse an `xprv` or `xpub` string.
    pub fn from_base58(encoded: &str) -> Result<Self> {
        let raw = Zeroizing::new(
            bs58::decode(encoded.trim())
                .with_check(None)
                .into_vec()
                .map_err(|e| Error::InvalidExtendedKey(e.to_string()))?,
        );
        if raw.len() != EXTENDED_KEY_LEN {
            return Err(Error::InvalidExtendedKey(format!(
                "expected {EXTENDED_KEY_LEN} bytes, got {}",
                raw.len()
            )));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&raw[..4]);
        let depth = raw[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&raw[5..9]);
        let mut index_bytes = [0u8; 4];
        index_bytes.copy_from_slice(&raw[9..13]);
        let child_index = u32::from_be_bytes(index_bytes);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&raw[13..45]);
        let key = &raw[45..];

        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_index != 0) {
            return Err(Error::InvalidExtendedKey(
                "master key with non-zero parent fingerprint or index".into(),
            ));
        }

        let key_pair = match version {
            VERSION_XPRV => {
                if key[0] != 0 {
                    return Err(Error::InvalidExtendedKey("private key must be prefixed with 0x00".into()));
                }
                let mut secret = Zeroizing::new([0u8; 32]);
                secret.copy_from_slice(&key[1..]);
                KeyPair::from_private_bytes(&secret)
                    .map_err(|e| Error::InvalidExtendedKey(e.to_string()))?
            }
            VERSION_XPUB => {
                if key.len() != 33 || !KeyPair::is_pub_key_canonical(key) {
                    return Err(Error::InvalidExtendedKey("public key must be compressed".into()));
                }
                KeyPair::from_public_bytes(key).map_err(|e| Error::InvalidExtendedKey(e.to_string()))?
            }
            other => {
                return Err(Error::InvalidExtendedKey(format!(
                    "unknown version {}",
                    u32::from_be_bytes(other)
                )))
            }
        };

        Ok(Self {
            key_pair,
            chain_code,
            depth,
            child_index,
            parent_fingerprint,
        })
    }
}

impl fmt::Debug for HDNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HDNode")
            .field("key_pair", &self.key_pair)
            .field("chain_code", &"<redacted>")
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .finish()
    }
}
