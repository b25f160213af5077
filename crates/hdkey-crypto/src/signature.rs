//! Recoverable ECDSA signatures: `(r, s, v)` with fixed-width components.
//!
//! `v` carries the recovery id as `27 + recId`. The packed 65-byte form
//! used for base64 transport is `header ‖ r ‖ s`, where the header adds 4
//! when the signing key used the compressed encoding.

#![forbid(unsafe_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hdkey_core::{Error, Result};

use crate::secp256k1::scalar::Scalar;

/// Offset of the recovery id inside `v` and the packed header.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Additional header offset marking a compressed public key.
pub const COMPRESSED_OFFSET: u8 = 4;

/// Length of the `r ‖ s ‖ v` and `header ‖ r ‖ s` encodings.
pub const SIGNATURE_LEN: usize = 65;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EcdsaSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// `27 + recId`, or 0 when no recovery id is attached.
    pub v: u8,
}

impl EcdsaSignature {
    /// Signature without a recovery id.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Self { r, s, v: 0 }
    }

    pub fn with_v(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    pub fn from_scalars(r: &Scalar, s: &Scalar, v: u8) -> Self {
        Self {
            r: r.to_bytes(),
            s: s.to_bytes(),
            v,
        }
    }

    /// Attach a recovery id in `0..=3` as `v = 27 + recId`.
    pub fn with_recovery_id(self, rec_id: u8) -> Self {
        Self {
            v: RECOVERY_ID_OFFSET + (rec_id & 3),
            ..self
        }
    }

    /// Both components in `[1, n-1]`.
    pub fn has_valid_components(&self) -> bool {
        matches!(Scalar::from_bytes(&self.r), Some(r) if !r.is_zero())
            && matches!(Scalar::from_bytes(&self.s), Some(s) if !s.is_zero())
    }

    /// True when `s <= n/2`.
    pub fn is_canonical(&self) -> bool {
        match Scalar::from_bytes(&self.s) {
            Some(s) => !s.is_high(),
            None => false,
        }
    }

    /// Low-S form: replace `s` with `n - s` when `s > n/2`.
    ///
    /// Negating `s` corresponds to negating the nonce point, so an attached
    /// recovery id has its parity bit flipped to stay valid. Idempotent.
    pub fn canonicalize(&self) -> Self {
        let s = match Scalar::from_bytes(&self.s) {
            Some(s) if s.is_high() => s,
            _ => return *self,
        };

        let v = match self.recovery_id() {
            Some(rec_id) => self.v - rec_id + (rec_id ^ 1),
            None => self.v,
        };

        Self {
            r: self.r,
            s: s.neg().to_bytes(),
            v,
        }
    }

    /// Recovery id from `v`: accepts `27..=30` and `31..=34`.
    ///
    /// Any other `v` (including 0) means no recovery id is attached.
    pub fn recovery_id(&self) -> Option<u8> {
        match self.v {
            27..=30 => Some(self.v - RECOVERY_ID_OFFSET),
            31..=34 => Some(self.v - RECOVERY_ID_OFFSET - COMPRESSED_OFFSET),
            _ => None,
        }
    }

    /// `r ‖ s ‖ v`, the form Ethereum tooling expects.
    pub fn to_rsv_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse `r ‖ s ‖ v`. A raw `v` of `0..=3` (y-parity style) is read as
    /// that recovery id and stored as `27 + recId`.
    pub fn from_rsv_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(Error::InvalidLength {
                expected: SIGNATURE_LEN,
                got: bytes.len(),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        let sig = Self::new(r, s);
        Ok(match bytes[64] {
            raw @ 0..=3 => sig.with_recovery_id(raw),
            v => Self { v, ..sig },
        })
    }

    /// `header ‖ r ‖ s` with `header = 27 + recId (+4 if compressed)`.
    pub fn to_packed(&self, compressed: bool) -> Result<[u8; SIGNATURE_LEN]> {
        let rec_id = self
            .recovery_id()
            .ok_or_else(|| Error::InvalidSignature("no recovery id attached".into()))?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[0] = RECOVERY_ID_OFFSET + rec_id + if compressed { COMPRESSED_OFFSET } else { 0 };
        out[1..33].copy_from_slice(&self.r);
        out[33..].copy_from_slice(&self.s);
        Ok(out)
    }

    /// Parse the packed form. Returns the signature (with `v = 27 + recId`)
    /// and whether the header marked a compressed key.
    pub fn from_packed(bytes: &[u8]) -> Result<(Self, bool)> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(Error::InvalidLength {
                expected: SIGNATURE_LEN,
                got: bytes.len(),
            });
        }

        let header = bytes[0];
        if !(27..=34).contains(&header) {
            return Err(Error::InvalidSignature(format!("header byte out of range: {header}")));
        }
        let compressed = header >= RECOVERY_ID_OFFSET + COMPRESSED_OFFSET;
        let rec_id = (header - RECOVERY_ID_OFFSET) & 3;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..]);
        Ok((Self::new(r, s).with_recovery_id(rec_id), compressed))
    }

    pub fn to_base64(&self, compressed: bool) -> Result<String> {
        Ok(STANDARD.encode(self.to_packed(compressed)?))
    }

    pub fn from_base64(encoded: &str) -> Result<(Self, bool)> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::InvalidSignature(format!("bad base64: {e}")))?;
        Self::from_packed(&bytes)
    }
}
