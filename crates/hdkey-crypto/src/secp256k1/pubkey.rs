//! Public keys: P = k*G with a SEC1 encoding preference.
//!
//! Compressed format: [02|03][x], 33 bytes (prefix is y parity).
//! Uncompressed format: [04][x][y], 65 bytes.

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};

use super::curve::{self, TAG_EVEN, TAG_ODD, TAG_UNCOMPRESSED};
use super::field::FieldElement;
use super::point::Point;
use super::scalar::Scalar;

/// Affine public key plus the encoding it was created or requested with.
///
/// Equality compares the curve point; the encoding flag is ignored.
#[derive(Clone, Copy, Debug)]
pub struct PublicKey {
    x: FieldElement,
    y: FieldElement,
    compressed: bool,
}

impl PublicKey {
    /// Fails with `PointAtInfinity` for the identity.
    pub fn from_point(point: &Point, compressed: bool) -> Result<Self> {
        let (x, y) = point.to_affine().ok_or(Error::PointAtInfinity)?;
        Ok(Self { x, y, compressed })
    }

    /// Generate the compressed public key for a private scalar.
    /// Returns None if private key is zero.
    pub fn from_private_key(private_key: &Scalar) -> Option<Self> {
        if private_key.is_zero() {
            return None;
        }
        let (x, y) = Point::mul_generator(private_key).to_affine()?;
        Some(Self {
            x,
            y,
            compressed: true,
        })
    }

    /// Parse a 33- or 65-byte SEC1 encoding, keeping its compression.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let (point, compressed) = curve::decode_point(bytes)?;
        Self::from_point(&point, compressed)
    }

    pub fn to_point(&self) -> Point {
        Point::from_affine(self.x, self.y)
    }

    pub fn x_bytes(&self) -> [u8; 32] {
        self.x.to_bytes()
    }

    pub fn y_bytes(&self) -> [u8; 32] {
        self.y.to_bytes()
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Same point, compressed encoding.
    pub fn compressed(&self) -> Self {
        Self {
            compressed: true,
            ..*self
        }
    }

    /// Same point, uncompressed encoding.
    pub fn decompressed(&self) -> Self {
        Self {
            compressed: false,
            ..*self
        }
    }

    pub fn compressed_bytes(&self) -> [u8; 33] {
        curve::compress_affine(&self.x, &self.y)
    }

    pub fn uncompressed_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = TAG_UNCOMPRESSED;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Encoding according to the compression flag.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.compressed_bytes().to_vec()
        } else {
            self.uncompressed_bytes().to_vec()
        }
    }

    /// `x ‖ y` without a prefix, the Ethereum address preimage.
    pub fn raw_xy(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.x.to_bytes());
        out[32..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Shape check only: length and prefix agree. Does not touch the curve.
    pub fn is_canonical_encoding(bytes: &[u8]) -> bool {
        match bytes.len() {
            33 => bytes[0] == TAG_EVEN || bytes[0] == TAG_ODD,
            65 => bytes[0] == TAG_UNCOMPRESSED,
            _ => false,
        }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for PublicKey {}
