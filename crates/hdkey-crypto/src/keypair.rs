//! secp256k1 key pairs: deterministic signing, verification, public key recovery.
//!
//! Signing follows RFC 6979 for the nonce and always emits low-S signatures
//! with the recovery id attached as `v = 27 + recId`. Recovery is SEC1
//! section 4.1.6.

#![forbid(unsafe_code)]

use std::fmt;

use hdkey_core::{Error, Result};

use crate::codec::add_be;
use crate::hash::keccak256;
use crate::rfc6979::NonceGenerator;
use crate::secp256k1::curve::ORDER;
use crate::secp256k1::field::FieldElement;
use crate::secp256k1::point::Point;
use crate::secp256k1::pubkey::PublicKey;
use crate::secp256k1::scalar::Scalar;
use crate::signature::EcdsaSignature;

/// A public key, optionally with its private scalar.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: Option<Scalar>,
    public: PublicKey,
}

impl KeyPair {
    /// Fails with `InvalidKey` for zero. Public key uses the compressed encoding.
    pub fn from_private_scalar(private: Scalar) -> Result<Self> {
        let public = PublicKey::from_private_key(&private)
            .ok_or_else(|| Error::InvalidKey("private key is zero".into()))?;
        Ok(Self {
            private: Some(private),
            public,
        })
    }

    /// Fails with `InvalidKey` for zero or values `>= n`.
    pub fn from_private_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let private = Scalar::from_bytes(bytes)
            .ok_or_else(|| Error::InvalidKey("private key not below curve order".into()))?;
        Self::from_private_scalar(private)
    }

    /// Pair a private scalar with an already computed public key.
    ///
    /// The public key is trusted as given; its compression flag is kept.
    pub fn from_private_and_public(private: Scalar, public: PublicKey) -> Result<Self> {
        if private.is_zero() {
            return Err(Error::InvalidKey("private key is zero".into()));
        }
        Ok(Self {
            private: Some(private),
            public,
        })
    }

    /// Public-only key pair. Signing fails with `MissingPrivateKey`.
    pub fn from_public_key(public: PublicKey) -> Self {
        Self {
            private: None,
            public,
        }
    }

    pub fn from_public_point(point: &Point, compressed: bool) -> Result<Self> {
        Ok(Self::from_public_key(PublicKey::from_point(point, compressed)?))
    }

    /// Parse a SEC1 encoded public key (33 or 65 bytes).
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_public_key(PublicKey::from_sec1_bytes(bytes)?))
    }

    pub fn has_private_key(&self) -> bool {
        self.private.is_some()
    }

    pub fn private_key(&self) -> Result<&Scalar> {
        self.private.as_ref().ok_or(Error::MissingPrivateKey)
    }

    /// Private scalar as 32 big-endian bytes, leading zeros kept.
    pub fn private_key_bytes(&self) -> Result<[u8; 32]> {
        Ok(self.private_key()?.to_bytes())
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// SEC1 encoding honouring the key's compression flag.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public.to_bytes()
    }

    pub fn is_compressed(&self) -> bool {
        self.public.is_compressed()
    }

    /// Same key with the uncompressed public encoding.
    pub fn decompress(&self) -> Self {
        Self {
            private: self.private,
            public: self.public.decompressed(),
        }
    }

    /// Ethereum address: last 20 bytes of Keccak-256(x ‖ y).
    pub fn address(&self) -> [u8; 20] {
        let hash = keccak256(&self.public.raw_xy());
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..]);
        out
    }

    /// Length/prefix check of a SEC1 public key encoding.
    pub fn is_pub_key_canonical(bytes: &[u8]) -> bool {
        PublicKey::is_canonical_encoding(bytes)
    }

    /// Sign a 32-byte digest.
    ///
    /// The result is low-S and carries `v = 27 + recId`.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<EcdsaSignature> {
        let d = self.private_key()?;
        let e = Scalar::from_bytes_reduced(digest);
        let mut nonces = NonceGenerator::new(d, digest)?;

        let sig = loop {
            let k = nonces.next_nonce()?;
            let (rx, _) = Point::mul_generator(&k)
                .to_affine()
                .ok_or(Error::PointAtInfinity)?;

            let r = Scalar::from_bytes_reduced(&rx.to_bytes());
            if r.is_zero() {
                continue;
            }

            let k_inv = k.inv().ok_or(Error::ScalarOutOfRange)?;
            let s = k_inv.mul(&e.add(&r.mul(d)));
            if s.is_zero() {
                continue;
            }

            break EcdsaSignature::from_scalars(&r, &s, 0).canonicalize();
        };

        let rec_id = self.find_recovery_id(&sig, digest)?;
        Ok(sig.with_recovery_id(rec_id))
    }

    /// Try each candidate recovery id until one reproduces our public key.
    fn find_recovery_id(&self, sig: &EcdsaSignature, digest: &[u8; 32]) -> Result<u8> {
        let mut found = None;
        let mut matches = 0usize;

        for rec_id in 0..4u8 {
            // Release builds stop at the first hit; debug builds check all four.
            if found.is_some() && !cfg!(debug_assertions) {
                break;
            }
            let recovered = Self::recover_from_signature(rec_id, sig, digest, self.is_compressed())?;
            if matches!(recovered, Some(ref kp) if kp.public == self.public) {
                matches += 1;
                found.get_or_insert(rec_id);
            }
        }

        debug_assert!(
            found.is_none() || matches == 1,
            "{matches} recovery ids reproduce the signing key"
        );

        found.ok_or_else(|| {
            tracing::error!("no recovery id reproduces the signing key");
            Error::RecoveryIdNotFound
        })
    }

    /// Standard ECDSA verification against this key's public point.
    ///
    /// Malformed components (zero or `>= n`) yield `false`.
    pub fn verify(&self, digest: &[u8; 32], sig: &EcdsaSignature) -> bool {
        let (r, s) = match (Scalar::from_bytes(&sig.r), Scalar::from_bytes(&sig.s)) {
            (Some(r), Some(s)) if !r.is_zero() && !s.is_zero() => (r, s),
            _ => return false,
        };
        let w = match s.inv() {
            Some(w) => w,
            None => return false,
        };

        let e = Scalar::from_bytes_reduced(digest);
        let u1 = e.mul(&w);
        let u2 = r.mul(&w);

        let x = Point::mul_add(&u1, &Point::generator(), &u2, &self.public.to_point());
        match x.to_affine() {
            Some((x, _)) => Scalar::from_bytes_reduced(&x.to_bytes()) == r,
            None => false,
        }
    }

    /// Recover the signing public key for one candidate recovery id.
    ///
    /// `Ok(None)` means this candidate does not yield a key and the caller
    /// should try the next id. A recovery id above 3 or components outside
    /// `[1, n-1]` are rejected with `InvalidSignature`.
    pub fn recover_from_signature(
        rec_id: u8,
        sig: &EcdsaSignature,
        digest: &[u8; 32],
        compressed: bool,
    ) -> Result<Option<KeyPair>> {
        if rec_id > 3 {
            return Err(Error::InvalidSignature(format!("recovery id {rec_id} out of range")));
        }
        let (r, s) = match (Scalar::from_bytes(&sig.r), Scalar::from_bytes(&sig.s)) {
            (Some(r), Some(s)) if !r.is_zero() && !s.is_zero() => (r, s),
            _ => return Err(Error::InvalidSignature("r and s must be in [1, n-1]".into())),
        };

        // x = r + (rec_id / 2) * n, which must still be a field element.
        let x_bytes = if rec_id >= 2 {
            match add_be(&sig.r, &ORDER) {
                (sum, false) => sum,
                (_, true) => return Ok(None),
            }
        } else {
            sig.r
        };
        let x = match FieldElement::from_bytes(&x_bytes) {
            Some(x) => x,
            None => return Ok(None),
        };

        let big_r = match Point::lift_x(&x, rec_id & 1 == 1) {
            Some(p) => p,
            None => return Ok(None),
        };
        if !big_r.mul_by_order().is_infinity() {
            return Ok(None);
        }

        // Q = r⁻¹ (sR - eG)
        let r_inv = r.inv().ok_or(Error::ScalarOutOfRange)?;
        let e = Scalar::from_bytes_reduced(digest);
        let u1 = e.neg().mul(&r_inv);
        let u2 = s.mul(&r_inv);

        let q = Point::mul_add(&u1, &Point::generator(), &u2, &big_r);
        if q.is_infinity() {
            return Ok(None);
        }

        Ok(Some(Self::from_public_point(&q, compressed)?))
    }

    /// Recover the signer from a base64 packed signature (`header ‖ r ‖ s`).
    pub fn signature_to_key(digest: &[u8; 32], signature_base64: &str) -> Result<KeyPair> {
        let (sig, compressed) = EcdsaSignature::from_base64(signature_base64)?;
        let rec_id = sig
            .recovery_id()
            .ok_or_else(|| Error::InvalidSignature("missing recovery id".into()))?;

        Self::recover_from_signature(rec_id, &sig, digest, compressed)?
            .ok_or_else(|| Error::InvalidSignature("could not recover public key".into()))
    }

    /// Address of the signer, using the recovery id carried in `v`.
    pub fn recover_address(digest: &[u8; 32], sig: &EcdsaSignature) -> Result<[u8; 20]> {
        let rec_id = sig
            .recovery_id()
            .ok_or_else(|| Error::InvalidSignature(format!("v = {} carries no recovery id", sig.v)))?;

        let key = Self::recover_from_signature(rec_id, sig, digest, true)?
            .ok_or_else(|| Error::InvalidSignature("could not recover public key".into()))?;
        Ok(key.address())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private", &self.private.map(|_| "<redacted>"))
            .field("public", &hex::encode(self.public.to_bytes()))
            .finish()
    }
}
