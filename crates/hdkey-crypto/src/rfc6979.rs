//! Deterministic ECDSA nonces (RFC 6979, HMAC-DRBG over SHA-256).
//!
//! qlen = hlen = 256 for secp256k1 with SHA-256, so bits2int is the plain
//! big-endian interpretation and bits2octets is a single reduction mod n.

#![forbid(unsafe_code)]

use hdkey_core::Result;

use crate::hmac::hmac_sha256;
use crate::secp256k1::scalar::Scalar;

/// HMAC-DRBG state seeded from a private key and a message digest.
///
/// Each call to [`NonceGenerator::next_nonce`] yields the next candidate k
/// in `[1, n-1]`. The first call produces the RFC 6979 nonce; later calls
/// continue the sequence as the RFC prescribes when a signature attempt
/// yields r = 0 or s = 0.
pub struct NonceGenerator {
    k: [u8; 32],
    v: [u8; 32],
    primed: bool,
}

impl NonceGenerator {
    /// Steps (b) through (f) of RFC 6979 section 3.2.
    pub fn new(private_key: &Scalar, digest: &[u8; 32]) -> Result<Self> {
        let x = private_key.to_bytes();
        let h1 = Scalar::from_bytes_reduced(digest).to_bytes();

        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        k = hmac_sha256(&k, &[&v[..], &[0x00], &x[..], &h1[..]])?;
        v = hmac_sha256(&k, &[&v[..]])?;
        k = hmac_sha256(&k, &[&v[..], &[0x01], &x[..], &h1[..]])?;
        v = hmac_sha256(&k, &[&v[..]])?;

        Ok(Self { k, v, primed: false })
    }

    /// Step (h): generate the next nonce candidate.
    pub fn next_nonce(&mut self) -> Result<Scalar> {
        if self.primed {
            self.reseed()?;
        }
        self.primed = true;

        loop {
            self.v = hmac_sha256(&self.k, &[&self.v[..]])?;
            match Scalar::from_bytes(&self.v) {
                Some(candidate) if !candidate.is_zero() => return Ok(candidate),
                _ => self.reseed()?,
            }
        }
    }

    fn reseed(&mut self) -> Result<()> {
        self.k = hmac_sha256(&self.k, &[&self.v[..], &[0x00]])?;
        self.v = hmac_sha256(&self.k, &[&self.v[..]])?;
        Ok(())
    }
}

impl std::fmt::Debug for NonceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("state", &"<redacted>")
            .finish()
    }
}
