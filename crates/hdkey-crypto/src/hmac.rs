//! HMAC-SHA512 (BIP32) and HMAC-SHA256 (RFC6979) over the RustCrypto `hmac` crate.

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;
type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA512 over the concatenation of `parts`.
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| Error::InvalidKey(format!("hmac-sha512 key: {e}")))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// HMAC-SHA256 over the concatenation of `parts`.
pub fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::InvalidKey(format!("hmac-sha256 key: {e}")))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case1() {
        let key = [0x0bu8; 20];
        let data: &[u8] = b"Hi There";
        assert_eq!(
            hex::encode(hmac_sha512(&key, &[data]).unwrap()),
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde\
             daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        );
        assert_eq!(
            hex::encode(hmac_sha256(&key, &[data]).unwrap()),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_rfc4231_case2() {
        let key = b"Jefe";
        let data: &[u8] = b"what do ya want for nothing?";
        assert_eq!(
            hex::encode(hmac_sha512(key, &[data]).unwrap()),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
        assert_eq!(
            hex::encode(hmac_sha256(key, &[data]).unwrap()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_parts_are_concatenated() {
        let key = b"Bitcoin seed";
        let whole = hmac_sha512(key, &[&b"abcdef"[..]]).unwrap();
        let split = hmac_sha512(key, &[&b"ab"[..], &b""[..], &b"cdef"[..]]).unwrap();
        assert_eq!(whole, split);
    }
}
