//! Fixed-width big-endian integer encoding.
//!
//! HMAC inputs and serialized keys are fixed width; a 32-byte value with a
//! leading zero byte must stay 32 bytes. Everything here either pads to the
//! requested width or fails.

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};

/// Encode a big-endian unsigned integer into exactly `N` bytes.
///
/// Leading zero bytes are stripped first, then the value is left-padded.
/// Fails with `InvalidLength` if the significant bytes exceed `N`.
pub fn to_fixed_be<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > N {
        return Err(Error::InvalidLength {
            expected: N,
            got: significant.len(),
        });
    }

    let mut out = [0u8; N];
    out[N - significant.len()..].copy_from_slice(significant);
    Ok(out)
}

/// 256-bit big-endian addition, returning the carry-out.
pub fn add_be(a: &[u8; 32], b: &[u8; 32]) -> ([u8; 32], bool) {
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let sum = a[i] as u16 + b[i] as u16 + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    (out, carry != 0)
}

/// BIP32 `ser32`: a child index as 4 big-endian bytes.
pub fn ser32(i: u32) -> [u8; 4] {
    i.to_be_bytes()
}

/// Parse hex (optional `0x` prefix) into exactly `N` bytes, left-padding short values.
pub fn parse_hex<const N: usize>(s: &str) -> Result<[u8; N]> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    // hex::decode wants whole bytes.
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    }
    .map_err(|e| Error::InvalidHex(e.to_string()))?;

    to_fixed_be::<N>(&decoded)
}

/// Parse hex (optional `0x` prefix) that must be exactly `N` bytes long.
pub fn parse_hex_exact<const N: usize>(s: &str) -> Result<[u8; N]> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let decoded = hex::decode(digits).map_err(|e| Error::InvalidHex(e.to_string()))?;
    if decoded.len() != N {
        return Err(Error::InvalidLength {
            expected: N,
            got: decoded.len(),
        });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&decoded);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_pads() {
        let out: [u8; 4] = to_fixed_be(&[0x01, 0x02]).unwrap();
        assert_eq!(out, [0, 0, 1, 2]);
    }

    #[test]
    fn test_to_fixed_strips_sign_byte() {
        // 33-byte two's complement style encoding of a 32-byte value
        let mut wide = vec![0u8; 33];
        wide[1] = 0xff;
        let out: [u8; 32] = to_fixed_be(&wide).unwrap();
        assert_eq!(out[0], 0xff);
    }

    #[test]
    fn test_to_fixed_keeps_leading_zero_width() {
        let mut v = [0u8; 32];
        v[31] = 7;
        let out: [u8; 32] = to_fixed_be(&v).unwrap();
        assert_eq!(out, v);
        let empty: [u8; 32] = to_fixed_be(&[]).unwrap();
        assert_eq!(empty, [0u8; 32]);
    }

    #[test]
    fn test_to_fixed_overflow() {
        let r: Result<[u8; 2]> = to_fixed_be(&[1, 2, 3]);
        assert_eq!(r, Err(Error::InvalidLength { expected: 2, got: 3 }));
    }

    #[test]
    fn test_add_be_carry() {
        let max = [0xffu8; 32];
        let mut one = [0u8; 32];
        one[31] = 1;
        let (sum, carry) = add_be(&max, &one);
        assert_eq!(sum, [0u8; 32]);
        assert!(carry);

        let (sum, carry) = add_be(&one, &one);
        assert_eq!(sum[31], 2);
        assert!(!carry);
    }

    #[test]
    fn test_ser32() {
        assert_eq!(ser32(0x8000_002c), [0x80, 0x00, 0x00, 0x2c]);
    }

    #[test]
    fn test_parse_hex() {
        let v: [u8; 4] = parse_hex("0xabc").unwrap();
        assert_eq!(v, [0, 0, 0x0a, 0xbc]);
        assert!(matches!(parse_hex::<4>("zz"), Err(Error::InvalidHex(_))));

        let exact: [u8; 2] = parse_hex_exact("0x0102").unwrap();
        assert_eq!(exact, [1, 2]);
        assert_eq!(
            parse_hex_exact::<2>("01"),
            Err(Error::InvalidLength { expected: 2, got: 1 })
        );
    }
}
