//! secp256k1 domain parameters and SEC1 point encoding.

#![forbid(unsafe_code)]

use hdkey_core::{Error, Result};

use super::field::FieldElement;
use super::point::Point;

/// Field prime p, big-endian.
pub const FIELD_PRIME: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
];

/// Group order n, big-endian.
pub const ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// floor(n / 2), big-endian.
pub const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Generator x-coordinate, big-endian.
pub const GENERATOR_X: [u8; 32] = [
    0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07,
    0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98,
];

/// Generator y-coordinate, big-endian.
pub const GENERATOR_Y: [u8; 32] = [
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08, 0xA8,
    0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19, 0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10, 0xD4, 0xB8,
];

pub const TAG_EVEN: u8 = 0x02;
pub const TAG_ODD: u8 = 0x03;
pub const TAG_UNCOMPRESSED: u8 = 0x04;

pub fn generator() -> Point {
    Point::generator()
}

/// SEC1 compressed encoding: `02|03 ‖ x`.
pub fn compress_point(point: &Point) -> Result<[u8; 33]> {
    let (x, y) = point.to_affine().ok_or(Error::PointAtInfinity)?;
    Ok(compress_affine(&x, &y))
}

/// Compressed encoding of affine coordinates already known to be on the curve.
pub(crate) fn compress_affine(x: &FieldElement, y: &FieldElement) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = if y.is_odd() { TAG_ODD } else { TAG_EVEN };
    out[1..].copy_from_slice(&x.to_bytes());
    out
}

/// Inverse of [`compress_point`].
pub fn decompress_point(bytes: &[u8; 33]) -> Result<Point> {
    let odd = match bytes[0] {
        TAG_EVEN => false,
        TAG_ODD => true,
        tag => return Err(Error::InvalidPoint(format!("bad compressed prefix 0x{tag:02x}"))),
    };

    let mut xb = [0u8; 32];
    xb.copy_from_slice(&bytes[1..]);
    let x = FieldElement::from_bytes(&xb)
        .ok_or_else(|| Error::InvalidPoint("x coordinate not below p".into()))?;

    Point::lift_x(&x, odd).ok_or_else(|| Error::InvalidPoint("x is not on the curve".into()))
}

/// Decode a 33-byte compressed or 65-byte uncompressed SEC1 point.
///
/// Returns the point and whether the input was compressed.
pub fn decode_point(bytes: &[u8]) -> Result<(Point, bool)> {
    match bytes.len() {
        33 => {
            let mut arr = [0u8; 33];
            arr.copy_from_slice(bytes);
            Ok((decompress_point(&arr)?, true))
        }
        65 => {
            if bytes[0] != TAG_UNCOMPRESSED {
                return Err(Error::InvalidPoint(format!(
                    "bad uncompressed prefix 0x{:02x}",
                    bytes[0]
                )));
            }
            let mut xb = [0u8; 32];
            let mut yb = [0u8; 32];
            xb.copy_from_slice(&bytes[1..33]);
            yb.copy_from_slice(&bytes[33..65]);

            let x = FieldElement::from_bytes(&xb)
                .ok_or_else(|| Error::InvalidPoint("x coordinate not below p".into()))?;
            let y = FieldElement::from_bytes(&yb)
                .ok_or_else(|| Error::InvalidPoint("y coordinate not below p".into()))?;

            let point = Point::from_affine(x, y);
            if !point.is_on_curve() {
                return Err(Error::InvalidPoint("point is not on the curve".into()));
            }
            Ok((point, false))
        }
        got => Err(Error::InvalidLength { expected: 33, got }),
    }
}
