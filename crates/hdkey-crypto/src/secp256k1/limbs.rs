//! 256-bit limb helpers shared by the field and scalar types.
//!
//! Values are 4 x 64-bit limbs in little-endian order.

#![forbid(unsafe_code)]

pub(crate) type Limbs = [u64; 4];

/// Big-endian 32 bytes -> little-endian limbs.
pub(crate) fn from_be_bytes(bytes: &[u8; 32]) -> Limbs {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 24 - i * 8;
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(word);
    }
    limbs
}

/// Little-endian limbs -> big-endian 32 bytes.
pub(crate) fn to_be_bytes(limbs: &Limbs) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let start = 24 - i * 8;
        bytes[start..start + 8].copy_from_slice(&limb.to_be_bytes());
    }
    bytes
}

#[inline]
fn adc(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (s, c1) = a.overflowing_add(b);
    let (s, c2) = s.overflowing_add(carry as u64);
    (s, c1 | c2)
}

#[inline]
fn sbb(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (d, b1) = a.overflowing_sub(b);
    let (d, b2) = d.overflowing_sub(borrow as u64);
    (d, b1 | b2)
}

/// a + b, returning the carry-out.
pub(crate) fn add(a: &Limbs, b: &Limbs) -> (Limbs, bool) {
    let mut out = [0u64; 4];
    let mut carry = false;
    for i in 0..4 {
        let (s, c) = adc(a[i], b[i], carry);
        out[i] = s;
        carry = c;
    }
    (out, carry)
}

/// a - b, returning the borrow-out.
pub(crate) fn sub(a: &Limbs, b: &Limbs) -> (Limbs, bool) {
    let mut out = [0u64; 4];
    let mut borrow = false;
    for i in 0..4 {
        let (d, bo) = sbb(a[i], b[i], borrow);
        out[i] = d;
        borrow = bo;
    }
    (out, borrow)
}

/// a >= b.
pub(crate) fn gte(a: &Limbs, b: &Limbs) -> bool {
    for i in (0..4).rev() {
        if a[i] > b[i] {
            return true;
        }
        if a[i] < b[i] {
            return false;
        }
    }
    true
}

pub(crate) fn is_zero(a: &Limbs) -> bool {
    a.iter().all(|&l| l == 0)
}

/// Schoolbook 256x256 -> 512-bit product (8 little-endian limbs).
pub(crate) fn mul_wide(a: &Limbs, b: &Limbs) -> [u64; 8] {
    let mut wide = [0u64; 8];

    for i in 0..4 {
        let mut carry: u128 = 0;

        for j in 0..4 {
            let idx = i + j;
            let prod = (a[i] as u128) * (b[j] as u128);
            let acc = (wide[idx] as u128) + (prod as u64 as u128) + carry;
            wide[idx] = acc as u64;
            carry = (acc >> 64) + (prod >> 64);
        }

        let mut k = i + 4;
        while carry != 0 {
            debug_assert!(k < 8, "512-bit multiply overflow");
            let acc = (wide[k] as u128) + carry;
            wide[k] = acc as u64;
            carry = acc >> 64;
            k += 1;
        }
    }

    wide
}
