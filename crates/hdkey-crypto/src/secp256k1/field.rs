//! Prime field arithmetic for secp256k1.
//! p = 2^256 - 2^32 - 977 = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F

#![forbid(unsafe_code)]

use super::limbs::{self, Limbs};

/// The secp256k1 field prime p = 2^256 - 2^32 - 977.
/// Represented as 4 x 64-bit limbs in little-endian order.
const P: Limbs = [
    0xFFFFFFFEFFFFFC2F,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// p - 2 for Fermat inversion.
const P_MINUS_2: Limbs = [
    0xFFFFFFFEFFFFFC2D,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// (p + 1) / 4. Since p = 3 (mod 4), a^((p+1)/4) is a square root of a.
const P_PLUS_1_DIV_4: Limbs = [
    0xFFFFFFFFBFFFFF0C,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0x3FFFFFFFFFFFFFFF,
];

/// Field element in secp256k1's prime field GF(p).
/// Always fully reduced, so limb equality is value equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement {
    limbs: Limbs,
}

impl FieldElement {
    pub const ZERO: Self = Self { limbs: [0, 0, 0, 0] };

    pub const ONE: Self = Self { limbs: [1, 0, 0, 0] };

    /// Curve constant b = 7 in y² = x³ + 7.
    pub const SEVEN: Self = Self { limbs: [7, 0, 0, 0] };

    /// Create field element from 4 limbs (little-endian).
    /// The caller guarantees the value is below p.
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self { limbs }
    }

    pub const fn from_u64(v: u64) -> Self {
        Self { limbs: [v, 0, 0, 0] }
    }

    /// Create field element from bytes (big-endian).
    /// Returns None if value >= p.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = limbs::from_be_bytes(bytes);
        if limbs::gte(&limbs, &P) {
            None
        } else {
            Some(Self { limbs })
        }
    }

    /// Convert to bytes (big-endian).
    pub fn to_bytes(&self) -> [u8; 32] {
        limbs::to_be_bytes(&self.limbs)
    }

    pub fn is_zero(&self) -> bool {
        limbs::is_zero(&self.limbs)
    }

    /// Check if self is odd (least significant bit is 1).
    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// Addition: self + other (mod p).
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = limbs::add(&self.limbs, &other.limbs);
        if carry || limbs::gte(&sum, &P) {
            Self {
                limbs: limbs::sub(&sum, &P).0,
            }
        } else {
            Self { limbs: sum }
        }
    }

    /// Subtraction: self - other (mod p).
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = limbs::sub(&self.limbs, &other.limbs);
        if borrow {
            Self {
                limbs: limbs::add(&diff, &P).0,
            }
        } else {
            Self { limbs: diff }
        }
    }

    /// Negation: -self (mod p).
    pub fn neg(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            Self {
                limbs: limbs::sub(&P, &self.limbs).0,
            }
        }
    }

    /// Multiplication: self * other (mod p).
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce(&limbs::mul_wide(&self.limbs, &other.limbs))
    }

    /// Square: self^2 (mod p).
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Multiply by a small constant.
    pub fn mul_small(&self, k: u64) -> Self {
        self.mul(&Self::from_u64(k))
    }

    /// Reduce 512-bit number mod p.
    /// Uses: 2^256 ≡ 2^32 + 977 (mod p).
    fn reduce(wide: &[u64; 8]) -> Self {
        // Fold the high half: t_hi * 2^256 -> t_hi * (2^32 + 977).
        let mut acc = [0u128; 4];
        for i in 0..4 {
            let hi = wide[i + 4] as u128;
            acc[i] = (wide[i] as u128) + hi * 977 + (hi << 32);
        }

        let mut result = [0u64; 5];
        let mut carry = 0u128;
        for i in 0..4 {
            carry += acc[i];
            result[i] = carry as u64;
            carry >>= 64;
        }
        result[4] = carry as u64;

        // The fold leaves at most a small overflow word; fold it again.
        while result[4] != 0 {
            let overflow = result[4] as u128;
            result[4] = 0;

            let mut carry = (result[0] as u128) + overflow * 977 + (overflow << 32);
            result[0] = carry as u64;
            carry >>= 64;
            for limb in result.iter_mut().take(4).skip(1) {
                carry += *limb as u128;
                *limb = carry as u64;
                carry >>= 64;
            }
            result[4] = carry as u64;
        }

        let mut out = [result[0], result[1], result[2], result[3]];
        while limbs::gte(&out, &P) {
            out = limbs::sub(&out, &P).0;
        }

        Self { limbs: out }
    }

    /// Exponentiation: self^exp (mod p), square-and-multiply.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut result = Self::ONE;
        let mut base = *self;

        for &limb in exp.iter() {
            for bit in 0..64 {
                if (limb >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
                base = base.square();
            }
        }

        result
    }

    /// Multiplicative inverse: self^(p-2) (mod p).
    pub fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(self.pow(&P_MINUS_2))
    }

    /// Square root, if one exists.
    ///
    /// Returns the root r with r² = self; the other root is -r.
    pub fn sqrt(&self) -> Option<Self> {
        let root = self.pow(&P_PLUS_1_DIV_4);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }
}
