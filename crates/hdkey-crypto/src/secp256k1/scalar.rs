//! Scalar arithmetic modulo curve order n.
//!
//! n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
//! Private keys, nonces, and signature components all live here.

#![forbid(unsafe_code)]

use super::limbs::{self, Limbs};

/// The secp256k1 curve order n, little-endian limbs.
const N: Limbs = [
    0xBFD25E8CD0364141,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// n - 2 for Fermat inversion.
const N_MINUS_2: Limbs = [
    0xBFD25E8CD036413F,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
];

/// floor(n / 2). Signatures with s above this are "high-S".
const HALF_N: Limbs = [
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
];

/// Element of Z/nZ where n is the secp256k1 curve order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scalar {
    limbs: Limbs,
}

impl Scalar {
    pub const ZERO: Self = Self { limbs: [0, 0, 0, 0] };

    pub const ONE: Self = Self { limbs: [1, 0, 0, 0] };

    /// floor(n / 2) as a scalar.
    pub const HALF_ORDER: Self = Self { limbs: HALF_N };

    /// Create scalar from 4 limbs (little-endian).
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self { limbs }
    }

    pub const fn from_u64(v: u64) -> Self {
        Self { limbs: [v, 0, 0, 0] }
    }

    /// Create scalar from bytes (big-endian).
    /// Returns None if value >= n.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = limbs::from_be_bytes(bytes);
        if limbs::gte(&limbs, &N) {
            None
        } else {
            Some(Self { limbs })
        }
    }

    /// Interpret 32 big-endian bytes as an integer and reduce it mod n.
    ///
    /// Used for message digests and for r = x mod n, where the input may
    /// exceed n. Any 256-bit value is below 2n, so one subtraction suffices.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let limbs = limbs::from_be_bytes(bytes);
        if limbs::gte(&limbs, &N) {
            Self {
                limbs: limbs::sub(&limbs, &N).0,
            }
        } else {
            Self { limbs }
        }
    }

    /// Convert to bytes (big-endian).
    pub fn to_bytes(&self) -> [u8; 32] {
        limbs::to_be_bytes(&self.limbs)
    }

    pub fn is_zero(&self) -> bool {
        limbs::is_zero(&self.limbs)
    }

    /// True when self > n/2.
    pub fn is_high(&self) -> bool {
        !limbs::gte(&HALF_N, &self.limbs)
    }

    /// Addition: self + other (mod n).
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = limbs::add(&self.limbs, &other.limbs);
        if carry || limbs::gte(&sum, &N) {
            Self {
                limbs: limbs::sub(&sum, &N).0,
            }
        } else {
            Self { limbs: sum }
        }
    }

    /// Subtraction: self - other (mod n).
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = limbs::sub(&self.limbs, &other.limbs);
        if borrow {
            Self {
                limbs: limbs::add(&diff, &N).0,
            }
        } else {
            Self { limbs: diff }
        }
    }

    /// Negation: -self (mod n).
    pub fn neg(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            Self {
                limbs: limbs::sub(&N, &self.limbs).0,
            }
        }
    }

    /// Multiplication: self * other (mod n).
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce_wide(&limbs::mul_wide(&self.limbs, &other.limbs))
    }

    /// Reduce 512-bit number mod n, one bit at a time from the MSB:
    /// rem = (rem * 2 + bit) mod n.
    fn reduce_wide(wide: &[u64; 8]) -> Self {
        let mut rem = Self::ZERO;

        for limb in wide.iter().rev() {
            for bit in (0..64).rev() {
                rem = rem.add(&rem);
                if (limb >> bit) & 1 == 1 {
                    rem = rem.add(&Self::ONE);
                }
            }
        }

        rem
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Multiplicative inverse via Fermat: self^(n-2) (mod n).
    /// Returns None for zero.
    pub fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        let mut result = Self::ONE;
        let mut base = *self;
        for &limb in N_MINUS_2.iter() {
            for bit in 0..64 {
                if (limb >> bit) & 1 == 1 {
                    result = result.mul(&base);
                }
                base = base.square();
            }
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_hex(s: &str) -> Scalar {
        let bytes = hex::decode(s).unwrap();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Scalar::from_bytes(&arr).unwrap()
    }

    fn bytes_from_hex(s: &str) -> [u8; 32] {
        let bytes = hex::decode(s).unwrap();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        arr
    }

    #[test]
    fn test_n_constant() {
        let arr = bytes_from_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        assert_eq!(limbs::from_be_bytes(&arr), N);
        assert!(Scalar::from_bytes(&arr).is_none());
        assert_eq!(Scalar::from_bytes_reduced(&arr), Scalar::ZERO);
    }

    #[test]
    fn test_half_order() {
        let half = scalar_from_hex("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0");
        assert_eq!(half, Scalar::HALF_ORDER);
        assert!(!half.is_high());
        assert!(half.add(&Scalar::ONE).is_high());
        // 2 * half + 1 = n = 0
        assert_eq!(half.add(&half).add(&Scalar::ONE), Scalar::ZERO);
    }

    #[test]
    fn test_from_bytes_reduced() {
        let max = [0xFFu8; 32];
        // 2^256 - 1 - n
        let expected =
            scalar_from_hex("000000000000000000000000000000014551231950B75FC4402DA1732FC9BEBE");
        assert_eq!(Scalar::from_bytes_reduced(&max), expected);

        let small = bytes_from_hex("0000000000000000000000000000000000000000000000000000000000000005");
        assert_eq!(Scalar::from_bytes_reduced(&small), Scalar::from_u64(5));
    }

    #[test]
    fn test_add_wrap() {
        let almost_n =
            scalar_from_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140");
        // (n-1) + 2 = n + 1 = 1 (mod n)
        assert_eq!(almost_n.add(&Scalar::from_u64(2)), Scalar::ONE);
    }

    #[test]
    fn test_sub_wrap() {
        let expected =
            scalar_from_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140");
        assert_eq!(Scalar::ONE.sub(&Scalar::from_u64(2)), expected);
    }

    #[test]
    fn test_neg() {
        let b = scalar_from_hex("deadbeefcafebabedeadbeefcafebabedeadbeefcafebabedeadbeefcafebabe");
        assert_eq!(b.add(&b.neg()), Scalar::ZERO);
        assert_eq!(Scalar::ZERO.neg(), Scalar::ZERO);
    }

    #[test]
    fn test_mul_simple() {
        assert_eq!(
            Scalar::from_u64(2).mul(&Scalar::from_u64(3)),
            Scalar::from_u64(6)
        );
    }

    #[test]
    fn test_inv() {
        let a = scalar_from_hex("deadbeefcafebabedeadbeefcafebabedeadbeefcafebabedeadbeefcafebabe");
        assert_eq!(a.mul(&a.inv().unwrap()), Scalar::ONE);
        assert_eq!(Scalar::ONE.inv().unwrap(), Scalar::ONE);
        assert!(Scalar::ZERO.inv().is_none());
    }

    #[test]
    fn test_against_k256() {
        use k256::elliptic_curve::ff::{Field, PrimeField};
        use k256::{FieldBytes, Scalar as K256Scalar};

        fn k256_from_bytes(b: [u8; 32]) -> K256Scalar {
            Option::<K256Scalar>::from(K256Scalar::from_repr(FieldBytes::from(b))).unwrap()
        }

        let test_values = [
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "deadbeefcafebabedeadbeefcafebabedeadbeefcafebabedeadbeefcafebabe",
            "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140", // n-1
        ];

        for hex_a in &test_values {
            let a = scalar_from_hex(hex_a);
            let ka = k256_from_bytes(a.to_bytes());

            let k256_inv: [u8; 32] = Option::<K256Scalar>::from(ka.invert())
                .unwrap()
                .to_repr()
                .into();
            assert_eq!(a.inv().unwrap().to_bytes(), k256_inv, "inv mismatch for {hex_a}");

            for hex_b in &test_values {
                let b = scalar_from_hex(hex_b);
                let kb = k256_from_bytes(b.to_bytes());

                let k256_mul: [u8; 32] = (ka * kb).to_repr().into();
                assert_eq!(a.mul(&b).to_bytes(), k256_mul, "mul mismatch for {hex_a} * {hex_b}");

                let k256_add: [u8; 32] = (ka + kb).to_repr().into();
                assert_eq!(a.add(&b).to_bytes(), k256_add, "add mismatch for {hex_a} + {hex_b}");

                let k256_sub: [u8; 32] = (ka - kb).to_repr().into();
                assert_eq!(a.sub(&b).to_bytes(), k256_sub, "sub mismatch for {hex_a} - {hex_b}");
            }
        }
    }
}
