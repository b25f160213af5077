//! Elliptic curve point operations in Jacobian coordinates.
//!
//! secp256k1 curve: y² = x³ + 7 over GF(p)
//! Jacobian: (X, Y, Z) represents affine (X/Z², Y/Z³)

#![forbid(unsafe_code)]

use super::curve::ORDER;
use super::field::FieldElement;
use super::scalar::Scalar;

/// Generator point G (affine x-coordinate).
const GX: [u64; 4] = [
    0x59F2815B16F81798,
    0x029BFCDB2DCE28D9,
    0x55A06295CE870B07,
    0x79BE667EF9DCBBAC,
];

/// Generator point G (affine y-coordinate).
const GY: [u64; 4] = [
    0x9C47D08FFB10D4B8,
    0xFD17B448A6855419,
    0x5DA4FBFC0E1108A8,
    0x483ADA7726A3C465,
];

/// Point on secp256k1 in Jacobian coordinates.
/// Point at infinity has Z = 0.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl Point {
    /// Point at infinity (identity element).
    pub const INFINITY: Self = Self {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Create point from affine coordinates (x, y).
    /// Does not validate that the point is on the curve; see [`Point::is_on_curve`].
    pub fn from_affine(x: FieldElement, y: FieldElement) -> Self {
        Self {
            x,
            y,
            z: FieldElement::ONE,
        }
    }

    pub fn generator() -> Self {
        Self::from_affine(FieldElement::from_limbs(GX), FieldElement::from_limbs(GY))
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Convert to affine coordinates (x, y).
    /// Returns None for point at infinity.
    pub fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.is_infinity() {
            return None;
        }

        let z_inv = self.z.inv()?;
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2.mul(&z_inv);

        Some((self.x.mul(&z_inv2), self.y.mul(&z_inv3)))
    }

    /// Check y² = x³ + 7. The point at infinity is not on the curve.
    pub fn is_on_curve(&self) -> bool {
        match self.to_affine() {
            Some((x, y)) => y.square() == x.square().mul(&x).add(&FieldElement::SEVEN),
            None => false,
        }
    }

    /// Recover the point with x-coordinate `x` and the requested y parity.
    ///
    /// Returns None when x³ + 7 has no square root, i.e. no point has this x.
    pub fn lift_x(x: &FieldElement, odd: bool) -> Option<Self> {
        let rhs = x.square().mul(x).add(&FieldElement::SEVEN);
        let mut y = rhs.sqrt()?;
        if y.is_odd() != odd {
            y = y.neg();
        }
        Some(Self::from_affine(*x, y))
    }

    /// Point doubling: 2P, a=0 Jacobian formulas.
    pub fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::INFINITY;
        }

        // S = 4*X*Y²
        let y2 = self.y.square();
        let s = self.x.mul(&y2).mul_small(4);

        // M = 3*X²
        let m = self.x.square().mul_small(3);

        // X3 = M² - 2*S
        let x3 = m.square().sub(&s).sub(&s);

        // Y3 = M*(S - X3) - 8*Y⁴
        let y3 = m.mul(&s.sub(&x3)).sub(&y2.square().mul_small(8));

        // Z3 = 2*Y*Z
        let z3 = self.y.mul(&self.z).mul_small(2);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Point addition: P1 + P2.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_infinity() {
            return *other;
        }
        if other.is_infinity() {
            return *self;
        }

        let z1_2 = self.z.square();
        let z2_2 = other.z.square();
        let z1_3 = z1_2.mul(&self.z);
        let z2_3 = z2_2.mul(&other.z);

        // U1 = X1*Z2², U2 = X2*Z1²
        let u1 = self.x.mul(&z2_2);
        let u2 = other.x.mul(&z1_2);

        // S1 = Y1*Z2³, S2 = Y2*Z1³
        let s1 = self.y.mul(&z2_3);
        let s2 = other.y.mul(&z1_3);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if h.is_zero() {
            if r.is_zero() {
                return self.double();
            }
            return Self::INFINITY;
        }

        let h2 = h.square();
        let h3 = h2.mul(&h);

        // X3 = R² - H³ - 2*U1*H²
        let u1_h2 = u1.mul(&h2);
        let x3 = r.square().sub(&h3).sub(&u1_h2).sub(&u1_h2);

        // Y3 = R*(U1*H² - X3) - S1*H³
        let y3 = r.mul(&u1_h2.sub(&x3)).sub(&s1.mul(&h3));

        // Z3 = H*Z1*Z2
        let z3 = h.mul(&self.z).mul(&other.z);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Negation: (X, -Y, Z).
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// Double-and-add over a big-endian integer, MSB first.
    /// The integer is not reduced, so this also computes n * P.
    fn mul_be(&self, k: &[u8; 32]) -> Self {
        let mut result = Self::INFINITY;
        for byte in k.iter() {
            for bit in (0..8).rev() {
                result = result.double();
                if (byte >> bit) & 1 == 1 {
                    result = result.add(self);
                }
            }
        }
        result
    }

    /// Scalar multiplication: k * P.
    pub fn mul(&self, k: &Scalar) -> Self {
        if k.is_zero() || self.is_infinity() {
            return Self::INFINITY;
        }
        self.mul_be(&k.to_bytes())
    }

    /// Multiply generator G by scalar k: k * G.
    pub fn mul_generator(k: &Scalar) -> Self {
        Self::generator().mul(k)
    }

    /// n * P. Infinity for every point of the prime-order group.
    pub fn mul_by_order(&self) -> Self {
        self.mul_be(&ORDER)
    }

    /// a*P + b*Q with a single shared doubling chain (Shamir's trick).
    pub fn mul_add(a: &Scalar, p: &Self, b: &Scalar, q: &Self) -> Self {
        let pq = p.add(q);
        let a_bytes = a.to_bytes();
        let b_bytes = b.to_bytes();

        let mut result = Self::INFINITY;
        for (ab, bb) in a_bytes.iter().zip(b_bytes.iter()) {
            for bit in (0..8).rev() {
                result = result.double();
                match ((ab >> bit) & 1, (bb >> bit) & 1) {
                    (1, 1) => result = result.add(&pq),
                    (1, 0) => result = result.add(p),
                    (0, 1) => result = result.add(q),
                    _ => {}
                }
            }
        }
        result
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        if self.is_infinity() && other.is_infinity() {
            return true;
        }
        if self.is_infinity() || other.is_infinity() {
            return false;
        }

        // Cross-multiply: X1*Z2² = X2*Z1² and Y1*Z2³ = Y2*Z1³
        let z1_2 = self.z.square();
        let z2_2 = other.z.square();
        let z1_3 = z1_2.mul(&self.z);
        let z2_3 = z2_2.mul(&other.z);

        self.x.mul(&z2_2) == other.x.mul(&z1_2) && self.y.mul(&z2_3) == other.y.mul(&z1_3)
    }
}

impl Eq for Point {}
