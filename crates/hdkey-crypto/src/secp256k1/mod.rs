//! secp256k1 elliptic curve implementation.

#![forbid(unsafe_code)]

pub mod curve;
pub mod field;
mod limbs;
pub mod point;
pub mod pubkey;
pub mod scalar;
