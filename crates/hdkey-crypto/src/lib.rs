//! Cryptographic primitives for hdkey.
//!
//! Curve arithmetic is implemented here directly; hashing and HMAC come from
//! the RustCrypto crates. k256 is a dev-dependency used only to cross-check.

#![forbid(unsafe_code)]

pub mod codec;
pub mod hash;
pub mod hmac;
pub mod keypair;
pub mod rfc6979;
pub mod secp256k1;
pub mod signature;

pub use keypair::KeyPair;
pub use signature::EcdsaSignature;
