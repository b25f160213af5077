//! BIP32/BIP44 implementation.

#![forbid(unsafe_code)]

pub mod bip32;
pub mod keygen;
pub mod path;

pub use bip32::{ChildKeyHasher, HDNode, HmacSha512Hasher, HARDENED};
pub use keygen::KeyGenerator;
pub use path::DerivationPath;
