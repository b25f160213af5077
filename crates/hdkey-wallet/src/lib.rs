//! Address and key queries over a cached BIP44 branch node.

#![forbid(unsafe_code)]

pub mod derivator;

pub use derivator::AddressDerivator;
