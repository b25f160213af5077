//! Ethereum address encoding.

#![forbid(unsafe_code)]

pub mod address;

pub use address::{to_checksum, Address, ADDRESS_LEN};
