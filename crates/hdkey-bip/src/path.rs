//! Textual derivation paths: `m(/index['])*`.
//!
//! `'` marks a hardened index (offset by 2^31). The bare roots `m`, `M`,
//! `m'` and `M'` denote the node itself.

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use hdkey_core::{Error, Result};

use crate::bip32::HARDENED;

/// Parsed derivation path as raw child indices (hardened ones include the flag).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    pub fn from_indices(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend with one more index.
    pub fn child(&self, index: u32) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

fn parse_segment(segment: &str) -> Result<u32> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(rest) => (rest, true),
        None => (segment, false),
    };

    if let Some(negative) = digits.strip_prefix('-') {
        if !negative.is_empty() && negative.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIndex(format!("negative index {digits}")));
        }
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPath(format!("malformed segment {segment:?}")));
    }

    let index: u32 = digits
        .parse()
        .ok()
        .filter(|&i| i < HARDENED)
        .ok_or_else(|| Error::InvalidIndex(format!("index {digits} is not below 2^31")))?;

    Ok(if hardened { index | HARDENED } else { index })
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        if matches!(path, "m" | "M" | "m'" | "M'") {
            return Ok(Self::default());
        }

        let mut segments = path.split('/');
        if segments.next() != Some("m") {
            return Err(Error::InvalidPath(format!("path must start with \"m\": {path:?}")));
        }

        segments.map(parse_segment).collect::<Result<Vec<_>>>().map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for &index in &self.0 {
            if index >= HARDENED {
                write!(f, "/{}'", index - HARDENED)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bip44() {
        let path: DerivationPath = "m/44'/60'/0'/0".parse().unwrap();
        assert_eq!(
            path.indices(),
            &[HARDENED | 44, HARDENED | 60, HARDENED, 0]
        );
        assert_eq!(path.to_string(), "m/44'/60'/0'/0");
    }

    #[test]
    fn test_root_shorthand() {
        for root in ["m", "M", "m'", "M'"] {
            assert!(root.parse::<DerivationPath>().unwrap().is_root(), "{root}");
        }
    }

    #[test]
    fn test_invalid_first_segment() {
        for bad in ["x", "z/44'", "M/0", "", "/0"] {
            assert!(
                matches!(bad.parse::<DerivationPath>(), Err(Error::InvalidPath(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(matches!(
            "m/2147483648".parse::<DerivationPath>(),
            Err(Error::InvalidIndex(_))
        ));
        assert!(matches!(
            "m/2147483648'".parse::<DerivationPath>(),
            Err(Error::InvalidIndex(_))
        ));
        assert!(matches!(
            "m/99999999999999999999".parse::<DerivationPath>(),
            Err(Error::InvalidIndex(_))
        ));
        let max: DerivationPath = "m/2147483647'".parse().unwrap();
        assert_eq!(max.indices(), &[u32::MAX]);
    }

    #[test]
    fn test_negative_index() {
        assert!(matches!(
            "m/-1".parse::<DerivationPath>(),
            Err(Error::InvalidIndex(_))
        ));
        assert!(matches!(
            "m/0/-5'".parse::<DerivationPath>(),
            Err(Error::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_malformed_segments() {
        for bad in ["m/", "m//0", "m/1''", "m/0x10", "m/+5", "m/h", "m/1 "] {
            assert!(
                matches!(bad.parse::<DerivationPath>(), Err(Error::InvalidPath(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_child() {
        let path: DerivationPath = "m/44'".parse().unwrap();
        assert_eq!(path.child(7).to_string(), "m/44'/7");
    }
}
