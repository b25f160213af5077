use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("missing private key")]
    MissingPrivateKey,

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("invalid child index: {0}")]
    InvalidIndex(String),

    #[error("maximum derivation depth exceeded")]
    DepthExceeded,

    #[error("could not construct a recoverable signature")]
    RecoveryIdNotFound,

    #[error("invalid point: {0}")]
    InvalidPoint(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid seed length {got}: expected 16 to 64 bytes")]
    InvalidSeedLength { got: usize },

    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("address derivator not initialized")]
    NotInitialized,

    #[error("scalar out of range")]
    ScalarOutOfRange,

    #[error("point at infinity")]
    PointAtInfinity,
}
