//! Error types for the frame obfuscation codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building an obfuscator or transcoding frames.
#[derive(Error, Debug)]
pub enum Error {
    /// Session key has the wrong length (must be exactly 32 bytes)
    #[error("session key must be {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// Encryption method identifier outside the known set
    #[error("unsupported encryption method: {0}")]
    UnsupportedMethod(String),

    /// The underlying cipher rejected the key material
    #[error("payload cipher initialization failed")]
    CipherInit,

    /// Destination buffer cannot hold the encoded frame
    #[error("destination buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall { required: usize, available: usize },

    /// Input shorter than the minimum decodable message
    #[error("input too short: need at least {required} bytes, got {actual}")]
    InputTooShort { required: usize, actual: usize },

    /// De-masked header declares more trailing overhead than the body holds
    #[error("declared overhead exceeds frame body: {declared} > {available}")]
    CorruptExtraLen { declared: usize, available: usize },

    /// AEAD tag verification failed (tampering, truncation, or wrong key)
    #[error("payload authentication failed")]
    Authentication,

    /// AEAD seal rejected the operation
    #[error("payload encryption failed")]
    Seal,
}

impl Error {
    /// Check whether the caller can recover by retrying with a larger buffer.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Error::BufferTooSmall { .. })
    }

    /// Check whether this error indicates untrusted input failed validation.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::InputTooShort { .. } | Error::CorruptExtraLen { .. } | Error::Authentication
        )
    }
}
