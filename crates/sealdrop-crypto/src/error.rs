//! Error types for cryptographic operations.

use thiserror::Error;

/// Cryptographic and codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key text is not a well-formed X25519 key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Sealed blob cannot be parsed at all.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Wrong key, truncated, or tampered ciphertext.
    ///
    /// Carries no detail so callers cannot tell the causes apart.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Encryption failed. Only reachable for inputs beyond AES-GCM limits.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Access code is not valid Base58, JSON, or is missing a field.
    #[error("Invalid access code format: {0}")]
    InvalidCodeFormat(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
