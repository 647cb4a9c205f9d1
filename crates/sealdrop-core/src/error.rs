//! Error types for sealdrop message flows.

use std::fmt;

use sealdrop_crypto::CryptoError;
use thiserror::Error;

/// Result type alias using sealdrop's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Step of a create or read flow.
///
/// Create: `Generating -> Sealing -> Publishing -> Encoding`.
/// Read: `Decoding -> Fetching -> Opening`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    Generating,
    Sealing,
    Publishing,
    Encoding,
    Decoding,
    Fetching,
    Opening,
}

impl FlowStep {
    /// Lowercase name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::Generating => "generating",
            FlowStep::Sealing => "sealing",
            FlowStep::Publishing => "publishing",
            FlowStep::Encoding => "encoding",
            FlowStep::Decoding => "decoding",
            FlowStep::Fetching => "fetching",
            FlowStep::Opening => "opening",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by a ledger implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No entry is stored under the requested public key.
    #[error("No entry for this public key")]
    NotFound,

    /// The ledger rejected or failed to store an entry.
    #[error("Publish failed: {0}")]
    Publish(String),

    /// The ledger failed to answer a lookup.
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

/// Core error type for sealdrop operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A local cryptographic or codec step failed.
    #[error("{step} failed: {source}")]
    Crypto {
        step: FlowStep,
        #[source]
        source: CryptoError,
    },

    /// No message was published under the access code's public key.
    #[error("Message not found")]
    NotFound,

    /// Ledger `put` failed.
    #[error("Publish error: {0}")]
    Publish(String),

    /// Ledger `get` failed for a reason other than a missing entry.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Plaintext exceeds the configured payload limit.
    #[error("Message too large: {size} bytes (limit {limit})")]
    MessageTooLarge { size: usize, limit: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Tag a crypto error with the step it happened in.
    pub fn crypto(step: FlowStep, source: CryptoError) -> Self {
        Error::Crypto { step, source }
    }

    /// Flow step at which the error occurred, if it came from a flow.
    pub fn step(&self) -> Option<FlowStep> {
        match self {
            Error::Crypto { step, .. } => Some(*step),
            Error::NotFound | Error::Fetch(_) => Some(FlowStep::Fetching),
            Error::Publish(_) => Some(FlowStep::Publishing),
            Error::MessageTooLarge { .. } | Error::Config(_) => None,
        }
    }

    /// The underlying crypto error, if any.
    pub fn crypto_error(&self) -> Option<&CryptoError> {
        match self {
            Error::Crypto { source, .. } => Some(source),
            _ => None,
        }
    }

    /// True when the ledger had nothing under the requested key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

impl From<LedgerError> for Error {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound => Error::NotFound,
            LedgerError::Publish(msg) => Error::Publish(msg),
            LedgerError::Fetch(msg) => Error::Fetch(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_error_display_names_step() {
        let err = Error::crypto(FlowStep::Opening, CryptoError::DecryptionFailed);
        assert_eq!(err.to_string(), "opening failed: Decryption failed");
        assert_eq!(err.step(), Some(FlowStep::Opening));
        assert_eq!(err.crypto_error(), Some(&CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_not_found_is_tagged_fetching() {
        let err: Error = LedgerError::NotFound.into();
        assert!(err.is_not_found());
        assert_eq!(err.step(), Some(FlowStep::Fetching));
        assert_eq!(err.to_string(), "Message not found");
    }

    #[test]
    fn test_ledger_errors_pass_through() {
        let err: Error = LedgerError::Publish("quota exceeded".into()).into();
        assert!(matches!(err, Error::Publish(ref m) if m == "quota exceeded"));
        assert_eq!(err.step(), Some(FlowStep::Publishing));

        let err: Error = LedgerError::Fetch("timeout".into()).into();
        assert!(matches!(err, Error::Fetch(ref m) if m == "timeout"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_message_too_large_display() {
        let err = Error::MessageTooLarge {
            size: 40_000,
            limit: 32_768,
        };
        assert_eq!(
            err.to_string(),
            "Message too large: 40000 bytes (limit 32768)"
        );
        assert_eq!(err.step(), None);
    }

    #[test]
    fn test_flow_step_display() {
        assert_eq!(FlowStep::Generating.to_string(), "generating");
        assert_eq!(FlowStep::Decoding.as_str(), "decoding");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;
        let err = Error::crypto(
            FlowStep::Decoding,
            CryptoError::InvalidCodeFormat("not Base58".into()),
        );
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Invalid access code format: not Base58")
        );
    }
}
