//! Ledger contract consumed by the message flows.
//!
//! The ledger is an external collaborator: an append-only store that maps a
//! public key (base64 text) to one sealed blob. Retry and timeout policy, if
//! any, belong to the implementation; the flows call each method once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Acknowledgement returned by a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: String,
}

/// Stored value for one public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Sealed blob, base64.
    pub ciphertext: String,
    /// When the ledger accepted the entry.
    pub published_at: DateTime<Utc>,
}

/// Key-value ledger addressed by public key.
///
/// At most one entry per key; a second `put` under the same key replaces the
/// first.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Store `ciphertext` under `public_key`.
    async fn put(&self, public_key: &str, ciphertext: &str) -> Result<Receipt, LedgerError>;

    /// Fetch the entry stored under `public_key`.
    ///
    /// Returns [`LedgerError::NotFound`] when nothing was published.
    async fn get(&self, public_key: &str) -> Result<LedgerEntry, LedgerError>;
}
