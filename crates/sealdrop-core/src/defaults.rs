//! Centralized default constants for sealdrop.
//!
//! Configuration falls back to these values when the environment does not
//! override them.

// =============================================================================
// MESSAGES
// =============================================================================

/// Largest plaintext accepted by the create flow, in bytes.
///
/// Stands in for the transport payload limit of the backing ledger.
pub const MAX_MESSAGE_BYTES: usize = 32 * 1024;

// =============================================================================
// LEDGER
// =============================================================================

/// JSON file used by the CLI's file-backed ledger.
pub const LEDGER_PATH: &str = "sealdrop-ledger.json";

/// Prefix for receipt identifiers issued by the bundled ledgers.
pub const RECEIPT_PREFIX: &str = "tx_";

// =============================================================================
// LOGGING
// =============================================================================

/// Log output format when `LOG_FORMAT` is unset.
pub const LOG_FORMAT: &str = "text";

/// `EnvFilter` directive when `RUST_LOG` is unset.
pub const LOG_FILTER: &str = "sealdrop=info,sealdrop_core=info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_message_bytes_is_positive() {
        assert!(MAX_MESSAGE_BYTES > 0);
    }

    #[test]
    fn test_receipt_prefix() {
        assert!(RECEIPT_PREFIX.ends_with('_'));
    }
}
