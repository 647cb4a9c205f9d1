//! Structured logging field names for sealdrop.
//!
//! Every `tracing` event in this crate uses these constants so log
//! aggregation can query by the same field names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | A create or read flow failed |
//! | INFO  | Flow completions, startup |
//! | DEBUG | Flow step transitions, config choices |
//! | TRACE | Ledger reads and writes |
//!
//! Private keys and access codes are never logged. Public keys appear only
//! as their fingerprint (see `PublicKey::fingerprint`).

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "flow", "ledger", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "message_service", "memory_ledger", "file_ledger"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create_message", "read_message", "put", "get"
pub const OPERATION: &str = "op";

// ─── Flow fields ───────────────────────────────────────────────────────────

/// Current step of a create or read flow.
pub const FLOW_STEP: &str = "flow_step";

/// Short BLAKE3 fingerprint of the message public key.
pub const KEY_FINGERPRINT: &str = "key_fingerprint";

/// Ledger receipt identifier.
pub const RECEIPT_ID: &str = "receipt_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a plaintext message.
pub const MESSAGE_LEN: &str = "message_len";

/// Character length of a sealed blob.
pub const CIPHERTEXT_LEN: &str = "ciphertext_len";

/// Number of entries held by a ledger.
pub const ENTRY_COUNT: &str = "entry_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
