//! Message flows: create and read.
//!
//! ## Create
//!
//! `Generating -> Sealing -> Publishing -> Encoding`
//!
//! 1. Generate a fresh keypair
//! 2. Seal the plaintext under its public key
//! 3. Publish `public_key -> ciphertext` to the ledger
//! 4. Encode the keypair as an access code
//!
//! ## Read
//!
//! `Decoding -> Fetching -> Opening`
//!
//! 1. Decode the access code back into a keypair
//! 2. Fetch the ciphertext stored under the public key
//! 3. Open it with the private key
//!
//! ## Error Handling
//!
//! The first failing step aborts the flow and the error is returned tagged
//! with that step. Nothing is retried here: crypto failures are
//! deterministic, and ledger retry policy belongs to the ledger. A caller
//! retrying a failed create must call `create_message` again, which starts
//! over with a new keypair.
//!
//! Private keys live only on the stack of one flow call and inside the
//! access code handed back to the caller. They are never logged.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sealdrop_crypto::{open, seal, AccessCode, KeyPair};
use tracing::{debug, info, instrument, warn};

use crate::config::ServiceConfig;
use crate::error::{Error, FlowStep, Result};
use crate::traits::Ledger;

/// Output of a successful create flow.
#[derive(Clone, PartialEq, Eq)]
pub struct CreatedMessage {
    /// Code to hand to the reader out-of-band. Contains the private key.
    pub access_code: String,
    /// Ledger receipt for the published ciphertext.
    pub receipt_id: String,
}

impl fmt::Debug for CreatedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedMessage")
            .field("access_code", &"[REDACTED]")
            .field("receipt_id", &self.receipt_id)
            .finish()
    }
}

/// Output of a successful read flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMessage {
    pub plaintext: String,
    /// When the ledger accepted the ciphertext.
    pub published_at: DateTime<Utc>,
}

/// Orchestrates keypair generation, sealing, the ledger, and access codes.
///
/// Holds no per-message state, so one instance can serve concurrent flows.
#[derive(Clone)]
pub struct MessageService {
    ledger: Arc<dyn Ledger>,
    config: ServiceConfig,
}

impl MessageService {
    pub fn new(ledger: Arc<dyn Ledger>, config: ServiceConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Seal `plaintext`, publish it, and return the access code.
    #[instrument(skip(self, plaintext), fields(subsystem = "flow", component = "message_service", op = "create_message", message_len = plaintext.len()))]
    pub async fn create_message(&self, plaintext: &str) -> Result<CreatedMessage> {
        let start = Instant::now();
        let result = self.run_create(plaintext).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(created) => info!(
                receipt_id = %created.receipt_id,
                duration_ms,
                success = true,
                "Message created"
            ),
            Err(e) => warn!(
                flow_step = e.step().map(|s| s.as_str()),
                error = %e,
                duration_ms,
                success = false,
                "Create flow failed"
            ),
        }
        result
    }

    async fn run_create(&self, plaintext: &str) -> Result<CreatedMessage> {
        if plaintext.len() > self.config.max_message_bytes {
            return Err(Error::MessageTooLarge {
                size: plaintext.len(),
                limit: self.config.max_message_bytes,
            });
        }

        debug!(flow_step = %FlowStep::Generating, "Flow step");
        let keypair = KeyPair::generate();
        let public_key = keypair.public.to_text();
        let fingerprint = keypair.public.fingerprint();

        debug!(flow_step = %FlowStep::Sealing, key_fingerprint = %fingerprint, "Flow step");
        let ciphertext =
            seal(&keypair.public, plaintext).map_err(|e| Error::crypto(FlowStep::Sealing, e))?;

        debug!(
            flow_step = %FlowStep::Publishing,
            key_fingerprint = %fingerprint,
            ciphertext_len = ciphertext.len(),
            "Flow step"
        );
        let receipt = self.ledger.put(&public_key, &ciphertext).await?;

        debug!(flow_step = %FlowStep::Encoding, key_fingerprint = %fingerprint, "Flow step");
        let access_code = AccessCode::from_keypair(&keypair)
            .encode()
            .map_err(|e| Error::crypto(FlowStep::Encoding, e))?;

        Ok(CreatedMessage {
            access_code,
            receipt_id: receipt.receipt_id,
        })
    }

    /// Decode `access_code`, fetch its ciphertext, and open it.
    #[instrument(skip(self, access_code), fields(subsystem = "flow", component = "message_service", op = "read_message"))]
    pub async fn read_message(&self, access_code: &str) -> Result<ReadMessage> {
        let start = Instant::now();
        let result = self.run_read(access_code).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(read) => info!(
                message_len = read.plaintext.len(),
                duration_ms,
                success = true,
                "Message read"
            ),
            Err(e) => warn!(
                flow_step = e.step().map(|s| s.as_str()),
                error = %e,
                duration_ms,
                success = false,
                "Read flow failed"
            ),
        }
        result
    }

    async fn run_read(&self, access_code: &str) -> Result<ReadMessage> {
        debug!(flow_step = %FlowStep::Decoding, "Flow step");
        let keypair = AccessCode::decode(access_code)
            .and_then(|code| code.to_keypair())
            .map_err(|e| Error::crypto(FlowStep::Decoding, e))?;
        let fingerprint = keypair.public.fingerprint();

        debug!(flow_step = %FlowStep::Fetching, key_fingerprint = %fingerprint, "Flow step");
        let entry = self.ledger.get(&keypair.public.to_text()).await?;

        debug!(
            flow_step = %FlowStep::Opening,
            key_fingerprint = %fingerprint,
            ciphertext_len = entry.ciphertext.len(),
            "Flow step"
        );
        let plaintext = open(&keypair.private, &entry.ciphertext)
            .map_err(|e| Error::crypto(FlowStep::Opening, e))?;

        Ok(ReadMessage {
            plaintext,
            published_at: entry.published_at,
        })
    }
}

impl fmt::Debug for MessageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::ledger::InMemoryLedger;
    use crate::traits::{LedgerEntry, Receipt};
    use async_trait::async_trait;
    use sealdrop_crypto::CryptoError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> (MessageService, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = MessageService::new(ledger.clone(), ServiceConfig::default());
        (service, ledger)
    }

    /// Ledger that fails every call and counts attempts.
    #[derive(Default)]
    struct BrokenLedger {
        puts: AtomicUsize,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl Ledger for BrokenLedger {
        async fn put(&self, _: &str, _: &str) -> std::result::Result<Receipt, LedgerError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::Publish("ledger offline".into()))
        }

        async fn get(&self, _: &str) -> std::result::Result<LedgerEntry, LedgerError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::Fetch("ledger offline".into()))
        }
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let (service, ledger) = service();

        let created = service.create_message("hi there").await.unwrap();
        assert!(created.receipt_id.starts_with("tx_"));
        assert_eq!(ledger.len().await, 1);

        let read = service.read_message(&created.access_code).await.unwrap();
        assert_eq!(read.plaintext, "hi there");
    }

    #[tokio::test]
    async fn test_create_publishes_under_public_key() {
        let (service, ledger) = service();
        let created = service.create_message("keyed by public key").await.unwrap();

        let code = AccessCode::decode(&created.access_code).unwrap();
        assert!(ledger.contains(&code.public_key).await);
        assert!(code.message_id.is_none());
    }

    #[tokio::test]
    async fn test_each_create_uses_fresh_keypair() {
        let (service, ledger) = service();
        let a = service.create_message("same").await.unwrap();
        let b = service.create_message("same").await.unwrap();

        assert_ne!(a.access_code, b.access_code);
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test]
    async fn test_read_unpublished_code_is_not_found() {
        let (service, _) = service();
        let code = AccessCode::from_keypair(&KeyPair::generate())
            .encode()
            .unwrap();

        let err = service.read_message(&code).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.step(), Some(FlowStep::Fetching));
    }

    #[tokio::test]
    async fn test_read_garbage_code_fails_decoding() {
        let (service, _) = service();
        let err = service.read_message("not a code").await.unwrap_err();

        assert_eq!(err.step(), Some(FlowStep::Decoding));
        assert!(matches!(
            err.crypto_error(),
            Some(CryptoError::InvalidCodeFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_read_with_overwritten_entry_fails_opening() {
        let (service, ledger) = service();
        let created = service.create_message("original").await.unwrap();
        let code = AccessCode::decode(&created.access_code).unwrap();

        // Replace the entry with a blob sealed for someone else.
        let other = KeyPair::generate();
        let foreign = seal(&other.public, "impostor").unwrap();
        ledger.put(&code.public_key, &foreign).await.unwrap();

        let err = service.read_message(&created.access_code).await.unwrap_err();
        assert_eq!(err.step(), Some(FlowStep::Opening));
        assert_eq!(err.crypto_error(), Some(&CryptoError::DecryptionFailed));
    }

    #[tokio::test]
    async fn test_message_too_large_publishes_nothing() {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = MessageService::new(
            ledger.clone(),
            ServiceConfig {
                max_message_bytes: 8,
            },
        );

        let err = service.create_message("123456789").await.unwrap_err();
        assert!(matches!(
            err,
            Error::MessageTooLarge { size: 9, limit: 8 }
        ));
        assert!(ledger.is_empty().await);

        // Exactly at the limit is accepted.
        assert!(service.create_message("12345678").await.is_ok());
    }

    #[tokio::test]
    async fn test_publish_failure_is_not_retried() {
        let ledger = Arc::new(BrokenLedger::default());
        let service = MessageService::new(ledger.clone(), ServiceConfig::default());

        let err = service.create_message("hello").await.unwrap_err();
        assert!(matches!(err, Error::Publish(ref m) if m == "ledger offline"));
        assert_eq!(err.step(), Some(FlowStep::Publishing));
        assert_eq!(ledger.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_passes_through() {
        let ledger = Arc::new(BrokenLedger::default());
        let service = MessageService::new(ledger.clone(), ServiceConfig::default());
        let code = AccessCode::from_keypair(&KeyPair::generate())
            .encode()
            .unwrap();

        let err = service.read_message(&code).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert!(!err.is_not_found());
        assert_eq!(ledger.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_created_message_debug_redacts_code() {
        let (service, _) = service();
        let created = service.create_message("secret").await.unwrap();
        let debug = format!("{:?}", created);

        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&created.access_code));
        assert!(debug.contains(&created.receipt_id));
    }

    #[tokio::test]
    async fn test_concurrent_flows() {
        let (service, ledger) = service();

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let message = format!("message {}", i);
                let created = service.create_message(&message).await.unwrap();
                let read = service.read_message(&created.access_code).await.unwrap();
                assert_eq!(read.plaintext, message);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(ledger.len().await, 16);
    }
}
