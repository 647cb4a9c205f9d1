//! Bundled ledger implementations.
//!
//! - [`InMemoryLedger`]: explicit in-process store for tests and embedding.
//! - [`FileLedger`]: JSON file store so separate CLI runs can share entries.
//!
//! Both issue `tx_<uuid-v7>` receipt identifiers.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::trace;
use uuid::Uuid;

use crate::defaults::RECEIPT_PREFIX;
use crate::error::LedgerError;
use crate::traits::{Ledger, LedgerEntry, Receipt};

fn new_receipt() -> Receipt {
    Receipt {
        receipt_id: format!("{}{}", RECEIPT_PREFIX, Uuid::now_v7()),
    }
}

fn new_entry(ciphertext: &str) -> LedgerEntry {
    LedgerEntry {
        ciphertext: ciphertext.to_string(),
        published_at: Utc::now(),
    }
}

// =============================================================================
// IN-MEMORY LEDGER
// =============================================================================

/// Ledger held entirely in memory.
///
/// Each instance is its own store; nothing is shared process-wide.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<HashMap<String, LedgerEntry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Whether an entry exists under `public_key`.
    pub async fn contains(&self, public_key: &str) -> bool {
        self.entries.read().await.contains_key(public_key)
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn put(&self, public_key: &str, ciphertext: &str) -> Result<Receipt, LedgerError> {
        let mut entries = self.entries.write().await;
        entries.insert(public_key.to_string(), new_entry(ciphertext));
        trace!(
            subsystem = "ledger",
            component = "memory_ledger",
            op = "put",
            entry_count = entries.len(),
            "Entry stored"
        );
        Ok(new_receipt())
    }

    async fn get(&self, public_key: &str) -> Result<LedgerEntry, LedgerError> {
        let entries = self.entries.read().await;
        trace!(
            subsystem = "ledger",
            component = "memory_ledger",
            op = "get",
            "Entry lookup"
        );
        entries.get(public_key).cloned().ok_or(LedgerError::NotFound)
    }
}

// =============================================================================
// FILE LEDGER
// =============================================================================

/// On-disk layout of the file ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    entries: BTreeMap<String, LedgerEntry>,
}

/// Ledger stored as a single JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the target.
/// A mutex serializes writers within one process; concurrent processes are
/// not coordinated.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLedger {
    /// Use `path` as the backing file. It is created on first `put`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> std::io::Result<LedgerFile> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LedgerFile::default()),
            Err(e) => Err(e),
        }
    }

    async fn store(&self, file: &LedgerFile) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn put(&self, public_key: &str, ciphertext: &str) -> Result<Receipt, LedgerError> {
        let _guard = self.write_lock.lock().await;

        let mut file = self
            .load()
            .await
            .map_err(|e| LedgerError::Publish(format!("{}: {}", self.path.display(), e)))?;
        file.entries
            .insert(public_key.to_string(), new_entry(ciphertext));
        self.store(&file)
            .await
            .map_err(|e| LedgerError::Publish(format!("{}: {}", self.path.display(), e)))?;

        trace!(
            subsystem = "ledger",
            component = "file_ledger",
            op = "put",
            entry_count = file.entries.len(),
            path = %self.path.display(),
            "Entry stored"
        );
        Ok(new_receipt())
    }

    async fn get(&self, public_key: &str) -> Result<LedgerEntry, LedgerError> {
        let mut file = self
            .load()
            .await
            .map_err(|e| LedgerError::Fetch(format!("{}: {}", self.path.display(), e)))?;

        trace!(
            subsystem = "ledger",
            component = "file_ledger",
            op = "get",
            path = %self.path.display(),
            "Entry lookup"
        );
        file.entries.remove(public_key).ok_or(LedgerError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_put_get() {
        let ledger = InMemoryLedger::new();
        let receipt = ledger.put("pk1", "blob1").await.unwrap();
        assert!(receipt.receipt_id.starts_with("tx_"));

        let entry = ledger.get("pk1").await.unwrap();
        assert_eq!(entry.ciphertext, "blob1");
        assert_eq!(ledger.len().await, 1);
        assert!(ledger.contains("pk1").await);
    }

    #[tokio::test]
    async fn test_memory_get_missing() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty().await);
        assert_eq!(ledger.get("nope").await, Err(LedgerError::NotFound));
    }

    #[tokio::test]
    async fn test_memory_last_write_wins() {
        let ledger = InMemoryLedger::new();
        ledger.put("pk", "first").await.unwrap();
        ledger.put("pk", "second").await.unwrap();

        assert_eq!(ledger.get("pk").await.unwrap().ciphertext, "second");
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_instances_are_isolated() {
        let a = InMemoryLedger::new();
        let b = InMemoryLedger::new();
        a.put("pk", "blob").await.unwrap();
        assert_eq!(b.get("pk").await, Err(LedgerError::NotFound));
    }

    #[tokio::test]
    async fn test_receipts_are_unique() {
        let ledger = InMemoryLedger::new();
        let r1 = ledger.put("a", "x").await.unwrap();
        let r2 = ledger.put("b", "y").await.unwrap();
        assert_ne!(r1, r2);
    }

    #[tokio::test]
    async fn test_file_put_get() {
        let dir = tempdir().unwrap();
        let ledger = FileLedger::new(dir.path().join("ledger.json"));

        ledger.put("pk1", "blob1").await.unwrap();
        let entry = ledger.get("pk1").await.unwrap();
        assert_eq!(entry.ciphertext, "blob1");
    }

    #[tokio::test]
    async fn test_file_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let ledger = FileLedger::new(dir.path().join("absent.json"));
        assert_eq!(ledger.get("pk").await, Err(LedgerError::NotFound));
    }

    #[tokio::test]
    async fn test_file_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        FileLedger::new(&path).put("pk", "blob").await.unwrap();

        let reopened = FileLedger::new(&path);
        assert_eq!(reopened.get("pk").await.unwrap().ciphertext, "blob");
        assert_eq!(reopened.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_file_corrupt_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();

        let ledger = FileLedger::new(&path);
        assert!(matches!(ledger.get("pk").await, Err(LedgerError::Fetch(_))));
        assert!(matches!(
            ledger.put("pk", "blob").await,
            Err(LedgerError::Publish(_))
        ));
    }

    #[tokio::test]
    async fn test_file_concurrent_puts() {
        let dir = tempdir().unwrap();
        let ledger = std::sync::Arc::new(FileLedger::new(dir.path().join("ledger.json")));

        let mut handles = Vec::new();
        for i in 0..10 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .put(&format!("pk{}", i), &format!("blob{}", i))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10 {
            let entry = ledger.get(&format!("pk{}", i)).await.unwrap();
            assert_eq!(entry.ciphertext, format!("blob{}", i));
        }
    }
}
