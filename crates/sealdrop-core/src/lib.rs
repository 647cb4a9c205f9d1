//! # sealdrop-core
//!
//! Message flows on top of `sealdrop-crypto`: a sender seals a text message
//! under a freshly generated keypair, publishes the blob to a ledger keyed by
//! the public key, and hands the reader an access code that carries the
//! keypair. The reader decodes the code, fetches the blob, and opens it.
//!
//! The ledger is an external collaborator behind the [`Ledger`] trait.
//! [`InMemoryLedger`] and [`FileLedger`] are bundled for tests, embedding,
//! and the `sealdrop` CLI.
//!
//! ```rust
//! use std::sync::Arc;
//! use sealdrop_core::{InMemoryLedger, MessageService, ServiceConfig};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = MessageService::new(Arc::new(InMemoryLedger::new()), ServiceConfig::default());
//!
//! let created = service.create_message("hi there").await.unwrap();
//! let read = service.read_message(&created.access_code).await.unwrap();
//! assert_eq!(read.plaintext, "hi there");
//! # });
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod service;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{Config, LogConfig, LogFormat, ServiceConfig};
pub use error::{Error, FlowStep, LedgerError, Result};
pub use ledger::{FileLedger, InMemoryLedger};
pub use service::{CreatedMessage, MessageService, ReadMessage};
pub use traits::{Ledger, LedgerEntry, Receipt};
