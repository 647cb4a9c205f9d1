//! # sealdrop-crypto
//!
//! Cryptographic core of sealdrop: one-shot keypairs, sealed text messages,
//! and the access code that carries a keypair to its reader.
//!
//! ## Cryptographic Primitives
//!
//! - **Key exchange**: X25519 (Curve25519 ECDH) with an ephemeral sender key
//! - **Symmetric cipher**: AES-256-GCM (AEAD)
//! - **Key derivation**: HKDF-SHA256
//! - **Access code**: compact JSON, Base58 (Bitcoin alphabet)
//! - **Random generation**: ChaCha-based CSPRNG seeded by the OS
//!
//! Everything here is pure and synchronous; nothing touches I/O or shared
//! state, so every function is safe to call from any number of threads.
//!
//! ## Examples
//!
//! ### Seal and Open
//!
//! ```rust
//! use sealdrop_crypto::{open, seal, KeyPair};
//!
//! let keypair = KeyPair::generate();
//! let blob = seal(&keypair.public, "meet at noon").unwrap();
//! assert_eq!(open(&keypair.private, &blob).unwrap(), "meet at noon");
//! ```
//!
//! ### Access Codes
//!
//! ```rust
//! use sealdrop_crypto::{AccessCode, KeyPair};
//!
//! let keypair = KeyPair::generate();
//! let code = AccessCode::from_keypair(&keypair).encode().unwrap();
//!
//! let decoded = AccessCode::decode(&code).unwrap();
//! assert_eq!(decoded.to_keypair().unwrap(), keypair);
//! ```

pub mod cipher;
pub mod codec;
pub mod ecdh;
pub mod error;
pub mod format;
pub mod keys;
pub mod seal;

// Re-export commonly used types
pub use codec::{decode_fields, encode_fields, AccessCode};
pub use error::{CryptoError, CryptoResult};
pub use format::{is_sealed, SealedBlob};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use seal::{open, open_message, seal, seal_message};
