//! Sealed blob layout and shared text encodings.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Magic: "SDS1" (4 bytes)                      │
//! ├──────────────────────────────────────────────┤
//! │ Ephemeral X25519 public key (32 bytes)       │
//! ├──────────────────────────────────────────────┤
//! │ Nonce (12 bytes)                             │
//! ├──────────────────────────────────────────────┤
//! │ AES-256-GCM ciphertext + tag (>= 16 bytes)   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The whole blob is carried as standard base64 text.

use base64::Engine;

use crate::cipher::{NONCE_LENGTH, TAG_LENGTH};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PublicKey, KEY_LENGTH};

/// Magic bytes at the start of every sealed blob.
pub const MAGIC_SEALED: &[u8; 4] = b"SDS1";

/// Bytes before the AEAD payload: magic, ephemeral key, nonce.
pub const HEADER_LENGTH: usize = MAGIC_SEALED.len() + KEY_LENGTH + NONCE_LENGTH;

/// Smallest possible blob (empty plaintext).
pub const MIN_BLOB_LENGTH: usize = HEADER_LENGTH + TAG_LENGTH;

/// Encode bytes as base64.
pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Decode base64 string to bytes.
pub fn base64_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(data)
}

/// A parsed sealed blob. Nothing here has been authenticated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlob {
    /// Sender's one-time public key.
    pub ephemeral_pubkey: PublicKey,
    /// AES-GCM nonce.
    pub nonce: [u8; NONCE_LENGTH],
    /// Ciphertext with the 16-byte tag appended.
    pub payload: Vec<u8>,
}

impl SealedBlob {
    /// Associated data bound into the AEAD tag: magic and ephemeral key.
    pub fn associated_data(&self) -> Vec<u8> {
        associated_data(&self.ephemeral_pubkey)
    }

    /// Serialize to base64 text.
    pub fn to_text(&self) -> String {
        let mut out = Vec::with_capacity(HEADER_LENGTH + self.payload.len());
        out.extend_from_slice(MAGIC_SEALED);
        out.extend_from_slice(self.ephemeral_pubkey.as_bytes());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.payload);
        base64_encode(&out)
    }

    /// Parse base64 text. Fails with `MalformedInput` before any crypto runs.
    pub fn parse(text: &str) -> CryptoResult<Self> {
        let bytes = base64_decode(text.trim())
            .map_err(|e| CryptoError::MalformedInput(format!("ciphertext is not base64: {}", e)))?;

        if bytes.len() < MIN_BLOB_LENGTH {
            return Err(CryptoError::MalformedInput(format!(
                "ciphertext too short: {} bytes (minimum {})",
                bytes.len(),
                MIN_BLOB_LENGTH
            )));
        }

        if &bytes[..MAGIC_SEALED.len()] != MAGIC_SEALED {
            return Err(CryptoError::MalformedInput(
                "ciphertext has unknown magic bytes".to_string(),
            ));
        }

        let mut offset = MAGIC_SEALED.len();
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&bytes[offset..offset + KEY_LENGTH]);
        offset += KEY_LENGTH;

        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(&bytes[offset..offset + NONCE_LENGTH]);
        offset += NONCE_LENGTH;

        Ok(Self {
            ephemeral_pubkey: PublicKey::from_bytes(key),
            nonce,
            payload: bytes[offset..].to_vec(),
        })
    }
}

pub(crate) fn associated_data(ephemeral_pubkey: &PublicKey) -> Vec<u8> {
    let mut aad = Vec::with_capacity(MAGIC_SEALED.len() + KEY_LENGTH);
    aad.extend_from_slice(MAGIC_SEALED);
    aad.extend_from_slice(ephemeral_pubkey.as_bytes());
    aad
}

/// Check whether text is structurally a sealed blob (no decryption).
pub fn is_sealed(text: &str) -> bool {
    SealedBlob::parse(text).is_ok()
}
