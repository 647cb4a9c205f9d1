//! X25519 keypair generation and text encoding.
//!
//! Each sealed message gets its own keypair. Both halves travel as standard
//! base64 text (44 characters for 32 bytes).
//!
//! # Security
//!
//! - Private keys are zeroized on drop
//! - Private keys never appear in `Debug` output
//! - Random number generation uses the thread-local ChaCha-based CSPRNG,
//!   seeded from the operating system

use std::fmt;

use rand::RngCore;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};
use crate::format::{base64_decode, base64_encode};

/// Length of an X25519 key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Number of BLAKE3 bytes kept in a public key fingerprint.
const FINGERPRINT_LENGTH: usize = 8;

fn decode_key(text: &str, kind: &str) -> CryptoResult<[u8; KEY_LENGTH]> {
    let bytes = base64_decode(text.trim())
        .map_err(|e| CryptoError::InvalidKey(format!("{} key is not base64: {}", kind, e)))?;
    if bytes.len() != KEY_LENGTH {
        return Err(CryptoError::InvalidKey(format!(
            "{} key must be {} bytes, got {}",
            kind,
            KEY_LENGTH,
            bytes.len()
        )));
    }
    let mut arr = [0u8; KEY_LENGTH];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// X25519 public key (32 bytes).
///
/// Doubles as the ledger lookup key for a sealed message.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; KEY_LENGTH]);

impl PublicKey {
    /// Create a public key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse the base64 text form.
    pub fn parse(text: &str) -> CryptoResult<Self> {
        decode_key(text, "public").map(Self)
    }

    /// Get the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Base64 text form, as stored in the ledger and the access code.
    pub fn to_text(&self) -> String {
        base64_encode(&self.0)
    }

    /// Short Base58 tag of BLAKE3(key), safe to log.
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(&self.0);
        bs58::encode(&hash.as_bytes()[..FINGERPRINT_LENGTH]).into_string()
    }

    pub(crate) fn to_x25519(&self) -> X25519Public {
        X25519Public::from(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.fingerprint())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl std::str::FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// X25519 private key (32 bytes) with automatic zeroization.
#[derive(Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct PrivateKey([u8; KEY_LENGTH]);

impl PrivateKey {
    /// Create a private key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse the base64 text form.
    pub fn parse(text: &str) -> CryptoResult<Self> {
        decode_key(text, "private").map(Self)
    }

    /// Get the raw bytes of the private key.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Base64 text form. Only ever placed inside an access code.
    pub fn to_text(&self) -> String {
        base64_encode(&self.0)
    }

    pub(crate) fn to_x25519(&self) -> StaticSecret {
        StaticSecret::from(self.0)
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        let secret = self.to_x25519();
        let public = X25519Public::from(&secret);
        PublicKey(*public.as_bytes())
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// X25519 keypair, generated fresh for every message.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The public key (sealing key and ledger lookup key).
    pub public: PublicKey,
    /// The private key (exported only inside the access code).
    pub private: PrivateKey,
}

impl KeyPair {
    /// Generate a new random keypair.
    ///
    /// Panics only if the operating system cannot supply entropy, in which
    /// case no key material can be produced safely anyway.
    pub fn generate() -> Self {
        let mut secret_bytes = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut secret_bytes);

        let secret = StaticSecret::from(secret_bytes);
        let public = X25519Public::from(&secret);

        secret_bytes.zeroize();

        Self {
            public: PublicKey(*public.as_bytes()),
            private: PrivateKey(secret.to_bytes()),
        }
    }

    /// Create a keypair from an existing private key.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { public, private }
    }

    /// Parse both halves from text and check they belong together.
    pub fn from_text(public: &str, private: &str) -> CryptoResult<Self> {
        let public = PublicKey::parse(public)?;
        let private = PrivateKey::parse(private)?;
        if private.public_key() != public {
            return Err(CryptoError::InvalidKey(
                "private key does not match public key".to_string(),
            ));
        }
        Ok(Self { public, private })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"[REDACTED]")
            .finish()
    }
}
