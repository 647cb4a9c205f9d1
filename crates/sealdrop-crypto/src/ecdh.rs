//! X25519 Elliptic Curve Diffie-Hellman key exchange.
//!
//! # Protocol
//!
//! For sealing:
//! 1. Sender generates an ephemeral keypair
//! 2. Sender computes: shared_secret = ECDH(ephemeral_private, recipient_public)
//! 3. Sender derives the message key via HKDF
//! 4. Ephemeral public key travels inside the sealed blob
//!
//! For opening:
//! 1. Recipient computes: shared_secret = ECDH(recipient_private, ephemeral_public)
//! 2. Recipient derives the same message key via HKDF
//!
//! The HKDF salt is `ephemeral_public || recipient_public`, so a key derived
//! for one recipient is useless for any other.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keys::{PrivateKey, PublicKey, KEY_LENGTH};

/// Shared secret from ECDH (32 bytes).
///
/// Raw X25519 output; pass it through HKDF before use as a key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Get the raw bytes of the shared secret.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Derived message key (32 bytes for AES-256).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MessageKey([u8; 32]);

impl MessageKey {
    /// Get the raw bytes of the derived key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Domain separation context for HKDF.
const HKDF_INFO_SEAL: &[u8] = b"sealdrop-seal-v1";

/// Perform X25519 Diffie-Hellman key exchange.
///
/// Returns `None` when `their_public` is a low-order point, which would
/// make the shared secret independent of our private key.
pub fn ecdh(our_private: &PrivateKey, their_public: &PublicKey) -> Option<SharedSecret> {
    let secret = our_private.to_x25519();
    let shared = secret.diffie_hellman(&their_public.to_x25519());
    if !shared.was_contributory() {
        return None;
    }
    Some(SharedSecret(*shared.as_bytes()))
}

/// Derive the AES-256 message key for one sealed blob.
pub fn derive_message_key(
    shared_secret: &SharedSecret,
    ephemeral_public: &PublicKey,
    recipient_public: &PublicKey,
) -> MessageKey {
    let mut salt = [0u8; KEY_LENGTH * 2];
    salt[..KEY_LENGTH].copy_from_slice(ephemeral_public.as_bytes());
    salt[KEY_LENGTH..].copy_from_slice(recipient_public.as_bytes());

    let hkdf = Hkdf::<Sha256>::new(Some(&salt), shared_secret.as_bytes());
    let mut key = [0u8; 32];
    // HKDF expand cannot fail with a 32-byte output
    hkdf.expand(HKDF_INFO_SEAL, &mut key)
        .expect("HKDF expand failed - this should never happen with 32-byte output");
    MessageKey(key)
}
