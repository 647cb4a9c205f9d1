//! Sealing and opening of text messages.
//!
//! # Sealing Flow
//!
//! 1. Generate an ephemeral X25519 keypair
//! 2. ECDH with the recipient public key
//! 3. Derive the message key via HKDF-SHA256
//! 4. Encrypt with AES-256-GCM under a fresh nonce, authenticating the header
//! 5. Emit `magic || ephemeral_pubkey || nonce || ciphertext+tag` as base64
//!
//! # Opening Flow
//!
//! 1. Parse the blob (structural errors are `MalformedInput`)
//! 2. ECDH with the embedded ephemeral key
//! 3. Derive the message key and decrypt
//!
//! Any cryptographic failure on open is reported as `DecryptionFailed`
//! without saying whether the key or the ciphertext was at fault.

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_nonce};
use crate::ecdh::{derive_message_key, ecdh};
use crate::error::{CryptoError, CryptoResult};
use crate::format::{associated_data, SealedBlob};
use crate::keys::{KeyPair, PrivateKey, PublicKey};

/// Seal a message so only the holder of `public_key`'s private half can read it.
///
/// Output differs on every call, even for identical inputs.
///
/// # Example
///
/// ```rust
/// use sealdrop_crypto::{open, seal, KeyPair};
///
/// let keypair = KeyPair::generate();
/// let blob = seal(&keypair.public, "hi there").unwrap();
/// assert_eq!(open(&keypair.private, &blob).unwrap(), "hi there");
/// ```
pub fn seal(public_key: &PublicKey, message: &str) -> CryptoResult<String> {
    let ephemeral = KeyPair::generate();

    let shared = ecdh(&ephemeral.private, public_key).ok_or_else(|| {
        CryptoError::InvalidKey("public key is a low-order point".to_string())
    })?;
    let key = derive_message_key(&shared, &ephemeral.public, public_key);

    let nonce = generate_nonce();
    let aad = associated_data(&ephemeral.public);
    let payload = aes_gcm_encrypt(key.as_bytes(), &nonce, message.as_bytes(), &aad)?;

    let blob = SealedBlob {
        ephemeral_pubkey: ephemeral.public.clone(),
        nonce,
        payload,
    };
    Ok(blob.to_text())
}

/// Open a sealed blob with the recipient's private key.
///
/// # Errors
///
/// - `MalformedInput` if `ciphertext` is not a sealed blob at all
/// - `DecryptionFailed` for a wrong key or altered bytes
pub fn open(private_key: &PrivateKey, ciphertext: &str) -> CryptoResult<String> {
    let blob = SealedBlob::parse(ciphertext)?;

    let shared =
        ecdh(private_key, &blob.ephemeral_pubkey).ok_or(CryptoError::DecryptionFailed)?;
    let key = derive_message_key(&shared, &blob.ephemeral_pubkey, &private_key.public_key());

    let plaintext = aes_gcm_decrypt(
        key.as_bytes(),
        &blob.nonce,
        &blob.payload,
        &blob.associated_data(),
    )?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

/// Seal using the base64 text form of the public key.
pub fn seal_message(public_key: &str, message: &str) -> CryptoResult<String> {
    let public_key = PublicKey::parse(public_key)?;
    seal(&public_key, message)
}

/// Open using the base64 text form of the private key.
pub fn open_message(private_key: &str, ciphertext: &str) -> CryptoResult<String> {
    let private_key = PrivateKey::parse(private_key)?;
    open(&private_key, ciphertext)
}
