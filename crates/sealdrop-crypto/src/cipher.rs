//! AES-256-GCM cipher operations.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// AES-GCM nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Generate cryptographically secure random bytes.
pub fn generate_random<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a random nonce (12 bytes).
pub fn generate_nonce() -> [u8; NONCE_LENGTH] {
    generate_random()
}

/// Encrypt plaintext with AES-256-GCM, authenticating `aad` alongside it.
///
/// Returns ciphertext with appended authentication tag (16 bytes).
pub fn aes_gcm_encrypt(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::Encryption(e.to_string()))?;

    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CryptoError::Encryption("AES-GCM encryption failed".into()))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// The ciphertext must include the authentication tag (16 bytes) at the end,
/// and `aad` must match what was passed to [`aes_gcm_encrypt`]. Every failure
/// collapses into [`CryptoError::DecryptionFailed`].
pub fn aes_gcm_decrypt(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LENGTH],
    ciphertext: &[u8],
    aad: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::DecryptionFailed)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_nonce() {
        let nonce1 = generate_nonce();
        let nonce2 = generate_nonce();

        assert_eq!(nonce1.len(), NONCE_LENGTH);
        assert_ne!(nonce1, nonce2);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [42u8; 32];
        let nonce = [1u8; 12];
        let plaintext = b"Hello, World!";

        let ciphertext = aes_gcm_encrypt(&key, &nonce, plaintext, b"aad").unwrap();
        let decrypted = aes_gcm_decrypt(&key, &nonce, &ciphertext, b"aad").unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_ciphertext_carries_tag() {
        let key = [42u8; 32];
        let nonce = [1u8; 12];
        let plaintext = b"Hello, World!";

        let ciphertext = aes_gcm_encrypt(&key, &nonce, plaintext, &[]).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len() + TAG_LENGTH);
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let nonce = [1u8; 12];
        let ciphertext = aes_gcm_encrypt(&[42u8; 32], &nonce, b"Secret data", &[]).unwrap();
        let result = aes_gcm_decrypt(&[99u8; 32], &nonce, &ciphertext, &[]);

        assert_eq!(result, Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_decrypt_wrong_aad() {
        let key = [42u8; 32];
        let nonce = [1u8; 12];
        let ciphertext = aes_gcm_encrypt(&key, &nonce, b"Secret data", b"header-a").unwrap();
        let result = aes_gcm_decrypt(&key, &nonce, &ciphertext, b"header-b");

        assert_eq!(result, Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_decrypt_tampered_ciphertext() {
        let key = [42u8; 32];
        let nonce = [1u8; 12];
        let mut ciphertext = aes_gcm_encrypt(&key, &nonce, b"Secret data", &[]).unwrap();

        ciphertext[0] ^= 0xFF;

        let result = aes_gcm_decrypt(&key, &nonce, &ciphertext, &[]);
        assert_eq!(result, Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_encrypt_empty_plaintext() {
        let key = [42u8; 32];
        let nonce = [1u8; 12];

        let ciphertext = aes_gcm_encrypt(&key, &nonce, b"", &[]).unwrap();
        let decrypted = aes_gcm_decrypt(&key, &nonce, &ciphertext, &[]).unwrap();

        assert!(decrypted.is_empty());
    }
}
