//! AES-256-GCM authenticated encryption of secret values.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce. The tag
//! is kept detached so the stored blob has a fixed layout:
//!
//!   base64( 12-byte nonce | 16-byte auth tag | ciphertext )

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use super::keys::VaultKey;
use crate::errors::{LdcmError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with `key` and return the encoded blob.
pub fn encrypt_with(key: &VaultKey, plaintext: &str) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LdcmError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|e| LdcmError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + TAG_LEN + buffer.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&tag);
    blob.extend_from_slice(&buffer);
    Ok(BASE64.encode(blob))
}

/// Decrypt a blob produced by `encrypt_with`.
///
/// Every failure (bad base64, short blob, tag mismatch, non UTF-8
/// plaintext) is reported as `DecryptionFailed`.
pub fn decrypt_with(key: &VaultKey, blob: &str) -> Result<String> {
    let data = BASE64
        .decode(blob)
        .map_err(|_| LdcmError::DecryptionFailed)?;

    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(LdcmError::DecryptionFailed);
    }

    let (nonce_bytes, rest) = data.split_at(NONCE_LEN);
    let (tag_bytes, ciphertext) = rest.split_at(TAG_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let tag = GenericArray::from_slice(tag_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| LdcmError::DecryptionFailed)?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(nonce, b"", &mut buffer, tag)
        .map_err(|_| LdcmError::DecryptionFailed)?;

    String::from_utf8(buffer).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        LdcmError::DecryptionFailed
    })
}

/// Holds the derived vault key between unlock and lock.
#[derive(Debug, Default)]
pub struct SecretCipher {
    key: Option<VaultKey>,
}

impl SecretCipher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a key. A previously loaded key is dropped (and zeroed).
    pub fn load_key(&mut self, key: VaultKey) {
        self.key = Some(key);
    }

    /// Overwrite the key buffer with zeros and release it.
    pub fn clear_key(&mut self) {
        if let Some(mut key) = self.key.take() {
            key.zeroize();
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.key.is_some()
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        encrypt_with(self.key()?, plaintext)
    }

    pub fn decrypt(&self, blob: &str) -> Result<String> {
        decrypt_with(self.key()?, blob)
    }

    fn key(&self) -> Result<&VaultKey> {
        self.key.as_ref().ok_or(LdcmError::KeyNotLoaded)
    }
}
