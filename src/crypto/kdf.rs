//! Encryption key derivation using PBKDF2-HMAC-SHA256.
//!
//! The salt is the base64 salt stored with the master credential; it is
//! decoded back to its raw 16 bytes before stretching.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{LdcmError, Result};

/// Lowest iteration count accepted from configuration.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive the 32-byte vault key from the master password and stored salt.
pub fn derive_key(password: &str, salt: &str, iterations: u32) -> Result<VaultKey> {
    if iterations < MIN_PBKDF2_ITERATIONS {
        return Err(LdcmError::KeyDerivationFailed(format!(
            "PBKDF2 iterations must be at least {MIN_PBKDF2_ITERATIONS} (got {iterations})"
        )));
    }

    let salt_bytes = BASE64
        .decode(salt)
        .map_err(|e| LdcmError::KeyDerivationFailed(format!("salt is not valid base64: {e}")))?;

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt_bytes, iterations, &mut bytes);
    let key = VaultKey::new(bytes);
    bytes.zeroize();

    Ok(key)
}
