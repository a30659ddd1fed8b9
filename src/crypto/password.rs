//! Master password hashing using Argon2id.
//!
//! The hash input is `password ‖ salt`, where `salt` is a random 16-byte
//! value stored base64-encoded next to the PHC hash string. The same salt
//! is later handed to the key derivation step (see `kdf`).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::errors::{LdcmError, Result};

/// Length of the vault salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Build an Argon2id hasher, refusing dangerously weak parameters.
fn hasher(argon2_params: &Argon2Params) -> Result<Argon2<'static>> {
    if argon2_params.memory_kib < MIN_MEMORY_KIB {
        return Err(LdcmError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            argon2_params.memory_kib
        )));
    }
    if argon2_params.iterations < 1 {
        return Err(LdcmError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if argon2_params.parallelism < 1 {
        return Err(LdcmError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        None,
    )
    .map_err(|e| LdcmError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Generate a fresh random salt, base64-encoded for storage.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    BASE64.encode(salt)
}

/// Hash a master password.
///
/// Returns `(phc_hash, salt)`. The PHC string embeds the Argon2 parameters,
/// so verification does not need the `Settings` that produced it.
pub fn hash_password(password: &str, argon2_params: &Argon2Params) -> Result<(String, String)> {
    let salt = generate_salt();
    let input = Zeroizing::new(format!("{password}{salt}"));

    let mut phc_salt_bytes = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut phc_salt_bytes);
    let phc_salt = SaltString::encode_b64(&phc_salt_bytes)
        .map_err(|e| LdcmError::KeyDerivationFailed(format!("invalid PHC salt: {e}")))?;
    let hash = hasher(argon2_params)?
        .hash_password(input.as_bytes(), &phc_salt)
        .map_err(|e| LdcmError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?
        .to_string();

    Ok((hash, salt))
}

/// Verify a master password against a stored hash and salt.
///
/// Any failure, including a malformed stored hash, is reported as `false`.
pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    let input = Zeroizing::new(format!("{password}{salt}"));

    Argon2::default()
        .verify_password(input.as_bytes(), &parsed)
        .is_ok()
}
