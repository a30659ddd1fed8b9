//! Cryptographic primitives for LDCM.
//!
//! This module provides:
//! - Argon2id master password hashing and verification (`password`)
//! - PBKDF2-HMAC-SHA256 encryption key derivation (`kdf`)
//! - The zeroize-on-drop key buffer (`keys`)
//! - AES-256-GCM encryption of secret values (`cipher`)

pub mod cipher;
pub mod kdf;
pub mod keys;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{hash_password, derive_key, SecretCipher, ...};
pub use cipher::{decrypt_with, encrypt_with, SecretCipher};
pub use kdf::{derive_key, MIN_PBKDF2_ITERATIONS};
pub use keys::VaultKey;
pub use password::{hash_password, verify_password, Argon2Params};
