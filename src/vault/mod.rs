//! Vault module: the locked/unlocked session and decrypted secret maps.
//!
//! This module provides:
//! - `VaultSession`, the state machine gating every decryption (`session`)
//! - `SecretMap`, an ordered key -> plaintext mapping (`secrets`)

pub mod secrets;
pub mod session;

// Re-export the most commonly used items.
pub use secrets::SecretMap;
pub use session::{SharedVault, VaultOptions, VaultSession, VaultState, DEFAULT_ENVIRONMENTS};
