use thiserror::Error;

/// All errors that can occur in LDCM.
#[derive(Debug, Error)]
pub enum LdcmError {
    // --- Session errors ---
    #[error("Vault already initialized")]
    AlreadyInitialized,

    #[error("Vault not initialized — run `ldcm init` first")]
    NotInitialized,

    #[error("Invalid master password")]
    AuthenticationFailed,

    #[error("Vault is locked")]
    VaultLocked,

    // --- Crypto errors ---
    #[error("Encryption key not loaded — unlock the vault first")]
    KeyNotLoaded,

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Lookup errors ---
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    // --- Store errors ---
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // --- Process errors ---
    #[error("Failed to launch process: {0}")]
    ProcessSpawnError(String),

    #[error("Child process exited with code {0}")]
    ChildProcessFailed(i32),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl LdcmError {
    /// Shorthand for a lookup miss.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// Convenience type alias for LDCM results.
pub type Result<T> = std::result::Result<T, LdcmError>;
