//! The in-memory vault key.

use std::fmt;

use zeroize::Zeroize;

/// Length of the vault key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A wrapper around the 32-byte vault key that zeroes its memory when
/// dropped or when `zeroize` is called explicitly.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a new `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Returns `true` once every byte of the buffer has been overwritten.
    pub fn is_erased(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey(<redacted>)")
    }
}
