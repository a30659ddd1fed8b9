//! Integration tests for the LDCM crypto module.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use ldcm::crypto::{
    decrypt_with, derive_key, encrypt_with, hash_password, verify_password, Argon2Params,
    SecretCipher, VaultKey, MIN_PBKDF2_ITERATIONS,
};
use ldcm::errors::LdcmError;

fn fast_params() -> Argon2Params {
    Argon2Params {
        memory_kib: 8192,
        iterations: 1,
        parallelism: 1,
    }
}

fn test_key(byte: u8) -> VaultKey {
    VaultKey::new([byte; 32])
}

// ---------------------------------------------------------------------------
// Password hashing + key derivation together
// ---------------------------------------------------------------------------

#[test]
fn password_hash_and_derived_key_work_end_to_end() {
    let (hash, salt) = hash_password("correct horse", &fast_params()).unwrap();
    assert!(verify_password("correct horse", &hash, &salt));
    assert!(!verify_password("wrong horse", &hash, &salt));

    let key = derive_key("correct horse", &salt, MIN_PBKDF2_ITERATIONS).unwrap();
    let blob = encrypt_with(&key, "postgres://localhost/db").unwrap();

    let again = derive_key("correct horse", &salt, MIN_PBKDF2_ITERATIONS).unwrap();
    assert_eq!(decrypt_with(&again, &blob).unwrap(), "postgres://localhost/db");
}

#[test]
fn each_init_gets_a_fresh_salt() {
    let (hash_a, salt_a) = hash_password("same password", &fast_params()).unwrap();
    let (hash_b, salt_b) = hash_password("same password", &fast_params()).unwrap();
    assert_ne!(salt_a, salt_b);
    assert_ne!(hash_a, hash_b);
    assert_eq!(STANDARD.decode(&salt_a).unwrap().len(), 16);
}

// ---------------------------------------------------------------------------
// Cipher
// ---------------------------------------------------------------------------

#[test]
fn blob_layout_is_nonce_tag_ciphertext() {
    let key = test_key(1);
    let blob = encrypt_with(&key, "hello").unwrap();
    let raw = STANDARD.decode(&blob).unwrap();
    // 12-byte nonce + 16-byte tag + 5 bytes of ciphertext.
    assert_eq!(raw.len(), 12 + 16 + 5);
}

#[test]
fn same_plaintext_encrypts_differently() {
    let key = test_key(2);
    let a = encrypt_with(&key, "same").unwrap();
    let b = encrypt_with(&key, "same").unwrap();
    assert_ne!(a, b);
    assert_eq!(decrypt_with(&key, &a).unwrap(), "same");
    assert_eq!(decrypt_with(&key, &b).unwrap(), "same");
}

#[test]
fn empty_and_unicode_values_roundtrip() {
    let key = test_key(3);
    for value in ["", "p@ss w0rd!", "пароль-密码-🔑"] {
        let blob = encrypt_with(&key, value).unwrap();
        assert_eq!(decrypt_with(&key, &blob).unwrap(), value);
    }
}

#[test]
fn any_modified_byte_fails_authentication() {
    let key = test_key(4);
    let blob = encrypt_with(&key, "tamper me").unwrap();
    let raw = STANDARD.decode(&blob).unwrap();

    for i in 0..raw.len() {
        let mut tampered = raw.clone();
        tampered[i] ^= 0x01;
        let result = decrypt_with(&key, &STANDARD.encode(&tampered));
        assert!(
            matches!(result, Err(LdcmError::DecryptionFailed)),
            "byte {i} modification was not detected"
        );
    }
}

#[test]
fn wrong_key_fails() {
    let blob = encrypt_with(&test_key(5), "secret").unwrap();
    assert!(matches!(
        decrypt_with(&test_key(6), &blob),
        Err(LdcmError::DecryptionFailed)
    ));
}

#[test]
fn truncated_or_garbage_blob_fails() {
    let key = test_key(7);
    assert!(matches!(
        decrypt_with(&key, "not base64!!"),
        Err(LdcmError::DecryptionFailed)
    ));
    assert!(matches!(
        decrypt_with(&key, &STANDARD.encode([0u8; 20])),
        Err(LdcmError::DecryptionFailed)
    ));
}

#[test]
fn cipher_without_key_refuses_work() {
    let mut cipher = SecretCipher::new();
    assert!(matches!(cipher.encrypt("x"), Err(LdcmError::KeyNotLoaded)));

    cipher.load_key(test_key(8));
    let blob = cipher.encrypt("x").unwrap();
    assert_eq!(cipher.decrypt(&blob).unwrap(), "x");

    cipher.clear_key();
    assert!(!cipher.is_loaded());
    assert!(matches!(cipher.decrypt(&blob), Err(LdcmError::KeyNotLoaded)));
}

#[test]
fn low_iteration_count_is_rejected() {
    let (_hash, salt) = hash_password("pw-long-enough", &fast_params()).unwrap();
    assert!(matches!(
        derive_key("pw-long-enough", &salt, 1_000),
        Err(LdcmError::KeyDerivationFailed(_))
    ));
}
