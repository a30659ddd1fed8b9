//! Integration tests for the LDCM vault session against a real SQLite file.

use std::path::PathBuf;
use std::time::Duration;

use ldcm::crypto::Argon2Params;
use ldcm::errors::LdcmError;
use ldcm::store::{SecretStore, SqliteStore};
use ldcm::vault::{VaultOptions, VaultSession, VaultState, DEFAULT_ENVIRONMENTS};
use tempfile::TempDir;

const PASSWORD: &str = "master-password";

fn options() -> VaultOptions {
    VaultOptions {
        argon2: Argon2Params {
            memory_kib: 8192,
            iterations: 1,
            parallelism: 1,
        },
        pbkdf2_iterations: 100_000,
        auto_lock: Some(Duration::from_secs(300)),
    }
}

/// Helper: a database path inside a fresh temp dir.
fn db_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("ldcm_vault.db");
    (dir, path)
}

fn open(path: &std::path::Path) -> VaultSession<SqliteStore> {
    VaultSession::new(SqliteStore::open(path).unwrap(), options())
}

fn initialized(path: &std::path::Path) -> VaultSession<SqliteStore> {
    let mut session = open(path);
    session.initialize(PASSWORD).unwrap();
    session
}

// ---------------------------------------------------------------------------
// Initialization and unlocking
// ---------------------------------------------------------------------------

#[test]
fn initialize_leaves_session_unlocked() {
    let (_dir, path) = db_path();
    let session = initialized(&path);
    assert_eq!(session.state(), VaultState::Unlocked);
    assert!(session.is_initialized().unwrap());
}

#[test]
fn second_initialize_keeps_original_credential() {
    let (_dir, path) = db_path();
    drop(initialized(&path));

    let mut session = open(&path);
    assert!(matches!(
        session.initialize("another-password"),
        Err(LdcmError::AlreadyInitialized)
    ));

    // The first password still works, the second never took effect.
    assert!(matches!(
        session.unlock("another-password"),
        Err(LdcmError::AuthenticationFailed)
    ));
    session.unlock(PASSWORD).unwrap();
}

#[test]
fn wrong_password_stays_locked() {
    let (_dir, path) = db_path();
    drop(initialized(&path));

    let mut session = open(&path);
    assert!(matches!(
        session.unlock("not-the-password"),
        Err(LdcmError::AuthenticationFailed)
    ));
    assert_eq!(session.state(), VaultState::Locked);
    assert!(matches!(
        session.add_secret(1, "K", "v", None),
        Err(LdcmError::VaultLocked)
    ));
}

#[test]
fn secrets_survive_reopen() {
    let (_dir, path) = db_path();
    {
        let mut session = initialized(&path);
        let project = session.create_project("api").unwrap();
        let dev = session.find_environment(project.id, "dev").unwrap();
        session
            .add_secret(dev.id, "DATABASE_URL", "postgres://localhost/api", None)
            .unwrap();
    }

    let mut session = open(&path);
    session.unlock(PASSWORD).unwrap();
    let project = session.find_project("api").unwrap();
    let dev = session.find_environment(project.id, "dev").unwrap();
    let secrets = session.decrypt_all(dev.id).unwrap();
    assert_eq!(secrets.get("DATABASE_URL"), Some("postgres://localhost/api"));
}

#[test]
fn values_are_stored_encrypted() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("api").unwrap();
    let dev = session.find_environment(project.id, "dev").unwrap();
    session.add_secret(dev.id, "TOKEN", "plain-token", None).unwrap();
    drop(session);

    let store = SqliteStore::open(&path).unwrap();
    let stored = store.secrets(dev.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].encrypted_value, "plain-token");
    assert!(!stored[0].encrypted_value.contains("plain-token"));
}

// ---------------------------------------------------------------------------
// Locking
// ---------------------------------------------------------------------------

#[test]
fn lock_blocks_decryption() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("web").unwrap();
    let dev = session.find_environment(project.id, "dev").unwrap();
    let secret = session.add_secret(dev.id, "K", "v", None).unwrap();

    session.lock();
    assert!(matches!(
        session.decrypt_secret(&secret.encrypted_value),
        Err(LdcmError::VaultLocked)
    ));
    assert!(matches!(session.get_secrets(dev.id), Err(LdcmError::VaultLocked)));
    assert!(matches!(session.decrypt_all(dev.id), Err(LdcmError::VaultLocked)));

    session.unlock(PASSWORD).unwrap();
    assert_eq!(session.decrypt_secret(&secret.encrypted_value).unwrap(), "v");
}

// ---------------------------------------------------------------------------
// Projects, environments, secrets
// ---------------------------------------------------------------------------

#[test]
fn new_project_has_default_environments() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("mobile").unwrap();

    let names: Vec<String> = session
        .get_environments(project.id)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, DEFAULT_ENVIRONMENTS);
}

#[test]
fn duplicate_project_names_are_allowed() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let a = session.create_project("dup").unwrap();
    let b = session.create_project("dup").unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(session.get_projects().unwrap().len(), 2);
    // Lookup by name returns the first one.
    assert_eq!(session.find_project("dup").unwrap().id, a.id);
}

#[test]
fn delete_project_cascades() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("gone").unwrap();
    let keep = session.create_project("kept").unwrap();

    for env in session.get_environments(project.id).unwrap() {
        session.add_secret(env.id, "K", "v", None).unwrap();
    }
    let kept_dev = session.find_environment(keep.id, "dev").unwrap();
    session.add_secret(kept_dev.id, "K", "kept", None).unwrap();

    let doomed_envs = session.get_environments(project.id).unwrap();
    session.delete_project(project.id).unwrap();

    assert!(session.get_environments(project.id).unwrap().is_empty());
    for env in doomed_envs {
        assert!(session.get_secrets(env.id).unwrap().is_empty());
    }
    assert_eq!(session.decrypt_all(kept_dev.id).unwrap().get("K"), Some("kept"));
}

#[test]
fn secrets_keep_insertion_order() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("svc").unwrap();
    let test_env = session.find_environment(project.id, "test").unwrap();

    for key in ["ZETA", "ALPHA", "MID"] {
        session.add_secret(test_env.id, key, "1", None).unwrap();
    }

    let secrets = session.decrypt_all(test_env.id).unwrap();
    let keys: Vec<&str> = secrets.keys().collect();
    assert_eq!(keys, ["ZETA", "ALPHA", "MID"]);
}

#[test]
fn update_secret_changes_key_and_value() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("svc").unwrap();
    let dev = session.find_environment(project.id, "dev").unwrap();
    let secret = session.add_secret(dev.id, "OLD", "one", None).unwrap();

    session.update_secret(secret.id, Some("NEW"), None).unwrap();
    session.update_secret(secret.id, None, Some("two")).unwrap();

    let secrets = session.decrypt_all(dev.id).unwrap();
    assert_eq!(secrets.get("OLD"), None);
    assert_eq!(secrets.get("NEW"), Some("two"));

    assert!(matches!(
        session.update_secret(9_999, Some("X"), None),
        Err(LdcmError::NotFound { .. })
    ));
}

#[test]
fn unknown_names_are_not_found() {
    let (_dir, path) = db_path();
    let mut session = initialized(&path);
    let project = session.create_project("svc").unwrap();

    let err = session.find_project("nope").unwrap_err();
    assert_eq!(err.to_string(), "Project 'nope' not found");

    let err = session.find_environment(project.id, "prod").unwrap_err();
    assert_eq!(err.to_string(), "Environment 'prod' not found");
}
