//! SQLite-backed `SecretStore`.
//!
//! Cascade delete is done by hand inside one transaction; the foreign
//! keys only guard against orphaned rows.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{Environment, MasterCredential, Project, Secret};
use super::SecretStore;
use crate::errors::Result;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS vault_settings (
        id                   INTEGER PRIMARY KEY AUTOINCREMENT,
        master_password_hash TEXT NOT NULL,
        salt                 TEXT NOT NULL,
        created_at           TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS projects (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS environments (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id),
        name       TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS secrets (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        environment_id  INTEGER NOT NULL REFERENCES environments(id),
        key             TEXT NOT NULL,
        encrypted_value TEXT NOT NULL,
        created_at      TEXT NOT NULL,
        expires_at      TEXT
    );
";

/// Vault records in a single SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self::with_connection(Connection::open(path)?)?;

        // Owner-only access on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(store)
    }

    /// A throwaway store, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn environment_from_row(row: &Row<'_>) -> rusqlite::Result<Environment> {
    Ok(Environment {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
    })
}

fn secret_from_row(row: &Row<'_>) -> rusqlite::Result<Secret> {
    Ok(Secret {
        id: row.get(0)?,
        environment_id: row.get(1)?,
        key: row.get(2)?,
        encrypted_value: row.get(3)?,
        created_at: row.get(4)?,
        expires_at: row.get(5)?,
    })
}

const SECRET_COLUMNS: &str = "id, environment_id, key, encrypted_value, created_at, expires_at";

impl SecretStore for SqliteStore {
    fn master_credential(&self) -> Result<Option<MasterCredential>> {
        let credential = self
            .conn
            .query_row(
                "SELECT master_password_hash, salt, created_at
                 FROM vault_settings ORDER BY id LIMIT 1",
                [],
                |row| {
                    Ok(MasterCredential {
                        password_hash: row.get(0)?,
                        salt: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(credential)
    }

    fn insert_master_credential(&mut self, credential: &MasterCredential) -> Result<()> {
        self.conn.execute(
            "INSERT INTO vault_settings (master_password_hash, salt, created_at)
             VALUES (?1, ?2, ?3)",
            params![credential.password_hash, credential.salt, credential.created_at],
        )?;
        Ok(())
    }

    fn insert_project(&mut self, name: &str, environments: &[&str]) -> Result<Project> {
        let created_at = Utc::now();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO projects (name, created_at) VALUES (?1, ?2)",
            params![name, created_at],
        )?;
        let id = tx.last_insert_rowid();

        for env in environments {
            tx.execute(
                "INSERT INTO environments (project_id, name) VALUES (?1, ?2)",
                params![id, env],
            )?;
        }
        tx.commit()?;

        Ok(Project {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    fn projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM projects ORDER BY id")?;
        let rows = stmt.query_map([], project_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn project(&self, id: i64) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM projects WHERE id = ?1",
                [id],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    fn delete_project(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM secrets WHERE environment_id IN
                 (SELECT id FROM environments WHERE project_id = ?1)",
            [id],
        )?;
        tx.execute("DELETE FROM environments WHERE project_id = ?1", [id])?;
        tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(())
    }

    fn environments(&self, project_id: i64) -> Result<Vec<Environment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name FROM environments WHERE project_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([project_id], environment_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn environment(&self, id: i64) -> Result<Option<Environment>> {
        let env = self
            .conn
            .query_row(
                "SELECT id, project_id, name FROM environments WHERE id = ?1",
                [id],
                environment_from_row,
            )
            .optional()?;
        Ok(env)
    }

    fn insert_secret(
        &mut self,
        environment_id: i64,
        key: &str,
        encrypted_value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Secret> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO secrets (environment_id, key, encrypted_value, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![environment_id, key, encrypted_value, created_at, expires_at],
        )?;

        Ok(Secret {
            id: self.conn.last_insert_rowid(),
            environment_id,
            key: key.to_string(),
            encrypted_value: encrypted_value.to_string(),
            created_at,
            expires_at,
        })
    }

    fn secrets(&self, environment_id: i64) -> Result<Vec<Secret>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SECRET_COLUMNS} FROM secrets WHERE environment_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map([environment_id], secret_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn secret(&self, id: i64) -> Result<Option<Secret>> {
        let secret = self
            .conn
            .query_row(
                &format!("SELECT {SECRET_COLUMNS} FROM secrets WHERE id = ?1"),
                [id],
                secret_from_row,
            )
            .optional()?;
        Ok(secret)
    }

    fn update_secret_key(&mut self, id: i64, key: &str) -> Result<()> {
        self.conn
            .execute("UPDATE secrets SET key = ?1 WHERE id = ?2", params![key, id])?;
        Ok(())
    }

    fn update_secret_value(&mut self, id: i64, encrypted_value: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE secrets SET encrypted_value = ?1 WHERE id = ?2",
            params![encrypted_value, id],
        )?;
        Ok(())
    }

    fn delete_secret(&mut self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM secrets WHERE id = ?1", [id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        SqliteStore::open(&path).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn database_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        SqliteStore::open(&path).unwrap();

        let perms = std::fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[test]
    fn master_credential_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        let credential = MasterCredential {
            password_hash: "$argon2id$fake".into(),
            salt: "c2FsdA==".into(),
            created_at: Utc::now(),
        };
        SqliteStore::open(&path)
            .unwrap()
            .insert_master_credential(&credential)
            .unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        let loaded = reopened.master_credential().unwrap().unwrap();
        assert_eq!(loaded.password_hash, credential.password_hash);
        assert_eq!(loaded.salt, credential.salt);
    }

    #[test]
    fn insert_project_creates_environments_in_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let project = store.insert_project("api", &["dev", "staging"]).unwrap();

        let envs = store.environments(project.id).unwrap();
        let names: Vec<&str> = envs.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["dev", "staging"]);
        assert!(envs.iter().all(|e| e.project_id == project.id));
    }

    #[test]
    fn delete_project_cascades() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let keep = store.insert_project("keep", &["dev"]).unwrap();
        let gone = store.insert_project("gone", &["dev", "test"]).unwrap();

        let keep_env = store.environments(keep.id).unwrap()[0].id;
        let gone_envs = store.environments(gone.id).unwrap();
        store.insert_secret(keep_env, "A", "blob", None).unwrap();
        let doomed = store.insert_secret(gone_envs[0].id, "B", "blob", None).unwrap();

        store.delete_project(gone.id).unwrap();

        assert!(store.project(gone.id).unwrap().is_none());
        assert!(store.environments(gone.id).unwrap().is_empty());
        assert!(store.secret(doomed.id).unwrap().is_none());
        for env in gone_envs {
            assert!(store.environment(env.id).unwrap().is_none());
            assert!(store.secrets(env.id).unwrap().is_empty());
        }
        assert_eq!(store.secrets(keep_env).unwrap().len(), 1);
    }

    #[test]
    fn secret_requires_existing_environment() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.insert_secret(999, "A", "blob", None).is_err());
    }

    #[test]
    fn duplicate_keys_are_allowed() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let project = store.insert_project("p", &["dev"]).unwrap();
        let env = store.environments(project.id).unwrap()[0].id;

        store.insert_secret(env, "TOKEN", "one", None).unwrap();
        store.insert_secret(env, "TOKEN", "two", None).unwrap();

        let values: Vec<String> = store
            .secrets(env)
            .unwrap()
            .into_iter()
            .map(|s| s.encrypted_value)
            .collect();
        assert_eq!(values, ["one", "two"]);
    }

    #[test]
    fn expires_at_roundtrips() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let project = store.insert_project("p", &["dev"]).unwrap();
        let env = store.environments(project.id).unwrap()[0].id;
        let when = Utc::now() + chrono::Duration::days(30);

        let secret = store.insert_secret(env, "K", "blob", Some(when)).unwrap();
        let loaded = store.secret(secret.id).unwrap().unwrap();
        assert_eq!(loaded.expires_at, Some(when));
    }

    #[test]
    fn delete_missing_rows_is_not_an_error() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.delete_secret(42).unwrap();
        store.delete_project(42).unwrap();
    }
}
