// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "CopperOne", "copperone"));

/// Document keys. Each key is an independent resource; there are no
/// cross-document transactions.
pub mod keys {
    pub const LEDGER: &str = "ledger";
    pub const SESSION: &str = "session";
    pub const ACCOUNT: &str = "account";
    pub const PIN: &str = "pin";
    pub const ASSISTANT_MODEL: &str = "assistant.model";
    pub const LEARNING_COMPLETED: &str = "learning.completed";
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn db_path(data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("copperone.sqlite"))
}

pub fn open_or_init(data_dir: &Path) -> Result<SqliteStore> {
    let path = db_path(data_dir)?;
    SqliteStore::open(&path)
}

/// Key-value persistence of whole JSON documents.
pub trait DurableStore: Send + Sync {
    fn read_raw(&self, key: &str) -> Result<Option<String>>;
    fn write_raw(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Loads a document. Read failures and documents that no longer
/// deserialize are treated as absent; a corrupt document is removed so
/// the caller's fresh default replaces it on the next write.
pub fn read_doc<T: DeserializeOwned>(store: &dyn DurableStore, key: &str) -> Option<T> {
    let raw = match store.read_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "store read failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(doc) => Some(doc),
        Err(err) => {
            warn!(key, error = %err, "discarding corrupt stored document");
            if let Err(err) = store.remove(key) {
                warn!(key, error = %err, "could not remove corrupt document");
            }
            None
        }
    }
}

pub fn write_doc<T: Serialize>(store: &dyn DurableStore, key: &str, doc: &T) -> Result<()> {
    let raw = serde_json::to_string(doc).with_context(|| format!("Serialize document '{}'", key))?;
    store.write_raw(key, &raw)?;
    debug!(key, bytes = raw.len(), "document written");
    Ok(())
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        f(&conn)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS documents(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

impl DurableStore for SqliteStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let v: Option<String> = conn
                .query_row(
                    "SELECT value FROM documents WHERE key=?1",
                    params![key],
                    |r| r.get(0),
                )
                .optional()
                .with_context(|| format!("Read document '{}'", key))?;
            Ok(v)
        })
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents(key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
                params![key, value],
            )
            .with_context(|| format!("Write document '{}'", key))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM documents WHERE key=?1", params![key])?;
            Ok(())
        })
    }
}

/// In-process store used by tests and `--ephemeral` runs.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let docs = self
            .docs
            .lock()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        Ok(docs.get(key).cloned())
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        docs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| anyhow!("document store lock poisoned"))?;
        docs.remove(key);
        Ok(())
    }
}
