// mapty-lib/src/storage.rs
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STORAGE_FILE_NAME: &str = "storage.db";
pub(crate) const APP_DATA_DIR: &str = "mapty";
const DATA_ENV_VAR: &str = "MAPTY_DATA_DIR"; // Environment variable name

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not determine data directory.")]
    DataDir,
    #[error("I/O error accessing storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage connection failed: {0}")]
    Connection(#[source] rusqlite::Error),
    #[error("Storage query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value persistence.
pub trait KeyValueStorage {
    /// # Errors
    /// Fails when the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// # Errors
    /// Fails when the backing store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Fails when the backing store cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// SQLite file holding a single key/value table.
pub struct SqliteStorage {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and initializes the table.
    ///
    /// # Errors
    /// Returns `StorageError` if the file cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref()).map_err(StorageError::Connection)?;
        init(&conn)?;
        Ok(Self {
            conn,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// # Errors
    /// Returns `StorageError` if SQLite fails to initialize.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::Connection)?;
        init(&conn)?;
        Ok(Self {
            conn,
            path: ":memory:".into(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn init(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(StorageError::Connection)?;
    Ok(())
}

impl KeyValueStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Determines the path to the storage database file.
///
/// # Errors
/// Fails when no data directory is known or it cannot be created.
pub fn get_storage_path() -> Result<PathBuf, StorageError> {
    let data_dir = match std::env::var(DATA_ENV_VAR).ok() {
        Some(path_str) => PathBuf::from(path_str),
        None => dirs::data_dir()
            .ok_or(StorageError::DataDir)?
            .join(APP_DATA_DIR),
    };
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir.join(STORAGE_FILE_NAME))
}
