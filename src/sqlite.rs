// SQLite-backed slot

use crate::models::now_ms;
use crate::slot::{Slot, validate_key};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DB_FILE: &str = "tasklist.db";

/// Key-value slots stored in a single SQLite table
pub struct SqliteSlot {
    base_path: PathBuf,
    db: Connection,
}

impl SqliteSlot {
    /// Open or create `tasklist.db` inside the given directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let base_path = dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create slot directory")?;

        let db = Connection::open(base_path.join(DB_FILE)).context("Failed to open SQLite database")?;
        let slot = Self { base_path, db };
        slot.create_schema()?;
        Ok(slot)
    }

    /// Slots that only live as long as this value
    pub fn in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let slot = Self {
            base_path: PathBuf::new(),
            db,
        };
        slot.create_schema()?;
        Ok(slot)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating slot schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Slot for SqliteSlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        self.db.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, now_ms()],
        )?;

        debug!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}
