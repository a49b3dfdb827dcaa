// Key-value slots that hold the serialized task list

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A durable string store addressed by key.
///
/// `set` overwrites the previous value atomically from the caller's view:
/// a later `get` sees either the old value or the new one, never a mix.
pub trait Slot {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: Slot + ?Sized> Slot for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Validate a slot key
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Slot key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Slot key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid slot key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

/// In-process slot, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Open (creating if needed) a slot directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create slot directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn lock(&self, key: &str) -> Result<File> {
        let lock_path = self.dir.join(format!("{}.lock", key));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .context("Failed to open slot lock file")?;
        file.lock_exclusive().context("Failed to acquire slot lock")?;
        Ok(file)
    }
}

impl Slot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        match fs::read_to_string(self.value_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read slot file"),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        // Lock is released when the guard is dropped
        let _guard = self.lock(key)?;

        let path = self.value_path(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));

        let mut tmp = File::create(&tmp_path).context("Failed to create temporary slot file")?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?; // Ensure data is flushed to disk before the rename
        drop(tmp);

        fs::rename(&tmp_path, &path).context("Failed to replace slot file")?;
        debug!(path = ?path, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}
