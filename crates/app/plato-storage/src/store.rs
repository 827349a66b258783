use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Result, StorageError};

/// String key to string value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Store kept entirely in memory. Used for tests and as a fallback when the
/// on-disk store cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// The whole map is loaded on open and rewritten atomically after every
/// mutation, so a crash mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match plato_fs::read_to_string_if_exists(&path) {
            Ok(Some(contents)) if !contents.trim().is_empty() => serde_json::from_str(&contents)
                .map_err(|source| StorageError::Parse {
                    path: path.clone(),
                    source,
                })?,
            Ok(_) => BTreeMap::new(),
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        debug!("Opened store at {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        plato_fs::create_dirs_then_write(&self.path, contents).map_err(|source| {
            StorageError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    // Mutations are staged on a copy; memory only changes once the disk does.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let mut staged = entries.clone();
        staged.insert(key.to_owned(), value.to_owned());
        self.persist(&staged)?;
        *entries = staged;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut staged = entries.clone();
        staged.remove(key);
        self.persist(&staged)?;
        *entries = staged;
        Ok(())
    }
}
