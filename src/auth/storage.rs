//! String key/value storage backing the session store. `FileStorage` keeps the
//! entries in a single JSON object on disk; `MemoryStorage` keeps them in
//! process for tests and embedders.

use crate::auth::errors::AuthError;
use directories::ProjectDirs;
use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub trait Storage {
    /// # Errors
    /// Returns `AuthError::Storage` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// # Errors
    /// Returns `AuthError::Storage` if the backing store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns `AuthError::Storage` if the backing store cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), AuthError>;

    /// Writes every entry or none of them. The default implementation restores
    /// the previous values when a write fails part way.
    ///
    /// # Errors
    /// Returns `AuthError::Storage` if the backing store cannot be written.
    fn set_items(&mut self, items: &[(&str, &str)]) -> Result<(), AuthError> {
        let previous = items
            .iter()
            .map(|(key, _)| Ok((*key, self.get_item(key)?)))
            .collect::<Result<Vec<_>, AuthError>>()?;

        for (key, value) in items {
            if let Err(err) = self.set_item(key, value) {
                for (key, value) in &previous {
                    let restored = match value {
                        Some(value) => self.set_item(key, value),
                        None => self.remove_item(key),
                    };
                    if let Err(restore_err) = restored {
                        warn!("failed to restore {key}: {restore_err}");
                    }
                }
                return Err(err);
            }
        }

        Ok(())
    }

    /// # Errors
    /// Returns `AuthError::Storage` if the backing store cannot be written.
    fn remove_items(&mut self, keys: &[&str]) -> Result<(), AuthError> {
        keys.iter().try_for_each(|key| self.remove_item(key))
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), AuthError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), AuthError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Session entries persisted as a JSON object file.
///
/// Every write replaces the file atomically through a temporary file in the
/// same directory. On Unix the temporary file, and therefore the session file,
/// is created owner-only (0600).
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

#[derive(Default)]
struct Entries {
    items: BTreeMap<String, String>,
    corrupt: bool,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file that is not a JSON object of strings reads as empty, flagged so the
    /// next write replaces it.
    fn read_items(&self) -> Result<Entries, AuthError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::default()),
            Err(err) => {
                return Err(AuthError::Storage(format!(
                    "Failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        if contents.trim().is_empty() {
            return Ok(Entries::default());
        }

        match serde_json::from_str(&contents) {
            Ok(items) => Ok(Entries {
                items,
                corrupt: false,
            }),
            Err(err) => {
                warn!(
                    "ignoring corrupt session file {}: {err}",
                    self.path.display()
                );
                Ok(Entries {
                    items: BTreeMap::new(),
                    corrupt: true,
                })
            }
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<(), AuthError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let payload = serde_json::to_vec_pretty(items)
            .map_err(|err| AuthError::Storage(format!("Failed to encode session: {err}")))?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&payload)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| {
            AuthError::Storage(format!("Failed to write {}: {}", self.path.display(), err.error))
        })?;

        debug!("session file written: {}", self.path.display());

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.read_items()?.items.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), AuthError> {
        self.set_items(&[(key, value)])
    }

    fn remove_item(&mut self, key: &str) -> Result<(), AuthError> {
        self.remove_items(&[key])
    }

    fn set_items(&mut self, items: &[(&str, &str)]) -> Result<(), AuthError> {
        let mut entries = self.read_items()?;
        for (key, value) in items {
            entries.items.insert((*key).to_string(), (*value).to_string());
        }
        self.write_items(&entries.items)
    }

    fn remove_items(&mut self, keys: &[&str]) -> Result<(), AuthError> {
        let mut entries = self.read_items()?;
        let mut changed = entries.corrupt;
        for key in keys {
            changed |= entries.items.remove(*key).is_some();
        }
        if !changed {
            return Ok(());
        }
        self.write_items(&entries.items)
    }
}

/// Default session file location, e.g. `~/.config/syncflow/session.json` on Linux.
#[must_use]
pub fn default_session_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "syncflow", "syncflow")
        .map(|dirs| dirs.config_dir().join("session.json"))
}
