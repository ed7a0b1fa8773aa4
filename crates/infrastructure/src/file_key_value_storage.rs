use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use paas_application::KeyValueStorage;
use paas_core::{AppError, AppResult};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Key/value storage kept as one JSON object in a file.
///
/// The file is read once on open and rewritten on every change through an
/// owner-only temporary sibling that is renamed into place.
#[derive(Debug)]
pub struct FileKeyValueStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStorage {
    /// Opens the storage at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and treated as empty; it is replaced on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "ignoring unreadable state file");
                BTreeMap::new()
            }
        };

        info!(path = %path.display(), keys = entries.len(), "state file opened");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn update<F>(&self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory).map_err(|error| {
            AppError::Persistence(format!(
                "failed to create state directory '{}': {error}",
                directory.display()
            ))
        })?;

        let encoded = serde_json::to_vec_pretty(entries).map_err(|error| {
            AppError::Internal(format!("failed to encode state file: {error}"))
        })?;

        // Created owner-only; the file holds the bearer token.
        let mut temporary = NamedTempFile::new_in(directory).map_err(|error| {
            AppError::Persistence(format!(
                "failed to create temporary state file in '{}': {error}",
                directory.display()
            ))
        })?;
        temporary.write_all(&encoded).map_err(|error| {
            AppError::Persistence(format!("failed to write temporary state file: {error}"))
        })?;
        temporary.persist(&self.path).map_err(|error| {
            AppError::Persistence(format!(
                "failed to replace state file '{}': {}",
                self.path.display(),
                error.error
            ))
        })?;

        Ok(())
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

fn load_entries(path: &Path) -> AppResult<BTreeMap<String, String>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(error) => {
            return Err(AppError::Persistence(format!(
                "failed to read state file: {error}"
            )));
        }
    };

    serde_json::from_slice(&raw).map_err(|error| {
        AppError::MalformedStoredState(format!("state file is not a JSON string map: {error}"))
    })
}
