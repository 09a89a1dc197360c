//! File-backed persistence for collections and environments.
//!
//! Each item is one pretty-printed JSON document named `<id>.json` inside a
//! per-kind directory:
//!
//! ```text
//! <base_dir>/
//!   collections/<id>.json
//!   environments/<id>.json
//! ```
//!
//! The base directory always comes from configuration.

use crate::config::EngineConfig;
use crate::environment::Environment;
use crate::error::{EngineError, Result};
use crate::models::Collection;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An item that can be kept in a [`JsonStore`].
pub trait Stored: Serialize + DeserializeOwned {
    /// Directory name and label used in errors.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Checks the item before it is written.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl Stored for Environment {
    const KIND: &'static str = "environment";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Stored for Collection {
    const KIND: &'static str = "collection";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<()> {
        Collection::validate(self)
    }
}

/// Root of the on-disk store.
#[derive(Debug, Clone)]
pub struct Storage {
    environments: JsonStore<Environment>,
    collections: JsonStore<Collection>,
}

impl Storage {
    /// Opens the store under `base_dir`, creating its directories.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        Ok(Self {
            environments: JsonStore::open(base_dir.join("environments"))?,
            collections: JsonStore::open(base_dir.join("collections"))?,
        })
    }

    /// Opens the store at the configured `storageDir`.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        match &config.storage_dir {
            Some(dir) => Self::new(dir),
            None => Err(EngineError::validation("storageDir", "is not configured")),
        }
    }

    pub fn environments(&self) -> &JsonStore<Environment> {
        &self.environments
    }

    pub fn collections(&self) -> &JsonStore<Collection> {
        &self.collections
    }
}

/// A directory of JSON documents of one kind.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Stored> JsonStore<T> {
    fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(|source| storage_error(&dir, source))?;
        Ok(Self {
            dir,
            _marker: PhantomData,
        })
    }

    /// Directory holding this kind's documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `item`, assigning a fresh UUID when its id is empty.
    ///
    /// # Returns
    ///
    /// The id the item was stored under.
    pub fn save(&self, item: &mut T) -> Result<String> {
        item.validate()?;
        if item.id().is_empty() {
            item.set_id(Uuid::new_v4().to_string());
        }

        let path = self.path_for(item.id())?;
        let json = serde_json::to_string_pretty(item)?;

        // Write to a sibling file first so readers never see a partial document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| storage_error(&tmp, source))?;
        fs::rename(&tmp, &path).map_err(|source| storage_error(&path, source))?;

        debug!("Saved {} {}", T::KIND, item.id());
        Ok(item.id().to_string())
    }

    /// Reads the item stored under `id`.
    pub fn load(&self, id: &str) -> Result<T> {
        let path = self.path_for(id)?;
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                EngineError::NotFound {
                    item: T::KIND,
                    id: id.to_string(),
                }
            } else {
                storage_error(&path, source)
            }
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Reads every stored item, sorted by id.
    ///
    /// Documents that cannot be decoded are logged and skipped.
    pub fn list(&self) -> Result<Vec<T>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| storage_error(&self.dir, source))?;

        let mut items = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| storage_error(&self.dir, source))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(|source| storage_error(&path, source))?;
            match serde_json::from_str::<T>(&content) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping unreadable {} file {}: {}", T::KIND, path.display(), e),
            }
        }

        items.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(items)
    }

    /// Removes the item stored under `id`.
    ///
    /// # Returns
    ///
    /// `true` if a document was removed, `false` if none existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {} {}", T::KIND, id);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(storage_error(&path, source)),
        }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

/// Rejects ids that could escape the store directory.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(EngineError::validation("id", "must not be empty"));
    }
    if id.contains('/') || id.contains('\\') || id.contains("..") || id.contains('\0') {
        return Err(EngineError::validation(
            "id",
            "must not contain path separators or '..'",
        ));
    }
    Ok(())
}

fn storage_error(path: &Path, source: io::Error) -> EngineError {
    EngineError::Storage {
        path: path.display().to_string(),
        source,
    }
}
