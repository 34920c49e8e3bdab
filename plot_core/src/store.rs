//! # Key-Value Store
//!
//! Plans persist as a single JSON string under a fixed key in a flat
//! key-value store, the same shape as browser local storage. Two stores are
//! provided:
//!
//! - [`MemoryStore`] - in-process map, for tests and embedding
//! - [`DirectoryStore`] - one file per key with atomic saves
//!
//! ## Atomic Saves
//!
//! `DirectoryStore::set` writes to `<key>.json.tmp`, syncs it to disk and
//! renames it over `<key>.json`, so an interrupted save never leaves a
//! half-written plan behind.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::errors::{PlanError, PlanResult};

/// Flat string-to-string storage.
pub trait KeyValueStore {
    /// Value for `key`, or `None` if it was never set (or was removed).
    fn get(&self, key: &str) -> PlanResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> PlanResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> PlanResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PlanResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PlanResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PlanResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// The directory is created lazily on the first `set`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> PlanResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PlanError::store_error("read", path.display().to_string(), e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> PlanResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            PlanError::store_error("create directory", self.root.display().to_string(), e.to_string())
        })?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let mut tmp_file = File::create(&tmp_path).map_err(|e| {
            PlanError::store_error("create temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        tmp_file.write_all(value.as_bytes()).map_err(|e| {
            PlanError::store_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        tmp_file.sync_all().map_err(|e| {
            PlanError::store_error("sync temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            PlanError::store_error("rename to final", path.display().to_string(), e.to_string())
        })?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> PlanResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PlanError::store_error("remove", path.display().to_string(), e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_store(name: &str) -> DirectoryStore {
        DirectoryStore::new(temp_dir().join(format!("plotwise_store_{}", name)))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("plan").unwrap(), None);
        store.set("plan", "{}").unwrap();
        assert_eq!(store.get("plan").unwrap().as_deref(), Some("{}"));
        store.remove("plan").unwrap();
        store.remove("plan").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_key_sanitized() {
        let store = DirectoryStore::new("/tmp/x");
        assert_eq!(store.path_for("../plan one"), Path::new("/tmp/x/___plan_one.json"));
    }

    #[test]
    fn test_directory_store_roundtrip() {
        let mut store = temp_store("roundtrip");
        store.set("plan", "{\"a\":1}").unwrap();
        assert_eq!(store.get("plan").unwrap().as_deref(), Some("{\"a\":1}"));

        // Temp file should not exist after a successful save
        assert!(!store.path_for("plan").with_extension("json.tmp").exists());

        store.remove("plan").unwrap();
        assert_eq!(store.get("plan").unwrap(), None);
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn test_directory_store_missing_key() {
        let store = temp_store("missing");
        assert_eq!(store.get("nothing_here").unwrap(), None);
    }
}
