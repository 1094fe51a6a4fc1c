//! Key/value global state used to cache catalogs between runs.
//!
//! The file store keeps every entry in one JSON object:
//!
//! ```text
//! {
//!   "FunctionTemplates": [...],
//!   "FunctionTemplateConfig": {...},
//!   "FunctionTemplateResources": {...},
//!   "FunctionTemplates.beta": [...],
//!   ...
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CatalogResult;

/// Persistent key/value store.
pub trait GlobalState {
    fn get(&self, key: &str) -> Option<Value>;

    fn update(&mut self, key: &str, value: Value) -> CatalogResult<()>;
}

/// Global state backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileGlobalState {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileGlobalState {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Discarding unreadable state file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn save(&self) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&self.entries)?)?;
        Ok(())
    }
}

impl GlobalState for FileGlobalState {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> CatalogResult<()> {
        self.entries.insert(key.to_string(), value);
        self.save()?;
        debug!("Updated global state key {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_update_persists() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("state.json");

        let mut state = FileGlobalState::open(&path);
        assert!(state.get("FunctionTemplates").is_none());
        state.update("FunctionTemplates", json!([1])).unwrap();

        let reopened = FileGlobalState::open(&path);
        assert_eq!(reopened.get("FunctionTemplates"), Some(json!([1])));
        assert_eq!(reopened.keys().collect::<Vec<_>>(), vec!["FunctionTemplates"]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let state = FileGlobalState::open(&path);
        assert_eq!(state.keys().count(), 0);
    }
}
