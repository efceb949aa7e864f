use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SPIN_DATE_KEY: &str = "spinDate";
pub const SPINS_LEFT_KEY: &str = "spinsLeft";
pub const SEGMENTS_KEY: &str = "wheelSegments";
pub const LOCAL_STATS_KEY: &str = "localStats";

/// String-valued key/value persistence, the shape of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Keeps the whole map in a single JSON file, rewritten on every `set`
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt local state at {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write local state to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spinon-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(SPINS_LEFT_KEY), None);

        store.set(SPINS_LEFT_KEY, "3".to_string()).unwrap();
        assert_eq!(store.get(SPINS_LEFT_KEY), Some("3".to_string()));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");

        let mut store = FileStore::open(&path);
        store.set(SPIN_DATE_KEY, "2026-10-19".to_string()).unwrap();
        store.set(SPINS_LEFT_KEY, "4".to_string()).unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(SPIN_DATE_KEY), Some("2026-10-19".to_string()));
        assert_eq!(reopened.get(SPINS_LEFT_KEY), Some("4".to_string()));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(SPINS_LEFT_KEY), None);

        std::fs::remove_file(path).ok();
    }
}
