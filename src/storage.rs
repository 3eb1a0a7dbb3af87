use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key-value persistence for record lists and cached snapshots.
///
/// Every key maps to one JSON file under the data directory. Reads fail soft:
/// a missing or unparsable value is treated as "no data". Writes replace the
/// whole value; there are no partial updates and the last writer wins.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Load the list stored under `key`, or an empty list if the key is
    /// absent or its content cannot be parsed.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("Discarding unparsable value for key '{}': {}", key, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        }
    }

    /// Overwrite the list stored under `key` with the full new contents.
    pub fn save_list<T: Serialize>(&self, key: &str, items: &[T]) {
        self.write_value(key, items);
    }

    /// Load a single cached value, or `None` if absent or unparsable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Discarding unparsable value for key '{}': {}", key, e);
                    None
                }
            },
            Err(_) => None,
        }
    }

    /// Replace the single value stored under `key`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.write_value(key, value);
    }

    /// Remove the value stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }

    fn write_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = std::fs::create_dir_all(&self.root) {
            log::error!("Failed to create data directory: {}", e);
            return;
        }
        match serde_json::to_string_pretty(value) {
            Ok(json) => {
                if let Err(e) = std::fs::write(self.path_for(key), json) {
                    log::error!("Failed to save '{}': {}", key, e);
                }
            }
            Err(e) => log::error!("Failed to serialize '{}': {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    fn record(name: &str, count: u32) -> Record {
        Record {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn save_then_load_roundtrips_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let items = vec![record("b", 2), record("a", 1), record("c", 3)];
        storage.save_list("records", &items);

        let loaded: Vec<Record> = storage.load_list("records");
        assert_eq!(loaded, items);
    }

    #[test]
    fn missing_key_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let loaded: Vec<Record> = storage.load_list("nothing");
        assert!(loaded.is_empty());
    }

    #[test]
    fn unparsable_content_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        std::fs::write(dir.path().join("records.json"), "{not json").unwrap();

        let loaded: Vec<Record> = storage.load_list("records");
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_overwrites_the_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        storage.save_list("records", &[record("old", 1)]);
        storage.save_list("records", &[record("new", 2)]);

        let loaded: Vec<Record> = storage.load_list("records");
        assert_eq!(loaded, vec![record("new", 2)]);
    }

    #[test]
    fn single_value_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        assert_eq!(storage.get::<Record>("snapshot"), None);
        storage.set("snapshot", &record("x", 9));
        assert_eq!(storage.get::<Record>("snapshot"), Some(record("x", 9)));
        storage.remove("snapshot");
        assert_eq!(storage.get::<Record>("snapshot"), None);
    }
}
