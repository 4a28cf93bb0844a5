use super::{PersistenceError, Record};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Check that a collection name is safe to use as a file stem.
///
/// Accepts non-empty names made of ASCII lowercase letters, digits, `_` and `-`.
pub fn validate_collection_name(name: &str) -> Result<(), PersistenceError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidCollectionName(name.to_string()))
    }
}

/// JSON-array-per-collection persistence store.
///
/// Each collection lives in `<data_dir>/<name>.json` as a single JSON array of
/// objects. Reads never fail: a missing or malformed file reads as an empty
/// collection. Writes replace the whole file through a temp file and rename.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    dir: PathBuf,
}

impl CollectionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn ensure_dir(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, name: &str) -> Result<PathBuf, PersistenceError> {
        validate_collection_name(name)?;
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Whether the collection has ever been written.
    pub fn exists(&self, name: &str) -> bool {
        self.file_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Load every record of a collection, degrading to empty on any read fault.
    pub fn read_all(&self, name: &str) -> Vec<Record> {
        let path = match self.file_path(name) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Refusing to read collection: {}", e);
                return vec![];
            }
        };
        if !path.exists() {
            tracing::debug!("Collection '{}' has no backing file yet", name);
            return vec![];
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read collection file {:?}: {}", path, e);
                return vec![];
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(items)) => {
                let total = items.len();
                let records: Vec<Record> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect();
                if records.len() != total {
                    tracing::warn!(
                        "Collection file {:?} holds {} non-object entries, ignoring them",
                        path,
                        total - records.len()
                    );
                }
                records
            }
            Ok(_) => {
                tracing::warn!("Collection file {:?} is not a JSON array", path);
                vec![]
            }
            Err(e) => {
                tracing::warn!("Failed to parse collection file {:?}: {}", path, e);
                vec![]
            }
        }
    }

    /// Replace the stored collection with `records`.
    pub fn write_all(&self, name: &str, records: &[Record]) -> Result<(), PersistenceError> {
        let path = self.file_path(name)?;
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(records)?;
        atomic_write(&path, json.as_bytes())?;
        tracing::debug!("Wrote {} record(s) to '{}'", records.len(), name);
        Ok(())
    }
}

/// Write `content` next to `path`, flush it to disk, then rename it into place.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), PersistenceError> {
    let temp_path = path.with_extension("json.tmp");
    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::into_record;
    use serde_json::json;

    fn sample(id: i64, name: &str) -> Record {
        into_record(json!({ "id": id, "name": name, "tags": ["a", "b"], "stats": { "hp": 10 } }))
            .unwrap()
    }

    #[test]
    fn test_write_and_read_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());
        let records = vec![sample(3, "c"), sample(1, "a"), sample(2, "b")];

        store.write_all("weapons", &records).unwrap();

        assert_eq!(store.read_all("weapons"), records);
    }

    #[test]
    fn test_read_missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().join("never_created"));
        assert!(store.read_all("weapons").is_empty());
        assert!(!store.exists("weapons"));
    }

    #[test]
    fn test_read_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("items.json"), "{ not json").unwrap();
        assert!(store.read_all("items").is_empty());
    }

    #[test]
    fn test_read_non_array_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("items.json"), r#"{"id": 1}"#).unwrap();
        assert!(store.read_all("items").is_empty());
    }

    #[test]
    fn test_read_skips_non_object_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("items.json"), r#"[{"id": 1}, 5, "x"]"#).unwrap();
        let records = store.read_all("items");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], 1);
    }

    #[test]
    fn test_collections_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());
        store.write_all("armors", &[sample(1, "plate")]).unwrap();
        assert!(store.read_all("weapons").is_empty());
        assert_eq!(store.read_all("armors").len(), 1);
    }

    #[test]
    fn test_write_creates_data_dir_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("data");
        let store = CollectionStore::new(data_dir.clone());
        store.write_all("lores", &[sample(1, "prophecy")]).unwrap();

        assert!(data_dir.join("lores.json").exists());
        assert!(!data_dir.join("lores.json.tmp").exists());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());
        for name in ["", "../etc", "Weapons", "a/b", "a.b"] {
            let result = store.write_all(name, &[]);
            assert!(
                matches!(result, Err(PersistenceError::InvalidCollectionName(_))),
                "expected rejection for {:?}",
                name
            );
            assert!(store.read_all(name).is_empty());
        }
        assert!(validate_collection_name("dnd_classes").is_ok());
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not dir").unwrap();
        let store = CollectionStore::new(blocker);
        let result = store.write_all("items", &[sample(1, "x")]);
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }
}
