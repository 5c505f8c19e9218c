// ── Document store ──
//
// `DashMap` of named collections. Each collection is locked independently,
// so lookups in one collection never block writes to another.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::collection::{Collection, CollectionFile, DocId, index_key};
use crate::error::StoreError;

const FILE_EXTENSION: &str = "json";

/// Outcome of `upsert_by_key`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Records with no existing match, now inserted.
    pub inserted: usize,
    /// Records whose key was already present.
    pub existing: usize,
}

/// Collections of JSON documents, optionally backed by a directory.
pub struct DocumentStore {
    root: Option<PathBuf>,
    collections: DashMap<String, Collection>,
}

impl DocumentStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            root: None,
            collections: DashMap::new(),
        }
    }

    /// Open (creating if needed) a store rooted at `dir`, loading every
    /// `<collection>.json` file found there.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = dir.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;

        let collections = DashMap::new();
        let entries = fs::read_dir(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Io {
                    path: root.clone(),
                    source,
                })?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_name(name).is_err() {
                continue;
            }
            let collection = load_collection(&path)?;
            debug!(name, documents = collection.len(), "loaded collection");
            collections.insert(name.to_owned(), collection);
        }

        Ok(Self {
            root: Some(root),
            collections,
        })
    }

    /// Directory backing this store, if persistent.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Write every collection back to disk. No-op for in-memory stores.
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(root) = &self.root else {
            return Ok(());
        };
        for entry in &self.collections {
            let path = collection_path(root, entry.key());
            let bytes = serde_json::to_vec_pretty(&entry.value().to_file())?;
            fs::write(&path, bytes).map_err(|source| StoreError::Io { path, source })?;
        }
        debug!(collections = self.collections.len(), "store flushed");
        Ok(())
    }

    // ── Collections ──────────────────────────────────────────────────

    pub fn create(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        if self.collections.contains_key(name) {
            return Err(StoreError::CollectionExists(name.to_owned()));
        }
        self.collections.insert(name.to_owned(), Collection::new());
        debug!(name, "collection created");
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Collection names in sorted order.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Remove a collection and its backing file.
    pub fn drop_collection(&self, name: &str) -> Result<(), StoreError> {
        if self.collections.remove(name).is_none() {
            return Err(StoreError::NoSuchCollection(name.to_owned()));
        }
        if let Some(root) = &self.root {
            let path = collection_path(root, name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(StoreError::Io { path, source }),
            }
        }
        info!(name, "collection dropped");
        Ok(())
    }

    /// Drop every collection.
    pub fn clear(&self) -> Result<(), StoreError> {
        for name in self.collections() {
            self.drop_collection(&name)?;
        }
        Ok(())
    }

    /// Maintain equality indexes on `fields`.
    pub fn index(&self, name: &str, fields: &[&str]) -> Result<(), StoreError> {
        let mut col = self.collection_mut(name)?;
        for field in fields {
            if col.add_index(field) {
                debug!(name, field, "index created");
            }
        }
        Ok(())
    }

    // ── Documents ────────────────────────────────────────────────────

    pub fn insert(&self, name: &str, record: Value) -> Result<DocId, StoreError> {
        let id = self.collection_mut(name)?.insert(record);
        Ok(id)
    }

    pub fn read(&self, name: &str, id: DocId) -> Result<Value, StoreError> {
        let col = self.collection(name)?;
        col.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchDocument {
                collection: name.to_owned(),
                id,
            })
    }

    /// Every document with its id, in insertion order.
    pub fn documents(&self, name: &str) -> Result<Vec<(DocId, Value)>, StoreError> {
        let col = self.collection(name)?;
        Ok(col.documents().map(|(id, doc)| (id, doc.clone())).collect())
    }

    pub fn len(&self, name: &str) -> Result<usize, StoreError> {
        Ok(self.collection(name)?.len())
    }

    /// Ids of documents whose top-level `field` equals `value`.
    ///
    /// Uses the field's index when one exists, otherwise scans.
    pub fn query_by_field(
        &self,
        name: &str,
        field: &str,
        value: &Value,
    ) -> Result<BTreeSet<DocId>, StoreError> {
        Ok(self.collection(name)?.find(field, &index_key(value)))
    }

    /// Insert each record whose key is not already present under `field`.
    ///
    /// Creates the collection and the `field` index when missing. Every
    /// record is considered, including the first.
    pub fn upsert_by_key<T, F>(
        &self,
        name: &str,
        field: &str,
        records: &[T],
        key_fn: F,
    ) -> Result<SyncReport, StoreError>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        validate_name(name)?;
        let mut col = self
            .collections
            .entry(name.to_owned())
            .or_insert_with(Collection::new);
        col.add_index(field);

        let mut report = SyncReport::default();
        for record in records {
            let key = key_fn(record);
            let matches = col.find(field, &key);
            if matches.is_empty() {
                let doc_id = col.insert(serde_json::to_value(record)?);
                info!(collection = name, doc_id, key = %key, "document inserted");
                report.inserted += 1;
            } else {
                debug!(collection = name, key = %key, ?matches, "document already stored");
                report.existing += 1;
            }
        }
        Ok(report)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn collection(
        &self,
        name: &str,
    ) -> Result<dashmap::mapref::one::Ref<'_, String, Collection>, StoreError> {
        self.collections
            .get(name)
            .ok_or_else(|| StoreError::NoSuchCollection(name.to_owned()))
    }

    fn collection_mut(
        &self,
        name: &str,
    ) -> Result<dashmap::mapref::one::RefMut<'_, String, Collection>, StoreError> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| StoreError::NoSuchCollection(name.to_owned()))
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_owned()))
    }
}

fn collection_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{name}.{FILE_EXTENSION}"))
}

fn load_collection(path: &Path) -> Result<Collection, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CollectionFile =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Collection::from_file(file))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize)]
    struct Alarm {
        #[serde(rename = "_id")]
        id: String,
        msg: String,
    }

    fn alarm(id: &str) -> Alarm {
        Alarm {
            id: id.into(),
            msg: format!("alarm {id}"),
        }
    }

    #[test]
    fn collection_lifecycle() {
        let store = DocumentStore::in_memory();
        store.create("Events").unwrap();
        store.create("Alarms").unwrap();

        assert!(store.exists("Alarms"));
        assert_eq!(store.collections(), vec!["Alarms", "Events"]);
        assert!(matches!(
            store.create("Alarms"),
            Err(StoreError::CollectionExists(_))
        ));
        assert!(matches!(
            store.create("../etc"),
            Err(StoreError::InvalidName(_))
        ));

        store.drop_collection("Events").unwrap();
        assert!(!store.exists("Events"));
        assert!(matches!(
            store.drop_collection("Events"),
            Err(StoreError::NoSuchCollection(_))
        ));

        store.clear().unwrap();
        assert!(store.collections().is_empty());
    }

    #[test]
    fn insert_read_and_query() {
        let store = DocumentStore::in_memory();
        store.create("Users").unwrap();
        let id = store
            .insert("Users", json!({"_id": "u1", "mac": "00:11:22:33:44:55"}))
            .unwrap();

        assert_eq!(store.read("Users", id).unwrap()["mac"], "00:11:22:33:44:55");
        assert_eq!(
            store.query_by_field("Users", "_id", &json!("u1")).unwrap(),
            BTreeSet::from([id])
        );

        store.index("Users", &["mac"]).unwrap();
        assert_eq!(
            store
                .query_by_field("Users", "mac", &json!("00:11:22:33:44:55"))
                .unwrap()
                .len(),
            1
        );
        assert!(matches!(
            store.read("Users", 99),
            Err(StoreError::NoSuchDocument { id: 99, .. })
        ));
        assert!(matches!(
            store.len("Missing"),
            Err(StoreError::NoSuchCollection(_))
        ));
    }

    #[test]
    fn upsert_counts_new_and_existing() {
        let store = DocumentStore::in_memory();

        let first = store
            .upsert_by_key("Alarms", "_id", &[alarm("a1"), alarm("a2")], |a| a.id.clone())
            .unwrap();
        assert_eq!(first, SyncReport { inserted: 2, existing: 0 });

        let second = store
            .upsert_by_key("Alarms", "_id", &[alarm("a2"), alarm("a3")], |a| a.id.clone())
            .unwrap();
        assert_eq!(second, SyncReport { inserted: 1, existing: 1 });

        assert_eq!(store.len("Alarms").unwrap(), 3);
        let ids: Vec<String> = store
            .documents("Alarms")
            .unwrap()
            .into_iter()
            .map(|(_, doc)| doc["_id"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn upsert_stores_first_record() {
        let store = DocumentStore::in_memory();
        let report = store
            .upsert_by_key("Alarms", "_id", &[alarm("only")], |a| a.id.clone())
            .unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(
            store
                .query_by_field("Alarms", "_id", &json!("only"))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn persists_across_open() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = DocumentStore::open(dir.path()).unwrap();
            store
                .upsert_by_key("Devices", "_id", &[alarm("d1"), alarm("d2")], |a| {
                    a.id.clone()
                })
                .unwrap();
            store.create("Scratch").unwrap();
            store.flush().unwrap();
            store.drop_collection("Scratch").unwrap();
        }

        assert!(dir.path().join("Devices.json").exists());
        assert!(!dir.path().join("Scratch.json").exists());

        let reopened = DocumentStore::open(dir.path()).unwrap();
        assert_eq!(reopened.collections(), vec!["Devices"]);
        assert_eq!(reopened.len("Devices").unwrap(), 2);
        let report = reopened
            .upsert_by_key("Devices", "_id", &[alarm("d2")], |a| a.id.clone())
            .unwrap();
        assert_eq!(report, SyncReport { inserted: 0, existing: 1 });
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Events.json"), b"{not json").unwrap();

        assert!(matches!(
            DocumentStore::open(dir.path()),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
