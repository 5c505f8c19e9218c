// ── Document collection ──
//
// Ordered document storage with per-field equality indexes. Document ids
// are assigned sequentially and never reused within a collection.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned to a document on insert.
pub type DocId = u64;

/// Index key for a field value: strings index as themselves, everything
/// else as its JSON text.
pub(crate) fn index_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A single named collection.
#[derive(Debug, Default)]
pub(crate) struct Collection {
    /// Primary storage: doc id -> document.
    documents: BTreeMap<DocId, Value>,

    /// Secondary indexes: field -> index key -> doc ids.
    indexes: HashMap<String, HashMap<String, BTreeSet<DocId>>>,

    next_id: DocId,
}

/// On-disk shape of a collection.
#[derive(Serialize, Deserialize)]
pub(crate) struct CollectionFile {
    #[serde(default)]
    pub indexes: Vec<String>,
    #[serde(default)]
    pub documents: BTreeMap<DocId, Value>,
}

impl Collection {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub(crate) fn from_file(file: CollectionFile) -> Self {
        let mut col = Self::new();
        col.next_id = file.documents.keys().next_back().map_or(1, |last| last + 1);
        col.documents = file.documents;
        for field in file.indexes {
            col.add_index(&field);
        }
        col
    }

    pub(crate) fn to_file(&self) -> CollectionFile {
        let mut indexes: Vec<String> = self.indexes.keys().cloned().collect();
        indexes.sort();
        CollectionFile {
            indexes,
            documents: self.documents.clone(),
        }
    }

    /// Start maintaining an index on `field`. Returns `false` if it already existed.
    pub(crate) fn add_index(&mut self, field: &str) -> bool {
        if self.indexes.contains_key(field) {
            return false;
        }
        let mut index: HashMap<String, BTreeSet<DocId>> = HashMap::new();
        for (id, doc) in &self.documents {
            if let Some(value) = doc.get(field) {
                index.entry(index_key(value)).or_default().insert(*id);
            }
        }
        self.indexes.insert(field.to_owned(), index);
        true
    }

    pub(crate) fn is_indexed(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    pub(crate) fn insert(&mut self, doc: Value) -> DocId {
        let id = self.next_id;
        self.next_id += 1;

        for (field, index) in &mut self.indexes {
            if let Some(value) = doc.get(field) {
                index.entry(index_key(value)).or_default().insert(id);
            }
        }
        self.documents.insert(id, doc);
        id
    }

    pub(crate) fn get(&self, id: DocId) -> Option<&Value> {
        self.documents.get(&id)
    }

    pub(crate) fn documents(&self) -> impl Iterator<Item = (DocId, &Value)> {
        self.documents.iter().map(|(id, doc)| (*id, doc))
    }

    /// Ids of documents whose `field` equals `key`, via index or scan.
    pub(crate) fn find(&self, field: &str, key: &str) -> BTreeSet<DocId> {
        if let Some(index) = self.indexes.get(field) {
            return index.get(key).cloned().unwrap_or_default();
        }
        self.documents
            .iter()
            .filter(|(_, doc)| doc.get(field).is_some_and(|v| index_key(v) == key))
            .map(|(id, _)| *id)
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_sequential() {
        let mut col = Collection::new();
        assert_eq!(col.insert(json!({"_id": "a"})), 1);
        assert_eq!(col.insert(json!({"_id": "b"})), 2);
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(2).unwrap()["_id"], "b");
    }

    #[test]
    fn index_and_scan_agree() {
        let mut col = Collection::new();
        col.insert(json!({"_id": "a", "occurs": 3}));
        col.insert(json!({"_id": "b", "occurs": 3}));
        col.insert(json!({"_id": "c"}));

        let scanned = col.find("occurs", "3");
        assert!(col.add_index("occurs"));
        assert!(!col.add_index("occurs"));
        let indexed = col.find("occurs", "3");

        assert_eq!(scanned, indexed);
        assert_eq!(indexed.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn index_tracks_later_inserts() {
        let mut col = Collection::new();
        col.add_index("_id");
        let id = col.insert(json!({"_id": "x1"}));
        assert!(col.find("_id", "x1").contains(&id));
        assert!(col.find("_id", "missing").is_empty());
    }

    #[test]
    fn file_round_trip_continues_numbering() {
        let mut col = Collection::new();
        col.add_index("_id");
        col.insert(json!({"_id": "a"}));
        col.insert(json!({"_id": "b"}));

        let mut restored = Collection::from_file(col.to_file());
        assert!(restored.is_indexed("_id"));
        assert_eq!(restored.find("_id", "b").len(), 1);
        assert_eq!(restored.insert(json!({"_id": "c"})), 3);
    }
}
