use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Collection {0:?} does not exist")]
    NoSuchCollection(String),

    #[error("Collection {0:?} already exists")]
    CollectionExists(String),

    #[error("Invalid collection name {0:?}: use letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("Document {id} not found in {collection}")]
    NoSuchDocument { collection: String, id: u64 },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
