// unified-store: small embedded document store
//
// Named collections of JSON documents with optional equality indexes and
// optional persistence as one `<collection>.json` file per collection.

mod collection;
pub mod error;
mod store;

pub use collection::DocId;
pub use error::StoreError;
pub use store::{DocumentStore, SyncReport};
