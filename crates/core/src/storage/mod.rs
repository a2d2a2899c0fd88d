pub mod file;
pub mod memory;
pub mod traits;
pub mod writer;

/// Namespace keys for the persisted documents.
pub mod keys {
    pub const COLLECTION: &str = "@swudb/collection";
    pub const DECKS: &str = "@swudb/decks";
}
