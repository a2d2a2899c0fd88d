pub mod registry;
pub mod traits;

// Catalog implementations
pub mod mock;
pub mod swudb;
