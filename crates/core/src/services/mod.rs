pub mod catalog_service;
pub mod collection_service;
pub mod deck_service;
