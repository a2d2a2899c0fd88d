pub mod card;
pub mod collection;
pub mod deck;
pub mod filters;
pub mod format;
