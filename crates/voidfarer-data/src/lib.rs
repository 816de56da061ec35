//! Data-driven catalog content for Voidfarer.
//!
//! Game content (ships, mods, items, augmentations, enemies, combat
//! actions, quests, balance tables) lives in RON data files. The schema
//! structs in [`schema`] define the on-disk shapes with name references;
//! the [`loader`] resolves names into catalog ids and builds the
//! immutable [`voidfarer_core::catalog::Catalog`].

pub mod loader;
pub mod schema;

pub use loader::{build_catalog, default_catalog, default_game_data, load_catalog_dir, DataLoadError};
