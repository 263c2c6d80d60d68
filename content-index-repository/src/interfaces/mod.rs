//! Interface definitions for the external collaborators.
//!
//! This module defines the abstract `SearchIndexProvider` and `OptionsStore`
//! traits that allow for dependency injection and swappable backends.

mod options_store;
mod search_index_provider;

pub use options_store::OptionsStore;
pub use search_index_provider::SearchIndexProvider;
