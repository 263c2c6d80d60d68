//! This module defines the core data structures and types used across the content indexer.
//! It re-exports the content item, custom field, generation and progress types.

pub mod content_item;
pub mod custom_field;
pub mod generation;
pub mod progress;

pub use content_item::{ContentItem, Post, Site, SiteId, Term, TermRef};
pub use custom_field::{CustomField, CustomFieldType};
pub use generation::{Generation, Visibility};
pub use progress::{ProgressState, ScopeProgress};
