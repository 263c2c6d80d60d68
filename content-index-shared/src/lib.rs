//! # Content Index Shared
//!
//! This crate defines the data structures shared across the content indexer
//! ecosystem: the content items delivered by the host content store, custom
//! field definitions, index generations and visibilities, and the persisted
//! bulk-indexing progress state.

pub mod types;

pub use types::content_item::{
    ContentItem, Post, Site, SiteId, Term, TermRef, DEFAULT_SITE_ID, INDEX_POST_STATUSES,
    STATUS_PRIVATE, STATUS_PUBLISH,
};
pub use types::custom_field::{CustomField, CustomFieldType};
pub use types::generation::{Generation, Visibility};
pub use types::progress::{ProgressState, ScopeProgress};
