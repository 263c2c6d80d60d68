//! # Content Indexer
//!
//! Keeps OpenSearch indices in sync with a mutable content store of posts,
//! taxonomy terms and sites.
//!
//! ## Architecture
//!
//! Every logical content set is served by two index generations (primary and
//! secondary) so that a full reindex can run while search stays online, and by
//! two visibilities (public and private) so that restricted content is only
//! queryable by authorized callers.
//!
//! 1. **Transformer**: Converts single field values (dates, HTML)
//! 2. **Mapping**: Derives the schema of each content kind
//! 3. **Document**: Builds the public and private documents of an item
//! 4. **Target**: Resolves the index of a (kind, visibility, generation)
//! 5. **Indexer**: Fans writes and deletes out over every target
//! 6. **Progress**: Walks all content page by page, resumably
//! 7. **Admin**: Creates, maps and clears indices
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`sources`]: Content and schema collaborators
//! - [`processor`]: Lifecycle events to sync actions
//! - [`actions`]: Operator-facing triggers
//! - [`errors`]: Error types for the indexer

pub mod actions;
pub mod admin;
pub mod config;
pub mod document;
pub mod errors;
pub mod indexer;
pub mod mapping;
pub mod processor;
pub mod progress;
pub mod sources;
pub mod target;
pub mod transformer;

pub use actions::{ActionResponse, AdminActions};
pub use admin::IndexAdministrator;
pub use config::{Dependencies, IndexNames, IndexerConfig};
pub use errors::IndexingError;
pub use indexer::{FanoutReport, Indexer, TargetFailure};
pub use processor::{ContentEvent, ContentProcessor, SyncAction};
pub use progress::BulkIndexer;
pub use sources::{ContentSource, SchemaSource, SnapshotSource};
