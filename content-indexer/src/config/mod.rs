//! Indexer configuration and dependency wiring.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    IndexNames, IndexerConfig, DEFAULT_OPENSEARCH_URL, DEFAULT_POSTS_PER_PAGE,
    DEFAULT_PRIMARY_INDEX, DEFAULT_PROGRESS_KEY, DEFAULT_TIMEOUT_SECS, OPTION_PRIMARY_INDEX,
    OPTION_PRIVATE_FIELDS, OPTION_PRIVATE_POST_KINDS, OPTION_PRIVATE_PRIMARY_INDEX,
    OPTION_PRIVATE_SECONDARY_INDEX, OPTION_SECONDARY_INDEX, OPTION_SERVER_URL, OPTION_TIMEOUT,
    PRIVATE_INDEX_SUFFIX,
};
