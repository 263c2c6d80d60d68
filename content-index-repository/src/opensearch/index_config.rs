//! OpenSearch index settings and analysis configuration.
//!
//! Every content index is created with the same analysis chain so that the
//! `_suggest` fields of any content kind can be indexed with edge n-grams and
//! searched with whitespace tokenization.

use serde_json::{json, Value};

/// Default number of primary shards.
pub const DEFAULT_SHARDS: u32 = 1;

/// Default number of replicas.
pub const DEFAULT_REPLICAS: u32 = 1;

/// Analyzer producing edge n-grams, used to index `_suggest` fields.
pub const NGRAM_ANALYZER: &str = "ngram_analyzer";

/// Analyzer used to search `_suggest` fields.
pub const WHITESPACE_ANALYZER: &str = "whitespace_analyzer";

/// Analyzer for case-insensitive prefix matching on whole values.
pub const STARTSWITH_ANALYZER: &str = "analyzer_startswith";

/// Name of the edge n-gram token filter.
pub const NGRAM_FILTER: &str = "ngram_filter";

/// Shortest edge n-gram.
pub const NGRAM_MIN_GRAM: u32 = 1;

/// Longest edge n-gram.
pub const NGRAM_MAX_GRAM: u32 = 20;

/// Settings used when creating a content index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    /// Number of primary shards.
    pub shards: u32,
    /// Number of replicas per shard.
    pub replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            shards: DEFAULT_SHARDS,
            replicas: DEFAULT_REPLICAS,
        }
    }
}

impl IndexSettings {
    /// Create settings with explicit shard and replica counts.
    pub fn new(shards: u32, replicas: u32) -> Self {
        Self { shards, replicas }
    }

    /// The create-index body.
    ///
    /// The configuration includes:
    /// - **ngram_filter**: edge n-grams of 1 to 20 characters over letters,
    ///   digits, punctuation and symbols
    /// - **ngram_analyzer**: whitespace tokenizer, lowercase, ASCII folding and
    ///   the n-gram filter
    /// - **whitespace_analyzer**: whitespace tokenizer, lowercase and ASCII folding
    /// - **analyzer_startswith**: keyword tokenizer and lowercase
    pub fn body(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.shards,
                "number_of_replicas": self.replicas,
                "analysis": {
                    "filter": {
                        NGRAM_FILTER: {
                            "type": "edge_ngram",
                            "min_gram": NGRAM_MIN_GRAM,
                            "max_gram": NGRAM_MAX_GRAM,
                            "token_chars": ["letter", "digit", "punctuation", "symbol"]
                        }
                    },
                    "analyzer": {
                        STARTSWITH_ANALYZER: {
                            "tokenizer": "keyword",
                            "filter": ["lowercase"]
                        },
                        NGRAM_ANALYZER: {
                            "type": "custom",
                            "tokenizer": "whitespace",
                            "filter": ["lowercase", "asciifolding", NGRAM_FILTER]
                        },
                        WHITESPACE_ANALYZER: {
                            "type": "custom",
                            "tokenizer": "whitespace",
                            "filter": ["lowercase", "asciifolding"]
                        }
                    }
                }
            }
        })
    }
}
