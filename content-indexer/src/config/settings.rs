//! Immutable indexer configuration.

use std::env;
use std::time::Duration;

use content_index_repository::OptionsStore;
use content_index_shared::{Generation, Visibility};
use serde_json::Value;
use tracing::warn;

use crate::errors::IndexingError;

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default name of the primary public index.
pub const DEFAULT_PRIMARY_INDEX: &str = "content_primary";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of items fetched per bulk-indexing step.
pub const DEFAULT_POSTS_PER_PAGE: u64 = 10;

/// Default options key holding the bulk-indexing progress.
pub const DEFAULT_PROGRESS_KEY: &str = "index_status";

/// Options store keys read by [`IndexerConfig::with_options`].
pub const OPTION_SERVER_URL: &str = "server_url";
pub const OPTION_PRIMARY_INDEX: &str = "primary_index";
pub const OPTION_SECONDARY_INDEX: &str = "secondary_index";
pub const OPTION_PRIVATE_PRIMARY_INDEX: &str = "private_primary_index";
pub const OPTION_PRIVATE_SECONDARY_INDEX: &str = "private_secondary_index";
pub const OPTION_TIMEOUT: &str = "timeout";
pub const OPTION_PRIVATE_FIELDS: &str = "private_fields";
pub const OPTION_PRIVATE_POST_KINDS: &str = "private_post_kinds";

/// Suffix appended to a generation's base name to derive its private index.
pub const PRIVATE_INDEX_SUFFIX: &str = "_private";

/// Index names per generation and visibility.
///
/// The public name of a generation is its base name. A private index without
/// an explicit name is derived as `<base>_private`. A generation without a
/// base name has no targets at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexNames {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub private_primary: Option<String>,
    pub private_secondary: Option<String>,
}

impl IndexNames {
    /// The index of a generation and visibility.
    pub fn get(&self, generation: Generation, visibility: Visibility) -> Option<String> {
        let (base, private) = match generation {
            Generation::Primary => (&self.primary, &self.private_primary),
            Generation::Secondary => (&self.secondary, &self.private_secondary),
        };
        let base = non_empty(base)?;

        match visibility {
            Visibility::Public => Some(base.to_string()),
            Visibility::Private => Some(match non_empty(private) {
                Some(name) => name.to_string(),
                None => format!("{}{}", base, PRIVATE_INDEX_SUFFIX),
            }),
        }
    }

    /// Every resolvable index, primary generation first.
    pub fn configured(&self) -> Vec<(Generation, Visibility, String)> {
        Generation::ALL
            .into_iter()
            .flat_map(|generation| {
                Visibility::ALL.into_iter().filter_map(move |visibility| {
                    self.get(generation, visibility)
                        .map(|name| (generation, visibility, name))
                })
            })
            .collect()
    }

    /// Whether the generation has a base name.
    pub fn has_generation(&self, generation: Generation) -> bool {
        self.get(generation, Visibility::Public).is_some()
    }
}

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|name| !name.is_empty())
}

/// Configuration snapshot handed to every component at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerConfig {
    pub server_url: String,
    pub indices: IndexNames,
    pub timeout: Duration,
    pub posts_per_page: u64,
    /// Field names only written to private indices.
    pub private_fields: Vec<String>,
    /// Post kinds whose items are only written to private indices.
    pub private_post_kinds: Vec<String>,
    pub progress_key: String,
    /// Generation receiving live lifecycle updates.
    pub live_generation: Generation,
    pub multisite: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_OPENSEARCH_URL.to_string(),
            indices: IndexNames {
                primary: Some(DEFAULT_PRIMARY_INDEX.to_string()),
                ..IndexNames::default()
            },
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            private_fields: Vec::new(),
            private_post_kinds: Vec::new(),
            progress_key: DEFAULT_PROGRESS_KEY.to_string(),
            live_generation: Generation::Primary,
            multisite: false,
        }
    }
}

impl IndexerConfig {
    /// Build the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `PRIMARY_INDEX`: Primary public index (default: content_primary)
    /// - `SECONDARY_INDEX`: Secondary public index (default: none)
    /// - `PRIVATE_PRIMARY_INDEX`: Primary private index (default: `<PRIMARY_INDEX>_private`)
    /// - `PRIVATE_SECONDARY_INDEX`: Secondary private index (default: `<SECONDARY_INDEX>_private`)
    /// - `OPENSEARCH_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `POSTS_PER_PAGE`: Items per bulk-indexing step (default: 10)
    /// - `PRIVATE_FIELDS`: Comma-separated private field names
    /// - `PRIVATE_POST_KINDS`: Comma-separated private post kinds
    /// - `PROGRESS_KEY`: Options key of the progress state (default: index_status)
    /// - `LIVE_GENERATION`: "primary" or "secondary" (default: primary)
    /// - `MULTISITE`: "true" to walk every site of the content source
    ///
    /// # Returns
    ///
    /// * `Ok(IndexerConfig)` - The configuration
    /// * `Err(IndexingError)` - If a variable holds an invalid value
    pub fn from_env() -> Result<Self, IndexingError> {
        let defaults = Self::default();

        let timeout = match env::var("OPENSEARCH_TIMEOUT_SECS").ok() {
            Some(raw) => Duration::from_secs(parse_number("OPENSEARCH_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };
        let posts_per_page = match env::var("POSTS_PER_PAGE").ok() {
            Some(raw) => parse_number("POSTS_PER_PAGE", &raw)?,
            None => defaults.posts_per_page,
        };
        let live_generation = match env::var("LIVE_GENERATION").ok() {
            Some(raw) => parse_generation(&raw)?,
            None => defaults.live_generation,
        };

        let config = Self {
            server_url: env::var("OPENSEARCH_URL").unwrap_or(defaults.server_url),
            indices: IndexNames {
                primary: env::var("PRIMARY_INDEX").ok().or(defaults.indices.primary),
                secondary: env::var("SECONDARY_INDEX").ok(),
                private_primary: env::var("PRIVATE_PRIMARY_INDEX").ok(),
                private_secondary: env::var("PRIVATE_SECONDARY_INDEX").ok(),
            },
            timeout,
            posts_per_page,
            private_fields: env::var("PRIVATE_FIELDS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            private_post_kinds: env::var("PRIVATE_POST_KINDS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            progress_key: env::var("PROGRESS_KEY").unwrap_or(defaults.progress_key),
            live_generation,
            multisite: env::var("MULTISITE")
                .map(|raw| matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Overlay the options persisted in an options store on this configuration.
    ///
    /// Keys that are absent keep their current value. String lists may be
    /// stored either as JSON arrays or as comma-separated strings.
    pub async fn with_options(
        mut self,
        store: &dyn OptionsStore,
    ) -> Result<Self, IndexingError> {
        if let Some(url) = read_string(store, OPTION_SERVER_URL).await? {
            self.server_url = url;
        }
        if let Some(name) = read_string(store, OPTION_PRIMARY_INDEX).await? {
            self.indices.primary = Some(name);
        }
        if let Some(name) = read_string(store, OPTION_SECONDARY_INDEX).await? {
            self.indices.secondary = Some(name);
        }
        if let Some(name) = read_string(store, OPTION_PRIVATE_PRIMARY_INDEX).await? {
            self.indices.private_primary = Some(name);
        }
        if let Some(name) = read_string(store, OPTION_PRIVATE_SECONDARY_INDEX).await? {
            self.indices.private_secondary = Some(name);
        }

        match store.get(OPTION_TIMEOUT).await? {
            Some(Value::Number(secs)) => match secs.as_u64() {
                Some(secs) => self.timeout = Duration::from_secs(secs),
                None => warn!(value = %secs, "Ignoring non-integer timeout option"),
            },
            Some(Value::String(raw)) => {
                self.timeout = Duration::from_secs(parse_number(OPTION_TIMEOUT, &raw)?)
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(IndexingError::config(format!(
                    "Option '{}' must be a number, got {}",
                    OPTION_TIMEOUT, other
                )))
            }
        }

        if let Some(fields) = read_list(store, OPTION_PRIVATE_FIELDS).await? {
            self.private_fields = fields;
        }
        if let Some(kinds) = read_list(store, OPTION_PRIVATE_POST_KINDS).await? {
            self.private_post_kinds = kinds;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_index(
        mut self,
        generation: Generation,
        visibility: Visibility,
        name: impl Into<String>,
    ) -> Self {
        let name = Some(name.into());
        match (generation, visibility) {
            (Generation::Primary, Visibility::Public) => self.indices.primary = name,
            (Generation::Secondary, Visibility::Public) => self.indices.secondary = name,
            (Generation::Primary, Visibility::Private) => self.indices.private_primary = name,
            (Generation::Secondary, Visibility::Private) => self.indices.private_secondary = name,
        }
        self
    }

    pub fn with_posts_per_page(mut self, posts_per_page: u64) -> Self {
        self.posts_per_page = posts_per_page;
        self
    }

    pub fn with_private_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.private_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_private_post_kinds<S: Into<String>>(
        mut self,
        kinds: impl IntoIterator<Item = S>,
    ) -> Self {
        self.private_post_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_progress_key(mut self, key: impl Into<String>) -> Self {
        self.progress_key = key.into();
        self
    }

    pub fn with_live_generation(mut self, generation: Generation) -> Self {
        self.live_generation = generation;
        self
    }

    pub fn with_multisite(mut self, multisite: bool) -> Self {
        self.multisite = multisite;
        self
    }

    /// Whether a secondary generation exists to roll over into.
    pub fn has_secondary(&self) -> bool {
        self.indices.has_generation(Generation::Secondary)
    }

    fn validate(&self) -> Result<(), IndexingError> {
        if self.server_url.trim().is_empty() {
            return Err(IndexingError::config("Server URL must not be empty"));
        }
        if self.posts_per_page == 0 {
            return Err(IndexingError::config("Posts per page must be at least 1"));
        }
        if self.progress_key.is_empty() {
            return Err(IndexingError::config("Progress key must not be empty"));
        }
        Ok(())
    }
}

fn parse_number(name: &str, raw: &str) -> Result<u64, IndexingError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| IndexingError::config(format!("Invalid value for {}: {}", name, e)))
}

fn parse_generation(raw: &str) -> Result<Generation, IndexingError> {
    match raw.trim().to_lowercase().as_str() {
        "primary" => Ok(Generation::Primary),
        "secondary" => Ok(Generation::Secondary),
        other => Err(IndexingError::config(format!(
            "Invalid generation '{}', expected 'primary' or 'secondary'",
            other
        ))),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

async fn read_string(
    store: &dyn OptionsStore,
    key: &str,
) -> Result<Option<String>, IndexingError> {
    match store.get(key).await? {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(Some(value)),
        Some(Value::String(_)) | Some(Value::Null) | None => Ok(None),
        Some(other) => Err(IndexingError::config(format!(
            "Option '{}' must be a string, got {}",
            key, other
        ))),
    }
}

async fn read_list(
    store: &dyn OptionsStore,
    key: &str,
) -> Result<Option<Vec<String>>, IndexingError> {
    match store.get(key).await? {
        Some(Value::String(raw)) => Ok(Some(split_list(&raw))),
        Some(Value::Array(items)) => Ok(Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(IndexingError::config(format!(
            "Option '{}' must be a list, got {}",
            key, other
        ))),
    }
}
