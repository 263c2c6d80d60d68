//! Bulk-indexing progress state.
//!
//! Progress is tracked per tenant scope. Single-tenant deployments use a
//! mapping with the one implicit scope [`DEFAULT_SITE_ID`]; multi-tenant
//! deployments hold one scope per site. Scopes are enumerated in ascending
//! site id order.
//!
//! [`DEFAULT_SITE_ID`]: crate::DEFAULT_SITE_ID

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::content_item::SiteId;
use super::generation::Generation;

/// Progress of the bulk walk over one site's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeProgress {
    /// The site this scope walks.
    pub blog_id: SiteId,
    /// Next page to fetch, starting at 1.
    pub page: u64,
    /// Items successfully indexed so far in this generation.
    pub count: u64,
    /// Items to index, computed when the scope was initialised.
    pub total: u64,
    /// Generation currently being filled.
    pub generation: Generation,
}

impl ScopeProgress {
    /// A fresh scope at the start of the primary generation.
    pub fn new(blog_id: SiteId, total: u64) -> Self {
        Self {
            blog_id,
            page: 1,
            count: 0,
            total,
            generation: Generation::Primary,
        }
    }

    /// Whether every item of the current generation has been indexed.
    pub fn is_exhausted(&self) -> bool {
        self.count >= self.total
    }

    /// Whether both generations have been filled.
    pub fn is_complete(&self) -> bool {
        self.generation == Generation::Secondary && self.is_exhausted()
    }

    /// Restart the walk for the secondary generation, keeping the total.
    pub fn rollover(&mut self) {
        self.page = 1;
        self.count = 0;
        self.generation = Generation::Secondary;
    }

    /// Record one indexing step.
    pub fn advance(&mut self, successes: u64) {
        self.page += 1;
        self.count += successes;
    }

    /// Mark the current generation as fully walked.
    pub fn exhaust(&mut self) {
        self.count = self.count.max(self.total);
    }
}

/// Progress of every tenant scope, keyed by site id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressState {
    scopes: BTreeMap<SiteId, ScopeProgress>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the scope for `progress.blog_id`.
    pub fn insert(&mut self, progress: ScopeProgress) {
        self.scopes.insert(progress.blog_id, progress);
    }

    pub fn get(&self, site_id: SiteId) -> Option<&ScopeProgress> {
        self.scopes.get(&site_id)
    }

    pub fn get_mut(&mut self, site_id: SiteId) -> Option<&mut ScopeProgress> {
        self.scopes.get_mut(&site_id)
    }

    /// Scopes in ascending site id order.
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeProgress> {
        self.scopes.values()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The only scope of a single-tenant state.
    pub fn single(&self) -> Option<&ScopeProgress> {
        if self.scopes.len() == 1 {
            self.scopes.values().next()
        } else {
            None
        }
    }

    /// Whether every scope has filled both generations.
    pub fn is_complete(&self) -> bool {
        self.scopes.values().all(ScopeProgress::is_complete)
    }
}

impl FromIterator<ScopeProgress> for ProgressState {
    fn from_iter<I: IntoIterator<Item = ScopeProgress>>(iter: I) -> Self {
        let mut state = ProgressState::new();
        for progress in iter {
            state.insert(progress);
        }
        state
    }
}
