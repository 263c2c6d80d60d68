//! Resolution of index targets from content kind, visibility and generation.

use content_index_shared::{Generation, Visibility};

use crate::config::IndexNames;

/// A concrete place to write a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
    pub index: String,
    /// The content kind. Distinguishes kinds sharing one index.
    pub type_name: String,
    pub visibility: Visibility,
    pub generation: Generation,
}

impl IndexTarget {
    /// Id of an item's document inside this target.
    pub fn document_id(&self, id: &str) -> String {
        format!("{}_{}", self.type_name, id)
    }
}

/// Resolves [`IndexTarget`]s from the configured index names.
#[derive(Debug, Clone)]
pub struct TypeFactory {
    indices: IndexNames,
}

impl TypeFactory {
    pub fn new(indices: IndexNames) -> Self {
        Self { indices }
    }

    /// The target for a kind, or `None` when the generation has no index.
    pub fn create(&self, kind: &str, is_private: bool, is_primary: bool) -> Option<IndexTarget> {
        let visibility = if is_private {
            Visibility::Private
        } else {
            Visibility::Public
        };
        let generation = if is_primary {
            Generation::Primary
        } else {
            Generation::Secondary
        };

        self.indices
            .get(generation, visibility)
            .map(|index| IndexTarget {
                index,
                type_name: kind.to_string(),
                visibility,
                generation,
            })
    }

    /// Shorthand for [`TypeFactory::create`] with typed arguments.
    pub fn resolve(
        &self,
        kind: &str,
        visibility: Visibility,
        generation: Generation,
    ) -> Option<IndexTarget> {
        self.create(kind, visibility.is_private(), generation.is_primary())
    }
}
