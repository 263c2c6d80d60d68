//! Processor for content lifecycle events.
//!
//! Turns the host's save, delete and status-transition notifications into
//! the sync actions applied by the [`Indexer`](crate::indexer::Indexer).

use content_index_shared::{ContentItem, Post, Term};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Statuses of a post that has never been saved before.
pub const UNSAVED_STATUSES: [&str; 2] = ["new", "auto-draft"];

/// A lifecycle notification from the host content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ContentEvent {
    /// A post was created or updated.
    Saved {
        post: Post,
        #[serde(default)]
        is_new: bool,
    },
    /// A post was deleted.
    Deleted { post: Post },
    /// A post moved between lifecycle statuses. `post` carries the new status.
    StatusChanged {
        post: Post,
        old_status: String,
        new_status: String,
    },
    TermSaved { term: Term },
    TermDeleted { term: Term },
}

/// What to do with the index for one event.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// Upsert or delete depending on the item's status.
    Sync { item: ContentItem, is_new: bool },
    /// Remove the item from every index.
    Delete(ContentItem),
    /// Nothing changed.
    Skip,
}

/// Maps lifecycle events to sync actions.
#[derive(Debug, Default)]
pub struct ContentProcessor {}

impl ContentProcessor {
    pub fn new() -> Self {
        Self {}
    }

    /// Process a batch of events, dropping the ones that change nothing.
    #[instrument(skip(self, events), fields(event_count = events.len()))]
    pub fn process_batch(&self, events: Vec<ContentEvent>) -> Vec<SyncAction> {
        let actions: Vec<SyncAction> = events
            .into_iter()
            .map(|event| self.process_event(event))
            .filter(|action| *action != SyncAction::Skip)
            .collect();

        debug!(action_count = actions.len(), "Processed event batch");
        actions
    }

    /// Process a single event.
    pub fn process_event(&self, event: ContentEvent) -> SyncAction {
        match event {
            ContentEvent::Saved { post, is_new } => SyncAction::Sync {
                item: post.into(),
                is_new,
            },
            ContentEvent::Deleted { post } => SyncAction::Delete(post.into()),
            ContentEvent::StatusChanged {
                mut post,
                old_status,
                new_status,
            } => {
                if old_status == new_status {
                    return SyncAction::Skip;
                }
                post.status = new_status;
                let is_new =
                    UNSAVED_STATUSES.contains(&old_status.as_str()) && post.is_publishable();
                SyncAction::Sync {
                    item: post.into(),
                    is_new,
                }
            }
            ContentEvent::TermSaved { term } => SyncAction::Sync {
                item: term.into(),
                is_new: false,
            },
            ContentEvent::TermDeleted { term } => SyncAction::Delete(term.into()),
        }
    }
}
