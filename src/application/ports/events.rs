// src/application/ports/events.rs
use serde::{Deserialize, Serialize};

/// Cache-invalidation scope of a tree-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeChangeKind {
    /// One node changed.
    RefreshNode,
    /// The node and its whole subtree changed.
    RefreshBranch,
}

/// In-process content lifecycle events. Subscribers to the cancelable ones
/// can veto the operation before any mutation is persisted; the
/// fire-and-forget ones drive caches and downstream indexes, so their
/// ordering (saving, mutate, saved) is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentEvent {
    Saving {
        id: i64,
        name: String,
    },
    Saved {
        id: i64,
    },
    Publishing {
        id: i64,
    },
    /// Batched: one event may cover many documents (branch publish, or the
    /// implicitly re-published descendants of a newly published parent).
    Published {
        ids: Vec<i64>,
    },
    Unpublishing {
        id: i64,
    },
    Unpublished {
        id: i64,
    },
    SendingToPublish {
        id: i64,
    },
    SentToPublish {
        id: i64,
    },
    TreeChange {
        id: i64,
        kind: TreeChangeKind,
        /// Cultures whose published state was refreshed; `None` when the
        /// change is not culture-scoped.
        published_cultures: Option<Vec<String>>,
        unpublished_cultures: Option<Vec<String>>,
    },
}

/// Synchronous observer bus. `publish_cancelable` returns true when a
/// subscriber vetoed the operation.
pub trait EventBus: Send + Sync {
    fn publish_cancelable(&self, event: &ContentEvent) -> bool;
    fn publish(&self, event: ContentEvent);
}
