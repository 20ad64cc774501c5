// src/domain/document/repository.rs
use crate::domain::document::entity::Document;
use crate::domain::document::schedule::{ContentScheduleCollection, ScheduleAction};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// How a save affects the published snapshot. Threaded explicitly instead of
/// a transient state flag on the entity, so a document can never be observed
/// mid-publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Persist drafts only; the published version is untouched.
    SaveOnly,
    /// Persist and promote the pending published values to the live version.
    Publish,
    /// Persist and drop the live published version.
    Unpublish,
}

/// Persistence port for documents and their schedules.
///
/// Contract for `save`: assigns `id`, `path` and `level` on first persist,
/// bumps `version_id` on every persist, and sets `published_version_id` to
/// the new `version_id` when `mode` is [`PersistMode::Publish`].
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Document>>;

    async fn get_by_key(&self, key: Uuid) -> DomainResult<Option<Document>>;

    async fn save(&self, document: &mut Document, mode: PersistMode) -> DomainResult<()>;

    /// Descendants of `id`, ordered by path ascending (parents before
    /// children), one page at a time. Returns the page and the total count.
    async fn get_paged_descendants(
        &self,
        id: i64,
        page: usize,
        page_size: usize,
    ) -> DomainResult<(Vec<Document>, u64)>;

    /// All descendants of the document, ordered by path ascending.
    async fn get_descendants(&self, of: &Document) -> DomainResult<Vec<Document>>;

    async fn has_children(&self, id: i64) -> DomainResult<bool>;

    /// Whether every ancestor up to the root, and the document itself, is
    /// published.
    async fn is_path_published(&self, document: &Document) -> DomainResult<bool>;

    async fn get_content_schedule(&self, id: i64) -> DomainResult<ContentScheduleCollection>;

    async fn persist_content_schedule(
        &self,
        document: &Document,
        schedule: &ContentScheduleCollection,
    ) -> DomainResult<()>;

    /// Bulk-remove schedule entries for the action dated at or before `date`,
    /// across all documents.
    async fn clear_schedule(&self, date: DateTime<Utc>, action: ScheduleAction)
        -> DomainResult<()>;

    async fn has_content_for_release(&self, date: DateTime<Utc>) -> DomainResult<bool>;

    async fn get_content_for_release(&self, date: DateTime<Utc>) -> DomainResult<Vec<Document>>;

    async fn has_content_for_expiration(&self, date: DateTime<Utc>) -> DomainResult<bool>;

    async fn get_content_for_expiration(&self, date: DateTime<Utc>) -> DomainResult<Vec<Document>>;

    /// Drop stored historic versions of a document. Publishing never calls
    /// this; retention policy does.
    async fn delete_versions(&self, id: i64, version_ids: &[i64]) -> DomainResult<()>;
}
