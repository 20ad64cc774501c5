// tests/support/mocks.rs
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pagecraft::application::ports::events::{ContentEvent, EventBus};
use pagecraft::application::ports::time::Clock;
use pagecraft::domain::audit::{AuditEntry, AuditRepository};
use pagecraft::domain::document::schedule::{ContentScheduleCollection, ScheduleAction};
use pagecraft::domain::document::{Document, DocumentRepository, PersistMode, ROOT_ID};
use pagecraft::domain::errors::DomainResult;
use pagecraft::domain::language::{Language, LanguageRepository};

#[derive(Default)]
struct DocumentStore {
    documents: HashMap<i64, Document>,
    schedules: HashMap<i64, ContentScheduleCollection>,
    next_id: i64,
    next_version: i64,
}

/// Document persistence over a `HashMap`, implementing the repository's save
/// contract: id/path/level assignment on first persist, version bump every
/// persist, published-version promotion on publish.
#[derive(Default)]
pub struct InMemoryDocumentRepo {
    inner: Mutex<DocumentStore>,
}

impl InMemoryDocumentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self, id: i64) -> Option<Document> {
        self.inner.lock().unwrap().documents.get(&id).cloned()
    }

    pub fn stored_schedule(&self, id: i64) -> ContentScheduleCollection {
        self.inner
            .lock()
            .unwrap()
            .schedules
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    fn pending_ids(&self, action: ScheduleAction, date: DateTime<Utc>) -> Vec<i64> {
        let store = self.inner.lock().unwrap();
        let mut ids: Vec<i64> = store
            .schedules
            .iter()
            .filter(|(_, schedule)| !schedule.pending(action, date).is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepo {
    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Document>> {
        Ok(self.stored(id))
    }

    async fn get_by_key(&self, key: Uuid) -> DomainResult<Option<Document>> {
        let store = self.inner.lock().unwrap();
        Ok(store.documents.values().find(|d| d.key == key).cloned())
    }

    async fn save(&self, document: &mut Document, mode: PersistMode) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();

        if !document.has_identity() {
            store.next_id += 1;
            document.id = store.next_id;
            document.path = match store.documents.get(&document.parent_id) {
                Some(parent) => format!("{},{}", parent.path, document.id),
                None => format!("{},{}", ROOT_ID, document.id),
            };
            document.level = (document.path.matches(',').count()) as i32;
        }

        store.next_version += 1;
        document.version_id = store.next_version;
        if mode == PersistMode::Publish {
            document.published_version_id = document.version_id;
        }

        store.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn get_paged_descendants(
        &self,
        id: i64,
        page: usize,
        page_size: usize,
    ) -> DomainResult<(Vec<Document>, u64)> {
        let store = self.inner.lock().unwrap();
        let prefix = match store.documents.get(&id) {
            Some(d) => format!("{},", d.path),
            None => return Ok((Vec::new(), 0)),
        };
        let mut descendants: Vec<Document> = store
            .documents
            .values()
            .filter(|d| d.path.starts_with(&prefix))
            .cloned()
            .collect();
        descendants.sort_by(|a, b| a.path.cmp(&b.path));
        let total = descendants.len() as u64;
        let page = descendants
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect();
        Ok((page, total))
    }

    async fn get_descendants(&self, of: &Document) -> DomainResult<Vec<Document>> {
        let store = self.inner.lock().unwrap();
        let prefix = format!("{},", of.path);
        let mut descendants: Vec<Document> = store
            .documents
            .values()
            .filter(|d| d.path.starts_with(&prefix))
            .cloned()
            .collect();
        descendants.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(descendants)
    }

    async fn has_children(&self, id: i64) -> DomainResult<bool> {
        let store = self.inner.lock().unwrap();
        Ok(store.documents.values().any(|d| d.parent_id == id))
    }

    async fn is_path_published(&self, document: &Document) -> DomainResult<bool> {
        let store = self.inner.lock().unwrap();
        for segment in document.path.split(',') {
            let id: i64 = segment.parse().unwrap();
            if id == ROOT_ID {
                continue;
            }
            match store.documents.get(&id) {
                Some(d) if d.published => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    async fn get_content_schedule(&self, id: i64) -> DomainResult<ContentScheduleCollection> {
        Ok(self.stored_schedule(id))
    }

    async fn persist_content_schedule(
        &self,
        document: &Document,
        schedule: &ContentScheduleCollection,
    ) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();
        store.schedules.insert(document.id, schedule.clone());
        Ok(())
    }

    async fn clear_schedule(
        &self,
        date: DateTime<Utc>,
        action: ScheduleAction,
    ) -> DomainResult<()> {
        let mut store = self.inner.lock().unwrap();
        for schedule in store.schedules.values_mut() {
            schedule.clear(action, date);
        }
        Ok(())
    }

    async fn has_content_for_release(&self, date: DateTime<Utc>) -> DomainResult<bool> {
        Ok(!self.pending_ids(ScheduleAction::Release, date).is_empty())
    }

    async fn get_content_for_release(&self, date: DateTime<Utc>) -> DomainResult<Vec<Document>> {
        let ids = self.pending_ids(ScheduleAction::Release, date);
        Ok(ids.into_iter().filter_map(|id| self.stored(id)).collect())
    }

    async fn has_content_for_expiration(&self, date: DateTime<Utc>) -> DomainResult<bool> {
        Ok(!self.pending_ids(ScheduleAction::Expire, date).is_empty())
    }

    async fn get_content_for_expiration(
        &self,
        date: DateTime<Utc>,
    ) -> DomainResult<Vec<Document>> {
        let ids = self.pending_ids(ScheduleAction::Expire, date);
        Ok(ids.into_iter().filter_map(|id| self.stored(id)).collect())
    }

    async fn delete_versions(&self, _id: i64, _version_ids: &[i64]) -> DomainResult<()> {
        Ok(())
    }
}

pub struct InMemoryLanguageRepo {
    languages: Vec<Language>,
}

impl InMemoryLanguageRepo {
    pub fn new(languages: Vec<Language>) -> Self {
        Self { languages }
    }
}

#[async_trait]
impl LanguageRepository for InMemoryLanguageRepo {
    async fn get_many(&self) -> DomainResult<Vec<Language>> {
        Ok(self.languages.clone())
    }

    async fn get_default_iso_code(&self) -> DomainResult<String> {
        Ok(self
            .languages
            .iter()
            .find(|l| l.is_default)
            .or(self.languages.first())
            .map(|l| l.iso_code.clone())
            .unwrap_or_default())
    }
}

/// Records every event in order and vetoes the ones the test arms.
#[derive(Default)]
pub struct RecordingEventBus {
    pub events: Mutex<Vec<ContentEvent>>,
    pub veto_publishing: AtomicBool,
    pub veto_unpublishing: AtomicBool,
    pub veto_sending_to_publish: AtomicBool,
    pub veto_saving_ids: Mutex<HashSet<i64>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<ContentEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn veto_saving_for(&self, id: i64) {
        self.veto_saving_ids.lock().unwrap().insert(id);
    }

    pub fn recorded_clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventBus for RecordingEventBus {
    fn publish_cancelable(&self, event: &ContentEvent) -> bool {
        self.events.lock().unwrap().push(event.clone());
        match event {
            ContentEvent::Saving { id, .. } => self.veto_saving_ids.lock().unwrap().contains(id),
            ContentEvent::Publishing { .. } => self.veto_publishing.load(Ordering::SeqCst),
            ContentEvent::Unpublishing { .. } => self.veto_unpublishing.load(Ordering::SeqCst),
            ContentEvent::SendingToPublish { .. } => {
                self.veto_sending_to_publish.load(Ordering::SeqCst)
            }
            _ => false,
        }
    }

    fn publish(&self, event: ContentEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingAuditRepo {
    pub entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingAuditRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditRepository for RecordingAuditRepo {
    async fn add(&self, entry: AuditEntry) -> DomainResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

/// Settable clock so schedule boundaries are exact.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
