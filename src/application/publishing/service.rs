// src/application/publishing/service.rs
use std::sync::Arc;

use crate::application::ports::{ClockPort, EventBusPort, PropertyValidatorPort};
use crate::application::scope::{CoreScope, LockResource, ScopeProvider};
use crate::application::ApplicationResult;
use crate::config::ContentSettings;
use crate::domain::audit::{AuditEntry, AuditRepository, AuditType};
use crate::domain::document::{CultureImpactFactory, Document, DocumentRepository, PersistMode};
use crate::domain::language::{Language, LanguageRepository};

/// Publishing operations over the content tree: save, publish/unpublish per
/// culture, branch publishing, and scheduled release/expiry. Persistence,
/// validation, eventing and auditing are injected ports; the service owns
/// only the decision logic and the locking discipline.
pub struct ContentPublishService {
    pub(super) documents: Arc<dyn DocumentRepository>,
    pub(super) languages: Arc<dyn LanguageRepository>,
    pub(super) validator: Arc<PropertyValidatorPort>,
    pub(super) events: Arc<EventBusPort>,
    pub(super) audit_repo: Arc<dyn AuditRepository>,
    pub(super) clock: Arc<ClockPort>,
    pub(super) scopes: ScopeProvider,
    pub(super) impacts: CultureImpactFactory,
    pub(super) settings: ContentSettings,
}

impl ContentPublishService {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        languages: Arc<dyn LanguageRepository>,
        validator: Arc<PropertyValidatorPort>,
        events: Arc<EventBusPort>,
        audit_repo: Arc<dyn AuditRepository>,
        clock: Arc<ClockPort>,
        settings: ContentSettings,
    ) -> Self {
        Self {
            documents,
            languages,
            validator,
            events,
            audit_repo,
            clock,
            scopes: ScopeProvider::new(),
            impacts: CultureImpactFactory::new(),
            settings,
        }
    }

    /// Snapshot the language registry once per operation. Taken under a read
    /// lock for variant content so a concurrent language change cannot skew
    /// the mandatory-culture checks mid-publish.
    pub(super) async fn load_languages(
        &self,
        scope: &mut CoreScope,
        varies_by_culture: bool,
    ) -> ApplicationResult<Vec<Language>> {
        if varies_by_culture {
            scope.read_lock(LockResource::Languages).await;
        }
        Ok(self.languages.get_many().await?)
    }

    /// Persist the document, stamping creator (new documents) and writer,
    /// applying the publish/unpublish transition the mode calls for.
    pub(super) async fn save_document(
        &self,
        document: &mut Document,
        user_id: i64,
        mode: PersistMode,
    ) -> ApplicationResult<()> {
        if !document.has_identity() {
            document.creator_id = user_id;
        }
        document.writer_id = user_id;

        match mode {
            PersistMode::Publish => document.apply_publish(),
            PersistMode::Unpublish => document.apply_unpublish(),
            PersistMode::SaveOnly => {}
        }

        // dirty tracking resets before the save so the repository stores a
        // clean snapshot; a reload must not report unsaved changes
        document.mark_persisted();
        self.documents.save(document, mode).await?;
        Ok(())
    }

    pub(super) async fn audit(
        &self,
        audit_type: AuditType,
        user_id: i64,
        object_id: i64,
        message: Option<String>,
        parameters: Option<String>,
    ) -> ApplicationResult<()> {
        let mut entry = AuditEntry::new(audit_type, user_id, object_id);
        entry.message = message;
        entry.parameters = parameters;
        Ok(self.audit_repo.add(entry).await?)
    }

    pub(super) fn is_default_culture(langs: &[Language], culture: &str) -> bool {
        langs.iter().any(|l| l.is_default && l.matches(culture))
    }

    pub(super) fn is_mandatory_culture(langs: &[Language], culture: &str) -> bool {
        langs.iter().any(|l| l.is_mandatory && l.matches(culture))
    }

    /// Iso codes of the affected cultures, for audit messages.
    pub(super) fn language_details(langs: &[Language], cultures: &[String]) -> String {
        langs
            .iter()
            .filter(|l| cultures.iter().any(|c| l.matches(c)))
            .map(|l| l.iso_code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
