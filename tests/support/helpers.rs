// tests/support/helpers.rs
use std::sync::Arc;

use pagecraft::application::ports::validation::NoopPropertyValidator;
use pagecraft::config::ContentSettings;
use pagecraft::domain::language::Language;
use pagecraft::ContentPublishService;

use super::builders::epoch;
use super::mocks::{FixedClock, InMemoryDocumentRepo, InMemoryLanguageRepo, RecordingAuditRepo, RecordingEventBus};

pub struct Harness {
    pub service: ContentPublishService,
    pub documents: Arc<InMemoryDocumentRepo>,
    pub bus: Arc<RecordingEventBus>,
    pub audit: Arc<RecordingAuditRepo>,
    pub clock: Arc<FixedClock>,
}

pub fn harness_with_languages(languages: Vec<Language>) -> Harness {
    // RUST_LOG=pagecraft=debug to see service logs while debugging a test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let documents = Arc::new(InMemoryDocumentRepo::new());
    let bus = Arc::new(RecordingEventBus::new());
    let audit = Arc::new(RecordingAuditRepo::new());
    let clock = Arc::new(FixedClock::new(epoch()));

    let service = ContentPublishService::new(
        documents.clone(),
        Arc::new(InMemoryLanguageRepo::new(languages)),
        Arc::new(NoopPropertyValidator),
        bus.clone(),
        audit.clone(),
        clock.clone(),
        ContentSettings::default(),
    );

    Harness {
        service,
        documents,
        bus,
        audit,
        clock,
    }
}

/// Default fixture: en-US is the default language, nothing mandatory.
pub fn harness() -> Harness {
    harness_with_languages(vec![
        Language::new("en-US", true, false),
        Language::new("fr-FR", false, false),
    ])
}

/// en-US default and mandatory, fr-FR optional.
pub fn harness_with_mandatory_default() -> Harness {
    harness_with_languages(vec![
        Language::new("en-US", true, true),
        Language::new("fr-FR", false, false),
    ])
}
