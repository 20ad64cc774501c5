// tests/support/builders.rs
use chrono::{TimeZone, Utc};

use pagecraft::domain::document::{ContentVariation, Document, DocumentRepository, PersistMode, ROOT_ID};

use super::mocks::InMemoryDocumentRepo;

/// Reference instant used by the fixtures; schedule tests offset from it.
pub fn epoch() -> chrono::DateTime<chrono::Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
}

pub fn invariant_document(name: &str) -> Document {
    Document::new(name, ROOT_ID, ContentVariation::Invariant)
}

pub fn invariant_child(name: &str, parent: &Document) -> Document {
    Document::new(name, parent.id, ContentVariation::Invariant)
}

/// A variant document with a draft name per culture.
pub fn variant_document(name: &str, cultures: &[&str]) -> Document {
    let mut document = Document::new(name, ROOT_ID, ContentVariation::Culture);
    for culture in cultures {
        document.edit_culture(culture, format!("{name} ({culture})"), epoch());
    }
    document
}

/// Persists a document straight through the repository, leaving it clean the
/// way a load would.
pub async fn persist(repo: &InMemoryDocumentRepo, document: &mut Document) {
    document.mark_persisted();
    repo.save(document, PersistMode::SaveOnly)
        .await
        .expect("in-memory save");
}
