// tests/scheduled_publish_tests.rs
mod support;

use pagecraft::application::publishing::PublishResultType;
use pagecraft::domain::document::{ContentSchedule, ContentScheduleCollection, ScheduleAction};

use support::*;

#[tokio::test]
async fn a_due_release_entry_publishes_the_culture() {
    let h = harness();
    let mut doc = variant_document("Home", &["en-US", "fr-FR"]);
    persist(&h.documents, &mut doc).await;

    let mut schedule = ContentScheduleCollection::new();
    schedule.add(ContentSchedule::new(
        "en-us",
        ScheduleAction::Release,
        epoch() - chrono::Duration::hours(1),
    ));
    h.service
        .persist_content_schedule(&doc, &schedule)
        .await
        .expect("schedule");

    let results = h
        .service
        .perform_scheduled_publish(epoch())
        .await
        .expect("scheduled publish");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result, PublishResultType::SuccessPublishCulture);

    let stored = h.documents.stored(doc.id).expect("stored");
    assert!(stored.published);
    assert!(stored.is_culture_published("en-us"));
    assert!(!stored.is_culture_published("fr-fr"));

    // the entry is consumed, a second run is a no-op
    let results = h
        .service
        .perform_scheduled_publish(epoch())
        .await
        .expect("second run");
    assert!(results.is_empty());
}

#[tokio::test]
async fn a_trashed_document_fails_release_but_its_schedule_is_cleared() {
    let h = harness();
    let mut doc = invariant_document("Trashed");
    doc.trashed = true;
    persist(&h.documents, &mut doc).await;

    let mut schedule = ContentScheduleCollection::new();
    schedule.add(ContentSchedule::new(
        "",
        ScheduleAction::Release,
        epoch() - chrono::Duration::minutes(5),
    ));
    h.service
        .persist_content_schedule(&doc, &schedule)
        .await
        .expect("schedule");

    let results = h
        .service
        .perform_scheduled_publish(epoch())
        .await
        .expect("scheduled publish");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result, PublishResultType::FailedPublishIsTrashed);
    assert!(!h.documents.stored(doc.id).expect("stored").published);

    let stored = h.documents.stored_schedule(doc.id);
    assert!(stored
        .pending(ScheduleAction::Release, epoch())
        .is_empty());
}

#[tokio::test]
async fn a_due_expiry_entry_unpublishes_one_culture() {
    let h = harness();
    let mut doc = variant_document("Home", &["en-US", "fr-FR"]);
    persist(&h.documents, &mut doc).await;
    h.service
        .publish(
            &mut doc,
            &["en-US".to_string(), "fr-FR".to_string()],
            1,
        )
        .await
        .expect("publish");

    let mut schedule = ContentScheduleCollection::new();
    schedule.add(ContentSchedule::new(
        "fr-fr",
        ScheduleAction::Expire,
        epoch() - chrono::Duration::hours(1),
    ));
    h.service
        .persist_content_schedule(&doc, &schedule)
        .await
        .expect("schedule");

    let results = h
        .service
        .perform_scheduled_publish(epoch())
        .await
        .expect("scheduled publish");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result, PublishResultType::SuccessUnpublishCulture);

    let stored = h.documents.stored(doc.id).expect("stored");
    assert!(stored.published);
    assert!(stored.is_culture_published("en-us"));
    assert!(!stored.is_culture_published("fr-fr"));
}

#[tokio::test]
async fn a_due_expiry_entry_unpublishes_an_invariant_document() {
    let h = harness();
    let mut doc = invariant_document("Home");
    persist(&h.documents, &mut doc).await;
    h.service.publish(&mut doc, &[], 1).await.expect("publish");

    let mut schedule = ContentScheduleCollection::new();
    schedule.add(ContentSchedule::new(
        "",
        ScheduleAction::Expire,
        epoch() - chrono::Duration::minutes(1),
    ));
    h.service
        .persist_content_schedule(&doc, &schedule)
        .await
        .expect("schedule");

    let results = h
        .service
        .perform_scheduled_publish(epoch())
        .await
        .expect("scheduled publish");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result, PublishResultType::SuccessUnpublish);
    assert!(!h.documents.stored(doc.id).expect("stored").published);
}

#[tokio::test]
async fn nothing_due_is_a_noop() {
    let h = harness();
    let mut doc = invariant_document("Home");
    persist(&h.documents, &mut doc).await;

    let mut schedule = ContentScheduleCollection::new();
    schedule.add(ContentSchedule::new(
        "",
        ScheduleAction::Release,
        epoch() + chrono::Duration::days(1),
    ));
    h.service
        .persist_content_schedule(&doc, &schedule)
        .await
        .expect("schedule");

    let results = h
        .service
        .perform_scheduled_publish(epoch())
        .await
        .expect("scheduled publish");
    assert!(results.is_empty());
    assert!(h.bus.recorded().is_empty());
}
