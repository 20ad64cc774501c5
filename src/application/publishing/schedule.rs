// src/application/publishing/schedule.rs
use chrono::{DateTime, Utc};
use tracing::{error, warn};

use crate::application::ports::events::ContentEvent;
use crate::application::publishing::commit::CommitIntent;
use crate::application::publishing::result::{PublishResult, PublishResultType};
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::LockResource;
use crate::application::ApplicationResult;
use crate::domain::document::schedule::{ContentScheduleCollection, ScheduleAction};
use crate::domain::document::{Document, WILDCARD_CULTURE};

impl ContentPublishService {
    /// Runs the pending release and expiry schedules up to `date`. Intended
    /// for a recurring background job. Returns one result per processed
    /// document; a failing document never aborts the batch.
    pub async fn perform_scheduled_publish(
        &self,
        date: DateTime<Utc>,
    ) -> ApplicationResult<Vec<PublishResult>> {
        let mut results = Vec::new();

        self.scheduled_release(date, &mut results).await?;
        self.scheduled_expiration(date, &mut results).await?;

        for result in results.iter().filter(|r| !r.success()) {
            error!(
                id = result.content.id,
                reason = ?result.result,
                "scheduled publishing failed for document"
            );
        }

        Ok(results)
    }

    async fn scheduled_release(
        &self,
        date: DateTime<Utc>,
        results: &mut Vec<PublishResult>,
    ) -> ApplicationResult<()> {
        let mut scope = self.scopes.create_scope();

        // fast lock-free check, this runs often and is usually a no-op
        if self.documents.has_content_for_release(date).await? {
            scope.write_lock(LockResource::ContentTree).await;

            let langs = self.languages.get_many().await?;

            for mut d in self.documents.get_content_for_release(date).await? {
                let mut schedule = self.documents.get_content_schedule(d.id).await?;

                if d.varies_by_culture() {
                    let mut pending: Vec<String> = schedule
                        .pending(ScheduleAction::Release, date)
                        .into_iter()
                        .map(|e| e.culture)
                        .collect();
                    pending.sort();
                    pending.dedup();
                    if pending.is_empty() {
                        continue;
                    }

                    let vetoed = self.events.publish_cancelable(&ContentEvent::Saving {
                        id: d.id,
                        name: d.name.clone(),
                    });
                    if vetoed {
                        results.push(PublishResult::new(
                            PublishResultType::FailedPublishCancelledByEvent,
                            &d,
                        ));
                        continue;
                    }

                    let mut publishing = true;
                    for culture in &pending {
                        schedule.clear_culture(culture, ScheduleAction::Release, date);

                        if d.trashed {
                            continue; // won't publish
                        }

                        // stage the culture and validate it; log the invalid
                        // properties so the failure is diagnosable
                        let impact = self
                            .impacts
                            .impact_explicit(culture, Self::is_mandatory_culture(&langs, culture));
                        let mut staged = d.publish_culture(&impact, date);
                        if staged {
                            if let Err(invalid) = self.validator.validate(&d, &impact) {
                                warn!(
                                    id = d.id,
                                    culture = %culture,
                                    invalid_properties = %invalid.join(","),
                                    "scheduled publishing will fail because of invalid properties"
                                );
                                staged = false;
                            }
                        }
                        publishing &= staged;
                    }

                    let result = if d.trashed {
                        PublishResult::new(PublishResultType::FailedPublishIsTrashed, &d)
                    } else if !publishing {
                        PublishResult::new(PublishResultType::FailedPublishContentInvalid, &d)
                    } else {
                        self.documents.persist_content_schedule(&d, &schedule).await?;
                        let writer_id = d.writer_id;
                        self.commit_in_scope(
                            &mut scope,
                            &mut d,
                            CommitIntent::Publish,
                            &langs,
                            writer_id,
                            false,
                            false,
                        )
                        .await?
                    };
                    results.push(result);
                } else {
                    schedule.clear(ScheduleAction::Release, date);

                    let result = if d.trashed {
                        PublishResult::new(PublishResultType::FailedPublishIsTrashed, &d)
                    } else {
                        self.documents.persist_content_schedule(&d, &schedule).await?;
                        let writer_id = d.writer_id;
                        self.publish_in_scope(
                            &mut scope,
                            &mut d,
                            &[WILDCARD_CULTURE.to_string()],
                            writer_id,
                        )
                        .await?
                    };
                    results.push(result);
                }
            }

            // entries may remain for documents that failed above; the pass
            // is done with them either way
            self.documents
                .clear_schedule(date, ScheduleAction::Release)
                .await?;
        }

        scope.complete();
        Ok(())
    }

    async fn scheduled_expiration(
        &self,
        date: DateTime<Utc>,
        results: &mut Vec<PublishResult>,
    ) -> ApplicationResult<()> {
        let mut scope = self.scopes.create_scope();

        // fast lock-free check, this runs often and is usually a no-op
        if self.documents.has_content_for_expiration(date).await? {
            scope.write_lock(LockResource::ContentTree).await;

            let langs = self.languages.get_many().await?;

            for mut d in self.documents.get_content_for_expiration(date).await? {
                let mut schedule = self.documents.get_content_schedule(d.id).await?;

                if d.varies_by_culture() {
                    let mut pending: Vec<String> = schedule
                        .pending(ScheduleAction::Expire, date)
                        .into_iter()
                        .map(|e| e.culture)
                        .collect();
                    pending.sort();
                    pending.dedup();
                    if pending.is_empty() {
                        continue;
                    }

                    let vetoed = self.events.publish_cancelable(&ContentEvent::Saving {
                        id: d.id,
                        name: d.name.clone(),
                    });
                    if vetoed {
                        results.push(PublishResult::new(
                            PublishResultType::FailedPublishCancelledByEvent,
                            &d,
                        ));
                        continue;
                    }

                    for culture in &pending {
                        schedule.clear_culture(culture, ScheduleAction::Expire, date);
                        d.unpublish_culture(Some(culture));
                    }

                    self.documents.persist_content_schedule(&d, &schedule).await?;
                    let writer_id = d.writer_id;
                    let result = self
                        .commit_in_scope(
                            &mut scope,
                            &mut d,
                            CommitIntent::Publish,
                            &langs,
                            writer_id,
                            false,
                            false,
                        )
                        .await?;
                    results.push(result);
                } else {
                    schedule.clear(ScheduleAction::Expire, date);
                    self.documents.persist_content_schedule(&d, &schedule).await?;

                    let writer_id = d.writer_id;
                    let result = self
                        .unpublish_in_scope(&mut scope, &mut d, None, writer_id)
                        .await?;
                    results.push(result);
                }
            }

            self.documents
                .clear_schedule(date, ScheduleAction::Expire)
                .await?;
        }

        scope.complete();
        Ok(())
    }

    /// The schedule of one document.
    pub async fn content_schedule(&self, id: i64) -> ApplicationResult<ContentScheduleCollection> {
        let mut scope = self.scopes.create_scope();
        scope.read_lock(LockResource::ContentTree).await;
        let schedule = self.documents.get_content_schedule(id).await?;
        scope.complete();
        Ok(schedule)
    }

    /// Replaces the stored schedule of a document.
    pub async fn persist_content_schedule(
        &self,
        document: &Document,
        schedule: &ContentScheduleCollection,
    ) -> ApplicationResult<()> {
        let mut scope = self.scopes.create_scope();
        scope.write_lock(LockResource::ContentTree).await;
        self.documents
            .persist_content_schedule(document, schedule)
            .await?;
        scope.complete();
        Ok(())
    }

    /// Documents with a release entry due at or before `date`.
    pub async fn content_for_release(
        &self,
        date: DateTime<Utc>,
    ) -> ApplicationResult<Vec<Document>> {
        let mut scope = self.scopes.create_scope();
        scope.read_lock(LockResource::ContentTree).await;
        let documents = self.documents.get_content_for_release(date).await?;
        scope.complete();
        Ok(documents)
    }

    /// Documents with an expiry entry due at or before `date`.
    pub async fn content_for_expiration(
        &self,
        date: DateTime<Utc>,
    ) -> ApplicationResult<Vec<Document>> {
        let mut scope = self.scopes.create_scope();
        scope.read_lock(LockResource::ContentTree).await;
        let documents = self.documents.get_content_for_expiration(date).await?;
        scope.complete();
        Ok(documents)
    }
}
