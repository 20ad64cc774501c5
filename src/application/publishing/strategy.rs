// src/application/publishing/strategy.rs
//
// The per-operation legality checks and outcome classification for a single
// document. These read only their arguments and the injected collaborators;
// all state mutation beyond staging pending culture values happens in the
// committer.
use tracing::info;

use crate::application::ports::events::ContentEvent;
use crate::application::publishing::result::{PublishResult, PublishResultType};
use crate::application::publishing::service::ContentPublishService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::document::schedule::ScheduleAction;
use crate::domain::document::{ContentStatus, CultureImpact, Document, ROOT_ID};
use crate::domain::language::Language;

impl ContentPublishService {
    /// Decide whether the document can be published, in order, short-circuiting
    /// on the first failure: culture staging, property validation, variant
    /// culture rules, schedule status, ancestor path.
    pub(super) async fn strategy_can_publish(
        &self,
        document: &mut Document,
        check_path: bool,
        cultures_publishing: Option<&[String]>,
        cultures_unpublishing: Option<&[String]>,
        langs: &[Language],
    ) -> ApplicationResult<PublishResult> {
        let varies = document.varies_by_culture();
        let now = self.clock.now();

        // one impact per culture being published, or a single invariant one
        let impacts: Vec<CultureImpact> = match cultures_publishing {
            None => vec![self.impacts.impact_invariant()],
            Some(cultures) => cultures
                .iter()
                .map(|c| {
                    self.impacts
                        .impact_explicit(c, Self::is_mandatory_culture(langs, c))
                })
                .collect(),
        };

        for impact in &impacts {
            if !document.publish_culture(impact, now) {
                return Ok(PublishResult::new(
                    PublishResultType::FailedPublishContentInvalid,
                    document,
                ));
            }
        }

        for impact in &impacts {
            if let Err(invalid) = self.validator.validate(document, impact) {
                return Ok(PublishResult::new(
                    PublishResultType::FailedPublishContentInvalid,
                    document,
                )
                .with_invalid_properties(invalid));
            }
        }

        if varies {
            let publishing_cultures = cultures_publishing.ok_or_else(|| {
                ApplicationError::invariant(
                    "variant document without explicit cultures being published",
                )
            })?;
            let unpublishing_cultures = cultures_unpublishing.unwrap_or(&[]);

            if document.published
                && publishing_cultures.is_empty()
                && unpublishing_cultures.is_empty()
            {
                // nothing changed: e.g. re-unpublishing an already
                // unpublished culture
                return Ok(PublishResult::new(
                    PublishResultType::FailedPublishNothingToPublish,
                    document,
                ));
            }

            let published = document.published_cultures();
            let mandatory_missing = langs
                .iter()
                .filter(|l| l.is_mandatory)
                .any(|l| !published.iter().any(|c| l.matches(c)));
            if mandatory_missing {
                return Ok(PublishResult::new(
                    PublishResultType::FailedPublishMandatoryCultureMissing,
                    document,
                ));
            }

            if publishing_cultures.is_empty() && !unpublishing_cultures.is_empty() {
                return Ok(PublishResult::new(
                    PublishResultType::SuccessUnpublishCulture,
                    document,
                ));
            }
        }

        let schedule = self.documents.get_content_schedule(document.id).await?;
        let status_cultures: Vec<Option<&str>> = match cultures_publishing {
            None => vec![None],
            Some(cultures) => cultures.iter().map(|c| Some(c.as_str())).collect(),
        };
        for culture in status_cultures {
            match document.status(&schedule, culture, now) {
                ContentStatus::Expired => {
                    info!(
                        name = %document.name,
                        id = document.id,
                        culture = culture.unwrap_or("*"),
                        "document cannot be published: has expired"
                    );
                    return Ok(PublishResult::new(
                        if varies {
                            PublishResultType::FailedPublishCultureHasExpired
                        } else {
                            PublishResultType::FailedPublishHasExpired
                        },
                        document,
                    ));
                }
                ContentStatus::AwaitingRelease => {
                    info!(
                        name = %document.name,
                        id = document.id,
                        culture = culture.unwrap_or("*"),
                        "document cannot be published: awaiting release"
                    );
                    return Ok(PublishResult::new(
                        if varies {
                            PublishResultType::FailedPublishCultureAwaitingRelease
                        } else {
                            PublishResultType::FailedPublishAwaitingRelease
                        },
                        document,
                    ));
                }
                ContentStatus::Trashed => {
                    info!(
                        name = %document.name,
                        id = document.id,
                        "document cannot be published: is trashed"
                    );
                    return Ok(PublishResult::new(
                        PublishResultType::FailedPublishIsTrashed,
                        document,
                    ));
                }
                ContentStatus::Published | ContentStatus::Unpublished => {}
            }
        }

        if check_path {
            // root content always passes; otherwise the ancestor chain must
            // be published
            let path_ok = if document.parent_id == ROOT_ID {
                true
            } else {
                match self.documents.get_by_id(document.parent_id).await? {
                    Some(parent) => self.documents.is_path_published(&parent).await?,
                    None => true,
                }
            };
            if !path_ok {
                info!(
                    name = %document.name,
                    id = document.id,
                    "document cannot be published: parent is not published"
                );
                return Ok(PublishResult::new(
                    PublishResultType::FailedPublishPathNotPublished,
                    document,
                ));
            }
        }

        if varies
            && cultures_publishing.map_or(false, |c| !c.is_empty())
            && cultures_unpublishing.map_or(false, |c| !c.is_empty())
        {
            return Ok(PublishResult::new(
                PublishResultType::SuccessMixedCulture,
                document,
            ));
        }

        Ok(PublishResult::new(
            PublishResultType::SuccessPublish,
            document,
        ))
    }

    /// Classify the committing publish. Assumes `strategy_can_publish`
    /// already passed.
    pub(super) fn strategy_publish(
        &self,
        document: &Document,
        cultures_publishing: Option<&[String]>,
        cultures_unpublishing: Option<&[String]>,
    ) -> PublishResult {
        if document.varies_by_culture() {
            let publishing = cultures_publishing.unwrap_or(&[]);
            let unpublishing = cultures_unpublishing.unwrap_or(&[]);

            if document.published && publishing.is_empty() && unpublishing.is_empty() {
                return PublishResult::new(
                    PublishResultType::FailedPublishNothingToPublish,
                    document,
                );
            }

            if !unpublishing.is_empty() {
                info!(
                    name = %document.name,
                    id = document.id,
                    cultures = %unpublishing.join(","),
                    "document cultures have been unpublished"
                );
            }
            if !publishing.is_empty() {
                info!(
                    name = %document.name,
                    id = document.id,
                    cultures = %publishing.join(","),
                    "document cultures have been published"
                );
            }

            if !unpublishing.is_empty() && !publishing.is_empty() {
                return PublishResult::new(PublishResultType::SuccessMixedCulture, document);
            }
            if !unpublishing.is_empty() {
                return PublishResult::new(PublishResultType::SuccessUnpublishCulture, document);
            }
            return PublishResult::new(PublishResultType::SuccessPublishCulture, document);
        }

        info!(name = %document.name, id = document.id, "document has been published");
        PublishResult::new(PublishResultType::SuccessPublish, document)
    }

    /// Give subscribers a chance to veto the unpublish.
    pub(super) fn strategy_can_unpublish(&self, document: &Document) -> PublishResult {
        let vetoed = self
            .events
            .publish_cancelable(&ContentEvent::Unpublishing { id: document.id });
        if vetoed {
            info!(
                name = %document.name,
                id = document.id,
                "document cannot be unpublished: unpublishing was cancelled"
            );
            return PublishResult::new(
                PublishResultType::FailedUnpublishCancelledByEvent,
                document,
            );
        }
        PublishResult::new(PublishResultType::SuccessUnpublish, document)
    }

    /// Trim stale expiry entries so the unpublish is not immediately undone,
    /// and persist the schedule. Assumes `strategy_can_unpublish` already
    /// passed; this step has no failure path.
    pub(super) async fn strategy_unpublish(
        &self,
        document: &Document,
    ) -> ApplicationResult<PublishResult> {
        let now = self.clock.now();
        let mut schedule = self.documents.get_content_schedule(document.id).await?;
        let stale = schedule.pending(ScheduleAction::Expire, now);
        for entry in &stale {
            schedule.remove(entry);
        }
        if !stale.is_empty() {
            info!(
                name = %document.name,
                id = document.id,
                "stale expiry schedule removed because the document was unpublished"
            );
        }
        self.documents
            .persist_content_schedule(document, &schedule)
            .await?;

        info!(name = %document.name, id = document.id, "document has been unpublished");
        Ok(PublishResult::new(
            PublishResultType::SuccessUnpublish,
            document,
        ))
    }
}
