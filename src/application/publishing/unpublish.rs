// src/application/publishing/unpublish.rs
use crate::application::ports::events::ContentEvent;
use crate::application::publishing::commit::CommitIntent;
use crate::application::publishing::result::{PublishResult, PublishResultType};
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::{CoreScope, LockResource};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::document::culture::normalize_culture;
use crate::domain::document::{Document, WILDCARD_CULTURE};

impl ContentPublishService {
    /// Unpublishes a culture, or the whole document for `None` or the
    /// wildcard. Unpublishing the last or a mandatory culture takes the
    /// whole document down; the result says which case happened.
    pub async fn unpublish(
        &self,
        document: &mut Document,
        culture: Option<&str>,
        user_id: i64,
    ) -> ApplicationResult<PublishResult> {
        let culture = culture
            .map(normalize_culture)
            .filter(|c| !c.is_empty());

        // a specific culture needs a variant document; a variant document
        // needs a culture
        if document.varies_by_culture() {
            if culture.is_none() {
                return Err(ApplicationError::validation(
                    "the invariant culture is not supported by variant documents",
                ));
            }
        } else if let Some(c) = &culture {
            if c != WILDCARD_CULTURE {
                return Err(ApplicationError::validation(format!(
                    "culture \"{c}\" is not supported by invariant documents"
                )));
            }
        }

        // not published, nothing to do
        if !document.published {
            return Ok(PublishResult::new(
                PublishResultType::SuccessUnpublishAlready,
                document,
            ));
        }

        let mut scope = self.scopes.create_scope();
        let result = self
            .unpublish_in_scope(&mut scope, document, culture.as_deref(), user_id)
            .await?;
        scope.complete();
        Ok(result)
    }

    /// The unpublish body, callable from an already-open scope (the
    /// scheduler reuses it). Arguments are assumed validated.
    pub(super) async fn unpublish_in_scope(
        &self,
        scope: &mut CoreScope,
        document: &mut Document,
        culture: Option<&str>,
        user_id: i64,
    ) -> ApplicationResult<PublishResult> {
        if !document.published {
            return Ok(PublishResult::new(
                PublishResultType::SuccessUnpublishAlready,
                document,
            ));
        }

        scope.write_lock(LockResource::ContentTree).await;

        let langs = self.load_languages(scope, document.varies_by_culture()).await?;

        let vetoed = self.events.publish_cancelable(&ContentEvent::Saving {
            id: document.id,
            name: document.name.clone(),
        });
        if vetoed {
            return Ok(PublishResult::new(
                PublishResultType::FailedPublishCancelledByEvent,
                document,
            ));
        }

        if culture == Some(WILDCARD_CULTURE) || (!document.varies_by_culture() && culture.is_none())
        {
            // all cultures: drop the published version in one commit
            document.unpublish_culture(culture);
            return self
                .commit_in_scope(
                    scope,
                    document,
                    CommitIntent::Unpublish,
                    &langs,
                    user_id,
                    false,
                    false,
                )
                .await;
        }

        // one culture: stage its removal and re-publish the document without
        // it; the committer handles the mandatory and last-culture cases
        let removed = document.unpublish_culture(culture);

        let result = self
            .commit_in_scope(
                scope,
                document,
                CommitIntent::Publish,
                &langs,
                user_id,
                false,
                false,
            )
            .await?;

        // nothing was staged because the culture was not published to begin
        // with
        if result.result == PublishResultType::FailedPublishNothingToPublish && !removed {
            return Ok(PublishResult::new(
                PublishResultType::SuccessUnpublishAlready,
                document,
            ));
        }

        Ok(result)
    }
}
