// src/application/publishing/publish.rs
use crate::application::publishing::commit::CommitIntent;
use crate::application::publishing::result::{PublishResult, PublishResultType};
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::{CoreScope, LockResource};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::document::culture::normalize_culture;
use crate::domain::document::{Document, WILDCARD_CULTURE};

pub(super) const MAX_NAME_LENGTH: usize = 255;

impl ContentPublishService {
    /// Publishes the document's pending values for the given cultures.
    ///
    /// The document must be saved first; publishing never persists pending
    /// edits. For invariant documents, pass no cultures or the wildcard.
    /// Business conditions come back inside the [`PublishResult`], argument
    /// misuse comes back as an error.
    pub async fn publish(
        &self,
        document: &mut Document,
        cultures: &[String],
        user_id: i64,
    ) -> ApplicationResult<PublishResult> {
        if cultures.iter().any(|c| c.trim().is_empty()) {
            return Err(ApplicationError::validation(
                "cultures cannot be blank",
            ));
        }
        let mut cultures: Vec<String> = cultures.iter().map(|c| normalize_culture(c)).collect();
        {
            let mut seen = cultures.clone();
            seen.sort();
            seen.dedup();
            if seen.len() != cultures.len() {
                return Err(ApplicationError::validation("cultures cannot repeat"));
            }
        }

        if document.has_unsaved_changes() {
            return Ok(PublishResult::new(
                PublishResultType::FailedPublishUnsavedChanges,
                document,
            ));
        }

        if document.name.len() > MAX_NAME_LENGTH {
            return Err(ApplicationError::validation(
                "name cannot be more than 255 characters in length",
            ));
        }

        if document.varies_by_culture() {
            if cultures.len() > 1 && cultures.iter().any(|c| c == WILDCARD_CULTURE) {
                return Err(ApplicationError::validation(
                    "cannot combine wildcard and specific cultures when publishing variant documents",
                ));
            }
        } else {
            if cultures.is_empty() {
                cultures = vec![WILDCARD_CULTURE.to_string()];
            }
            if cultures[0] != WILDCARD_CULTURE || cultures.len() > 1 {
                return Err(ApplicationError::validation(
                    "only the wildcard culture is supported when publishing invariant documents",
                ));
            }
        }

        let mut scope = self.scopes.create_scope();
        let result = self
            .publish_in_scope(&mut scope, document, &cultures, user_id)
            .await?;
        scope.complete();
        Ok(result)
    }

    /// The publish body, callable from an already-open scope (the scheduler
    /// reuses it). Arguments are assumed validated.
    pub(super) async fn publish_in_scope(
        &self,
        scope: &mut CoreScope,
        document: &mut Document,
        cultures: &[String],
        user_id: i64,
    ) -> ApplicationResult<PublishResult> {
        scope.write_lock(LockResource::ContentTree).await;

        let langs = self.load_languages(scope, document.varies_by_culture()).await?;

        // stage the culture values now; the committer re-checks them
        let now = self.clock.now();
        for culture in cultures {
            let impact = self.impacts.create(
                culture,
                Self::is_default_culture(&langs, culture),
                document,
            )?;
            document.publish_culture(&impact, now);
        }

        self.commit_in_scope(
            scope,
            document,
            CommitIntent::Publish,
            &langs,
            user_id,
            false,
            false,
        )
        .await
    }
}
