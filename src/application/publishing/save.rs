// src/application/publishing/save.rs
use tracing::info;

use crate::application::ports::events::{ContentEvent, TreeChangeKind};
use crate::application::publishing::publish::MAX_NAME_LENGTH;
use crate::application::publishing::result::OperationResult;
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::LockResource;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::audit::AuditType;
use crate::domain::document::{ContentScheduleCollection, Document, PersistMode};

impl ContentPublishService {
    /// Persists pending edits without touching the published version,
    /// optionally replacing the document's schedule in the same scope.
    pub async fn save(
        &self,
        document: &mut Document,
        user_id: i64,
        schedule: Option<&ContentScheduleCollection>,
    ) -> ApplicationResult<OperationResult> {
        if document.name.len() > MAX_NAME_LENGTH {
            return Err(ApplicationError::validation(
                "name cannot be more than 255 characters in length",
            ));
        }

        let mut scope = self.scopes.create_scope();

        let vetoed = self.events.publish_cancelable(&ContentEvent::Saving {
            id: document.id,
            name: document.name.clone(),
        });
        if vetoed {
            scope.complete();
            return Ok(OperationResult::cancel());
        }

        scope.write_lock(LockResource::ContentTree).await;

        // captured before the save clears the dirty flags
        let cultures_changing = document.cultures_being_edited();

        self.save_document(document, user_id, PersistMode::SaveOnly)
            .await?;

        if let Some(schedule) = schedule {
            self.documents
                .persist_content_schedule(document, schedule)
                .await?;
        }

        self.events.publish(ContentEvent::Saved { id: document.id });
        self.events.publish(ContentEvent::TreeChange {
            id: document.id,
            kind: TreeChangeKind::RefreshNode,
            published_cultures: None,
            unpublished_cultures: None,
        });

        if let Some(changing) = &cultures_changing {
            let langs = self.load_languages(&mut scope, true).await?;
            let details = Self::language_details(&langs, changing);
            self.audit(
                AuditType::SaveVariant,
                user_id,
                document.id,
                Some(format!("Saved languages: {details}")),
                Some(details),
            )
            .await?;
        } else {
            self.audit(AuditType::Save, user_id, document.id, None, None)
                .await?;
        }

        scope.complete();
        Ok(OperationResult::succeed())
    }

    /// Marks the document as waiting for an editor with publish rights.
    /// Saves pending edits first; returns whether the request went through.
    pub async fn send_to_publication(
        &self,
        document: &mut Document,
        user_id: i64,
    ) -> ApplicationResult<bool> {
        let mut scope = self.scopes.create_scope();

        let vetoed = self
            .events
            .publish_cancelable(&ContentEvent::SendingToPublish { id: document.id });
        if vetoed {
            scope.complete();
            return Ok(false);
        }

        // captured before the save clears the dirty flags
        let cultures_changing = document.cultures_being_edited();

        scope.write_lock(LockResource::ContentTree).await;
        self.save_document(document, user_id, PersistMode::SaveOnly)
            .await?;

        scope.complete();

        self.events
            .publish(ContentEvent::SentToPublish { id: document.id });

        if let Some(changing) = &cultures_changing {
            let cultures = changing.join(",");
            self.audit(
                AuditType::SendToPublishVariant,
                user_id,
                document.id,
                Some(format!("Send To Publish for cultures: {cultures}")),
                Some(cultures),
            )
            .await?;
        } else {
            self.audit(AuditType::SendToPublish, user_id, document.id, None, None)
                .await?;
        }

        info!(
            name = %document.name,
            id = document.id,
            "document was sent to publication"
        );
        Ok(true)
    }
}
