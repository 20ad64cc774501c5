// src/application/publishing/queries.rs
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::LockResource;
use crate::application::ApplicationResult;
use crate::domain::document::{Document, ROOT_ID};

impl ContentPublishService {
    /// Whether publishing the document would make it visible, judged from
    /// its ancestors alone.
    pub async fn is_path_publishable(&self, document: &Document) -> ApplicationResult<bool> {
        // root content is always publishable
        if document.parent_id == ROOT_ID {
            return Ok(true);
        }

        // trashed content never is
        if document.trashed {
            return Ok(false);
        }

        match self.documents.get_by_id(document.parent_id).await? {
            Some(parent) => self.is_path_published(&parent).await,
            None => Ok(true),
        }
    }

    /// Whether the document and every ancestor up to the root is published.
    pub async fn is_path_published(&self, document: &Document) -> ApplicationResult<bool> {
        let mut scope = self.scopes.create_scope();
        scope.read_lock(LockResource::ContentTree).await;
        let published = self.documents.is_path_published(document).await?;
        scope.complete();
        Ok(published)
    }

    /// Descendants that are effectively published, skipping subtrees hidden
    /// below an unpublished ancestor.
    pub async fn published_descendants(
        &self,
        document: &Document,
    ) -> ApplicationResult<Vec<Document>> {
        let mut scope = self.scopes.create_scope();
        scope.read_lock(LockResource::ContentTree).await;
        let descendants = self.published_descendants_in_scope(document).await?;
        scope.complete();
        Ok(descendants)
    }
}
