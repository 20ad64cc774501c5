// src/application/publishing/commit.rs
//
// The committer: one save that resolves every publish/unpublish business
// case for a single document. Unpublishing a mandatory culture or the last
// culture starts as a publish and ends as an unpublish, so the two flags
// are resolved here before the document is persisted.
use tracing::info;

use crate::application::ports::events::{ContentEvent, TreeChangeKind};
use crate::application::publishing::result::{PublishResult, PublishResultType};
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::{CoreScope, LockResource};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::audit::AuditType;
use crate::domain::document::{Document, PersistMode};
use crate::domain::language::Language;

/// What the caller wants the commit to do. Carried as an argument instead of
/// a transient state on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitIntent {
    /// Promote pending culture values to the published version. Cultures
    /// staged for removal are dropped at the same time.
    Publish,
    /// Drop the published version entirely.
    Unpublish,
}

fn non_empty(cultures: Option<&Vec<String>>) -> Option<Vec<String>> {
    cultures.filter(|c| !c.is_empty()).cloned()
}

impl ContentPublishService {
    /// Advanced entry point: commit already-staged culture changes directly.
    /// [`ContentPublishService::publish`] and
    /// [`ContentPublishService::unpublish`] cover the common cases; this is
    /// for callers that stage culture values themselves.
    pub async fn commit_document_changes(
        &self,
        document: &mut Document,
        intent: CommitIntent,
        user_id: i64,
    ) -> ApplicationResult<PublishResult> {
        let mut scope = self.scopes.create_scope();
        scope.write_lock(LockResource::ContentTree).await;

        let vetoed = self.events.publish_cancelable(&ContentEvent::Saving {
            id: document.id,
            name: document.name.clone(),
        });
        if vetoed {
            scope.complete();
            return Ok(PublishResult::new(
                PublishResultType::FailedPublishCancelledByEvent,
                document,
            ));
        }

        let langs = self.load_languages(&mut scope, document.varies_by_culture()).await?;

        let result = self
            .commit_in_scope(&mut scope, document, intent, &langs, user_id, false, false)
            .await?;
        scope.complete();
        Ok(result)
    }

    /// Commit a document change inside an already write-locked scope.
    /// `branch_one` marks a call made per-document by the branch publisher,
    /// which defers tree-change and published events to the branch level.
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn commit_in_scope(
        &self,
        scope: &mut CoreScope,
        document: &mut Document,
        intent: CommitIntent,
        langs: &[Language],
        user_id: i64,
        branch_one: bool,
        branch_root: bool,
    ) -> ApplicationResult<PublishResult> {
        debug_assert!(scope.holds(LockResource::ContentTree));

        let mut publish_result: Option<PublishResult> = None;
        let mut unpublish_result: Option<PublishResult> = None;

        // these start from the intent but may flip below
        let mut publishing = intent == CommitIntent::Publish;
        let mut unpublishing = intent == CommitIntent::Unpublish;

        let varies_by_culture = document.varies_by_culture();

        let cultures_changing = document.cultures_being_edited();

        let is_new = !document.has_identity();
        let mut change_type = if is_new {
            TreeChangeKind::RefreshNode
        } else {
            TreeChangeKind::RefreshBranch
        };
        let previously_published = document.has_identity() && document.published;

        let mut cultures_publishing: Option<Vec<String>> = None;
        let mut cultures_unpublishing: Option<Vec<String>> = None;

        if publishing {
            // derived from the staging calls made before the commit
            cultures_unpublishing = Some(document.cultures_unpublishing());
            cultures_publishing = document.cultures_being_published();

            let mut result = self
                .strategy_can_publish(
                    document,
                    // branch descendants have a published parent by
                    // construction, no need to walk the path
                    !branch_one || branch_root,
                    cultures_publishing.as_deref(),
                    cultures_unpublishing.as_deref(),
                    langs,
                )
                .await?;

            if result.success() {
                let vetoed = self
                    .events
                    .publish_cancelable(&ContentEvent::Publishing { id: document.id });
                if vetoed {
                    info!(
                        name = %document.name,
                        id = document.id,
                        "document cannot be published: publishing was cancelled"
                    );
                    return Ok(PublishResult::new(
                        PublishResultType::FailedPublishCancelledByEvent,
                        document,
                    ));
                }

                result = self.strategy_publish(
                    document,
                    cultures_publishing.as_deref(),
                    cultures_unpublishing.as_deref(),
                );

                // unpublishing the last culture: persist the publish with no
                // cultures first, then unpublish the document as a whole
                if result.result == PublishResultType::SuccessUnpublishCulture
                    && document.published_culture_count() == 0
                {
                    self.save_document(document, user_id, PersistMode::Publish)
                        .await?;

                    unpublishing = document.published;
                }
            } else if branch_one && !branch_root {
                // in a branch, just give up
                return Ok(result);
            } else if result.result == PublishResultType::FailedPublishMandatoryCultureMissing {
                // a mandatory culture was unpublished: the whole document
                // goes down with it, but we still save the rest
                publishing = false;
                unpublishing = document.published;
            }

            publish_result = Some(result);
        }

        // won't happen in a branch
        if unpublishing {
            // ensure we have the newest version, in scope
            let newest = self.documents.get_by_id(document.id).await?;
            if newest.map(|n| n.version_id) != Some(document.version_id) {
                return Ok(PublishResult::new(
                    PublishResultType::FailedPublishConcurrencyViolation,
                    document,
                ));
            }

            if document.published {
                let result = self.strategy_can_unpublish(document);
                if result.success() {
                    unpublish_result = Some(self.strategy_unpublish(document).await?);
                } else {
                    return Ok(result);
                }
            } else {
                // already unpublished under the write lock: someone raced us
                // around the scope, better die fast than corrupt the store
                return Err(ApplicationError::invariant(
                    "unpublish concurrency collision",
                ));
            }
        }

        let mode = if unpublishing && unpublish_result.as_ref().is_some_and(|r| r.success()) {
            PersistMode::Unpublish
        } else if publishing && publish_result.as_ref().is_some_and(|r| r.success()) {
            PersistMode::Publish
        } else {
            PersistMode::SaveOnly
        };
        if mode == PersistMode::SaveOnly {
            // the commit did not go through: drafts are still saved, the
            // staged publish state is not
            document.revert_publish_changes();
        }
        self.save_document(document, user_id, mode).await?;

        // we have tried to unpublish - won't happen in a branch
        if unpublishing {
            if unpublish_result.as_ref().is_some_and(|r| r.success()) {
                self.events.publish(ContentEvent::Unpublished { id: document.id });
                self.events.publish(ContentEvent::TreeChange {
                    id: document.id,
                    kind: TreeChangeKind::RefreshBranch,
                    published_cultures: if varies_by_culture {
                        non_empty(cultures_publishing.as_ref())
                    } else {
                        None
                    },
                    unpublished_cultures: if varies_by_culture {
                        non_empty(cultures_unpublishing.as_ref())
                    } else {
                        Some(vec!["*".to_string()])
                    },
                });

                if let Some(unpublished) = &cultures_unpublishing {
                    // we unpublished a mandatory culture or the last culture
                    let details = Self::language_details(langs, unpublished);
                    self.audit(
                        AuditType::UnpublishVariant,
                        user_id,
                        document.id,
                        Some(format!("Unpublished languages: {details}")),
                        Some(details),
                    )
                    .await?;

                    let publish_result = publish_result.ok_or_else(|| {
                        ApplicationError::invariant("unpublishing cultures without publish result")
                    })?;
                    match publish_result.result {
                        PublishResultType::FailedPublishMandatoryCultureMissing => {
                            self.audit(
                                AuditType::Unpublish,
                                user_id,
                                document.id,
                                Some("Unpublished (mandatory language unpublished)".to_string()),
                                None,
                            )
                            .await?;
                            return Ok(PublishResult::new(
                                PublishResultType::SuccessUnpublishMandatoryCulture,
                                document,
                            ));
                        }
                        PublishResultType::SuccessUnpublishCulture => {
                            self.audit(
                                AuditType::Unpublish,
                                user_id,
                                document.id,
                                Some("Unpublished (last language unpublished)".to_string()),
                                None,
                            )
                            .await?;
                            return Ok(PublishResult::new(
                                PublishResultType::SuccessUnpublishLastCulture,
                                document,
                            ));
                        }
                        _ => {}
                    }
                }

                self.audit(AuditType::Unpublish, user_id, document.id, None, None)
                    .await?;
                return Ok(PublishResult::new(
                    PublishResultType::SuccessUnpublish,
                    document,
                ));
            }

            self.events.publish(ContentEvent::TreeChange {
                id: document.id,
                kind: change_type,
                published_cultures: None,
                unpublished_cultures: None,
            });
            return Ok(PublishResult::new(PublishResultType::FailedUnpublish, document));
        }

        // we have tried to publish
        if publishing {
            if publish_result.as_ref().is_some_and(|r| r.success()) {
                let result = publish_result.ok_or_else(|| {
                    ApplicationError::invariant("publishing without publish result")
                })?;

                if !is_new {
                    change_type = if previously_published {
                        TreeChangeKind::RefreshNode
                    } else {
                        // it was not published and now is: the whole branch
                        // comes back
                        TreeChangeKind::RefreshBranch
                    };
                }

                // for branches, the branch publisher raises these once at
                // the end
                if !branch_one {
                    self.events.publish(ContentEvent::TreeChange {
                        id: document.id,
                        kind: change_type,
                        published_cultures: if varies_by_culture {
                            non_empty(cultures_publishing.as_ref())
                        } else {
                            Some(vec!["*".to_string()])
                        },
                        unpublished_cultures: if varies_by_culture {
                            non_empty(cultures_unpublishing.as_ref())
                        } else {
                            None
                        },
                    });
                    self.events.publish(ContentEvent::Published {
                        ids: vec![document.id],
                    });
                }

                // descendants that were published but invisible below an
                // unpublished ancestor are back as published
                if !branch_one
                    && !is_new
                    && !previously_published
                    && self.documents.has_children(document.id).await?
                {
                    let descendants = self.published_descendants_in_scope(document).await?;
                    if !descendants.is_empty() {
                        self.events.publish(ContentEvent::Published {
                            ids: descendants.iter().map(|d| d.id).collect(),
                        });
                    }
                }

                match result.result {
                    PublishResultType::SuccessPublish => {
                        self.audit(AuditType::Publish, user_id, document.id, None, None)
                            .await?;
                    }
                    PublishResultType::SuccessPublishCulture => {
                        if let Some(published) = &cultures_publishing {
                            let details = Self::language_details(langs, published);
                            self.audit(
                                AuditType::PublishVariant,
                                user_id,
                                document.id,
                                Some(format!("Published languages: {details}")),
                                Some(details),
                            )
                            .await?;
                        }
                    }
                    PublishResultType::SuccessUnpublishCulture => {
                        if let Some(unpublished) = &cultures_unpublishing {
                            let details = Self::language_details(langs, unpublished);
                            self.audit(
                                AuditType::UnpublishVariant,
                                user_id,
                                document.id,
                                Some(format!("Unpublished languages: {details}")),
                                Some(details),
                            )
                            .await?;
                        }
                    }
                    _ => {}
                }

                return Ok(result);
            }
        }

        if branch_one && !branch_root {
            return Err(ApplicationError::invariant(
                "branch descendant fell through the commit",
            ));
        }

        // publishing did not happen, or failed: still log which cultures
        // were saved
        if !branch_one && !publish_result.as_ref().is_some_and(|r| r.success()) {
            if let Some(changing) = &cultures_changing {
                let details = Self::language_details(langs, changing);
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
        }

        self.events.publish(ContentEvent::TreeChange {
            id: document.id,
            kind: change_type,
            published_cultures: None,
            unpublished_cultures: None,
        });

        publish_result
            .ok_or_else(|| ApplicationError::invariant("commit fell through without a result"))
    }

    /// Descendants that are effectively published: published themselves and
    /// not hidden below an unpublished ancestor. Caller holds the tree lock.
    pub(super) async fn published_descendants_in_scope(
        &self,
        document: &Document,
    ) -> ApplicationResult<Vec<Document>> {
        let descendants = self.documents.get_descendants(document).await?;

        let mut parents = vec![document.id];
        let mut published = Vec::new();
        for d in descendants {
            if d.published && parents.contains(&d.parent_id) {
                parents.push(d.id);
                published.push(d);
            }
        }
        Ok(published)
    }
}
