// src/application/publishing/branch.rs
use std::collections::HashSet;

use crate::application::ports::events::{ContentEvent, TreeChangeKind};
use crate::application::publishing::commit::CommitIntent;
use crate::application::publishing::result::{PublishResult, PublishResultType};
use crate::application::publishing::service::ContentPublishService;
use crate::application::scope::{CoreScope, LockResource};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::audit::AuditType;
use crate::domain::document::culture::normalize_culture;
use crate::domain::document::{Document, WILDCARD_CULTURE};
use crate::domain::language::Language;

/// Which documents of a branch get (re)published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishBranchFilter {
    /// Also publish documents that are not published at all.
    pub include_unpublished: bool,
    /// Republish documents even when they carry no pending edits.
    pub force_republish: bool,
}

impl PublishBranchFilter {
    /// Published documents with pending edits only.
    pub const DEFAULT: Self = Self {
        include_unpublished: false,
        force_republish: false,
    };

    /// Everything in the branch.
    pub const ALL: Self = Self {
        include_unpublished: true,
        force_republish: true,
    };
}

// accumulates one culture's verdict; None stays None when there is nothing
// to do at all
fn accumulate(
    cultures: &mut Option<HashSet<String>>,
    culture: &str,
    published: bool,
    edited: bool,
    is_root: bool,
    filter: PublishBranchFilter,
) {
    if published {
        // empty set means 'already published'
        let set = cultures.get_or_insert_with(HashSet::new);
        if edited || filter.force_republish {
            set.insert(culture.to_string());
        }
        return;
    }

    // not published: publish when forcing or at the root, else nothing to do
    if !filter.include_unpublished && !is_root {
        return;
    }
    cultures
        .get_or_insert_with(HashSet::new)
        .insert(culture.to_string());
}

impl ContentPublishService {
    /// Publishes a document and its descendants, top-down. A document that
    /// fails cuts its whole subtree out of the run; a root failure aborts
    /// the run. Returns one result per visited document.
    pub async fn publish_branch(
        &self,
        document: &mut Document,
        filter: PublishBranchFilter,
        cultures: &[String],
        user_id: i64,
    ) -> ApplicationResult<Vec<PublishResult>> {
        let mut cultures: Vec<String> = cultures.iter().map(|c| normalize_culture(c)).collect();
        // invariant roots accept the empty and "invariant" spellings of
        // "all cultures"
        if !document.varies_by_culture()
            && (cultures.is_empty() || (cultures.len() == 1 && cultures[0] == "invariant"))
        {
            cultures = vec![WILDCARD_CULTURE.to_string()];
        }

        let default_culture = {
            let mut scope = self.scopes.create_scope();
            scope.read_lock(LockResource::Languages).await;
            let default = self.languages.get_default_iso_code().await?;
            scope.complete();
            default
        };

        let root_id = document.id;
        let should_publish = move |d: &Document| -> Option<HashSet<String>> {
            let is_root = d.id == root_id;
            let mut to_publish: Option<HashSet<String>> = None;

            if !d.varies_by_culture() {
                accumulate(
                    &mut to_publish,
                    WILDCARD_CULTURE,
                    d.published,
                    d.edited,
                    is_root,
                    filter,
                );
                return to_publish;
            }

            if d.published {
                // some cultures may be already published, others need a
                // republish
                for culture in &cultures {
                    // an invariant request against a variant descendant
                    // means its default culture
                    let specific = if culture == WILDCARD_CULTURE {
                        default_culture.as_str()
                    } else {
                        culture.as_str()
                    };
                    accumulate(
                        &mut to_publish,
                        specific,
                        d.is_culture_published(specific),
                        d.is_culture_edited(specific),
                        is_root,
                        filter,
                    );
                }
                return to_publish;
            }

            if filter.include_unpublished || is_root {
                Some(cultures.iter().cloned().collect())
            } else {
                None
            }
        };

        self.publish_branch_with(document, should_publish, user_id)
            .await
    }

    /// Branch publishing with a caller-supplied verdict per document:
    /// `None` to skip it, an empty set for 'already published', a set of
    /// cultures to (re)publish.
    pub async fn publish_branch_with<F>(
        &self,
        document: &mut Document,
        should_publish: F,
        user_id: i64,
    ) -> ApplicationResult<Vec<PublishResult>>
    where
        F: Fn(&Document) -> Option<HashSet<String>> + Send + Sync,
    {
        if !document.has_identity() {
            return Err(ApplicationError::validation(
                "cannot branch-publish a new document",
            ));
        }

        let mut results = Vec::new();
        let mut published_ids = Vec::new();

        let mut scope = self.scopes.create_scope();
        scope.write_lock(LockResource::ContentTree).await;

        let langs = self
            .load_languages(&mut scope, document.varies_by_culture())
            .await?;

        // the branch root first; if it fails, abort
        let root_cultures = should_publish(document);
        let mut cultures_published: HashSet<String> =
            root_cultures.clone().unwrap_or_default();
        if let Some(result) = self
            .publish_branch_item(
                &mut scope,
                document,
                root_cultures,
                true,
                &mut published_ids,
                &langs,
                user_id,
            )
            .await?
        {
            let failed = !result.success();
            results.push(result);
            if failed {
                // the root failing is a business outcome, not a rollback
                scope.complete();
                return Ok(results);
            }
        }

        // descendants, parents before children; a failed document cuts its
        // subtree
        let mut exclude: HashSet<i64> = HashSet::new();
        let page_size = self.settings.branch_page_size();
        let mut page = 0;
        loop {
            let (descendants, _total) = self
                .documents
                .get_paged_descendants(document.id, page, page_size)
                .await?;
            let count = descendants.len();

            for mut d in descendants {
                if exclude.contains(&d.parent_id) {
                    exclude.insert(d.id);
                    continue;
                }

                // no need to check the path here, the parent was published
                // above
                let cultures_to_publish = should_publish(&d);
                let published_here = cultures_to_publish.clone().unwrap_or_default();
                match self
                    .publish_branch_item(
                        &mut scope,
                        &mut d,
                        cultures_to_publish,
                        false,
                        &mut published_ids,
                        &langs,
                        user_id,
                    )
                    .await?
                {
                    Some(result) if result.success() => {
                        results.push(result);
                        cultures_published.extend(published_here);
                    }
                    Some(result) => {
                        results.push(result);
                        exclude.insert(d.id);
                    }
                    None => {}
                }
            }

            page += 1;
            if count == 0 {
                break;
            }
        }

        self.audit(
            AuditType::Publish,
            user_id,
            document.id,
            Some("Branch published".to_string()),
            None,
        )
        .await?;

        // one tree change and one batched published event for the whole
        // branch
        self.events.publish(ContentEvent::TreeChange {
            id: document.id,
            kind: TreeChangeKind::RefreshBranch,
            published_cultures: if document.varies_by_culture() {
                if cultures_published.is_empty() {
                    None
                } else {
                    let mut cultures: Vec<String> = cultures_published.into_iter().collect();
                    cultures.sort();
                    Some(cultures)
                }
            } else {
                Some(vec![WILDCARD_CULTURE.to_string()])
            },
            unpublished_cultures: None,
        });
        self.events.publish(ContentEvent::Published {
            ids: published_ids,
        });

        scope.complete();
        Ok(results)
    }

    #[allow(clippy::too_many_arguments)]
    async fn publish_branch_item(
        &self,
        scope: &mut CoreScope,
        document: &mut Document,
        cultures_to_publish: Option<HashSet<String>>,
        is_root: bool,
        published_ids: &mut Vec<i64>,
        langs: &[Language],
        user_id: i64,
    ) -> ApplicationResult<Option<PublishResult>> {
        // the document will be saved, but pending edits must have been
        // persisted before the branch run
        if document.has_unsaved_changes() {
            return Ok(Some(PublishResult::new(
                PublishResultType::FailedPublishUnsavedChanges,
                document,
            )));
        }

        // None: not part of the run
        let cultures_to_publish = match cultures_to_publish {
            None => return Ok(None),
            Some(cultures) => cultures,
        };

        // empty: impacted but already published
        if cultures_to_publish.is_empty() {
            return Ok(Some(PublishResult::new(
                PublishResultType::SuccessPublishAlready,
                document,
            )));
        }

        let vetoed = self.events.publish_cancelable(&ContentEvent::Saving {
            id: document.id,
            name: document.name.clone(),
        });
        if vetoed {
            return Ok(Some(PublishResult::new(
                PublishResultType::FailedPublishCancelledByEvent,
                document,
            )));
        }

        if !self
            .stage_branch_cultures(document, &cultures_to_publish, langs)?
        {
            return Ok(Some(PublishResult::new(
                PublishResultType::FailedPublishContentInvalid,
                document,
            )));
        }

        let result = self
            .commit_in_scope(
                scope,
                document,
                CommitIntent::Publish,
                langs,
                user_id,
                true,
                is_root,
            )
            .await?;
        if result.success() {
            published_ids.push(document.id);
        }
        Ok(Some(result))
    }

    /// Stages and validates the culture values for one branch document.
    fn stage_branch_cultures(
        &self,
        document: &mut Document,
        cultures: &HashSet<String>,
        langs: &[Language],
    ) -> ApplicationResult<bool> {
        let now = self.clock.now();

        if document.varies_by_culture() {
            for culture in cultures {
                let impact = self.impacts.create(
                    culture,
                    Self::is_default_culture(langs, culture),
                    document,
                )?;
                if !document.publish_culture(&impact, now)
                    || self.validator.validate(document, &impact).is_err()
                {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        let impact = self.impacts.impact_invariant();
        Ok(document.publish_culture(&impact, now)
            && self.validator.validate(document, &impact).is_ok())
    }
}
