// src/domain/document/entity.rs
use crate::domain::document::culture::{normalize_culture, CultureImpact};
use crate::domain::document::schedule::{ContentScheduleCollection, ScheduleAction};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Parent id of root-level content; also the first segment of every path.
pub const ROOT_ID: i64 = -1;

/// Pseudo-culture meaning "all cultures" (variant) or "the" culture
/// (invariant).
pub const WILDCARD_CULTURE: &str = "*";

/// Culture key under which invariant schedule entries are stored.
pub const INVARIANT_CULTURE: &str = "";

/// Whether a content type tracks publish state per culture or as one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentVariation {
    Invariant,
    Culture,
}

/// Document status with respect to trash and schedule, per culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStatus {
    Published,
    Unpublished,
    Trashed,
    Expired,
    AwaitingRelease,
}

/// Edited (draft) state of one culture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureInfo {
    pub culture: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    pub edited: bool,
    dirty: bool,
}

/// Published state of one culture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCultureInfo {
    pub culture: String,
    pub name: String,
    pub published_at: DateTime<Utc>,
    dirty: bool,
}

/// The unit of publishing: a node of the content tree with per-culture draft
/// and published state. Mutators record dirty state consumed by the publish
/// committer to decide which cultures an operation affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64, // 0 until first persisted
    pub key: Uuid,
    pub name: String,
    pub parent_id: i64,
    pub path: String, // "-1,12,34", assigned on persist
    pub level: i32,
    pub sort_order: i32,
    pub variation: ContentVariation,
    pub trashed: bool,
    pub published: bool,
    pub edited: bool,
    pub version_id: i64,
    pub published_version_id: i64, // 0 until first publish
    pub creator_id: i64,
    pub writer_id: i64,
    culture_infos: BTreeMap<String, CultureInfo>,
    publish_culture_infos: BTreeMap<String, PublishCultureInfo>,
    cultures_unpublishing: Vec<String>,
    // last-persisted publish entry per culture touched since the last
    // persist; `None` marks a culture that had no entry
    publish_rollback: BTreeMap<String, Option<PublishCultureInfo>>,
    dirty: bool,
}

impl Document {
    pub fn new(name: impl Into<String>, parent_id: i64, variation: ContentVariation) -> Self {
        Self {
            id: 0,
            key: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            path: String::new(),
            level: 0,
            sort_order: 0,
            variation,
            trashed: false,
            published: false,
            edited: true,
            version_id: 0,
            published_version_id: 0,
            creator_id: 0,
            writer_id: 0,
            culture_infos: BTreeMap::new(),
            publish_culture_infos: BTreeMap::new(),
            cultures_unpublishing: Vec::new(),
            publish_rollback: BTreeMap::new(),
            dirty: true,
        }
    }

    pub fn has_identity(&self) -> bool {
        self.id != 0
    }

    pub fn varies_by_culture(&self) -> bool {
        self.variation == ContentVariation::Culture
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.culture_infos.values().any(|i| i.dirty)
    }

    /// A document that was never saved, or carries unsaved edits, cannot be
    /// published as-is.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.has_identity() || self.is_dirty()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.edited = true;
        self.dirty = true;
    }

    /// Record a draft edit for one culture of a variant document.
    pub fn edit_culture(&mut self, culture: &str, name: impl Into<String>, now: DateTime<Utc>) {
        let culture = normalize_culture(culture);
        let name = name.into();
        self.culture_infos
            .entry(culture.clone())
            .and_modify(|info| {
                info.name = name.clone();
                info.updated_at = now;
                info.edited = true;
                info.dirty = true;
            })
            .or_insert(CultureInfo {
                culture,
                name,
                updated_at: now,
                edited: true,
                dirty: true,
            });
        self.edited = true;
        self.dirty = true;
    }

    pub fn available_cultures(&self) -> Vec<String> {
        self.culture_infos.keys().cloned().collect()
    }

    pub fn is_culture_available(&self, culture: &str) -> bool {
        self.culture_infos.contains_key(&normalize_culture(culture))
    }

    pub fn is_culture_edited(&self, culture: &str) -> bool {
        self.culture_infos
            .get(&normalize_culture(culture))
            .map(|i| i.edited)
            .unwrap_or(false)
    }

    pub fn published_cultures(&self) -> Vec<String> {
        self.publish_culture_infos.keys().cloned().collect()
    }

    pub fn is_culture_published(&self, culture: &str) -> bool {
        self.publish_culture_infos
            .contains_key(&normalize_culture(culture))
    }

    pub fn published_culture_count(&self) -> usize {
        self.publish_culture_infos.len()
    }

    pub fn culture_name(&self, culture: &str) -> Option<&str> {
        self.culture_infos
            .get(&normalize_culture(culture))
            .map(|i| i.name.as_str())
    }

    /// Stage the publish of the cultures covered by `impact`, copying draft
    /// values into pending published values. Returns false when the impact
    /// does not fit the document (missing culture, blank name, variance
    /// mismatch); the caller maps that to a content-invalid result.
    pub fn publish_culture(&mut self, impact: &CultureImpact, at: DateTime<Utc>) -> bool {
        match impact {
            CultureImpact::Invariant => {
                !self.varies_by_culture() && !self.name.trim().is_empty()
            }
            CultureImpact::All => {
                if !self.varies_by_culture() || self.culture_infos.is_empty() {
                    return false;
                }
                let cultures = self.available_cultures();
                for culture in cultures {
                    if !self.stage_culture_publish(&culture, at) {
                        return false;
                    }
                }
                true
            }
            CultureImpact::Explicit { culture, .. } => {
                self.varies_by_culture() && self.stage_culture_publish(culture, at)
            }
        }
    }

    fn stage_culture_publish(&mut self, culture: &str, at: DateTime<Utc>) -> bool {
        let culture = normalize_culture(culture);
        let name = match self.culture_infos.get(&culture) {
            Some(info) if !info.name.trim().is_empty() => info.name.clone(),
            _ => return false,
        };
        self.cultures_unpublishing.retain(|c| c != &culture);
        let original = self.publish_culture_infos.get(&culture).cloned();
        self.publish_rollback
            .entry(culture.clone())
            .or_insert(original);
        self.publish_culture_infos
            .entry(culture.clone())
            .and_modify(|info| {
                info.name = name.clone();
                info.published_at = at;
                info.dirty = true;
            })
            .or_insert(PublishCultureInfo {
                culture,
                name,
                published_at: at,
                dirty: true,
            });
        true
    }

    /// Remove pending published values for one culture (`Some`) or all
    /// cultures (`None` / wildcard). Returns whether anything was removed;
    /// removed cultures are recorded for the committer.
    pub fn unpublish_culture(&mut self, culture: Option<&str>) -> bool {
        match culture {
            None => self.clear_all_publish_infos(),
            Some(c) if c == WILDCARD_CULTURE => self.clear_all_publish_infos(),
            Some(c) => {
                let culture = normalize_culture(c);
                if let Some(info) = self.publish_culture_infos.remove(&culture) {
                    self.publish_rollback
                        .entry(culture.clone())
                        .or_insert(Some(info));
                    self.cultures_unpublishing.push(culture);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn clear_all_publish_infos(&mut self) -> bool {
        if self.publish_culture_infos.is_empty() {
            return false;
        }
        for (culture, info) in std::mem::take(&mut self.publish_culture_infos) {
            self.cultures_unpublishing.push(culture.clone());
            self.publish_rollback.entry(culture).or_insert(Some(info));
        }
        true
    }

    /// Put the per-culture publish state back the way the last persist left
    /// it, dropping everything staged since. A failed commit saves drafts
    /// only; staged publish values must not reach the store.
    pub fn revert_publish_changes(&mut self) {
        for (culture, original) in std::mem::take(&mut self.publish_rollback) {
            match original {
                Some(info) => {
                    self.publish_culture_infos.insert(culture, info);
                }
                None => {
                    self.publish_culture_infos.remove(&culture);
                }
            }
        }
        self.cultures_unpublishing.clear();
    }

    /// Cultures whose pending published values changed since the last
    /// persist; `None` for invariant documents.
    pub fn cultures_being_published(&self) -> Option<Vec<String>> {
        if !self.varies_by_culture() {
            return None;
        }
        Some(
            self.publish_culture_infos
                .values()
                .filter(|i| i.dirty)
                .map(|i| i.culture.clone())
                .collect(),
        )
    }

    /// Cultures whose draft values changed since the last persist; `None`
    /// for invariant documents.
    pub fn cultures_being_edited(&self) -> Option<Vec<String>> {
        if !self.varies_by_culture() {
            return None;
        }
        Some(
            self.culture_infos
                .values()
                .filter(|i| i.dirty)
                .map(|i| i.culture.clone())
                .collect(),
        )
    }

    /// Cultures explicitly unpublished since the last persist.
    pub fn cultures_unpublishing(&self) -> Vec<String> {
        self.cultures_unpublishing.clone()
    }

    /// Schedule-aware status for one culture (or the invariant
    /// pseudo-culture).
    pub fn status(
        &self,
        schedule: &ContentScheduleCollection,
        culture: Option<&str>,
        now: DateTime<Utc>,
    ) -> ContentStatus {
        if self.trashed {
            return ContentStatus::Trashed;
        }

        let key = culture.map(normalize_culture);
        let key = key.as_deref().unwrap_or(INVARIANT_CULTURE);

        if schedule
            .for_culture(key, ScheduleAction::Expire)
            .iter()
            .any(|e| e.date <= now)
        {
            return ContentStatus::Expired;
        }

        if schedule
            .for_culture(key, ScheduleAction::Release)
            .iter()
            .any(|e| e.date > now)
        {
            return ContentStatus::AwaitingRelease;
        }

        let published = if self.varies_by_culture() {
            match culture {
                Some(c) => self.is_culture_published(c),
                None => self.published,
            }
        } else {
            self.published
        };

        if published {
            ContentStatus::Published
        } else {
            ContentStatus::Unpublished
        }
    }

    /// Transition applied when the document is persisted with publish
    /// intent. Pending published values become live.
    pub fn apply_publish(&mut self) {
        self.published = true;
        let published: Vec<String> = self.publish_culture_infos.keys().cloned().collect();
        for info in self.publish_culture_infos.values_mut() {
            info.dirty = false;
        }
        for culture in &published {
            if let Some(info) = self.culture_infos.get_mut(culture) {
                info.edited = false;
            }
        }
        if self.varies_by_culture() {
            self.edited = self.culture_infos.values().any(|i| i.edited);
        } else {
            self.edited = false;
        }
    }

    /// Transition applied when the document is persisted with unpublish
    /// intent. The live published snapshot goes away; drafts remain.
    pub fn apply_unpublish(&mut self) {
        self.published = false;
        self.publish_culture_infos.clear();
        self.edited = true;
        for info in self.culture_infos.values_mut() {
            info.edited = true;
        }
    }

    /// Reset dirty tracking after a successful persist.
    pub fn mark_persisted(&mut self) {
        self.dirty = false;
        for info in self.culture_infos.values_mut() {
            info.dirty = false;
        }
        for info in self.publish_culture_infos.values_mut() {
            info.dirty = false;
        }
        self.cultures_unpublishing.clear();
        self.publish_rollback.clear();
    }
}
