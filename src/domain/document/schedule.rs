// src/domain/document/schedule.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a schedule entry does when its date passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleAction {
    Release,
    Expire,
}

/// A single `(culture, action, date)` schedule entry. The empty culture
/// stands for invariant content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSchedule {
    pub culture: String,
    pub action: ScheduleAction,
    pub date: DateTime<Utc>,
}

impl ContentSchedule {
    pub fn new(culture: impl Into<String>, action: ScheduleAction, date: DateTime<Utc>) -> Self {
        Self {
            culture: culture.into(),
            action,
            date,
        }
    }
}

/// The full set of schedule entries for one document. A variant document can
/// carry independent release/expiry dates per culture; entries are removed
/// once acted upon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentScheduleCollection {
    entries: Vec<ContentSchedule>,
}

impl ContentScheduleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ContentSchedule) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ContentSchedule] {
        &self.entries
    }

    /// Entries for the given action whose date has passed at `date`.
    pub fn pending(&self, action: ScheduleAction, date: DateTime<Utc>) -> Vec<ContentSchedule> {
        self.entries
            .iter()
            .filter(|e| e.action == action && e.date <= date)
            .cloned()
            .collect()
    }

    /// Entries for one culture and action, regardless of date.
    pub fn for_culture(&self, culture: &str, action: ScheduleAction) -> Vec<&ContentSchedule> {
        self.entries
            .iter()
            .filter(|e| e.action == action && e.culture.eq_ignore_ascii_case(culture))
            .collect()
    }

    /// Remove entries for one culture and action with a date at or before
    /// `date`.
    pub fn clear_culture(&mut self, culture: &str, action: ScheduleAction, date: DateTime<Utc>) {
        self.entries.retain(|e| {
            !(e.action == action && e.culture.eq_ignore_ascii_case(culture) && e.date <= date)
        });
    }

    /// Remove entries for the action with a date at or before `date`, across
    /// all cultures.
    pub fn clear(&mut self, action: ScheduleAction, date: DateTime<Utc>) {
        self.entries
            .retain(|e| !(e.action == action && e.date <= date));
    }

    pub fn remove(&mut self, entry: &ContentSchedule) {
        self.entries.retain(|e| e != entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(offset_secs: i64) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(offset_secs)
    }

    #[test]
    fn pending_only_returns_past_entries_for_action() {
        let mut schedule = ContentScheduleCollection::new();
        schedule.add(ContentSchedule::new("en", ScheduleAction::Release, at(-60)));
        schedule.add(ContentSchedule::new("fr", ScheduleAction::Release, at(60)));
        schedule.add(ContentSchedule::new("en", ScheduleAction::Expire, at(-60)));

        let pending = schedule.pending(ScheduleAction::Release, Utc::now());
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].culture, "en");
    }

    #[test]
    fn clear_culture_is_scoped() {
        let mut schedule = ContentScheduleCollection::new();
        schedule.add(ContentSchedule::new("en", ScheduleAction::Release, at(-60)));
        schedule.add(ContentSchedule::new("fr", ScheduleAction::Release, at(-60)));

        schedule.clear_culture("en", ScheduleAction::Release, Utc::now());
        assert_eq!(schedule.entries().len(), 1);
        assert_eq!(schedule.entries()[0].culture, "fr");
    }

    #[test]
    fn clear_removes_all_cultures_for_action() {
        let mut schedule = ContentScheduleCollection::new();
        schedule.add(ContentSchedule::new("en", ScheduleAction::Expire, at(-60)));
        schedule.add(ContentSchedule::new("fr", ScheduleAction::Expire, at(-30)));
        schedule.add(ContentSchedule::new("fr", ScheduleAction::Expire, at(600)));

        schedule.clear(ScheduleAction::Expire, Utc::now());
        assert_eq!(schedule.entries().len(), 1);
        assert!(schedule.entries()[0].date > Utc::now());
    }
}
