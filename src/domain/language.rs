// src/domain/language.rs
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A configured language of the content tree. Mandatory languages must remain
/// published whenever the document is published at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub iso_code: String,
    pub is_default: bool,
    pub is_mandatory: bool,
}

impl Language {
    pub fn new(iso_code: impl Into<String>, is_default: bool, is_mandatory: bool) -> Self {
        Self {
            iso_code: iso_code.into(),
            is_default,
            is_mandatory,
        }
    }

    pub fn matches(&self, culture: &str) -> bool {
        self.iso_code.eq_ignore_ascii_case(culture)
    }
}

#[async_trait]
pub trait LanguageRepository: Send + Sync {
    async fn get_many(&self) -> DomainResult<Vec<Language>>;
    async fn get_default_iso_code(&self) -> DomainResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_is_case_insensitive() {
        let lang = Language::new("en-US", true, true);
        assert!(lang.matches("en-us"));
        assert!(!lang.matches("fr"));
    }
}
