// src/config.rs
use std::env;
use thiserror::Error;

/// Runtime tuning for the publishing service. Values come from the
/// environment with defaults suitable for a small content tree.
#[derive(Clone, Debug)]
pub struct ContentSettings {
    branch_page_size: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_branch_page_size() -> usize {
    100
}

impl ContentSettings {
    /// Build settings from environment variables, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let branch_page_size = match env::var("PAGECRAFT_BRANCH_PAGE_SIZE") {
            Ok(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::Invalid(
                        "PAGECRAFT_BRANCH_PAGE_SIZE must be a positive integer".into(),
                    )
                })?,
            Err(_) => default_branch_page_size(),
        };

        Ok(Self { branch_page_size })
    }

    /// Number of descendants fetched per page during a branch publish.
    pub fn branch_page_size(&self) -> usize {
        self.branch_page_size
    }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            branch_page_size: default_branch_page_size(),
        }
    }
}
