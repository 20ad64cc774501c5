// src/application/ports/validation.rs
use crate::domain::document::{CultureImpact, Document};

/// Structural validation of property values for the cultures covered by an
/// impact. `Err` carries the aliases of the invalid properties.
pub trait PropertyValidator: Send + Sync {
    fn validate(&self, document: &Document, impact: &CultureImpact) -> Result<(), Vec<String>>;
}

/// Accept-everything validator for hosts without property-level rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPropertyValidator;

impl PropertyValidator for NoopPropertyValidator {
    fn validate(&self, _document: &Document, _impact: &CultureImpact) -> Result<(), Vec<String>> {
        Ok(())
    }
}
