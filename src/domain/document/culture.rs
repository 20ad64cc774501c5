// src/domain/document/culture.rs
use crate::domain::document::entity::{Document, WILDCARD_CULTURE};
use crate::domain::errors::{DomainError, DomainResult};

/// Normalized culture code: trimmed, lower-cased.
pub fn normalize_culture(culture: &str) -> String {
    culture.trim().to_ascii_lowercase()
}

/// Scopes a publish or validate operation to one culture, to every available
/// culture, or to the invariant pseudo-culture. Mandatory/default-ness is
/// resolved once, at construction, so downstream checks read flags instead
/// of re-querying the language registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CultureImpact {
    /// Invariant content; the `"*"` pseudo-culture.
    Invariant,
    /// Every available culture of a variant document.
    All,
    /// One explicit culture of a variant document.
    Explicit {
        culture: String,
        is_default: bool,
        is_mandatory: bool,
    },
}

impl CultureImpact {
    pub fn culture(&self) -> Option<&str> {
        match self {
            CultureImpact::Explicit { culture, .. } => Some(culture),
            _ => None,
        }
    }

    pub fn is_invariant(&self) -> bool {
        matches!(self, CultureImpact::Invariant)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CultureImpact::All)
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(self, CultureImpact::Explicit { is_mandatory, .. } if *is_mandatory)
    }
}

/// Builds validated [`CultureImpact`] values. Pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CultureImpactFactory;

impl CultureImpactFactory {
    pub fn new() -> Self {
        Self
    }

    /// General case: resolves `culture` against the document's variance.
    /// Rejects an explicit culture for an invariant content type and a
    /// blank culture for a variant one.
    pub fn create(
        &self,
        culture: &str,
        is_default: bool,
        document: &Document,
    ) -> DomainResult<CultureImpact> {
        let varies = document.varies_by_culture();
        let culture = normalize_culture(culture);

        if culture == WILDCARD_CULTURE {
            return Ok(if varies {
                CultureImpact::All
            } else {
                CultureImpact::Invariant
            });
        }

        if culture.is_empty() {
            if varies {
                return Err(DomainError::Validation(
                    "invariant culture is not supported by variant content types".into(),
                ));
            }
            return Ok(CultureImpact::Invariant);
        }

        if !varies {
            return Err(DomainError::Validation(format!(
                "culture \"{culture}\" is not supported by invariant content types"
            )));
        }

        Ok(CultureImpact::Explicit {
            culture,
            is_default,
            is_mandatory: false,
        })
    }

    pub fn impact_explicit(&self, culture: &str, is_mandatory: bool) -> CultureImpact {
        CultureImpact::Explicit {
            culture: normalize_culture(culture),
            is_default: false,
            is_mandatory,
        }
    }

    pub fn impact_invariant(&self) -> CultureImpact {
        CultureImpact::Invariant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::entity::tests::{invariant_document, variant_document};

    #[test]
    fn wildcard_maps_to_variance() {
        let factory = CultureImpactFactory::new();
        let variant = variant_document(&["en"]);
        let invariant = invariant_document();

        assert!(factory.create("*", false, &variant).unwrap().is_all());
        assert!(factory.create("*", false, &invariant).unwrap().is_invariant());
    }

    #[test]
    fn explicit_culture_rejected_for_invariant_type() {
        let factory = CultureImpactFactory::new();
        let invariant = invariant_document();
        assert!(factory.create("en", false, &invariant).is_err());
    }

    #[test]
    fn blank_culture_rejected_for_variant_type() {
        let factory = CultureImpactFactory::new();
        let variant = variant_document(&["en"]);
        assert!(factory.create("  ", false, &variant).is_err());
    }

    #[test]
    fn explicit_impact_normalizes_and_carries_mandatory() {
        let factory = CultureImpactFactory::new();
        let impact = factory.impact_explicit(" EN-us ", true);
        assert_eq!(impact.culture(), Some("en-us"));
        assert!(impact.is_mandatory());
    }
}
