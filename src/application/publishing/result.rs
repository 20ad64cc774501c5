// src/application/publishing/result.rs
use crate::domain::document::Document;
use serde::{Deserialize, Serialize};

/// Outcome taxonomy of a publish/unpublish operation. Expected business
/// conditions are values here, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishResultType {
    SuccessPublish,
    SuccessPublishCulture,
    SuccessPublishAlready,
    SuccessUnpublish,
    SuccessUnpublishAlready,
    SuccessUnpublishCulture,
    SuccessUnpublishLastCulture,
    SuccessUnpublishMandatoryCulture,
    SuccessMixedCulture,
    FailedPublishPathNotPublished,
    FailedPublishHasExpired,
    FailedPublishCultureHasExpired,
    FailedPublishAwaitingRelease,
    FailedPublishCultureAwaitingRelease,
    FailedPublishIsTrashed,
    FailedPublishCancelledByEvent,
    FailedPublishContentInvalid,
    FailedPublishNothingToPublish,
    FailedPublishMandatoryCultureMissing,
    FailedPublishConcurrencyViolation,
    FailedPublishUnsavedChanges,
    FailedUnpublish,
    FailedUnpublishCancelledByEvent,
}

impl PublishResultType {
    pub fn is_success(self) -> bool {
        matches!(
            self,
            PublishResultType::SuccessPublish
                | PublishResultType::SuccessPublishCulture
                | PublishResultType::SuccessPublishAlready
                | PublishResultType::SuccessUnpublish
                | PublishResultType::SuccessUnpublishAlready
                | PublishResultType::SuccessUnpublishCulture
                | PublishResultType::SuccessUnpublishLastCulture
                | PublishResultType::SuccessUnpublishMandatoryCulture
                | PublishResultType::SuccessMixedCulture
        )
    }
}

/// Result of one publish/unpublish operation on one document. Returned up
/// the call chain, never persisted.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub result: PublishResultType,
    pub content: Document,
    pub invalid_properties: Vec<String>,
}

impl PublishResult {
    pub fn new(result: PublishResultType, content: &Document) -> Self {
        Self {
            result,
            content: content.clone(),
            invalid_properties: Vec::new(),
        }
    }

    pub fn with_invalid_properties(mut self, invalid_properties: Vec<String>) -> Self {
        self.invalid_properties = invalid_properties;
        self
    }

    pub fn success(&self) -> bool {
        self.result.is_success()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResultType {
    Success,
    FailedCancelledByEvent,
}

/// Result of a plain save.
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub result: OperationResultType,
}

impl OperationResult {
    pub fn succeed() -> Self {
        Self {
            result: OperationResultType::Success,
        }
    }

    pub fn cancel() -> Self {
        Self {
            result: OperationResultType::FailedCancelledByEvent,
        }
    }

    pub fn success(&self) -> bool {
        self.result == OperationResultType::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_classification() {
        assert!(PublishResultType::SuccessUnpublishLastCulture.is_success());
        assert!(PublishResultType::SuccessMixedCulture.is_success());
        assert!(!PublishResultType::FailedPublishConcurrencyViolation.is_success());
        assert!(!PublishResultType::FailedUnpublish.is_success());
    }
}
