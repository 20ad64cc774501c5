// src/domain/audit.rs
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditType {
    Save,
    SaveVariant,
    Publish,
    PublishVariant,
    Unpublish,
    UnpublishVariant,
    SendToPublish,
    SendToPublishVariant,
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub audit_type: AuditType,
    pub user_id: i64,
    pub object_id: i64,
    pub message: Option<String>,
    pub parameters: Option<String>,
}

impl AuditEntry {
    pub fn new(audit_type: AuditType, user_id: i64, object_id: i64) -> Self {
        Self {
            audit_type,
            user_id,
            object_id,
            message: None,
            parameters: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn add(&self, entry: AuditEntry) -> DomainResult<()>;
}
