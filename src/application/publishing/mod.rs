// src/application/publishing/mod.rs
mod branch;
mod commit;
mod publish;
mod queries;
mod result;
mod save;
mod schedule;
mod service;
mod strategy;
mod unpublish;

pub use branch::PublishBranchFilter;
pub use commit::CommitIntent;
pub use result::{OperationResult, OperationResultType, PublishResult, PublishResultType};
pub use service::ContentPublishService;
