//! Publishing service layer for a culture-variant content tree.
//!
//! The crate owns the decision logic for save/publish/unpublish operations:
//! per-culture legality checks, branch (subtree) publishing with failure
//! containment, and time-triggered release/expiry processing. Persistence,
//! property validation, eventing and auditing are ports implemented by the
//! hosting application.

pub mod application;
pub mod config;
pub mod domain;

pub use application::publishing::ContentPublishService;
