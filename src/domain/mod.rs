pub mod audit;
pub mod document;
pub mod errors;
pub mod language;

pub use errors::{DomainError, DomainResult};
