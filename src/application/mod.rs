pub mod error;
pub mod ports;
pub mod publishing;
pub mod scope;

pub use error::{ApplicationError, ApplicationResult};
