//! Core domain model: ids, entities, and the error taxonomy

pub mod entities;
pub mod error;
pub mod types;

pub use error::CoreError;

/// Convenience alias used throughout the services.
pub type CoreResult<T> = Result<T, CoreError>;
