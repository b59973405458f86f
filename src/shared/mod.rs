//! Cross-cutting types: errors, pagination math, listing assembly.

pub mod errors;
pub mod listing;
pub mod pagination;

pub use errors::{AppError, DomainError, InfraError};
