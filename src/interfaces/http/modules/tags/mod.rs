//! Tag module — tag categories with usage counts

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
