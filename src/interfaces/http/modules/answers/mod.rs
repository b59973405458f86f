//! Answer module — posting, editing, likes and acceptance

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
