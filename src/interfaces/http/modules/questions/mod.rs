//! Question module — listing, detail, CRUD and per-session view/like counters

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
