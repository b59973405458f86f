//! Health module — liveness probe with a database ping

pub mod handlers;

pub use handlers::*;
