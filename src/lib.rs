//! # Q&A Forum Service
//!
//! REST backend for a community question and answer forum.
//!
//! ## Architecture
//!
//! - **shared**: Error types, pagination math and listing assembly
//! - **session**: Cookie-based visitor sessions and the once-per-session
//!   action guard behind view/like counters
//! - **auth**: JWT authentication and password hashing
//! - **infrastructure**: Database connection, entities and migrations
//! - **interfaces**: REST API with Swagger documentation
//! - **config**: TOML configuration

pub mod auth;
pub mod config;
pub mod infrastructure;
pub mod interfaces;
pub mod session;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::create_api_router;

// Re-export session primitives
pub use session::{create_action_guard, ActionGuard, SharedActionGuard};
