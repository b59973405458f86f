//! HTTP REST API interfaces
//!
//! - `common`: Response envelopes and validated extractors
//! - `modules`: Request handlers grouped per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
