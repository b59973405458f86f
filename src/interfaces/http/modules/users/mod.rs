//! User module — profile activity, admin overview and account deletion

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
