//! Visitor sessions and the per-session action guard.
//!
//! Every visitor gets an opaque session id in a cookie. Counter-incrementing
//! actions (question views, question/answer likes, accepted-answer marking)
//! consult the guard first so each fires at most once per session.

mod guard;
mod middleware;

pub use guard::{create_action_guard, keys, ActionGuard, SharedActionGuard};
pub use middleware::{session_middleware, SessionId, SESSION_COOKIE};
