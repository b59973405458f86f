//! Session-scoped idempotency guard.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

/// Tracks which one-shot actions a session has already performed.
///
/// Keys are opaque strings such as `viewed_question_42`. A session's record
/// is created empty on first access and entries are never removed; the guard
/// lives exactly as long as the session does. Guard state is in-process, so
/// a restart forgets consumed keys and a returning session may increment
/// each counter once more; that is the accepted consistency level.
pub struct ActionGuard {
    /// Consumed action keys indexed by session id
    sessions: DashMap<String, HashSet<String>>,
}

impl ActionGuard {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Ensure a record exists for the session.
    pub fn ensure(&self, session_id: &str) {
        self.sessions.entry(session_id.to_string()).or_default();
    }

    /// Consume `key` for the session.
    ///
    /// Returns true on the first call for a given (session, key) pair and
    /// false on every later one; the caller must skip the associated
    /// increment when this returns false.
    pub fn try_consume(&self, session_id: &str, key: &str) -> bool {
        let mut record = self.sessions.entry(session_id.to_string()).or_default();
        let first = record.insert(key.to_string());
        if !first {
            debug!(session_id, key, "duplicate action suppressed");
        }
        first
    }

    /// Whether the session has already consumed `key`.
    pub fn is_consumed(&self, session_id: &str, key: &str) -> bool {
        self.sessions
            .get(session_id)
            .map(|record| record.contains(key))
            .unwrap_or(false)
    }

    /// Number of sessions with a record.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ActionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe action guard handle
pub type SharedActionGuard = Arc<ActionGuard>;

pub fn create_action_guard() -> SharedActionGuard {
    Arc::new(ActionGuard::new())
}

/// Guard key builders, one per guarded counter.
pub mod keys {
    pub fn viewed_question(id: i32) -> String {
        format!("viewed_question_{id}")
    }

    pub fn liked_question(id: i32) -> String {
        format!("liked_question_{id}")
    }

    pub fn liked_answer(id: i32) -> String {
        format!("liked_answer_{id}")
    }

    pub fn accepted_answer(question_id: i32) -> String {
        format!("accepted_answer_{question_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_consume_succeeds_then_always_fails() {
        let guard = ActionGuard::new();
        assert!(guard.try_consume("s1", "k"));
        for _ in 0..50 {
            assert!(!guard.try_consume("s1", "k"));
        }
    }

    #[test]
    fn sessions_do_not_share_state() {
        let guard = ActionGuard::new();
        assert!(guard.try_consume("s1", "k"));
        assert!(guard.try_consume("s2", "k"));
        assert!(!guard.try_consume("s1", "k"));
        assert!(!guard.try_consume("s2", "k"));
    }

    #[test]
    fn keys_are_independent_within_a_session() {
        let guard = ActionGuard::new();
        assert!(guard.try_consume("s1", &keys::viewed_question(42)));
        assert!(guard.try_consume("s1", &keys::liked_question(42)));
        assert!(guard.try_consume("s1", &keys::liked_answer(7)));
        assert!(!guard.try_consume("s1", &keys::viewed_question(42)));
    }

    #[test]
    fn ensure_creates_an_empty_record() {
        let guard = ActionGuard::new();
        assert_eq!(guard.session_count(), 0);
        guard.ensure("s1");
        assert_eq!(guard.session_count(), 1);
        assert!(!guard.is_consumed("s1", "k"));
    }

    #[test]
    fn key_builders_match_session_key_format() {
        assert_eq!(keys::viewed_question(42), "viewed_question_42");
        assert_eq!(keys::liked_question(3), "liked_question_3");
        assert_eq!(keys::liked_answer(7), "liked_answer_7");
        assert_eq!(keys::accepted_answer(9), "accepted_answer_9");
    }
}
