//! Session lifecycle: identifier generation, start, reset.
//!
//! A session is a client-side identifier the backend uses to correlate
//! messages with conversation state. Exactly one is active per running
//! client; reset replaces it.
//!
//! Failure policy: start/clear failures are logged and do not block the UI.
//! The session is considered started client-side even when the backend never
//! acknowledged it — an accepted weak guarantee, covered by tests rather than
//! silently tightened.

use chrono::Utc;
use uuid::Uuid;

use crate::backend::{Backend, BackendError};
use crate::config::Role;

/// Client-side session identity.
///
/// Owned by whoever drives the conversation (the TUI reducer or a one-shot
/// command); re-assigned in place on reset. No ambient global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub id: String,
    pub role: Option<Role>,
    pub username: Option<String>,
}

impl SessionState {
    /// Creates a session with a freshly generated identifier.
    pub fn new(role: Option<Role>, username: Option<String>) -> Self {
        let id = new_session_id(username.as_deref());
        Self { id, role, username }
    }

    /// Creates a session with an explicit identifier (e.g. `--session`).
    pub fn with_id(id: String, role: Option<Role>, username: Option<String>) -> Self {
        Self { id, role, username }
    }

    /// Replaces the identifier with a freshly generated one and returns the
    /// previous id.
    pub fn regenerate(&mut self) -> String {
        let fresh = new_session_id(self.username.as_deref());
        std::mem::replace(&mut self.id, fresh)
    }
}

/// Generates a session identifier.
///
/// `session_<username>_<unix-millis>` when a username is known, otherwise
/// `session_<random>`. Uniqueness is probabilistic/time-based; there is no
/// collision detection at this scale.
pub fn new_session_id(username: Option<&str>) -> String {
    match username {
        Some(name) if !name.trim().is_empty() => {
            format!("session_{}_{}", name.trim(), Utc::now().timestamp_millis())
        }
        _ => format!("session_{}", Uuid::new_v4().simple()),
    }
}

/// Drives the session lifecycle against the backend.
///
/// Used directly by the one-shot CLI commands; the TUI owns a `SessionState`
/// in its reducer and issues the same backend calls as effects.
#[derive(Debug, Clone)]
pub struct SessionManager {
    state: SessionState,
    backend: Backend,
}

impl SessionManager {
    pub fn new(backend: Backend, state: SessionState) -> Self {
        Self { state, backend }
    }

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn role(&self) -> Option<Role> {
        self.state.role
    }

    /// Registers the current session id with the backend.
    ///
    /// Returns whether the backend acknowledged. Failures are logged; the
    /// session is still treated as started client-side.
    pub async fn start(&self) -> bool {
        start_session_optimistic(&self.backend, &self.state.id).await
    }

    /// Discards the current session and starts a fresh one.
    ///
    /// Clear failures are logged only; a new identifier is generated
    /// regardless. Returns the new id.
    pub async fn reset(&mut self) -> String {
        clear_session_logged(&self.backend, &self.state.id).await;
        self.state.regenerate();
        self.start().await;
        self.state.id.clone()
    }

    /// Relays a message under the current session, forwarding the role when
    /// one is configured.
    pub async fn send(&self, message: &str) -> Result<String, BackendError> {
        self.backend
            .send_message(&self.state.id, message, self.state.role)
            .await
    }
}

/// Start call with the optimistic failure policy applied.
pub async fn start_session_optimistic(backend: &Backend, session_id: &str) -> bool {
    match backend.start_session(session_id).await {
        Ok(ack) => {
            tracing::info!(session_id, ?ack, "session started");
            true
        }
        Err(e) => {
            tracing::warn!(session_id, error = %e, "failed to start session; continuing");
            false
        }
    }
}

/// Clear call that reports failure through the log only.
pub async fn clear_session_logged(backend: &Backend, session_id: &str) {
    match backend.clear_session(session_id).await {
        Ok(_) => tracing::info!(session_id, "session cleared"),
        Err(e) => {
            tracing::warn!(session_id, error = %e, "failed to clear session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_id_has_random_suffix() {
        let id = new_session_id(None);
        assert!(id.starts_with("session_"));
        let suffix = id.strip_prefix("session_").unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_named_id_embeds_username_and_timestamp() {
        let id = new_session_id(Some("alice"));
        let rest = id.strip_prefix("session_alice_").unwrap();
        assert!(rest.parse::<i64>().is_ok());
    }

    #[test]
    fn test_blank_username_falls_back_to_anonymous() {
        let id = new_session_id(Some("   "));
        assert!(!id.contains("   "));
        assert_eq!(id.strip_prefix("session_").unwrap().len(), 32);
    }

    #[test]
    fn test_regenerate_always_changes_id() {
        let mut state = SessionState::new(None, None);
        let before = state.id.clone();
        let returned = state.regenerate();
        assert_eq!(returned, before);
        assert_ne!(state.id, before);
    }

    #[test]
    fn test_consecutive_anonymous_ids_differ() {
        assert_ne!(new_session_id(None), new_session_id(None));
    }
}
