//! HTTP client for the chat backend.
//!
//! The backend exposes three JSON-over-POST endpoints:
//! - `/start-session` — register a session id, arbitrary JSON ack
//! - `/send-message` — relay a message, returns `{"response": "..."}`
//! - `/clear-session` — discard backend state for a session id
//!
//! Requests carry no timeout and are never retried; the only retry loop in
//! this module is the bounded startup readiness probe.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::Role;

/// Error categories for backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Connection-level failure (refused, reset, DNS).
    Transport,
    /// Non-success HTTP status from the backend.
    HttpStatus,
    /// Response body was not the expected JSON shape.
    Parse,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendErrorKind::Transport => write!(f, "transport"),
            BackendErrorKind::HttpStatus => write!(f, "http_status"),
            BackendErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// A failed backend call.
#[derive(Debug, Clone)]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend {} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for BackendError {}

#[derive(Serialize)]
struct SessionBody<'a> {
    session_id: &'a str,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    session_id: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

#[derive(Deserialize)]
struct MessageReply {
    response: String,
}

/// Chat backend client.
///
/// Cheap to clone; spawned tasks take their own handle.
#[derive(Debug, Clone)]
pub struct Backend {
    base_url: String,
    http: reqwest::Client,
}

impl Backend {
    /// Creates a client for the given base URL.
    ///
    /// The URL is validated up front so a typo fails at startup, not on the
    /// first send.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            BackendError::new(
                BackendErrorKind::Parse,
                format!("invalid base URL '{base_url}': {e}"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::new(
                BackendErrorKind::Parse,
                format!("unsupported URL scheme '{}'", parsed.scheme()),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registers a session id with the backend.
    ///
    /// The ack body is arbitrary JSON and returned as-is.
    pub async fn start_session(&self, session_id: &str) -> Result<Value, BackendError> {
        self.post_json("/start-session", &SessionBody { session_id })
            .await
    }

    /// Relays a user message and returns the assistant response text.
    ///
    /// The `role` field is included exactly when a role is provided, matching
    /// the role-aware flow.
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &str,
        role: Option<Role>,
    ) -> Result<String, BackendError> {
        let body = MessageBody {
            session_id,
            message,
            role: role.map(|r| r.as_str()),
        };
        let value = self.post_json("/send-message", &body).await?;
        let reply: MessageReply = serde_json::from_value(value).map_err(|e| {
            BackendError::new(
                BackendErrorKind::Parse,
                format!("missing 'response' field: {e}"),
            )
        })?;
        Ok(reply.response)
    }

    /// Tells the backend to discard state for a session id.
    pub async fn clear_session(&self, session_id: &str) -> Result<Value, BackendError> {
        self.post_json("/clear-session", &SessionBody { session_id })
            .await
    }

    /// Probes the backend until it answers, with bounded attempts.
    ///
    /// Any HTTP response counts as ready (even an error status proves the
    /// server is listening); only connection failures trigger a retry.
    /// Returns false once the attempts are exhausted.
    pub async fn wait_until_ready(&self, max_attempts: u32, interval: Duration) -> bool {
        for attempt in 1..=max_attempts {
            match self.http.get(&self.base_url).send().await {
                Ok(_) => {
                    tracing::debug!(attempt, "backend reachable");
                    return true;
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "backend not ready");
                }
            }
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }
        false
    }

    async fn post_json<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, BackendError> {
        let url = format!("{}{endpoint}", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::new(BackendErrorKind::Transport, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                BackendErrorKind::HttpStatus,
                format!("{endpoint} returned {status}"),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::new(BackendErrorKind::Parse, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = Backend::new("not a url").unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Parse);
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let err = Backend::new("ftp://example.com").unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Parse);
    }

    #[test]
    fn test_new_normalizes_trailing_slash() {
        let backend = Backend::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_message_body_omits_role_when_anonymous() {
        let body = MessageBody {
            session_id: "session_abc",
            message: "hi",
            role: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("role"));
    }

    #[test]
    fn test_message_body_includes_role_when_configured() {
        let body = MessageBody {
            session_id: "session_abc",
            message: "hi",
            role: Some(Role::TaxSpecialist.as_str()),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"role\":\"TaxSpecialist\""));
    }
}
