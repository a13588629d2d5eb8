//! Session lifecycle command handlers.

use anyhow::{Context, Result};
use taxchat_core::backend::Backend;
use taxchat_core::config::Config;
use taxchat_core::session::{SessionManager, SessionState};

/// Registers a session with the backend and prints its identifier.
pub async fn start(config: &Config, session: SessionState) -> Result<()> {
    let backend = Backend::new(&config.base_url).context("create backend client")?;
    let manager = SessionManager::new(backend, session);

    if manager.start().await {
        println!("Started session {}", manager.id());
    } else {
        println!(
            "Started session {} (backend did not acknowledge)",
            manager.id()
        );
    }
    Ok(())
}

/// Discards a session on the backend.
///
/// Unlike the optimistic in-chat reset, an explicit clear reports failure.
pub async fn clear(config: &Config, id: &str) -> Result<()> {
    let backend = Backend::new(&config.base_url).context("create backend client")?;
    let ack = backend
        .clear_session(id)
        .await
        .with_context(|| format!("clear session '{id}'"))?;
    tracing::debug!(session_id = id, ?ack, "session cleared");
    println!("Cleared session {id}");
    Ok(())
}

/// Discards a session and starts a fresh one, printing the new identifier.
pub async fn reset(config: &Config, session: SessionState) -> Result<()> {
    let backend = Backend::new(&config.base_url).context("create backend client")?;
    let mut manager = SessionManager::new(backend, session);

    let new_id = manager.reset().await;
    println!("New session {new_id}");
    Ok(())
}
