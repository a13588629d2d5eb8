//! One-shot send command handler.
//!
//! Starts the session, relays one message, prints the response to stdout.
//! Mirrors the interactive flow: empty input is a no-op, a failed send
//! prints the generic failure text instead of aborting.

use anyhow::{Context, Result};
use taxchat_core::backend::Backend;
use taxchat_core::config::Config;
use taxchat_core::message::SEND_FAILURE_TEXT;
use taxchat_core::session::{SessionManager, SessionState};

pub async fn run(config: &Config, session: SessionState, message: &str) -> Result<()> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        // No message, no request.
        return Ok(());
    }

    let backend = Backend::new(&config.base_url).context("create backend client")?;
    let manager = SessionManager::new(backend, session);

    // Optimistic: a failed start is logged and the send proceeds.
    manager.start().await;

    match manager.send(trimmed).await {
        Ok(response) => println!("{response}"),
        Err(e) => {
            tracing::error!(session_id = manager.id(), error = %e, "send failed");
            println!("{SEND_FAILURE_TEXT}");
        }
    }

    Ok(())
}
