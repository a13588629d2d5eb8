//! Full-screen chat TUI for taxchat.

pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::time::Duration;

use anyhow::{Context, Result};
pub use features::{input, starters, transcript};
pub use runtime::ChatRuntime;
use taxchat_core::backend::Backend;
use taxchat_core::config::Config;
use taxchat_core::session::SessionState;

use crate::state::AppState;

/// Bounded readiness probe: attempts and spacing.
const READY_ATTEMPTS: u32 = 20;
const READY_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the interactive chat loop.
pub async fn run_chat(config: &Config, session: SessionState) -> Result<()> {
    // Chat mode requires a terminal to render the TUI
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `taxchat send --message '...'` for non-interactive use."
        );
    }

    let backend = Backend::new(&config.base_url).context("create backend client")?;

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "taxchat")?;
    writeln!(err, "Backend: {}", backend.base_url())?;
    writeln!(err, "Session: {}", session.id)?;
    if let Some(role) = session.role {
        writeln!(err, "Role: {role}")?;
    }
    err.flush()?;

    // Bounded probe so a slow backend does not race the first start call.
    // Exhaustion is not fatal: session start stays optimistic.
    if !backend.wait_until_ready(READY_ATTEMPTS, READY_INTERVAL).await {
        tracing::warn!(
            base_url = backend.base_url(),
            "backend not reachable after {READY_ATTEMPTS} attempts; starting anyway"
        );
        writeln!(err, "Warning: backend is not answering yet.")?;
    }

    let starter_items = config.starters_for(session.role);
    let state = AppState::new(session, starter_items);

    let mut chat = ChatRuntime::new(backend, state)?;
    chat.run()?;

    // Print goodbye after TUI exits (terminal restored)
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
