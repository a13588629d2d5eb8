//! Interactive chat command handler.

use anyhow::{Context, Result};
use taxchat_core::config::Config;
use taxchat_core::session::SessionState;

pub async fn run(config: &Config, session: SessionState) -> Result<()> {
    taxchat_tui::run_chat(config, session)
        .await
        .context("interactive chat failed")
}
