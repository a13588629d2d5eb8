//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use taxchat_core::config::{Config, Role, paths};
use taxchat_core::logging;
use taxchat_core::session::SessionState;

mod commands;

#[derive(Parser)]
#[command(name = "taxchat")]
#[command(version)]
#[command(about = "Terminal chat client for the SmartTax assistant backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides config)
    #[arg(long, env = "TAXCHAT_BASE_URL")]
    base_url: Option<String>,

    /// Chat role: 'individual' or 'specialist' (overrides config)
    #[arg(long)]
    role: Option<String>,

    /// Username used to derive session identifiers (overrides config)
    #[arg(long)]
    username: Option<String>,

    /// Use an explicit session identifier instead of generating one
    #[arg(long, value_name = "ID")]
    session: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Send a single message and print the response
    Send {
        /// The message to relay to the backend
        #[arg(short, long)]
        message: String,
    },

    /// Manage backend sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Register a session with the backend
    Start,
    /// Discard a session on the backend
    Clear {
        /// The session identifier to clear (defaults to --session)
        #[arg(value_name = "ID")]
        id: Option<String>,
    },
    /// Discard a session and start a fresh one
    Reset {
        /// The session identifier to replace (defaults to --session)
        #[arg(value_name = "ID")]
        id: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;

    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = base_url.to_string();
    }
    if let Some(role) = cli.role.as_deref() {
        config.role = Some(role.parse::<Role>()?);
    }
    if let Some(username) = cli.username.as_deref() {
        config.username = Some(username.to_string());
    }

    // Config inspection must not touch the log directory.
    let needs_logging = !matches!(cli.command, Some(Commands::Config { .. }));
    let _log_guard = if needs_logging {
        Some(logging::init(&paths::logs_dir()).context("init logging")?)
    } else {
        None
    };

    let session_state = |config: &Config, explicit: Option<String>| match explicit {
        Some(id) => SessionState::with_id(id, config.role, config.username.clone()),
        None => SessionState::new(config.role, config.username.clone()),
    };

    let Cli {
        command,
        base_url: _,
        role: _,
        username: _,
        session,
    } = cli;

    // default to chat mode
    let Some(command) = command else {
        let state = session_state(&config, session);
        return commands::chat::run(&config, state).await;
    };

    match command {
        Commands::Send { message } => {
            let state = session_state(&config, session);
            commands::send::run(&config, state, &message).await
        }

        Commands::Session { command } => match command {
            SessionCommands::Start => {
                let state = session_state(&config, session);
                commands::session::start(&config, state).await
            }
            SessionCommands::Clear { id } => {
                let id = id
                    .or(session)
                    .context("pass a session id: taxchat session clear <ID>")?;
                commands::session::clear(&config, &id).await
            }
            SessionCommands::Reset { id } => {
                let id = id
                    .or(session)
                    .context("pass a session id: taxchat session reset <ID>")?;
                let state = SessionState::with_id(id, config.role, config.username.clone());
                commands::session::reset(&config, state).await
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
