//! TUI runtime - owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here: the reducer stays pure and produces
//! effects; this module executes them. Backend calls run on spawned tokio
//! tasks and report back through the inbox channel, so nothing blocks the
//! render loop and there is no lock around the session id — the reducer owns
//! it and replaces it on reset.

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use taxchat_core::backend::Backend;
use taxchat_core::session;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence (spinner animation, render batching).
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// How long one loop iteration waits for a terminal event.
const POLL_DURATION: Duration = Duration::from_millis(50);

/// Full-screen chat runtime.
pub struct ChatRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    backend: Backend,
    /// Handlers send completion events here.
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    /// Drained every loop iteration.
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
}

impl ChatRuntime {
    /// Creates the runtime and takes over the terminal.
    pub fn new(backend: Backend, state: AppState) -> Result<Self> {
        // Panic hook BEFORE entering the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            backend,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until quit, restoring the terminal after.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        // Register the session before the first frame; failure is logged and
        // the session is treated as started anyway.
        self.execute_effect(UiEffect::StartSession {
            session_id: self.state.session.id.clone(),
        });

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        let _ = terminal::restore_terminal();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // initial render

        while !self.state.should_quit {
            let mut events = Vec::new();

            // Terminal events: wait briefly, then drain whatever is queued.
            if crossterm::event::poll(POLL_DURATION)? {
                loop {
                    events.push(UiEvent::Terminal(crossterm::event::read()?));
                    if !crossterm::event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            // Completed backend calls.
            while let Ok(event) = self.inbox_rx.try_recv() {
                events.push(event);
            }

            if self.last_tick.elapsed() >= FRAME_DURATION {
                events.push(UiEvent::Tick);
                self.last_tick = Instant::now();
            }

            if !events.is_empty() {
                dirty = true;
            }

            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                let state = &mut self.state;
                self.terminal.draw(|frame| render::render(state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Executes one effect. Network effects spawn and report to the inbox.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }

            UiEffect::StartSession { session_id } => {
                let backend = self.backend.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    let acknowledged =
                        session::start_session_optimistic(&backend, &session_id).await;
                    let _ = tx.send(UiEvent::SessionStarted { acknowledged });
                });
            }

            UiEffect::SendMessage {
                session_id,
                text,
                role,
            } => {
                let backend = self.backend.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    let event = match backend.send_message(&session_id, &text, role).await {
                        Ok(response) => UiEvent::AssistantReply {
                            session_id,
                            text: response,
                        },
                        Err(e) => {
                            tracing::error!(session_id, error = %e, "send failed");
                            UiEvent::SendFailed { session_id }
                        }
                    };
                    let _ = tx.send(event);
                });
            }

            UiEffect::ReplaceSession { old_id, new_id } => {
                let backend = self.backend.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    session::clear_session_logged(&backend, &old_id).await;
                    let acknowledged =
                        session::start_session_optimistic(&backend, &new_id).await;
                    let _ = tx.send(UiEvent::SessionReplaced { acknowledged });
                });
            }
        }
    }
}
