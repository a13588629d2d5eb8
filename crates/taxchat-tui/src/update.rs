//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects. This is the single source of truth for
//! the send/receive flow:
//!
//! ```text
//! Idle --non-empty send--> AwaitingResponse --reply or error--> Idle
//! ```
//!
//! A submission while a request is in flight is queued (latest wins) and
//! dispatched when the response arrives, so the transcript never shows two
//! typing indicators.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use taxchat_core::message::{ChatMessage, SEND_FAILURE_TEXT};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, SendState};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            state.spinner_frame = state.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(state, term_event),
        UiEvent::SessionStarted { acknowledged } => {
            // Outcome already logged by the handler; the session is treated
            // as started either way.
            if !acknowledged {
                tracing::debug!(session_id = %state.session.id, "session start unacknowledged");
            }
            vec![]
        }
        UiEvent::AssistantReply { session_id, text } => {
            finish_send(state, &session_id, Some(text))
        }
        UiEvent::SendFailed { session_id } => finish_send(state, &session_id, None),
        UiEvent::SessionReplaced { acknowledged } => {
            if !acknowledged {
                tracing::debug!(session_id = %state.session.id, "replacement session unacknowledged");
            }
            vec![]
        }
    }
}

fn handle_terminal_event(state: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        Event::Paste(text) => {
            state.input.insert_str(&text);
            vec![]
        }
        // The transcript re-wraps at render time.
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return vec![UiEffect::Quit],
        KeyCode::Char('r') if ctrl => return reset_session(state),
        KeyCode::PageUp => {
            state.transcript.page_up();
            return vec![];
        }
        KeyCode::PageDown => {
            state.transcript.page_down();
            return vec![];
        }
        KeyCode::Up if state.starters.is_visible() => {
            state.starters.select_prev();
            return vec![];
        }
        KeyCode::Down if state.starters.is_visible() => {
            state.starters.select_next();
            return vec![];
        }
        KeyCode::Tab if state.starters.is_visible() => {
            if let Some(starter) = state.starters.current() {
                let starter = starter.to_string();
                state.input.set_text(&starter);
            }
            return vec![];
        }
        KeyCode::Enter => return submit(state),
        _ => {}
    }

    state.input.handle_key(key);
    vec![]
}

/// Handles Enter: resolves what to send, enforces the empty-input no-op, and
/// either dispatches or queues.
fn submit(state: &mut AppState) -> Vec<UiEffect> {
    let text = if state.input.is_blank() {
        // Enter on an empty input sends the highlighted starter, if the user
        // navigated to one; otherwise it is a no-op.
        match state
            .starters
            .is_visible()
            .then(|| state.starters.current())
            .flatten()
        {
            Some(starter) => starter.to_string(),
            None => return vec![],
        }
    } else {
        state.input.take()
    };

    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        return vec![];
    }

    if state.send_state.is_awaiting() {
        // Serialize sends per session: keep the latest submission and
        // dispatch it when the in-flight request completes.
        state.queued_prompt = Some(trimmed);
        return vec![];
    }

    dispatch_send(state, trimmed)
}

/// Appends the user message and typing indicator, hides the starters, and
/// emits the relay effect.
fn dispatch_send(state: &mut AppState, text: String) -> Vec<UiEffect> {
    state.transcript.push(ChatMessage::user(text.clone()));
    state.starters.hide();
    state.transcript.push(ChatMessage::typing());
    state.send_state = SendState::AwaitingResponse;

    vec![UiEffect::SendMessage {
        session_id: state.session.id.clone(),
        text,
        role: state.session.role,
    }]
}

/// Completes a send: removes the typing indicator, appends the assistant
/// message (or the generic failure text), and drains the queued prompt.
fn finish_send(state: &mut AppState, session_id: &str, text: Option<String>) -> Vec<UiEffect> {
    if session_id != state.session.id {
        // The session was reset while this request was in flight; its reply
        // belongs to a transcript that no longer exists.
        tracing::debug!(session_id, "dropping reply for replaced session");
        return vec![];
    }

    state.transcript.remove_typing();
    match text {
        Some(text) => state.transcript.push(ChatMessage::assistant(text)),
        None => state
            .transcript
            .push(ChatMessage::assistant(SEND_FAILURE_TEXT)),
    }
    state.send_state = SendState::Idle;

    if let Some(queued) = state.queued_prompt.take() {
        return dispatch_send(state, queued);
    }
    vec![]
}

/// Resets the session: new id, cleared transcript, starters back, and a
/// clear+start round-trip for the backend.
fn reset_session(state: &mut AppState) -> Vec<UiEffect> {
    let old_id = state.session.regenerate();
    state.transcript.clear();
    state.starters.show();
    state.send_state = SendState::Idle;
    state.queued_prompt = None;

    vec![UiEffect::ReplaceSession {
        old_id,
        new_id: state.session.id.clone(),
    }]
}
