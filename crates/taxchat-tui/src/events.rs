//! UI event types.
//!
//! Events are the only inputs to the reducer. Terminal events come from
//! crossterm; the rest arrive through the runtime inbox from spawned
//! backend calls.

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Animation/refresh tick.
    Tick,

    /// Raw terminal event (keys, paste, resize).
    Terminal(crossterm::event::Event),

    /// The initial start-session call finished.
    ///
    /// `acknowledged` is informational only: the session is considered
    /// started either way (optimistic policy).
    SessionStarted { acknowledged: bool },

    /// The backend answered a relayed message.
    AssistantReply { session_id: String, text: String },

    /// A relayed message failed (transport/status/parse); details are in the
    /// log, the transcript shows the generic failure text.
    SendFailed { session_id: String },

    /// A reset round-trip (clear + start) finished for the new session id.
    SessionReplaced { acknowledged: bool },
}
