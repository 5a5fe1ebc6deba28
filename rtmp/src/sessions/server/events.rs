use super::StreamRole;

/// Notable points in a server session's life, reported to its `SessionObserver`
#[derive(Debug, PartialEq, Clone)]
pub enum SessionEvent {
    HandshakeCompleted,

    /// A command message was decoded and is about to be dispatched
    CommandReceived {
        command: String,
        transaction_id: f64,
        stream_id: u32,
    },

    /// A command response was written and flushed
    ResponseSent {
        command: String,
        chunk_stream_id: u32,
        stream_id: u32,
    },

    /// The client sent a command this session has no handler for.  The session carries on.
    UnsupportedCommand { name: String },

    NegotiationCompleted { role: StreamRole },

    /// The session failed and is about to close its connection
    ErrorRaised { message: String },
}

/// Receives the events raised by a server session
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent);
}

/// Turns every session event into a `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::HandshakeCompleted => tracing::debug!("Handshake completed"),

            SessionEvent::CommandReceived {
                command,
                transaction_id,
                stream_id,
            } => tracing::debug!(%command, transaction_id, stream_id, "Command received"),

            SessionEvent::ResponseSent {
                command,
                chunk_stream_id,
                stream_id,
            } => tracing::debug!(%command, chunk_stream_id, stream_id, "Response sent"),

            SessionEvent::UnsupportedCommand { name } => tracing::warn!(command = %name, "Unsupported command"),

            SessionEvent::NegotiationCompleted { role } => tracing::debug!(role = ?role, "Negotiation completed"),

            SessionEvent::ErrorRaised { message } => tracing::error!(error = %message, "Session failed"),
        }
    }
}

/// Collects events in order, mostly useful for inspecting a session after the fact
impl SessionObserver for Vec<SessionEvent> {
    fn on_event(&mut self, event: &SessionEvent) {
        self.push(event.clone());
    }
}
