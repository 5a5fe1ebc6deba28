//! Sessions drive a connection through the command exchange that precedes streaming.
//!
//! Only the server side is implemented.  A `ServerSession` takes a freshly accepted socket
//! through the handshake, answers `connect`, `createStream` and `publish`/`play`, and reports
//! what the client asked for.  The media that follows is left to the caller.

mod server;

pub use self::server::{
    ConnectInfo, PlayInfo, PublishInfo, PublishMode, RequestError, ServerSession, ServerSessionConfig,
    ServerSessionError, SessionEvent, SessionInfo, SessionObserver, SessionState, StreamRole, TracingObserver,
};
