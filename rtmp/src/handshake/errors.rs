use std::io;
use thiserror::Error;

/// Errors that end a handshake.  Every one of them is fatal to the connection.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The peer's first byte was not the only RTMP version this server speaks
    #[error("Peer requested RTMP version {0}, but only version 3 is supported")]
    BadVersionId(u8),

    /// A handshake was already attempted on this connection
    #[error("A handshake has already been attempted on this connection")]
    AlreadyAttempted,

    /// The channel failed or ended before all handshake packets were exchanged
    #[error("I/O failure during handshake: {0}")]
    Io(#[from] io::Error),
}
