use crate::connection::ConnectionError;
use crate::handshake::HandshakeError;
use crate::messages::{MessageDeserializationError, MessageSerializationError};
use rtmp_ingest_amf0::Amf0Value;
use thiserror::Error;

/// A command the client sent that can't be honored.  The session can't continue past one of
/// these, since the client is left waiting on a response that will never come.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Connect requests must use transaction id 1, but {received:?} was given")]
    InvalidTransactionId { received: Option<f64> },

    #[error("The command message did not contain any values")]
    MissingCommandName,

    #[error("Expected the first value of a command message to be its name, but found {value:?}")]
    UnexpectedCommandNameType { value: Amf0Value },

    #[error("'{mode}' is not a valid publish mode")]
    InvalidPublishMode { mode: String },

    #[error("Received '{command}' before the connection was established")]
    NotConnected { command: String },

    #[error("Received '{command}' before a stream was created")]
    NoStreamCreated { command: String },

    #[error("Received a connect request on a connection that is already established")]
    AlreadyConnected,

    #[error("Received '{command}' after the stream was already published or played")]
    AlreadyNegotiated { command: String },

    #[error("The '{command}' request did not contain a stream name")]
    MissingStreamName { command: String },
}

#[derive(Debug, Error)]
pub enum ServerSessionError {
    #[error("Handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    #[error("{0}")]
    Connection(#[from] ConnectionError),

    #[error("An error occurred while attempting to turn a message payload into an RTMP message: {0}")]
    MessageDeserialization(#[from] MessageDeserializationError),

    #[error("An error occurred while attempting to turn an RTMP message into a message payload: {0}")]
    MessageSerialization(#[from] MessageSerializationError),

    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),
}
