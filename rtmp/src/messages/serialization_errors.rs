use rtmp_ingest_amf0::Amf0SerializationError;
use thiserror::Error;

use std::io;

/// Enumeration that represents the various errors that may occur while trying to
/// serialize a RTMP message into a raw RTMP payload.
#[derive(Debug, Error)]
pub enum MessageSerializationError {
    #[error("Cannot serialize a SetChunkSize message with a size of 2147483648 or greater")]
    InvalidChunkSize,

    #[error("The values provided could not be serialized into valid AMF0 encoded data: {0}")]
    Amf0SerializationError(#[from] Amf0SerializationError),

    #[error("An IO error occurred while writing the output: {0}")]
    Io(#[from] io::Error),
}
