use std::io;
use thiserror::Error;

/// An enumeration defining all the possible errors that could occur while serializing
/// RTMP messages into RTMP chunks.
#[derive(Debug, Error)]
pub enum ChunkSerializationError {
    /// RTMP specification states that a message cannot be more than 16777215, even when split
    /// across multiple RTMP chunks
    #[error("The current message has a length of {size} bytes, which is over the allowed size of 16777215 bytes")]
    MessageTooLong { size: usize },

    /// Encountered when the chunk size is set to an invalid value
    #[error("An invalid chunk size of {attempted_chunk_size} was specified.  Chunk size must be between 1 and 2147483647")]
    InvalidMaxChunkSize { attempted_chunk_size: u32 },

    /// Chunk stream ids 0 and 1 are reserved by the basic header encoding, and the 3 byte form
    /// can't address anything past 65599
    #[error("Chunk stream id {csid} can't be encoded, it must be between 2 and 65599")]
    InvalidChunkStreamId { csid: u32 },

    /// An I/O error occurred while writing the output
    #[error("{0}")]
    Io(#[from] io::Error),
}
