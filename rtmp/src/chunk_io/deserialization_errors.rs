use std::io;
use thiserror::Error;

/// An enumeration defining all the possible errors that could occur while reading RTMP chunks.
/// All of them leave the chunk streams in an unknown state, so the connection can't be used
/// afterwards.
#[derive(Debug, Error)]
pub enum ChunkDeserializationError {
    /// Chunks with a format other than 0 rely on the previous header of the same chunk stream.
    /// This error occurs when one arrives on a chunk stream that has never seen a format 0 header.
    #[error("Received chunk with non-zero chunk type on csid {csid} prior to receiving a type 0 chunk")]
    NoPreviousChunkOnStream { csid: u32 },

    /// A new message header arrived on a chunk stream whose previous message was not complete.
    /// Only format 3 chunks may continue a partially received message.
    #[error("Format {format} chunk on csid {csid} interrupted a message with {received} of {length} bytes received")]
    MessageInterrupted {
        csid: u32,
        format: u8,
        received: u32,
        length: u32,
    },

    /// A message header declared a length of zero
    #[error("Chunk on csid {csid} declared a zero length message")]
    ZeroLengthMessage { csid: u32 },

    /// The max chunk size must be between 1 and 2,147,483,647 since it's encoded in only 31 bits
    /// of the SetChunkSize message
    #[error("Requested an invalid max chunk size of {chunk_size}.  Chunk sizes must be between 1 and 2147483647")]
    InvalidMaxChunkSize { chunk_size: u32 },

    /// An I/O error occurred while reading the input
    #[error("{0}")]
    Io(#[from] io::Error),
}
