use super::chunk_header::{ChunkHeaderFormat, ChunkStreamState};
use crate::chunk_io::ChunkDeserializationError;
use crate::messages::MessagePayload;
use crate::time::RtmpTimestamp;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use bytes::BytesMut;
use std::cmp::min;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{self, Read};

pub const INITIAL_MAX_CHUNK_SIZE: u32 = 128;
pub const MAX_CHUNK_SIZE: u32 = 0x7FFF_FFFF;

/// The outcome of reading one chunk off the wire
#[derive(Debug, PartialEq)]
pub struct ReadChunk {
    /// Chunk stream the chunk arrived on
    pub csid: u32,

    /// Number of message payload bytes the chunk carried, not counting headers
    pub payload_length: u32,

    /// Present when the chunk completed a message
    pub message: Option<MessagePayload>,
}

/// Reassembles RTMP chunks read from a blocking byte stream into RTMP message payloads.
///
/// Due to the nature of the RTMP chunk protocol it is required that every chunk read from the
/// peer goes through the same `ChunkDeserializer` instance, as headers are compressed against
/// the previous header on the same chunk stream.
pub struct ChunkDeserializer {
    max_chunk_size: u32,
    chunk_streams: HashMap<u32, ChunkStreamState>,
}

impl ChunkDeserializer {
    /// Per the RTMP specification a new deserializer expects chunks of at most 128 bytes
    pub fn new() -> ChunkDeserializer {
        ChunkDeserializer {
            max_chunk_size: INITIAL_MAX_CHUNK_SIZE,
            chunk_streams: HashMap::new(),
        }
    }

    /// Reads exactly one chunk.
    ///
    /// Chunks from different chunk streams may be interleaved, so a single call completes at
    /// most one message and usually completes none.  Callers loop until `message` is present.
    pub fn read_chunk<R: Read>(&mut self, reader: &mut R) -> Result<ReadChunk, ChunkDeserializationError> {
        let first_byte = reader.read_u8()?;
        let format = ChunkHeaderFormat::from_basic_header(first_byte);
        let csid = read_csid(first_byte, reader)?;

        let state = match self.chunk_streams.entry(csid) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if format != ChunkHeaderFormat::Full {
                    return Err(ChunkDeserializationError::NoPreviousChunkOnStream { csid });
                }

                entry.insert(ChunkStreamState::new(csid))
            }
        };

        if format != ChunkHeaderFormat::Empty && state.is_mid_message() {
            return Err(ChunkDeserializationError::MessageInterrupted {
                csid,
                format: format.id(),
                received: state.received(),
                length: state.length,
            });
        }

        let starts_message = !state.is_mid_message();
        state.format = format;
        read_message_header(reader, state, starts_message)?;

        if starts_message {
            if state.length == 0 {
                return Err(ChunkDeserializationError::ZeroLengthMessage { csid });
            }

            state.buffer = BytesMut::with_capacity(state.length as usize);
        }

        let payload_length = min(state.length - state.received(), self.max_chunk_size);
        let start = state.buffer.len();
        state.buffer.resize(start + payload_length as usize, 0);
        reader.read_exact(&mut state.buffer[start..])?;

        tracing::trace!(
            csid,
            format = format.id(),
            payload_length,
            received = state.received(),
            length = state.length,
            "Read chunk"
        );

        let message = if state.received() == state.length {
            Some(MessagePayload {
                timestamp: state.timestamp,
                type_id: state.type_id,
                message_stream_id: state.stream_id,
                data: state.buffer.split().freeze(),
            })
        } else {
            None
        };

        Ok(ReadChunk {
            csid,
            payload_length,
            message,
        })
    }

    /// Tells the deserializer that the peer will start sending RTMP chunks with a different
    /// max chunk size.
    ///
    /// Sender and receiver must agree on the chunk size exactly, otherwise split chunks are
    /// expected where there are none.  This should only be called in reaction to the peer's
    /// `SetChunkSize` message.
    pub fn set_max_chunk_size(&mut self, new_size: u32) -> Result<(), ChunkDeserializationError> {
        if new_size == 0 || new_size > MAX_CHUNK_SIZE {
            return Err(ChunkDeserializationError::InvalidMaxChunkSize {
                chunk_size: new_size,
            });
        }

        self.max_chunk_size = new_size;
        Ok(())
    }

    /// Returns the maximum size of any RTMP chunks that should be received
    pub fn get_max_chunk_size(&self) -> u32 {
        self.max_chunk_size
    }

    /// Throws away the partially received message on a chunk stream.  Returns true if there
    /// was anything to discard.
    pub fn abort_message(&mut self, csid: u32) -> bool {
        match self.chunk_streams.get_mut(&csid) {
            Some(state) if state.is_mid_message() => {
                state.buffer.clear();
                true
            }

            _ => false,
        }
    }

    pub fn chunk_stream(&self, csid: u32) -> Option<&ChunkStreamState> {
        self.chunk_streams.get(&csid)
    }
}

impl Default for ChunkDeserializer {
    fn default() -> Self {
        ChunkDeserializer::new()
    }
}

fn read_csid<R: Read>(first_byte: u8, reader: &mut R) -> io::Result<u32> {
    const CSID_MASK: u8 = 0b0011_1111;

    match first_byte & CSID_MASK {
        0 => Ok(reader.read_u8()? as u32 + 64),
        1 => {
            let low = reader.read_u8()? as u32;
            let high = reader.read_u8()? as u32;
            Ok(high * 256 + low + 64)
        }

        csid => Ok(csid as u32),
    }
}

fn read_message_header<R: Read>(
    reader: &mut R,
    state: &mut ChunkStreamState,
    starts_message: bool,
) -> io::Result<()> {
    match state.format {
        ChunkHeaderFormat::Full => {
            state.timestamp_field = reader.read_u24::<BigEndian>()?;
            state.length = reader.read_u24::<BigEndian>()?;
            state.type_id = reader.read_u8()?;
            state.stream_id = reader.read_u32::<LittleEndian>()?;
        }

        ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId => {
            state.timestamp_field = reader.read_u24::<BigEndian>()?;
            state.length = reader.read_u24::<BigEndian>()?;
            state.type_id = reader.read_u8()?;
        }

        ChunkHeaderFormat::TimeDeltaOnly => {
            state.timestamp_field = reader.read_u24::<BigEndian>()?;
        }

        ChunkHeaderFormat::Empty => (),
    }

    // Format 3 chunks repeat the extended timestamp of the header they follow
    let extended_timestamp = if state.has_extended_timestamp() {
        Some(reader.read_u32::<BigEndian>()?)
    } else {
        None
    };

    match state.format {
        ChunkHeaderFormat::Full => {
            let timestamp = extended_timestamp.unwrap_or(state.timestamp_field);
            state.timestamp = RtmpTimestamp::new(timestamp);
            state.timestamp_delta = timestamp;
        }

        ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId | ChunkHeaderFormat::TimeDeltaOnly => {
            let delta = extended_timestamp.unwrap_or(state.timestamp_field);
            state.timestamp = state.timestamp + delta;
            state.timestamp_delta = delta;
        }

        ChunkHeaderFormat::Empty => {
            // Continuation chunks must not re-apply the delta, only a format 3 header that
            // starts a new message does.
            if starts_message {
                state.timestamp = state.timestamp + state.timestamp_delta;
            }
        }
    }

    Ok(())
}
