use super::chunk_header::{ChunkHeaderFormat, EXTENDED_TIMESTAMP_MARKER};
use super::deserializer::{INITIAL_MAX_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::chunk_io::ChunkSerializationError;
use crate::messages::MessagePayload;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::Write;

const MAX_MESSAGE_LENGTH: usize = 0x00FF_FFFF;
const MIN_CHUNK_STREAM_ID: u32 = 2;
const MAX_CHUNK_STREAM_ID: u32 = 65599;

/// Splits RTMP messages into RTMP chunks.
///
/// No header compression is attempted.  The first chunk of every message carries a full
/// format 0 header and every following chunk of the same message a format 3 header, which any
/// compliant peer can read no matter what was sent before.
pub struct ChunkSerializer {
    max_chunk_size: u32,
}

impl ChunkSerializer {
    /// Creates a new `ChunkSerializer`.
    ///
    /// By default (per the RTMP specification) the serializer will break any message into RTMP
    /// chunks with a max size of 128.  To change this amount a call to `set_max_chunk_size()` is
    /// required.
    pub fn new() -> ChunkSerializer {
        ChunkSerializer {
            max_chunk_size: INITIAL_MAX_CHUNK_SIZE,
        }
    }

    /// Changes the maximum amount of bytes from RTMP messages that can be in a single RTMP chunk.
    ///
    /// The peer must be told about the change with a `SetChunkSize` message before any chunk
    /// serialized with the new size reaches it.
    pub fn set_max_chunk_size(&mut self, new_size: u32) -> Result<(), ChunkSerializationError> {
        if new_size == 0 || new_size > MAX_CHUNK_SIZE {
            return Err(ChunkSerializationError::InvalidMaxChunkSize {
                attempted_chunk_size: new_size,
            });
        }

        self.max_chunk_size = new_size;
        Ok(())
    }

    pub fn get_max_chunk_size(&self) -> u32 {
        self.max_chunk_size
    }

    /// Writes the message as one or more chunks on the given chunk stream.  Nothing is written
    /// if the message or chunk stream id can't be encoded.
    pub fn serialize<W: Write>(
        &self,
        message: &MessagePayload,
        csid: u32,
        writer: &mut W,
    ) -> Result<(), ChunkSerializationError> {
        if message.data.len() > MAX_MESSAGE_LENGTH {
            return Err(ChunkSerializationError::MessageTooLong {
                size: message.data.len(),
            });
        }

        if csid < MIN_CHUNK_STREAM_ID || csid > MAX_CHUNK_STREAM_ID {
            return Err(ChunkSerializationError::InvalidChunkStreamId { csid });
        }

        let mut bytes = Vec::with_capacity(message.data.len() + 18);
        let mut chunks = message.data.chunks(self.max_chunk_size as usize);

        // An empty payload still needs its header on the wire
        let first_chunk = chunks.next().unwrap_or(&[]);
        add_basic_header(&mut bytes, ChunkHeaderFormat::Full, csid)?;
        add_message_header(&mut bytes, message)?;
        add_extended_timestamp(&mut bytes, message)?;
        bytes.extend_from_slice(first_chunk);

        for chunk in chunks {
            add_basic_header(&mut bytes, ChunkHeaderFormat::Empty, csid)?;
            add_extended_timestamp(&mut bytes, message)?;
            bytes.extend_from_slice(chunk);
        }

        writer.write_all(&bytes)?;
        Ok(())
    }
}

impl Default for ChunkSerializer {
    fn default() -> Self {
        ChunkSerializer::new()
    }
}

fn add_basic_header(bytes: &mut dyn Write, format: ChunkHeaderFormat, csid: u32) -> Result<(), ChunkSerializationError> {
    let format_mask = format.id() << 6;

    match csid {
        x if x <= 63 => bytes.write_u8(format_mask | x as u8)?,
        x if x <= 319 => {
            bytes.write_u8(format_mask)?;
            bytes.write_u8((x - 64) as u8)?;
        }

        x => {
            bytes.write_u8(format_mask | 1)?;
            bytes.write_u16::<LittleEndian>((x - 64) as u16)?;
        }
    }

    Ok(())
}

fn add_message_header(bytes: &mut dyn Write, message: &MessagePayload) -> Result<(), ChunkSerializationError> {
    let timestamp = message.timestamp.value;
    let timestamp_field = if timestamp >= EXTENDED_TIMESTAMP_MARKER {
        EXTENDED_TIMESTAMP_MARKER
    } else {
        timestamp
    };

    bytes.write_u24::<BigEndian>(timestamp_field)?;
    bytes.write_u24::<BigEndian>(message.data.len() as u32)?;
    bytes.write_u8(message.type_id)?;
    bytes.write_u32::<LittleEndian>(message.message_stream_id)?;
    Ok(())
}

fn add_extended_timestamp(bytes: &mut dyn Write, message: &MessagePayload) -> Result<(), ChunkSerializationError> {
    if message.timestamp.value >= EXTENDED_TIMESTAMP_MARKER {
        bytes.write_u32::<BigEndian>(message.timestamp.value)?;
    }

    Ok(())
}
