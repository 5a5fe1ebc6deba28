use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::messages::{MessageDeserializationError, MessageSerializationError};
use crate::messages::{RtmpMessage, UserControlEventType};
use crate::time::RtmpTimestamp;

const USER_CONTROL_TYPE_ID: u8 = 4;

/// Fields an event doesn't carry are ignored, and fields it needs but weren't given are
/// written as zero.
pub fn serialize(
    event_type: UserControlEventType,
    stream_id: Option<u32>,
    buffer_length: Option<u32>,
    timestamp: Option<RtmpTimestamp>,
) -> Result<Bytes, MessageSerializationError> {
    let mut bytes = Vec::with_capacity(10);
    bytes.write_u16::<BigEndian>(event_type.id())?;

    match event_type {
        UserControlEventType::StreamBegin
        | UserControlEventType::StreamEof
        | UserControlEventType::StreamDry
        | UserControlEventType::StreamIsRecorded => {
            bytes.write_u32::<BigEndian>(stream_id.unwrap_or(0))?;
        }

        UserControlEventType::SetBufferLength => {
            bytes.write_u32::<BigEndian>(stream_id.unwrap_or(0))?;
            bytes.write_u32::<BigEndian>(buffer_length.unwrap_or(0))?;
        }

        UserControlEventType::PingRequest | UserControlEventType::PingResponse => {
            bytes.write_u32::<BigEndian>(timestamp.unwrap_or_default().value)?;
        }
    }

    Ok(Bytes::from(bytes))
}

/// Events this library doesn't know about come back as `RtmpMessage::Unknown` so the caller
/// can skip them without failing the connection.
pub fn deserialize(data: &[u8]) -> Result<RtmpMessage, MessageDeserializationError> {
    let mut cursor = data;
    let event_type = match UserControlEventType::from_id(cursor.read_u16::<BigEndian>()?) {
        Some(event_type) => event_type,
        None => {
            return Ok(RtmpMessage::Unknown {
                type_id: USER_CONTROL_TYPE_ID,
                data: Bytes::copy_from_slice(data),
            })
        }
    };

    let mut stream_id = None;
    let mut buffer_length = None;
    let mut timestamp = None;

    match event_type {
        UserControlEventType::StreamBegin
        | UserControlEventType::StreamEof
        | UserControlEventType::StreamDry
        | UserControlEventType::StreamIsRecorded => {
            stream_id = Some(cursor.read_u32::<BigEndian>()?);
        }

        UserControlEventType::SetBufferLength => {
            stream_id = Some(cursor.read_u32::<BigEndian>()?);
            buffer_length = Some(cursor.read_u32::<BigEndian>()?);
        }

        UserControlEventType::PingRequest | UserControlEventType::PingResponse => {
            timestamp = Some(RtmpTimestamp::new(cursor.read_u32::<BigEndian>()?));
        }
    }

    Ok(RtmpMessage::UserControl {
        event_type,
        stream_id,
        buffer_length,
        timestamp,
    })
}
