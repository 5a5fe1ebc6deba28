use bytes::Bytes;
use rtmp_ingest_amf0::{self as amf0, Amf0Value, ObjectEncoding};

use crate::messages::RtmpMessage;
use crate::messages::{MessageDeserializationError, MessageSerializationError};

pub const AMF0_COMMAND_TYPE_ID: u8 = 20;
pub const AMF3_COMMAND_TYPE_ID: u8 = 17;

/// AMF3 command payloads open with a single format selector byte ahead of the values
const AMF3_COMMAND_PREFIX: u8 = 0;

pub fn type_id(encoding: ObjectEncoding) -> u8 {
    match encoding {
        ObjectEncoding::Amf0 => AMF0_COMMAND_TYPE_ID,
        ObjectEncoding::Amf3 => AMF3_COMMAND_TYPE_ID,
    }
}

pub fn serialize(encoding: ObjectEncoding, values: &[Amf0Value]) -> Result<Bytes, MessageSerializationError> {
    let mut bytes = Vec::new();
    if encoding == ObjectEncoding::Amf3 {
        bytes.push(AMF3_COMMAND_PREFIX);
    }

    for value in values {
        amf0::serialize_value(value, &mut bytes)?;
    }

    Ok(Bytes::from(bytes))
}

/// No structure is enforced on the values, so a command with a missing or mistyped name
/// still decodes and is left for the session to reject.
pub fn deserialize(data: &[u8], encoding: ObjectEncoding) -> Result<RtmpMessage, MessageDeserializationError> {
    let mut values_bytes = data;
    if encoding == ObjectEncoding::Amf3 {
        values_bytes = match data.split_first() {
            Some((_, rest)) => rest,
            None => return Err(MessageDeserializationError::InvalidMessageFormat),
        };
    }

    let values = amf0::deserialize(&mut values_bytes, encoding)?;
    Ok(RtmpMessage::Command { encoding, values })
}
