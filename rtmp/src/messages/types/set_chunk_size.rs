use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::messages::RtmpMessage;
use crate::messages::{MessageDeserializationError, MessageSerializationError};

/// The first bit of the chunk size field is reserved and must be zero
const MAX_SIZE: u32 = 0x7FFF_FFFF;

pub fn serialize(size: u32) -> Result<Bytes, MessageSerializationError> {
    if size > MAX_SIZE {
        return Err(MessageSerializationError::InvalidChunkSize);
    }

    let mut bytes = Vec::with_capacity(4);
    bytes.write_u32::<BigEndian>(size)?;

    Ok(Bytes::from(bytes))
}

pub fn deserialize(mut data: &[u8]) -> Result<RtmpMessage, MessageDeserializationError> {
    let size = data.read_u32::<BigEndian>()?;
    if size > MAX_SIZE {
        return Err(MessageDeserializationError::InvalidMessageFormat);
    }

    Ok(RtmpMessage::SetChunkSize { size })
}
