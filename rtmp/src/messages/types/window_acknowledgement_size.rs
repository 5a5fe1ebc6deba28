use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::messages::RtmpMessage;
use crate::messages::{MessageDeserializationError, MessageSerializationError};

pub fn serialize(size: u32) -> Result<Bytes, MessageSerializationError> {
    let mut bytes = Vec::with_capacity(4);
    bytes.write_u32::<BigEndian>(size)?;

    Ok(Bytes::from(bytes))
}

pub fn deserialize(mut data: &[u8]) -> Result<RtmpMessage, MessageDeserializationError> {
    let size = data.read_u32::<BigEndian>()?;
    Ok(RtmpMessage::WindowAcknowledgement { size })
}
