use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::messages::RtmpMessage;
use crate::messages::{MessageDeserializationError, MessageSerializationError};

pub fn serialize(stream_id: u32) -> Result<Bytes, MessageSerializationError> {
    let mut bytes = Vec::with_capacity(4);
    bytes.write_u32::<BigEndian>(stream_id)?;

    Ok(Bytes::from(bytes))
}

pub fn deserialize(mut data: &[u8]) -> Result<RtmpMessage, MessageDeserializationError> {
    let stream_id = data.read_u32::<BigEndian>()?;
    Ok(RtmpMessage::Abort { stream_id })
}
