use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::messages::RtmpMessage;
use crate::messages::{MessageDeserializationError, MessageSerializationError};

pub fn serialize(sequence_number: u32) -> Result<Bytes, MessageSerializationError> {
    let mut bytes = Vec::with_capacity(4);
    bytes.write_u32::<BigEndian>(sequence_number)?;

    Ok(Bytes::from(bytes))
}

pub fn deserialize(mut data: &[u8]) -> Result<RtmpMessage, MessageDeserializationError> {
    let sequence_number = data.read_u32::<BigEndian>()?;
    Ok(RtmpMessage::Acknowledgement { sequence_number })
}
