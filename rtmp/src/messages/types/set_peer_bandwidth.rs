use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::messages::{MessageDeserializationError, MessageSerializationError};
use crate::messages::{PeerBandwidthLimitType, RtmpMessage};

pub fn serialize(limit_type: PeerBandwidthLimitType, size: u32) -> Result<Bytes, MessageSerializationError> {
    let mut bytes = Vec::with_capacity(5);
    bytes.write_u32::<BigEndian>(size)?;
    bytes.write_u8(limit_type.id())?;

    Ok(Bytes::from(bytes))
}

pub fn deserialize(mut data: &[u8]) -> Result<RtmpMessage, MessageDeserializationError> {
    let size = data.read_u32::<BigEndian>()?;
    let limit_type = match PeerBandwidthLimitType::from_id(data.read_u8()?) {
        Some(limit_type) => limit_type,
        None => return Err(MessageDeserializationError::InvalidMessageFormat),
    };

    Ok(RtmpMessage::SetPeerBandwidth { size, limit_type })
}
