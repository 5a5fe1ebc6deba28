use super::types;
use crate::messages::{MessageDeserializationError, MessageSerializationError};
use crate::messages::{RtmpMessage, MAX_CONTROL_TYPE_ID};
use crate::time::RtmpTimestamp;
use bytes::Bytes;
use rtmp_ingest_amf0::ObjectEncoding;

/// A complete RTMP message as it comes out of, or goes into, the chunk layer
#[derive(PartialEq, Debug, Clone)]
pub struct MessagePayload {
    pub timestamp: RtmpTimestamp,
    pub type_id: u8,
    pub message_stream_id: u32,
    pub data: Bytes,
}

impl MessagePayload {
    pub fn new() -> MessagePayload {
        MessagePayload {
            timestamp: RtmpTimestamp::new(0),
            message_stream_id: 0,
            type_id: 0,
            data: Bytes::new(),
        }
    }

    /// Protocol control messages (type ids 1 through 6) are consumed by the connection itself
    pub fn is_control_message(&self) -> bool {
        self.type_id >= 1 && self.type_id <= MAX_CONTROL_TYPE_ID
    }

    pub fn to_rtmp_message(&self) -> Result<RtmpMessage, MessageDeserializationError> {
        let data = &self.data[..];
        match self.type_id {
            1 => types::set_chunk_size::deserialize(data),
            2 => types::abort::deserialize(data),
            3 => types::acknowledgement::deserialize(data),
            4 => types::user_control::deserialize(data),
            5 => types::window_acknowledgement_size::deserialize(data),
            6 => types::set_peer_bandwidth::deserialize(data),
            types::command::AMF3_COMMAND_TYPE_ID => types::command::deserialize(data, ObjectEncoding::Amf3),
            types::command::AMF0_COMMAND_TYPE_ID => types::command::deserialize(data, ObjectEncoding::Amf0),
            _ => Ok(RtmpMessage::Unknown {
                type_id: self.type_id,
                data: self.data.clone(),
            }),
        }
    }

    pub fn from_rtmp_message(
        message: RtmpMessage,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
    ) -> Result<MessagePayload, MessageSerializationError> {
        let type_id = message.get_message_type_id();

        let data = match message {
            RtmpMessage::Unknown { data, .. } => data,
            RtmpMessage::Abort { stream_id } => types::abort::serialize(stream_id)?,
            RtmpMessage::Acknowledgement { sequence_number } => types::acknowledgement::serialize(sequence_number)?,
            RtmpMessage::Command { encoding, values } => types::command::serialize(encoding, &values)?,
            RtmpMessage::SetChunkSize { size } => types::set_chunk_size::serialize(size)?,
            RtmpMessage::SetPeerBandwidth { size, limit_type } => types::set_peer_bandwidth::serialize(limit_type, size)?,
            RtmpMessage::UserControl {
                event_type,
                stream_id,
                buffer_length,
                timestamp,
            } => types::user_control::serialize(event_type, stream_id, buffer_length, timestamp)?,
            RtmpMessage::WindowAcknowledgement { size } => types::window_acknowledgement_size::serialize(size)?,
        };

        Ok(MessagePayload {
            timestamp,
            type_id,
            message_stream_id,
            data,
        })
    }
}

impl Default for MessagePayload {
    fn default() -> Self {
        MessagePayload::new()
    }
}
