/*!
The RTMP message types this library understands, and their conversion to and from the raw
payloads that the chunk layer carries.

`MessagePayload`s have auxiliary data about an RTMP message, such as what message stream it is
meant for, the timestamp for the message and what type of message it is.  Audio, video and
data messages have no typed form here and pass through as `RtmpMessage::Unknown`.
*/

mod deserialization_errors;
mod message_payload;
mod serialization_errors;
mod types;

pub use self::deserialization_errors::MessageDeserializationError;
pub use self::message_payload::MessagePayload;
pub use self::serialization_errors::MessageSerializationError;
pub use self::types::command::{AMF0_COMMAND_TYPE_ID, AMF3_COMMAND_TYPE_ID};

use crate::time::RtmpTimestamp;
use bytes::Bytes;
use rtmp_ingest_amf0::{Amf0Value, ObjectEncoding};

/// Type ids at or below this value are protocol control messages
pub const MAX_CONTROL_TYPE_ID: u8 = 6;

/// The type of bandwidth limiting that is being requested
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PeerBandwidthLimitType {
    /// Peer should limit its output bandwidth to the indicated window size
    Hard,

    /// The peer should limit its output bandwidth to the window indicated or the limit
    /// already in effect, whichever is smaller.
    Soft,

    /// If we previously had a hard limit, this limit should be treated as hard.  Otherwise ignore.
    Dynamic,
}

impl PeerBandwidthLimitType {
    pub fn id(&self) -> u8 {
        match self {
            PeerBandwidthLimitType::Hard => 0,
            PeerBandwidthLimitType::Soft => 1,
            PeerBandwidthLimitType::Dynamic => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<PeerBandwidthLimitType> {
        match id {
            0 => Some(PeerBandwidthLimitType::Hard),
            1 => Some(PeerBandwidthLimitType::Soft),
            2 => Some(PeerBandwidthLimitType::Dynamic),
            _ => None,
        }
    }
}

/// Events and notifications that are raised with the peer
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum UserControlEventType {
    /// Notifies the client that a stream has become functional
    StreamBegin,

    /// Notifies the client that the playback of data on the stream is over
    StreamEof,

    /// Notifies the client that there is no more data on the stream.
    StreamDry,

    /// Notifies the server of the buffer size (in milliseconds) that the client is using
    SetBufferLength,

    /// Notifies the client that the stream is a recorded stream.
    StreamIsRecorded,

    /// Server sends this to test whether the client is reachable.
    PingRequest,

    /// Client sends this in response to a ping request
    PingResponse,
}

impl UserControlEventType {
    pub fn id(&self) -> u16 {
        match self {
            UserControlEventType::StreamBegin => 0,
            UserControlEventType::StreamEof => 1,
            UserControlEventType::StreamDry => 2,
            UserControlEventType::SetBufferLength => 3,
            UserControlEventType::StreamIsRecorded => 4,
            UserControlEventType::PingRequest => 6,
            UserControlEventType::PingResponse => 7,
        }
    }

    pub fn from_id(id: u16) -> Option<UserControlEventType> {
        match id {
            0 => Some(UserControlEventType::StreamBegin),
            1 => Some(UserControlEventType::StreamEof),
            2 => Some(UserControlEventType::StreamDry),
            3 => Some(UserControlEventType::SetBufferLength),
            4 => Some(UserControlEventType::StreamIsRecorded),
            6 => Some(UserControlEventType::PingRequest),
            7 => Some(UserControlEventType::PingResponse),
            _ => None,
        }
    }
}

/// An enumeration of all types of RTMP messages that are supported
#[derive(PartialEq, Debug, Clone)]
pub enum RtmpMessage {
    /// This type of message is used when an RTMP message is encountered with a type id that
    /// we do not know about
    Unknown { type_id: u8, data: Bytes },

    /// Notifies the peer that if it is waiting for chunks to complete a message that it should
    /// discard the chunks it has already received.  Despite the name, `stream_id` is a chunk
    /// stream id.
    Abort { stream_id: u32 },

    /// An acknowledgement sent to confirm how many bytes have been received so far
    Acknowledgement { sequence_number: u32 },

    /// A command, as the flat sequence of values it was sent as: the command name, the
    /// transaction id and then any arguments.
    Command {
        encoding: ObjectEncoding,
        values: Vec<Amf0Value>,
    },

    /// Tells the peer that the maximum chunk size for RTMP chunks it will be sending is changing
    /// to the specified size.
    SetChunkSize { size: u32 },

    /// Indicates that the peer should limit its output bandwidth
    SetPeerBandwidth {
        size: u32,
        limit_type: PeerBandwidthLimitType,
    },

    /// Notifies the peer of an event, such as a stream being
    /// created or telling the peer how much of a buffer it should have.
    UserControl {
        event_type: UserControlEventType,
        stream_id: Option<u32>,
        buffer_length: Option<u32>,
        timestamp: Option<RtmpTimestamp>,
    },

    /// Notifies the peer how many bytes should be received before sending an `Acknowledgement`
    /// message
    WindowAcknowledgement { size: u32 },
}

impl RtmpMessage {
    pub fn into_message_payload(
        self,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
    ) -> Result<MessagePayload, MessageSerializationError> {
        MessagePayload::from_rtmp_message(self, timestamp, message_stream_id)
    }

    pub fn get_message_type_id(&self) -> u8 {
        match self {
            RtmpMessage::Unknown { type_id, .. } => *type_id,
            RtmpMessage::Abort { .. } => 2,
            RtmpMessage::Acknowledgement { .. } => 3,
            RtmpMessage::Command { encoding, .. } => types::command::type_id(*encoding),
            RtmpMessage::SetChunkSize { .. } => 1,
            RtmpMessage::SetPeerBandwidth { .. } => 6,
            RtmpMessage::UserControl { .. } => 4,
            RtmpMessage::WindowAcknowledgement { .. } => 5,
        }
    }
}
