//! A chunked RTMP connection over a buffered byte channel.
//!
//! The connection owns the channel along with both directions of chunk state, and applies
//! protocol control messages itself.  Callers only ever see the messages that carry
//! application meaning.

use crate::chunk_io::{
    ChunkDeserializationError, ChunkDeserializer, ChunkSerializationError, ChunkSerializer, MAX_CHUNK_SIZE,
};
use crate::flow_control::FlowControl;
use crate::messages::{
    MessageDeserializationError, MessagePayload, MessageSerializationError, PeerBandwidthLimitType, RtmpMessage,
    UserControlEventType,
};
use crate::time::RtmpTimestamp;
use crate::transport::{BufferedChannel, Socket};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

/// Chunk stream reserved for protocol control messages
pub const CONTROL_CHUNK_STREAM_ID: u32 = 2;

/// Message stream that control messages are sent on
pub const CONTROL_MESSAGE_STREAM_ID: u32 = 0;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to read chunk: {0}")]
    ChunkDeserialization(#[from] ChunkDeserializationError),

    #[error("Failed to write chunk: {0}")]
    ChunkSerialization(#[from] ChunkSerializationError),

    #[error("Received a malformed control message: {0}")]
    MessageDeserialization(#[from] MessageDeserializationError),

    #[error("Failed to serialize message: {0}")]
    MessageSerialization(#[from] MessageSerializationError),

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// A completely received message that isn't a protocol control message
#[derive(Debug, PartialEq)]
pub struct InboundMessage {
    pub csid: u32,
    pub payload: MessagePayload,
}

pub struct Connection<S: Socket> {
    channel: BufferedChannel<S>,
    deserializer: ChunkDeserializer,
    serializer: ChunkSerializer,
    flow_control: FlowControl,
}

impl<S: Socket> Connection<S> {
    pub fn new(socket: S) -> Self {
        Connection::from_channel(BufferedChannel::new(socket))
    }

    pub fn from_channel(channel: BufferedChannel<S>) -> Self {
        Connection {
            channel,
            deserializer: ChunkDeserializer::new(),
            serializer: ChunkSerializer::new(),
            flow_control: FlowControl::new(),
        }
    }

    /// Reads chunks until a message that isn't a protocol control message is complete.
    ///
    /// Control messages that complete along the way are applied, and any acknowledgement that
    /// comes due is written and flushed right away.
    pub fn read_message(&mut self) -> Result<InboundMessage, ConnectionError> {
        loop {
            let chunk = self.deserializer.read_chunk(&mut self.channel)?;
            if let Some(sequence_number) = self.flow_control.record_received(chunk.payload_length) {
                self.send_acknowledgement(sequence_number)?;
            }

            let payload = match chunk.message {
                Some(payload) => payload,
                None => continue,
            };

            if payload.is_control_message() {
                self.apply_control_message(&payload)?;
                continue;
            }

            return Ok(InboundMessage {
                csid: chunk.csid,
                payload,
            });
        }
    }

    /// Queues a message in the outbound buffer.  Nothing reaches the socket until `flush()`.
    pub fn write_message(&mut self, payload: &MessagePayload, csid: u32) -> Result<(), ConnectionError> {
        self.serializer.serialize(payload, csid, &mut self.channel)?;
        Ok(())
    }

    pub fn send_message(
        &mut self,
        message: RtmpMessage,
        csid: u32,
        message_stream_id: u32,
    ) -> Result<(), ConnectionError> {
        let payload = message.into_message_payload(RtmpTimestamp::new(0), message_stream_id)?;
        self.write_message(&payload, csid)
    }

    /// Announces a new outbound chunk size.  The announcement itself still goes out at the old
    /// size, and every message queued afterwards uses the new one.
    pub fn send_set_chunk_size(&mut self, size: u32) -> Result<(), ConnectionError> {
        if size == 0 || size > MAX_CHUNK_SIZE {
            return Err(ChunkSerializationError::InvalidMaxChunkSize {
                attempted_chunk_size: size,
            }
            .into());
        }

        self.send_control_message(RtmpMessage::SetChunkSize { size })?;
        self.serializer.set_max_chunk_size(size)?;
        Ok(())
    }

    pub fn send_window_ack_size(&mut self, size: u32) -> Result<(), ConnectionError> {
        self.send_control_message(RtmpMessage::WindowAcknowledgement { size })?;
        self.flow_control.set_local_window_ack_size(size);
        Ok(())
    }

    pub fn send_set_peer_bandwidth(&mut self, size: u32, limit_type: PeerBandwidthLimitType) -> Result<(), ConnectionError> {
        self.send_control_message(RtmpMessage::SetPeerBandwidth { size, limit_type })
    }

    pub fn send_stream_begin(&mut self, stream_id: u32) -> Result<(), ConnectionError> {
        self.send_control_message(RtmpMessage::UserControl {
            event_type: UserControlEventType::StreamBegin,
            stream_id: Some(stream_id),
            buffer_length: None,
            timestamp: None,
        })
    }

    pub fn flush(&mut self) -> Result<(), ConnectionError> {
        self.channel.flush()?;
        Ok(())
    }

    /// Flushes whatever is still buffered, best effort, and closes the socket
    pub fn close(&mut self) -> Result<(), ConnectionError> {
        self.channel.close()?;
        Ok(())
    }

    pub fn set_deadline(&mut self, timeout: Option<Duration>) -> Result<(), ConnectionError> {
        self.channel.set_deadline(timeout)?;
        Ok(())
    }

    /// Direct access to the channel, for the exchanges that happen before chunking starts
    pub fn channel_mut(&mut self) -> &mut BufferedChannel<S> {
        &mut self.channel
    }

    pub fn flow_control(&self) -> &FlowControl {
        &self.flow_control
    }

    pub fn inbound_chunk_size(&self) -> u32 {
        self.deserializer.get_max_chunk_size()
    }

    pub fn outbound_chunk_size(&self) -> u32 {
        self.serializer.get_max_chunk_size()
    }

    fn send_control_message(&mut self, message: RtmpMessage) -> Result<(), ConnectionError> {
        self.send_message(message, CONTROL_CHUNK_STREAM_ID, CONTROL_MESSAGE_STREAM_ID)
    }

    fn send_acknowledgement(&mut self, sequence_number: u32) -> Result<(), ConnectionError> {
        tracing::debug!(sequence_number, "Sending acknowledgement");
        self.send_control_message(RtmpMessage::Acknowledgement { sequence_number })?;
        self.flush()
    }

    fn apply_control_message(&mut self, payload: &MessagePayload) -> Result<(), ConnectionError> {
        match payload.to_rtmp_message()? {
            RtmpMessage::SetChunkSize { size } => {
                tracing::debug!(size, "Peer changed its chunk size");
                self.deserializer.set_max_chunk_size(size)?;
            }

            RtmpMessage::Abort { stream_id } => {
                let discarded = self.deserializer.abort_message(stream_id);
                tracing::debug!(csid = stream_id, discarded, "Peer aborted message");
            }

            RtmpMessage::WindowAcknowledgement { size } => {
                tracing::debug!(size, "Peer set acknowledgement window");
                self.flow_control.set_remote_window_ack_size(size);
            }

            RtmpMessage::SetPeerBandwidth { size, limit_type } => {
                tracing::debug!(size, limit_type = ?limit_type, "Peer set bandwidth limit");
                self.flow_control.set_peer_bandwidth(size, limit_type);
            }

            RtmpMessage::Acknowledgement { sequence_number } => {
                tracing::trace!(sequence_number, "Peer acknowledged bytes");
                self.flow_control.record_peer_acknowledgement(sequence_number);
            }

            RtmpMessage::UserControl {
                event_type: UserControlEventType::PingRequest,
                timestamp,
                ..
            } => {
                self.send_control_message(RtmpMessage::UserControl {
                    event_type: UserControlEventType::PingResponse,
                    stream_id: None,
                    buffer_length: None,
                    timestamp,
                })?;

                self.flush()?;
            }

            other => tracing::trace!(message = ?other, "Ignoring control message"),
        }

        Ok(())
    }
}
