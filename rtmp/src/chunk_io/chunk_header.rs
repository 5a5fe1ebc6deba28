use crate::time::RtmpTimestamp;
use bytes::BytesMut;

/// Timestamp fields at this value signal that a 4 byte extended timestamp follows the header
pub const EXTENDED_TIMESTAMP_MARKER: u32 = 0x00FF_FFFF;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ChunkHeaderFormat {
    Full,                            // Format 0
    TimeDeltaWithoutMessageStreamId, // Format 1
    TimeDeltaOnly,                   // Format 2
    Empty,                           // Format 3
}

impl ChunkHeaderFormat {
    pub fn from_basic_header(byte: u8) -> ChunkHeaderFormat {
        match byte >> 6 {
            0 => ChunkHeaderFormat::Full,
            1 => ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId,
            2 => ChunkHeaderFormat::TimeDeltaOnly,
            _ => ChunkHeaderFormat::Empty,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            ChunkHeaderFormat::Full => 0,
            ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId => 1,
            ChunkHeaderFormat::TimeDeltaOnly => 2,
            ChunkHeaderFormat::Empty => 3,
        }
    }
}

/// Reassembly state of a single chunk stream.
///
/// The message level fields (`type_id`, `stream_id`, `length`) only change when a format 0 or 1
/// header arrives, so format 2 and 3 chunks continue with whatever was stored last.
#[derive(Debug)]
pub struct ChunkStreamState {
    pub csid: u32,
    pub format: ChunkHeaderFormat,
    pub timestamp: RtmpTimestamp,

    /// Delta applied when a format 3 header starts a new message.  After a format 0 header this
    /// is the absolute timestamp, as the protocol requires.
    pub timestamp_delta: u32,

    /// The raw 3 byte timestamp field of the last header that carried one
    pub timestamp_field: u32,
    pub type_id: u8,
    pub stream_id: u32,
    pub length: u32,
    pub buffer: BytesMut,
}

impl ChunkStreamState {
    pub fn new(csid: u32) -> ChunkStreamState {
        ChunkStreamState {
            csid,
            format: ChunkHeaderFormat::Full,
            timestamp: RtmpTimestamp::new(0),
            timestamp_delta: 0,
            timestamp_field: 0,
            type_id: 0,
            stream_id: 0,
            length: 0,
            buffer: BytesMut::new(),
        }
    }

    /// Bytes of the current message received so far
    pub fn received(&self) -> u32 {
        self.buffer.len() as u32
    }

    /// True while some, but not all, of a message's payload has arrived
    pub fn is_mid_message(&self) -> bool {
        !self.buffer.is_empty() && self.received() < self.length
    }

    pub fn has_extended_timestamp(&self) -> bool {
        self.timestamp_field >= EXTENDED_TIMESTAMP_MARKER
    }
}
