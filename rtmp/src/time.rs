//! RTMP timestamps are 32 bit unsigned millisecond counters from an unspecified epoch.
//!
//! A long running stream will overflow 32 bits, so applying a delta to an `RtmpTimestamp`
//! wraps instead of panicking.
//!
//! # Examples
//!
//! ```
//! use rtmp_ingest::time::RtmpTimestamp;
//!
//! let start = RtmpTimestamp::new(4_294_967_000);
//! let later = start + 1_000;
//!
//! assert_eq!(later, 704);
//! ```

use std::ops::Add;

/// A wrapping RTMP timestamp
#[derive(Eq, PartialEq, Debug, Copy, Clone, Default)]
pub struct RtmpTimestamp {
    /// Milliseconds since the stream's epoch
    pub value: u32,
}

impl RtmpTimestamp {
    pub fn new(value: u32) -> Self {
        RtmpTimestamp { value }
    }
}

/// Applies a chunk header's timestamp delta
impl Add<u32> for RtmpTimestamp {
    type Output = RtmpTimestamp;

    fn add(self, milliseconds: u32) -> Self {
        RtmpTimestamp::new(self.value.wrapping_add(milliseconds))
    }
}

impl PartialEq<u32> for RtmpTimestamp {
    fn eq(&self, other: &u32) -> bool {
        self.value == *other
    }
}
