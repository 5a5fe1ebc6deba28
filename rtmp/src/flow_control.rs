//! Byte accounting for RTMP's acknowledgement window.
//!
//! Every chunk read from the peer, whatever message it belongs to, counts towards the window.
//! Once the peer's window size worth of bytes has been received since the last acknowledgement
//! an `Acknowledgement` carrying that count must be sent back.

use crate::messages::PeerBandwidthLimitType;

pub const DEFAULT_WINDOW_ACK_SIZE: u32 = 2_500_000;

/// The running total is reset before it can reach this value, so sequence numbers never get
/// close to overflowing 32 bits.
pub const SEQUENCE_NUMBER_WRAP: u32 = 0xF000_0000;

#[derive(Debug, Clone)]
pub struct FlowControl {
    received_total: u32,
    acked_since_last: u32,
    remote_window_ack_size: u32,
    local_window_ack_size: u32,
    peer_bandwidth: Option<(u32, PeerBandwidthLimitType)>,
    last_peer_acknowledgement: Option<u32>,
}

impl FlowControl {
    pub fn new() -> FlowControl {
        FlowControl {
            received_total: 0,
            acked_since_last: 0,
            remote_window_ack_size: DEFAULT_WINDOW_ACK_SIZE,
            local_window_ack_size: DEFAULT_WINDOW_ACK_SIZE,
            peer_bandwidth: None,
            last_peer_acknowledgement: None,
        }
    }

    /// Counts bytes read off the wire.  Returns the sequence number to acknowledge when the
    /// peer's window has been filled.
    pub fn record_received(&mut self, bytes: u32) -> Option<u32> {
        self.received_total = self.received_total.saturating_add(bytes);
        if self.received_total >= SEQUENCE_NUMBER_WRAP {
            self.received_total = 0;
        }

        self.acked_since_last = self.acked_since_last.saturating_add(bytes);
        if self.acked_since_last >= self.remote_window_ack_size {
            let sequence_number = self.acked_since_last;
            self.acked_since_last = 0;
            return Some(sequence_number);
        }

        None
    }

    /// The window size the peer asked us to acknowledge at
    pub fn set_remote_window_ack_size(&mut self, size: u32) {
        self.remote_window_ack_size = size;
    }

    /// The window size we told the peer to acknowledge at
    pub fn set_local_window_ack_size(&mut self, size: u32) {
        self.local_window_ack_size = size;
    }

    pub fn set_peer_bandwidth(&mut self, size: u32, limit_type: PeerBandwidthLimitType) {
        self.peer_bandwidth = Some((size, limit_type));
    }

    pub fn record_peer_acknowledgement(&mut self, sequence_number: u32) {
        self.last_peer_acknowledgement = Some(sequence_number);
    }

    pub fn received_total(&self) -> u32 {
        self.received_total
    }

    pub fn acked_since_last(&self) -> u32 {
        self.acked_since_last
    }

    pub fn remote_window_ack_size(&self) -> u32 {
        self.remote_window_ack_size
    }

    pub fn local_window_ack_size(&self) -> u32 {
        self.local_window_ack_size
    }

    pub fn peer_bandwidth(&self) -> Option<&(u32, PeerBandwidthLimitType)> {
        self.peer_bandwidth.as_ref()
    }

    pub fn last_peer_acknowledgement(&self) -> Option<u32> {
        self.last_peer_acknowledgement
    }
}

impl Default for FlowControl {
    fn default() -> Self {
        FlowControl::new()
    }
}
