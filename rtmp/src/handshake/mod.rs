//! The fixed size byte exchange that has to complete before any RTMP chunk is read.
//!
//! This is the simple echo variant of the RTMP handshake.  No digests are calculated or
//! verified, so clients that insist on the authenticated handshake will not be able to
//! connect.
//!
//! The exchange as seen from the server:
//!
//! 1. Read C0 (the version byte, which must be 3) and then C1 (1536 bytes).
//! 2. Write S0 (the version byte), S1 (1536 zeroed bytes) and S2 (an echo of C1).
//! 3. Flush, then read C2 (1536 bytes) and throw it away.

mod errors;

pub use self::errors::HandshakeError;

use std::io::{Read, Write};

/// The only RTMP version the handshake accepts
pub const RTMP_VERSION: u8 = 3;

/// Size of the C1/C2/S1/S2 handshake packets
pub const HANDSHAKE_PACKET_SIZE: usize = 1536;

/// How far a handshake got.  A failed handshake stays at the stage it failed in.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum HandshakeStage {
    WaitingForPacket0,
    WaitingForPacket1,
    SendingResponse,
    WaitingForPacket2,
    Complete,
}

/// Performs the server side of the handshake over a blocking channel
pub struct Handshake {
    current_stage: HandshakeStage,
}

impl Handshake {
    pub fn new() -> Handshake {
        Handshake {
            current_stage: HandshakeStage::WaitingForPacket0,
        }
    }

    pub fn stage(&self) -> HandshakeStage {
        self.current_stage
    }

    pub fn is_complete(&self) -> bool {
        self.current_stage == HandshakeStage::Complete
    }

    /// Runs the whole exchange, returning once C2 has been consumed.
    ///
    /// A bad version byte fails the handshake before anything past it is read.  Everything the
    /// server sends is flushed before C2 is read, since the client will not send C2 until it has
    /// received S2.
    pub fn perform<C: Read + Write>(&mut self, channel: &mut C) -> Result<(), HandshakeError> {
        if self.current_stage != HandshakeStage::WaitingForPacket0 {
            return Err(HandshakeError::AlreadyAttempted);
        }

        let mut version = [0_u8; 1];
        channel.read_exact(&mut version)?;
        if version[0] != RTMP_VERSION {
            return Err(HandshakeError::BadVersionId(version[0]));
        }

        self.current_stage = HandshakeStage::WaitingForPacket1;
        let mut c1 = vec![0_u8; HANDSHAKE_PACKET_SIZE];
        channel.read_exact(&mut c1)?;

        self.current_stage = HandshakeStage::SendingResponse;
        let s1 = [0_u8; HANDSHAKE_PACKET_SIZE];
        channel.write_all(&[RTMP_VERSION])?;
        channel.write_all(&s1)?;
        channel.write_all(&c1)?;
        channel.flush()?;

        self.current_stage = HandshakeStage::WaitingForPacket2;
        let mut c2 = vec![0_u8; HANDSHAKE_PACKET_SIZE];
        channel.read_exact(&mut c2)?;
        tracing::trace!(length = c2.len(), "Discarding handshake packet C2");

        self.current_stage = HandshakeStage::Complete;
        Ok(())
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Handshake::new()
    }
}
