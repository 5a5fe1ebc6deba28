//! The byte channel the protocol runs over.
//!
//! Everything above this module only depends on the `Socket` capability set and the
//! `BufferedChannel` adapter, never on a concrete transport.  Accepting connections is left to
//! the application.

use bytes::BytesMut;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

const DEFAULT_BUFFER_SIZE: usize = 4096;

/// A bidirectional, ordered byte stream that can be closed and given an I/O deadline
pub trait Socket: Read + Write {
    /// Shuts down both directions of the stream
    fn close(&mut self) -> io::Result<()>;

    /// Limits how long a single read or write may block.  `None` blocks indefinitely.
    fn set_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl Socket for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }

    fn set_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }
}

/// Buffers both directions of a `Socket`.
///
/// Writes are only appended to an outbound buffer, so several messages can be batched and
/// handed to the socket with a single `flush()`.
pub struct BufferedChannel<S: Socket> {
    reader: BufReader<S>,
    outbound: BytesMut,
}

impl<S: Socket> BufferedChannel<S> {
    pub fn new(socket: S) -> Self {
        BufferedChannel::with_capacity(DEFAULT_BUFFER_SIZE, socket)
    }

    pub fn with_capacity(capacity: usize, socket: S) -> Self {
        BufferedChannel {
            reader: BufReader::with_capacity(capacity, socket),
            outbound: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written but not yet flushed to the socket
    pub fn pending_write_len(&self) -> usize {
        self.outbound.len()
    }

    /// Number of bytes already pulled off the socket but not yet consumed
    pub fn buffered_read_len(&self) -> usize {
        self.reader.buffer().len()
    }

    pub fn set_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.reader.get_mut().set_deadline(timeout)
    }

    /// Flushes whatever is pending and closes the socket.  A failed flush does not prevent
    /// the close.
    pub fn close(&mut self) -> io::Result<()> {
        if let Err(error) = self.flush() {
            tracing::debug!(error = %error, "Failed to flush pending bytes while closing");
        }

        self.outbound.clear();
        self.reader.get_mut().close()
    }

    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }
}

impl<S: Socket> Read for BufferedChannel<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<S: Socket> BufRead for BufferedChannel<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        self.reader.consume(amount)
    }
}

impl<S: Socket> Write for BufferedChannel<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.outbound.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.outbound.is_empty() {
            let pending = self.outbound.split();
            self.reader.get_mut().write_all(&pending[..])?;
        }

        self.reader.get_mut().flush()
    }
}
