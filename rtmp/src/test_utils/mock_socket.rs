use crate::transport::Socket;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct SocketRecord {
    written: Vec<u8>,
    written_at_reads: Vec<usize>,
    flush_count: usize,
    closed: bool,
    deadline: Option<Duration>,
}

/// An in memory socket that plays back scripted client bytes and records what the server
/// writes.
///
/// Each input segment is handed out by separate `read()` calls, which lets tests control
/// where the reads are split.  Once every segment is consumed the socket reports end of stream.
pub struct MockSocket {
    segments: VecDeque<Vec<u8>>,
    record: Rc<RefCell<SocketRecord>>,
}

/// Inspects a `MockSocket` after it has been moved into a channel or session
#[derive(Clone)]
pub struct MockSocketHandle {
    record: Rc<RefCell<SocketRecord>>,
}

impl MockSocket {
    pub fn new(input: Vec<u8>) -> (MockSocket, MockSocketHandle) {
        MockSocket::with_segments(vec![input])
    }

    pub fn with_segments(segments: Vec<Vec<u8>>) -> (MockSocket, MockSocketHandle) {
        let record = Rc::new(RefCell::new(SocketRecord::default()));
        let socket = MockSocket {
            segments: segments.into_iter().collect(),
            record: record.clone(),
        };

        (socket, MockSocketHandle { record })
    }
}

impl MockSocketHandle {
    pub fn written(&self) -> Vec<u8> {
        self.record.borrow().written.clone()
    }

    /// How many bytes had been written when each non-empty read was served
    pub fn written_at_reads(&self) -> Vec<usize> {
        self.record.borrow().written_at_reads.clone()
    }

    pub fn flush_count(&self) -> usize {
        self.record.borrow().flush_count
    }

    pub fn is_closed(&self) -> bool {
        self.record.borrow().closed
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.record.borrow().deadline
    }
}

impl Read for MockSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.record.borrow().closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed"));
        }

        while let Some(segment) = self.segments.front_mut() {
            if segment.is_empty() {
                self.segments.pop_front();
                continue;
            }

            let count = segment.len().min(buf.len());
            buf[..count].copy_from_slice(&segment[..count]);
            segment.drain(..count);

            let mut record = self.record.borrow_mut();
            let written = record.written.len();
            record.written_at_reads.push(written);
            return Ok(count);
        }

        Ok(0)
    }
}

impl Write for MockSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut record = self.record.borrow_mut();
        if record.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed"));
        }

        record.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.record.borrow_mut().flush_count += 1;
        Ok(())
    }
}

impl Socket for MockSocket {
    fn close(&mut self) -> io::Result<()> {
        self.record.borrow_mut().closed = true;
        Ok(())
    }

    fn set_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.record.borrow_mut().deadline = timeout;
        Ok(())
    }
}
