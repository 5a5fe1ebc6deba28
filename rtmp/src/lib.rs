//! Server side RTMP ingest: everything between an accepted socket and a client that is ready
//! to publish or play.
//!
//! The crate is layered bottom up:
//!
//! * `transport` - the `Socket` capability set and the buffered channel the protocol runs over
//! * `handshake` - the version check and echo exchange that precedes chunking
//! * `chunk_io` - splitting messages into chunks and reassembling them per chunk stream
//! * `messages` - typed protocol control and command messages
//! * `connection` - a chunked connection that applies control messages and acknowledges bytes
//! * `sessions` - the command state machine that negotiates a publish or play
//!
//! Command values are encoded with the `rtmp_ingest_amf0` crate.
//!
//! # Example
//! ```no_run
//! use rtmp_ingest::sessions::{ServerSession, ServerSessionConfig, StreamRole};
//! use std::net::TcpListener;
//!
//! let listener = TcpListener::bind("0.0.0.0:1935").unwrap();
//! for stream in listener.incoming() {
//!     let mut session = ServerSession::new(stream.unwrap(), ServerSessionConfig::new());
//!     match session.serve() {
//!         Ok(StreamRole::Publisher) => println!("Publishing to {:?}", session.info().stream_url()),
//!         Ok(StreamRole::Player) => println!("Playing {:?}", session.info().stream_name()),
//!         Err(error) => println!("Session failed: {}", error),
//!     }
//! }
//! ```

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod chunk_io;
pub mod connection;
pub mod flow_control;
pub mod handshake;
pub mod messages;
pub mod sessions;
pub mod time;
pub mod transport;

pub use rtmp_ingest_amf0 as amf0;
