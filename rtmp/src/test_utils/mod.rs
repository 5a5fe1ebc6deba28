//! Helpers shared by the unit tests of every module

mod mock_socket;

pub use self::mock_socket::{MockSocket, MockSocketHandle};

use crate::chunk_io::{ChunkDeserializer, ChunkSerializer};
use crate::messages::RtmpMessage;
use crate::time::RtmpTimestamp;
use std::io::Cursor;

/// A message the server wrote, decoded along with where it was sent
#[derive(Debug)]
pub struct SentMessage {
    pub csid: u32,
    pub message_stream_id: u32,
    pub message: RtmpMessage,
}

/// Chunks messages the way a client would send them, at the given chunk size
pub fn client_chunks(chunk_size: u32, messages: Vec<(u32, u32, RtmpMessage)>) -> Vec<u8> {
    let mut serializer = ChunkSerializer::new();
    serializer.set_max_chunk_size(chunk_size).unwrap();

    let mut bytes = Vec::new();
    for (csid, message_stream_id, message) in messages {
        let payload = message
            .into_message_payload(RtmpTimestamp::new(0), message_stream_id)
            .unwrap();

        serializer.serialize(&payload, csid, &mut bytes).unwrap();
    }

    bytes
}

/// Decodes everything the server wrote after the handshake, following any chunk size changes
/// it announced along the way.
pub fn parse_server_output(bytes: &[u8]) -> Vec<SentMessage> {
    let mut deserializer = ChunkDeserializer::new();
    let mut cursor = Cursor::new(bytes);
    let mut results = Vec::new();

    while (cursor.position() as usize) < bytes.len() {
        let chunk = deserializer.read_chunk(&mut cursor).unwrap();
        let payload = match chunk.message {
            Some(payload) => payload,
            None => continue,
        };

        let message = payload.to_rtmp_message().unwrap();
        if let RtmpMessage::SetChunkSize { size } = message {
            deserializer.set_max_chunk_size(size).unwrap();
        }

        results.push(SentMessage {
            csid: chunk.csid,
            message_stream_id: payload.message_stream_id,
            message,
        });
    }

    results
}

/// Asserts that a vector holds exactly the given patterns, in order.
///
/// ```ignore
/// assert_vec_match!(values,
///     Amf0Value::Utf8String(name) if name == "_result",
///     Amf0Value::Number(_),
/// );
/// ```
#[allow(unused_macros)]
macro_rules! assert_vec_match {
    ($vector:expr $(, $pattern:pat $(if $cond:expr)?)* $(,)?) => {{
        let vector = &$vector;
        #[allow(unused_mut)]
        let mut index = 0usize;
        $(
            match vector.get(index) {
                Some($pattern) $(if $cond)? => (),
                other => panic!(
                    "Element {} did not match '{}': {:?}",
                    index,
                    stringify!($pattern $(if $cond)?),
                    other
                ),
            }
            index += 1;
        )*

        if vector.len() != index {
            panic!("Vector contained {} elements but {} were expected", vector.len(), index);
        }
    }};
}

/// Asserts that at least one element of a vector matches the pattern, optionally running an
/// expression with the bindings of each match.
#[allow(unused_macros)]
macro_rules! assert_vec_contains {
    ($vector:expr, $pattern:pat $(if $cond:expr)? $(=> $success:expr)?) => {{
        let vector = &$vector;
        let mut has_value = false;
        for element in vector.iter() {
            match element {
                $pattern $(if $cond)? => {
                    has_value = true;
                    $($success;)?
                }
                _ => (),
            }
        }

        if !has_value {
            panic!(
                "Vector had {} elements but none matched '{}'",
                vector.len(),
                stringify!($pattern $(if $cond)?)
            );
        }
    }};
}
