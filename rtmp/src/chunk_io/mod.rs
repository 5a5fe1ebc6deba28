//! Conversion between RTMP messages and the chunks they travel in.
//!
//! Every chunk read from a peer must pass through one `ChunkDeserializer`, since chunk headers
//! are compressed against the previous header on the same chunk stream.

mod chunk_header;
mod deserialization_errors;
mod deserializer;
mod serialization_errors;
mod serializer;

pub use self::chunk_header::{ChunkHeaderFormat, ChunkStreamState, EXTENDED_TIMESTAMP_MARKER};
pub use self::deserialization_errors::ChunkDeserializationError;
pub use self::deserializer::{ChunkDeserializer, ReadChunk, INITIAL_MAX_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use self::serialization_errors::ChunkSerializationError;
pub use self::serializer::ChunkSerializer;
