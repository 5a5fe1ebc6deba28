use std::{io, string};
use thiserror::Error;

/// Errors that can occur while reading AMF0 values out of a byte stream
#[derive(Debug, Error)]
pub enum Amf0DeserializationError {
    /// The type marker in front of a value is not one this decoder understands
    #[error("Encountered unknown marker {marker}")]
    UnknownMarker { marker: u8 },

    /// An object property had an empty name but was not followed by the object end marker
    #[error("Unexpected empty object property name")]
    UnexpectedEmptyObjectPropertyName,

    /// The input ended in the middle of a value
    #[error("Hit end of the byte buffer but was expecting more data")]
    UnexpectedEof,

    /// Objects and arrays were nested inside each other more deeply than the decoder allows
    #[error("Values were nested more than {max_depth} levels deep")]
    NestingTooDeep { max_depth: usize },

    /// A string value was not valid UTF-8
    #[error("String value was not valid utf-8: {0}")]
    InvalidUtf8(#[from] string::FromUtf8Error),

    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for Amf0DeserializationError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Amf0DeserializationError::UnexpectedEof,
            _ => Amf0DeserializationError::Io(error),
        }
    }
}

/// Errors that can occur while writing AMF0 values
#[derive(Debug, Error)]
pub enum Amf0SerializationError {
    /// Object property names are length prefixed with 16 bits
    #[error("Object property name is {length} bytes long, greater than 65,535")]
    PropertyNameTooLong { length: usize },

    /// Long strings and arrays are length prefixed with 32 bits
    #[error("Value with {length} elements or bytes cannot be represented in AMF0")]
    ValueTooLong { length: usize },

    #[error("{0}")]
    Io(#[from] io::Error),
}
