//! This crate provides functionality for serializing and deserializing the dynamically typed
//! values carried inside RTMP command messages, based on the Adobe AMF0 encoding specification
//! located at
//! <https://wwwimages2.adobe.com/content/dam/acom/en/devnet/pdf/amf0-file-format-specification.pdf>
//!
//! Objects keep the order their properties were written in, so a value that is deserialized
//! and serialized again produces its properties in the same order.
//!
//! # Examples
//! ```
//! use std::io::Cursor;
//! use rtmp_ingest_amf0::{Amf0Object, Amf0Value, ObjectEncoding, serialize, deserialize};
//!
//! // Put some data into the Amf0Value types
//! let mut properties = Amf0Object::new();
//! properties.insert("app".to_string(), Amf0Value::Number(99.0));
//! properties.insert("second".to_string(), Amf0Value::Utf8String("test".to_string()));
//!
//! let value1 = Amf0Value::Number(32.0);
//! let value2 = Amf0Value::Boolean(true);
//! let object = Amf0Value::Object(properties);
//!
//! let input = vec![value1, object, value2];
//!
//! // Serialize the values into a vector of bytes
//! let serialized_data = serialize(&input).unwrap();
//!
//! // Deserialize the vector of bytes back into Amf0Value types
//! let mut serialized_cursor = Cursor::new(serialized_data);
//! let results = deserialize(&mut serialized_cursor, ObjectEncoding::Amf0).unwrap();
//!
//! assert_eq!(input, results);
//! ```

mod deserialization;
mod errors;
mod serialization;

pub use deserialization::{deserialize, deserialize_value, MAX_NESTING_DEPTH};
pub use errors::{Amf0DeserializationError, Amf0SerializationError};
pub use serialization::{serialize, serialize_value};

use indexmap::IndexMap;

/// The properties of an AMF0 object, in the order they were inserted
pub type Amf0Object = IndexMap<String, Amf0Value>;

/// An Enum representing the different supported types of Amf0 values
///
/// Some wire types have no variant of their own.  Long strings decode to `Utf8String`, and are
/// only written as long strings again when longer than 65,535 bytes.  ECMA arrays decode to
/// `Object`, since both are string keyed property lists, and are written back as objects.  The
/// keys, values and their order are unchanged by that trip.
#[derive(PartialEq, Debug, Clone)]
pub enum Amf0Value {
    Number(f64),
    Boolean(bool),
    Utf8String(String),
    Object(Amf0Object),
    StrictArray(Vec<Amf0Value>),
    Null,
    Undefined,

    /// Milliseconds since the unix epoch.  The time zone sent on the wire is ignored.
    Date(f64),
}

impl Amf0Value {
    pub fn get_number(self) -> Option<f64> {
        match self {
            Amf0Value::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_boolean(self) -> Option<bool> {
        match self {
            Amf0Value::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_string(self) -> Option<String> {
        match self {
            Amf0Value::Utf8String(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_object_properties(self) -> Option<Amf0Object> {
        match self {
            Amf0Value::Object(properties) => Some(properties),
            _ => None,
        }
    }

    /// Borrowing variant of `get_string()`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Amf0Value::Utf8String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for Amf0Value {
    fn from(value: f64) -> Self {
        Amf0Value::Number(value)
    }
}

impl From<bool> for Amf0Value {
    fn from(value: bool) -> Self {
        Amf0Value::Boolean(value)
    }
}

impl From<&str> for Amf0Value {
    fn from(value: &str) -> Self {
        Amf0Value::Utf8String(value.to_string())
    }
}

impl From<String> for Amf0Value {
    fn from(value: String) -> Self {
        Amf0Value::Utf8String(value)
    }
}

impl From<Amf0Object> for Amf0Value {
    fn from(value: Amf0Object) -> Self {
        Amf0Value::Object(value)
    }
}

/// The generation of value encoding a command message was sent with.
///
/// RTMP carries AMF0 encoded commands in message type 20 and AMF3 encoded commands in message
/// type 17.  AMF3 is only recognized so that it can be routed; its values are read with the
/// AMF0 marker table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ObjectEncoding {
    Amf0,
    Amf3,
}

impl ObjectEncoding {
    /// The numeric version used for the `objectEncoding` property of a connect request
    pub fn version(self) -> u8 {
        match self {
            ObjectEncoding::Amf0 => 0,
            ObjectEncoding::Amf3 => 3,
        }
    }
}

mod markers {
    pub const NUMBER_MARKER: u8 = 0;
    pub const BOOLEAN_MARKER: u8 = 1;
    pub const STRING_MARKER: u8 = 2;
    pub const OBJECT_MARKER: u8 = 3;
    pub const NULL_MARKER: u8 = 5;
    pub const UNDEFINED_MARKER: u8 = 6;
    pub const ECMA_ARRAY_MARKER: u8 = 8;
    pub const OBJECT_END_MARKER: u8 = 9;
    pub const STRICT_ARRAY_MARKER: u8 = 10;
    pub const DATE_MARKER: u8 = 11;
    pub const LONG_STRING_MARKER: u8 = 12;
    pub const UTF_8_EMPTY_MARKER: u16 = 0;
}
