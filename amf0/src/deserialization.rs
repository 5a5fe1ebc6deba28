//! This module contains functionality to deserialize values from bytes
//! that were encoded via the AMF0 specification
//! (http://wwwimages.adobe.com/content/dam/Adobe/en/devnet/amf/pdf/amf0-file-format-specification.pdf)

use crate::errors::Amf0DeserializationError;
use crate::markers;
use crate::{Amf0Object, Amf0Value, ObjectEncoding};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;

/// How many objects and arrays a value may be nested inside of.  Decoding recurses once per
/// level, so this bounds stack use no matter what the peer sends.
pub const MAX_NESTING_DEPTH: usize = 64;

struct ObjectProperty {
    label: String,
    value: Amf0Value,
}

/// Reads values from the byte stream until it is exhausted.
///
/// Running out of bytes between two values ends the sequence normally, while running out of
/// bytes in the middle of a value is an error.
pub fn deserialize<R: Read>(
    bytes: &mut R,
    encoding: ObjectEncoding,
) -> Result<Vec<Amf0Value>, Amf0DeserializationError> {
    let mut results = vec![];

    while let Some(marker) = read_marker(bytes)? {
        results.push(read_value_with_marker(bytes, marker, encoding)?);
    }

    Ok(results)
}

/// Reads exactly one value from the byte stream, leaving the stream positioned right after it.
pub fn deserialize_value<R: Read>(
    bytes: &mut R,
    encoding: ObjectEncoding,
) -> Result<Amf0Value, Amf0DeserializationError> {
    match read_marker(bytes)? {
        Some(marker) => read_value_with_marker(bytes, marker, encoding),
        None => Err(Amf0DeserializationError::UnexpectedEof),
    }
}

fn read_marker<R: Read>(bytes: &mut R) -> Result<Option<u8>, Amf0DeserializationError> {
    let mut buffer: [u8; 1] = [0];
    let bytes_read = bytes.read(&mut buffer)?;

    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(buffer[0]))
}

fn read_value_with_marker<R: Read>(
    bytes: &mut R,
    marker: u8,
    encoding: ObjectEncoding,
) -> Result<Amf0Value, Amf0DeserializationError> {
    // AMF3 command messages are recognized at the RTMP layer but their values are read with
    // the AMF0 marker table for now.
    match encoding {
        ObjectEncoding::Amf0 | ObjectEncoding::Amf3 => read_amf0_value(bytes, marker, 0),
    }
}

/// `depth` is the number of objects and arrays the value is nested inside of
fn read_amf0_value<R: Read>(bytes: &mut R, marker: u8, depth: usize) -> Result<Amf0Value, Amf0DeserializationError> {
    match marker {
        markers::BOOLEAN_MARKER => parse_bool(bytes),
        markers::NULL_MARKER => Ok(Amf0Value::Null),
        markers::UNDEFINED_MARKER => Ok(Amf0Value::Undefined),
        markers::NUMBER_MARKER => parse_number(bytes),
        markers::OBJECT_MARKER => parse_object(bytes, depth),
        markers::ECMA_ARRAY_MARKER => parse_ecma_array(bytes, depth),
        markers::STRING_MARKER => parse_string(bytes),
        markers::LONG_STRING_MARKER => parse_long_string(bytes),
        markers::STRICT_ARRAY_MARKER => parse_strict_array(bytes, depth),
        markers::DATE_MARKER => parse_date(bytes),
        _ => Err(Amf0DeserializationError::UnknownMarker { marker }),
    }
}

/// Reads a value held by a container at `container_depth`
fn read_nested_value<R: Read>(bytes: &mut R, container_depth: usize) -> Result<Amf0Value, Amf0DeserializationError> {
    let depth = container_depth + 1;
    if depth > MAX_NESTING_DEPTH {
        return Err(Amf0DeserializationError::NestingTooDeep {
            max_depth: MAX_NESTING_DEPTH,
        });
    }

    let marker = bytes.read_u8()?;
    read_amf0_value(bytes, marker, depth)
}

fn parse_number<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DeserializationError> {
    let number = bytes.read_f64::<BigEndian>()?;
    Ok(Amf0Value::Number(number))
}

fn parse_bool<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DeserializationError> {
    let value = bytes.read_u8()?;
    Ok(Amf0Value::Boolean(value != 0))
}

fn parse_string<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DeserializationError> {
    let length = bytes.read_u16::<BigEndian>()?;
    let value = read_utf8(bytes, length as u64)?;
    Ok(Amf0Value::Utf8String(value))
}

fn parse_long_string<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DeserializationError> {
    let length = bytes.read_u32::<BigEndian>()?;
    let value = read_utf8(bytes, length as u64)?;
    Ok(Amf0Value::Utf8String(value))
}

fn parse_date<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DeserializationError> {
    let timestamp = bytes.read_f64::<BigEndian>()?;
    let _time_zone = bytes.read_i16::<BigEndian>()?;
    Ok(Amf0Value::Date(timestamp))
}

fn read_utf8<R: Read>(bytes: &mut R, length: u64) -> Result<String, Amf0DeserializationError> {
    // Read through `take` so a bogus length can't force a huge up front allocation
    let mut buffer = Vec::new();
    bytes.take(length).read_to_end(&mut buffer)?;
    if (buffer.len() as u64) < length {
        return Err(Amf0DeserializationError::UnexpectedEof);
    }

    Ok(String::from_utf8(buffer)?)
}

fn parse_object<R: Read>(bytes: &mut R, depth: usize) -> Result<Amf0Value, Amf0DeserializationError> {
    let mut properties = Amf0Object::new();

    while let Some(property) = parse_object_property(bytes, depth)? {
        properties.insert(property.label, property.value);
    }

    Ok(Amf0Value::Object(properties))
}

fn parse_ecma_array<R: Read>(bytes: &mut R, depth: usize) -> Result<Amf0Value, Amf0DeserializationError> {
    // An ECMA array is an array of values indexed via strings instead of numeric indexes, so
    // it is functionally equivalent to an object.  Encoders in the wild terminate it with the
    // same 0x000009 sequence objects use, so the associative count is only a hint.
    let _associative_count = bytes.read_u32::<BigEndian>()?;
    parse_object(bytes, depth)
}

fn parse_strict_array<R: Read>(bytes: &mut R, depth: usize) -> Result<Amf0Value, Amf0DeserializationError> {
    let array_count = bytes.read_u32::<BigEndian>()?;
    let mut values: Vec<Amf0Value> = Vec::new();

    for _ in 0..array_count {
        values.push(read_nested_value(bytes, depth)?);
    }

    Ok(Amf0Value::StrictArray(values))
}

fn parse_object_property<R: Read>(
    bytes: &mut R,
    depth: usize,
) -> Result<Option<ObjectProperty>, Amf0DeserializationError> {
    let label_length = bytes.read_u16::<BigEndian>()?;
    if label_length == markers::UTF_8_EMPTY_MARKER {
        // Next byte should be the end of object marker.  We need to read this
        // to make sure we progress the current position.
        let byte = bytes.read_u8()?;
        if byte != markers::OBJECT_END_MARKER {
            return Err(Amf0DeserializationError::UnexpectedEmptyObjectPropertyName);
        }

        return Ok(None);
    }

    let label = read_utf8(bytes, label_length as u64)?;
    let value = read_nested_value(bytes, depth)?;

    Ok(Some(ObjectProperty { label, value }))
}

#[cfg(test)]
mod tests {
    use super::{deserialize, deserialize_value, MAX_NESTING_DEPTH};
    use crate::errors::Amf0DeserializationError;
    use crate::markers;
    use crate::{Amf0Object, Amf0Value, ObjectEncoding};
    use byteorder::{BigEndian, WriteBytesExt};
    use std::io::Cursor;

    #[test]
    fn can_deserialize_strict_array() {
        let mut vector = vec![];
        vector.push(markers::STRICT_ARRAY_MARKER);
        vector.write_u32::<BigEndian>(2).unwrap();
        vector.push(markers::NUMBER_MARKER);
        vector.write_f64::<BigEndian>(1.0).unwrap();
        vector.push(markers::NUMBER_MARKER);
        vector.write_f64::<BigEndian>(2.0).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let array = vec![Amf0Value::Number(1.0), Amf0Value::Number(2.0)];
        let expected = vec![Amf0Value::StrictArray(array)];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_number() {
        let number: f64 = 332.0;

        let mut vector = vec![];
        vector.write_u8(markers::NUMBER_MARKER).unwrap();
        vector.write_f64::<BigEndian>(number).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let expected = vec![Amf0Value::Number(number)];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_true_boolean() {
        let mut vector = vec![];
        vector.write_u8(markers::BOOLEAN_MARKER).unwrap();
        vector.write_u8(1).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let expected = vec![Amf0Value::Boolean(true)];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_false_boolean() {
        let mut vector = vec![];
        vector.write_u8(markers::BOOLEAN_MARKER).unwrap();
        vector.write_u8(0).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let expected = vec![Amf0Value::Boolean(false)];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_string() {
        let value = "test";

        let mut vector = vec![];
        vector.write_u8(markers::STRING_MARKER).unwrap();
        vector.write_u16::<BigEndian>(value.len() as u16).unwrap();
        vector.extend(value.as_bytes());

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let expected = vec![Amf0Value::Utf8String(value.to_string())];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_long_string() {
        let value = "long";

        let mut vector = vec![];
        vector.write_u8(markers::LONG_STRING_MARKER).unwrap();
        vector.write_u32::<BigEndian>(value.len() as u32).unwrap();
        vector.extend(value.as_bytes());

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        assert_eq!(result, vec![Amf0Value::Utf8String(value.to_string())]);
    }

    #[test]
    fn can_deserialize_null() {
        let mut vector = vec![];
        vector.write_u8(markers::NULL_MARKER).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let expected = vec![Amf0Value::Null];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_undefined() {
        let mut vector = vec![];
        vector.write_u8(markers::UNDEFINED_MARKER).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let expected = vec![Amf0Value::Undefined];
        assert_eq!(result, expected);
    }

    #[test]
    fn can_deserialize_date_and_ignores_time_zone() {
        let mut vector = vec![];
        vector.write_u8(markers::DATE_MARKER).unwrap();
        vector.write_f64::<BigEndian>(1_600_000_000_000.0).unwrap();
        vector.write_i16::<BigEndian>(-300).unwrap();

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        assert_eq!(result, vec![Amf0Value::Date(1_600_000_000_000.0)]);
    }

    #[test]
    fn can_deserialize_object() {
        const NUMBER: f64 = 332.0;

        let mut vector = vec![];
        vector.push(markers::OBJECT_MARKER);
        vector.write_u16::<BigEndian>(4).unwrap();
        vector.extend("test".as_bytes());
        vector.push(markers::NUMBER_MARKER);
        vector.write_f64::<BigEndian>(NUMBER).unwrap();
        vector
            .write_u16::<BigEndian>(markers::UTF_8_EMPTY_MARKER)
            .unwrap();
        vector.push(markers::OBJECT_END_MARKER);

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let mut properties = Amf0Object::new();
        properties.insert("test".to_string(), Amf0Value::Number(NUMBER));

        let expected = vec![Amf0Value::Object(properties)];
        assert_eq!(result, expected);
    }

    #[test]
    fn object_properties_keep_wire_order() {
        let mut vector = vec![];
        vector.push(markers::OBJECT_MARKER);
        for name in &["zeta", "alpha", "mid"] {
            vector.write_u16::<BigEndian>(name.len() as u16).unwrap();
            vector.extend(name.as_bytes());
            vector.push(markers::NULL_MARKER);
        }
        vector
            .write_u16::<BigEndian>(markers::UTF_8_EMPTY_MARKER)
            .unwrap();
        vector.push(markers::OBJECT_END_MARKER);

        let mut input = Cursor::new(vector);
        let result = deserialize_value(&mut input, ObjectEncoding::Amf0).unwrap();
        let properties = result.get_object_properties().unwrap();
        let keys: Vec<&str> = properties.keys().map(|x| x.as_str()).collect();

        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn can_deserialize_ecma_array() {
        let mut vector = vec![];
        vector.push(markers::ECMA_ARRAY_MARKER);
        vector.write_u32::<BigEndian>(2).unwrap();
        vector.write_u16::<BigEndian>(5).unwrap();
        vector.extend("test1".as_bytes());
        vector.push(markers::NUMBER_MARKER);
        vector.write_f64::<BigEndian>(1.0).unwrap();
        vector.write_u16::<BigEndian>(5).unwrap();
        vector.extend("test2".as_bytes());
        vector.write_u8(markers::STRING_MARKER).unwrap();
        vector.write_u16::<BigEndian>(6).unwrap();
        vector.extend("second".as_bytes());
        vector
            .write_u16::<BigEndian>(markers::UTF_8_EMPTY_MARKER)
            .unwrap();
        vector.push(markers::OBJECT_END_MARKER);

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        let mut properties = Amf0Object::new();
        properties.insert("test1".to_string(), Amf0Value::Number(1.0));
        properties.insert(
            "test2".to_string(),
            Amf0Value::Utf8String("second".to_string()),
        );

        let expected = vec![Amf0Value::Object(properties)];
        assert_eq!(result, expected);
    }

    #[test]
    fn deserialize_value_only_consumes_one_value() {
        let mut vector = vec![];
        vector.push(markers::NUMBER_MARKER);
        vector.write_f64::<BigEndian>(5.0).unwrap();
        vector.push(markers::NULL_MARKER);

        let mut input = Cursor::new(vector);
        let first = deserialize_value(&mut input, ObjectEncoding::Amf0).unwrap();

        assert_eq!(first, Amf0Value::Number(5.0));
        assert_eq!(input.position(), 9);
    }

    #[test]
    fn amf3_encoding_reads_with_amf0_markers() {
        let mut vector = vec![];
        vector.write_u8(markers::STRING_MARKER).unwrap();
        vector.write_u16::<BigEndian>(7).unwrap();
        vector.extend("connect".as_bytes());

        let mut input = Cursor::new(vector);
        let result = deserialize(&mut input, ObjectEncoding::Amf3).unwrap();

        assert_eq!(result, vec![Amf0Value::Utf8String("connect".to_string())]);
    }

    #[test]
    fn empty_input_is_an_empty_sequence() {
        let mut input = Cursor::new(Vec::<u8>::new());
        let result = deserialize(&mut input, ObjectEncoding::Amf0).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn error_when_deserializing_single_value_from_empty_input() {
        let mut input = Cursor::new(Vec::<u8>::new());
        match deserialize_value(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::UnexpectedEof) => (),
            x => panic!("Expected UnexpectedEof, instead received {:?}", x),
        }
    }

    #[test]
    fn error_when_value_is_truncated() {
        let mut vector = vec![];
        vector.push(markers::NUMBER_MARKER);
        vector.write_f64::<BigEndian>(5.0).unwrap();
        vector.push(markers::NUMBER_MARKER);
        vector.extend(&[0x40, 0x14]);

        let mut input = Cursor::new(vector);
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::UnexpectedEof) => (),
            x => panic!("Expected UnexpectedEof, instead received {:?}", x),
        }
    }

    #[test]
    fn error_when_string_length_exceeds_input() {
        let mut vector = vec![];
        vector.write_u8(markers::STRING_MARKER).unwrap();
        vector.write_u16::<BigEndian>(10).unwrap();
        vector.extend("abc".as_bytes());

        let mut input = Cursor::new(vector);
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::UnexpectedEof) => (),
            x => panic!("Expected UnexpectedEof, instead received {:?}", x),
        }
    }

    #[test]
    fn error_when_unknown_marker_encountered() {
        let mut input = Cursor::new(vec![0x20_u8]);
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::UnknownMarker { marker: 0x20 }) => (),
            x => panic!("Expected UnknownMarker, instead received {:?}", x),
        }
    }

    #[test]
    fn error_when_empty_property_name_not_followed_by_object_end() {
        let mut vector = vec![];
        vector.push(markers::OBJECT_MARKER);
        vector
            .write_u16::<BigEndian>(markers::UTF_8_EMPTY_MARKER)
            .unwrap();
        vector.push(markers::NULL_MARKER);

        let mut input = Cursor::new(vector);
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::UnexpectedEmptyObjectPropertyName) => (),
            x => panic!(
                "Expected UnexpectedEmptyObjectPropertyName, instead received {:?}",
                x
            ),
        }
    }

    #[test]
    fn error_when_strict_array_is_missing_elements() {
        let mut vector = vec![];
        vector.push(markers::STRICT_ARRAY_MARKER);
        vector.write_u32::<BigEndian>(3).unwrap();
        vector.push(markers::NULL_MARKER);

        let mut input = Cursor::new(vector);
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::UnexpectedEof) => (),
            x => panic!("Expected UnexpectedEof, instead received {:?}", x),
        }
    }

    fn nested_strict_arrays(levels: usize) -> Vec<u8> {
        let mut vector = vec![];
        for _ in 0..levels {
            vector.push(markers::STRICT_ARRAY_MARKER);
            vector.write_u32::<BigEndian>(1).unwrap();
        }

        vector.push(markers::NULL_MARKER);
        vector
    }

    #[test]
    fn can_deserialize_values_nested_up_to_the_limit() {
        // The innermost null sits inside MAX_NESTING_DEPTH arrays
        let mut input = Cursor::new(nested_strict_arrays(MAX_NESTING_DEPTH));
        let mut result = deserialize_value(&mut input, ObjectEncoding::Amf0).unwrap();

        let mut levels = 0;
        while let Amf0Value::StrictArray(mut values) = result {
            assert_eq!(values.len(), 1);
            result = values.remove(0);
            levels += 1;
        }

        assert_eq!(levels, MAX_NESTING_DEPTH);
        assert_eq!(result, Amf0Value::Null);
    }

    #[test]
    fn error_when_arrays_are_nested_too_deeply() {
        let mut input = Cursor::new(nested_strict_arrays(MAX_NESTING_DEPTH + 1));
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::NestingTooDeep { max_depth }) if max_depth == MAX_NESTING_DEPTH => (),
            x => panic!("Expected NestingTooDeep, instead received {:?}", x),
        }
    }

    #[test]
    fn hugely_nested_arrays_fail_without_exhausting_the_stack() {
        let mut input = Cursor::new(nested_strict_arrays(200_000));
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::NestingTooDeep { .. }) => (),
            x => panic!("Expected NestingTooDeep, instead received {:?}", x),
        }
    }

    #[test]
    fn error_when_objects_are_nested_too_deeply() {
        let mut vector = vec![];
        for _ in 0..=MAX_NESTING_DEPTH {
            vector.push(markers::OBJECT_MARKER);
            vector.write_u16::<BigEndian>(1).unwrap();
            vector.push(b'a');
        }

        vector.push(markers::NULL_MARKER);

        let mut input = Cursor::new(vector);
        match deserialize(&mut input, ObjectEncoding::Amf0) {
            Err(Amf0DeserializationError::NestingTooDeep { .. }) => (),
            x => panic!("Expected NestingTooDeep, instead received {:?}", x),
        }
    }
}
