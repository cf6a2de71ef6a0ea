//! Key/value dictionaries carried inside app messages
//!
//! Wire layout:
//! ```text
//! COUNT(1B) { KEY(u32 LE) TYPE(1B) LEN(u16 LE) VALUE(LEN bytes) } * COUNT
//! ```
//! Integers are little-endian and 1, 2 or 4 bytes wide. Text is UTF-8; a
//! trailing NUL terminator is accepted and stripped.

use heapless::{String, Vec};

use crate::frame::MAX_PAYLOAD_SIZE;

/// Maximum tuples in one dictionary
pub const MAX_TUPLES: usize = 8;

/// Maximum text or byte value length per tuple
pub const MAX_TEXT_LEN: usize = 64;

/// Per-tuple header: key (4) + type (1) + length (2)
const TUPLE_HEADER_LEN: usize = 7;

// Value type tags
const TYPE_BYTES: u8 = 0x00;
const TYPE_TEXT: u8 = 0x01;
const TYPE_UINT: u8 = 0x02;
const TYPE_INT: u8 = 0x03;

/// Dictionary encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictionaryError {
    /// Input ended in the middle of a tuple
    Truncated,
    /// More tuples than [`MAX_TUPLES`]
    TooManyTuples,
    /// Value longer than [`MAX_TEXT_LEN`]
    ValueTooLarge,
    /// Unknown value type tag
    UnknownType(u8),
    /// Integer width other than 1, 2 or 4 bytes
    InvalidIntWidth(u16),
    /// Text value is not UTF-8
    InvalidUtf8,
    /// Bytes left over after the last tuple
    TrailingBytes,
    /// Encoded dictionary does not fit in a frame
    PayloadTooLarge,
}

/// A single dictionary value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TupleValue {
    Bytes(Vec<u8, MAX_TEXT_LEN>),
    Text(String<MAX_TEXT_LEN>),
    Uint(u32),
    Int(i32),
}

impl TupleValue {
    /// Text value, truncated at a character boundary if too long
    pub fn text(s: &str) -> Self {
        let mut text = String::new();
        for ch in s.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        TupleValue::Text(text)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TupleValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer view of `Int` and `Uint` values
    ///
    /// Unsigned values above `i32::MAX` are reinterpreted, the way a C
    /// receiver reading `int32` off the same bytes would.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TupleValue::Int(v) => Some(*v),
            TupleValue::Uint(v) => Some(*v as i32),
            _ => None,
        }
    }
}

/// One key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuple {
    pub key: u32,
    pub value: TupleValue,
}

/// Ordered key/value dictionary
///
/// Tuples keep the order they were pushed or received in; keys are not
/// deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dictionary {
    tuples: Vec<Tuple, MAX_TUPLES>,
}

impl Dictionary {
    pub const fn new() -> Self {
        Self { tuples: Vec::new() }
    }

    /// Append a tuple
    pub fn push(&mut self, key: u32, value: TupleValue) -> Result<(), DictionaryError> {
        self.tuples
            .push(Tuple { key, value })
            .map_err(|_| DictionaryError::TooManyTuples)
    }

    /// Builder-style [`Dictionary::push`]
    pub fn with(mut self, key: u32, value: TupleValue) -> Result<Self, DictionaryError> {
        self.push(key, value)?;
        Ok(self)
    }

    /// First value stored under `key`
    pub fn get(&self, key: u32) -> Option<&TupleValue> {
        self.tuples.iter().find(|t| t.key == key).map(|t| &t.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Append the wire encoding to `out`
    pub fn encode_into<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<(), DictionaryError> {
        out.push(self.tuples.len() as u8).map_err(full)?;
        for tuple in &self.tuples {
            out.extend_from_slice(&tuple.key.to_le_bytes()).map_err(full)?;
            match &tuple.value {
                TupleValue::Bytes(bytes) => write_value(out, TYPE_BYTES, bytes)?,
                TupleValue::Text(text) => write_value(out, TYPE_TEXT, text.as_bytes())?,
                TupleValue::Uint(v) => write_value(out, TYPE_UINT, &v.to_le_bytes()[..uint_width(*v)])?,
                TupleValue::Int(v) => write_value(out, TYPE_INT, &v.to_le_bytes()[..int_width(*v)])?,
            }
        }
        Ok(())
    }

    /// Encode into a frame-sized buffer
    pub fn encode(&self) -> Result<Vec<u8, MAX_PAYLOAD_SIZE>, DictionaryError> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Decode a complete dictionary; the whole input must be consumed
    pub fn decode(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let (&count, mut rest) = bytes.split_first().ok_or(DictionaryError::Truncated)?;
        if count as usize > MAX_TUPLES {
            return Err(DictionaryError::TooManyTuples);
        }

        let mut dict = Dictionary::new();
        for _ in 0..count {
            if rest.len() < TUPLE_HEADER_LEN {
                return Err(DictionaryError::Truncated);
            }
            let key = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
            let tag = rest[4];
            let len = u16::from_le_bytes([rest[5], rest[6]]);
            rest = &rest[TUPLE_HEADER_LEN..];

            if rest.len() < len as usize {
                return Err(DictionaryError::Truncated);
            }
            let (raw, tail) = rest.split_at(len as usize);
            rest = tail;

            dict.push(key, read_value(tag, raw)?)?;
        }

        if !rest.is_empty() {
            return Err(DictionaryError::TrailingBytes);
        }
        Ok(dict)
    }
}

fn write_value<const N: usize>(out: &mut Vec<u8, N>, tag: u8, raw: &[u8]) -> Result<(), DictionaryError> {
    out.push(tag).map_err(full)?;
    out.extend_from_slice(&(raw.len() as u16).to_le_bytes()).map_err(full)?;
    out.extend_from_slice(raw).map_err(full)
}

fn full<E>(_: E) -> DictionaryError {
    DictionaryError::PayloadTooLarge
}

/// Narrowest width that preserves an unsigned value
fn uint_width(v: u32) -> usize {
    if v <= u8::MAX as u32 {
        1
    } else if v <= u16::MAX as u32 {
        2
    } else {
        4
    }
}

/// Narrowest width that preserves a signed value
fn int_width(v: i32) -> usize {
    if i8::try_from(v).is_ok() {
        1
    } else if i16::try_from(v).is_ok() {
        2
    } else {
        4
    }
}

fn read_value(tag: u8, raw: &[u8]) -> Result<TupleValue, DictionaryError> {
    match tag {
        TYPE_BYTES => Vec::from_slice(raw)
            .map(TupleValue::Bytes)
            .map_err(|_| DictionaryError::ValueTooLarge),
        TYPE_TEXT => {
            let raw = match raw.iter().position(|&b| b == 0) {
                Some(nul) => &raw[..nul],
                None => raw,
            };
            let text = core::str::from_utf8(raw).map_err(|_| DictionaryError::InvalidUtf8)?;
            String::try_from(text)
                .map(TupleValue::Text)
                .map_err(|_| DictionaryError::ValueTooLarge)
        }
        TYPE_UINT => match raw {
            &[a] => Ok(TupleValue::Uint(a as u32)),
            &[a, b] => Ok(TupleValue::Uint(u16::from_le_bytes([a, b]) as u32)),
            &[a, b, c, d] => Ok(TupleValue::Uint(u32::from_le_bytes([a, b, c, d]))),
            _ => Err(DictionaryError::InvalidIntWidth(raw.len() as u16)),
        },
        TYPE_INT => match raw {
            &[a] => Ok(TupleValue::Int(a as i8 as i32)),
            &[a, b] => Ok(TupleValue::Int(i16::from_le_bytes([a, b]) as i32)),
            &[a, b, c, d] => Ok(TupleValue::Int(i32::from_le_bytes([a, b, c, d]))),
            _ => Err(DictionaryError::InvalidIntWidth(raw.len() as u16)),
        },
        other => Err(DictionaryError::UnknownType(other)),
    }
}
