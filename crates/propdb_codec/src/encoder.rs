//! Binary encoder.

use crate::map::OrderedMap;
use crate::Encode;

/// Encode a single value into a fresh buffer.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut encoder = BinaryEncoder::new();
    value.encode(&mut encoder);
    encoder.into_bytes()
}

/// Marks whether a property carries a value on the wire.
///
/// Written as a single byte in front of every property so that
/// "never set", "set to null" and "set to a value" survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Presence {
    /// The property was never set; readers fall back to its initial value.
    Unset = 0x00,
    /// The property was explicitly set to null.
    Null = 0x01,
    /// A value follows.
    Value = 0x02,
}

impl Presence {
    /// Parses a presence byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Unset),
            0x01 => Some(Self::Null),
            0x02 => Some(Self::Value),
            _ => None,
        }
    }
}

/// A binary encoder.
///
/// Integers are zigzag varints, strings and byte strings are
/// length-prefixed, and collections use block encoding: a count, the
/// items, then a zero count closing the sequence.
pub struct BinaryEncoder {
    buffer: Vec<u8>,
}

impl BinaryEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new encoder with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Consume this encoder and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Write a presence tag.
    pub fn write_presence(&mut self, presence: Presence) {
        self.buffer.push(presence as u8);
    }

    /// Write a boolean as a single byte.
    pub fn write_bool(&mut self, b: bool) {
        self.buffer.push(u8::from(b));
    }

    /// Write a 32-bit integer as a zigzag varint.
    pub fn write_int(&mut self, n: i32) {
        self.write_long(i64::from(n));
    }

    /// Write a 64-bit integer as a zigzag varint.
    #[allow(clippy::cast_sign_loss)]
    pub fn write_long(&mut self, n: i64) {
        let zigzag = ((n << 1) ^ (n >> 63)) as u64;
        self.write_varint(zigzag);
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Write a length-prefixed byte string.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_length(bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    /// Write an array as a single block followed by the terminator.
    pub fn write_array<T: Encode>(&mut self, items: &[T]) {
        if !items.is_empty() {
            self.write_length(items.len());
            for item in items {
                item.encode(self);
            }
        }
        self.write_long(0);
    }

    /// Write a map as a single block followed by the terminator.
    ///
    /// Entries are written in the map's insertion order.
    pub fn write_map<K: Encode, V: Encode>(&mut self, map: &OrderedMap<K, V>) {
        if !map.is_empty() {
            self.write_length(map.len());
            for (key, value) in map.iter() {
                key.encode(self);
                value.encode(self);
            }
        }
        self.write_long(0);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn write_length(&mut self, len: usize) {
        // usize never exceeds i64::MAX on supported targets
        self.write_long(len as i64);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}
