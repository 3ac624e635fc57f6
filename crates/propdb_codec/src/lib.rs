//! # propdb Codec
//!
//! Binary and text codecs for propdb property values.
//!
//! ## Binary rules
//!
//! - `int` and `long` are zigzag varints
//! - `bool` is a single byte, `0x00` or `0x01`
//! - strings and byte strings are a `long` length followed by the bytes
//! - arrays and maps are block encoded: a count, the items, then `0`
//! - map entries keep insertion order and keys must be unique
//! - every property is preceded by a [`Presence`] byte
//!
//! ## Usage
//!
//! ```
//! use propdb_codec::{from_bytes, to_bytes, OrderedMap};
//!
//! let map = OrderedMap::from([("a".to_string(), 1i32), ("b".to_string(), 2)]);
//! let bytes = to_bytes(&map);
//!
//! let decoded: OrderedMap<String, i32> = from_bytes(&bytes).unwrap();
//! assert_eq!(decoded.keys().collect::<Vec<_>>(), ["a", "b"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod map;
mod text;
mod value;

pub use decoder::{
    from_bytes, BinaryDecoder, DecodeLimits, MAX_BYTES_LENGTH, MAX_CONTAINER_ELEMENTS,
};
pub use encoder::{to_bytes, BinaryEncoder, Presence};
pub use error::{CodecError, CodecResult};
pub use map::OrderedMap;
pub use text::TextCodec;
pub use value::{ToValue, Value};

/// Types with a binary wire form.
pub trait Encode {
    /// Appends this value to the encoder.
    fn encode(&self, encoder: &mut BinaryEncoder);
}

/// Types that can be read back from their binary wire form.
pub trait Decode: Sized {
    /// Reads one value from the decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is truncated or malformed.
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self>;
}

impl Encode for bool {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_bool(*self);
    }
}

impl Decode for bool {
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self> {
        decoder.read_bool()
    }
}

impl Encode for i32 {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_int(*self);
    }
}

impl Decode for i32 {
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self> {
        decoder.read_int()
    }
}

impl Encode for i64 {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_long(*self);
    }
}

impl Decode for i64 {
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self> {
        decoder.read_long()
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_string(self);
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_string(self);
    }
}

impl Decode for String {
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self> {
        decoder.read_string()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_array(self);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self> {
        decoder.read_array()
    }
}

impl<K: Encode, V: Encode> Encode for OrderedMap<K, V> {
    fn encode(&self, encoder: &mut BinaryEncoder) {
        encoder.write_map(self);
    }
}

impl<K, V> Decode for OrderedMap<K, V>
where
    K: Decode + std::hash::Hash + Eq + std::fmt::Debug,
    V: Decode,
{
    fn decode(decoder: &mut BinaryDecoder<'_>) -> CodecResult<Self> {
        decoder.read_map()
    }
}
