//! Binary decoder.

use crate::encoder::Presence;
use crate::error::{CodecError, CodecResult};
use crate::map::OrderedMap;
use crate::Decode;

/// Decode a single value, rejecting trailing bytes.
///
/// # Errors
///
/// Returns an error if the bytes are malformed or not fully consumed.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> CodecResult<T> {
    let mut decoder = BinaryDecoder::new(bytes);
    let value = T::decode(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

/// Maximum allowed element count for arrays and maps.
/// This prevents allocation-based DoS from untrusted input.
pub const MAX_CONTAINER_ELEMENTS: u64 = 16 * 1024 * 1024;

/// Maximum allowed byte/string length.
pub const MAX_BYTES_LENGTH: u64 = 256 * 1024 * 1024;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum total number of items in one array or map.
    pub max_collection_len: u64,
    /// Maximum length of one string or byte string.
    pub max_text_len: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_collection_len: MAX_CONTAINER_ELEMENTS,
            max_text_len: MAX_BYTES_LENGTH,
        }
    }
}

/// A binary decoder over a borrowed buffer.
pub struct BinaryDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    limits: DecodeLimits,
}

impl<'a> BinaryDecoder<'a> {
    /// Create a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_limits(data, DecodeLimits::default())
    }

    /// Create a decoder with explicit limits.
    pub fn with_limits(data: &'a [u8], limits: DecodeLimits) -> Self {
        Self {
            data,
            pos: 0,
            limits,
        }
    }

    /// Check if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Fails if any bytes are left unread.
    pub fn finish(&self) -> CodecResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                remaining: self.data.len() - self.pos,
            })
        }
    }

    /// Read a presence tag.
    pub fn read_presence(&mut self) -> CodecResult<Presence> {
        let tag = self.read_byte()?;
        Presence::from_byte(tag).ok_or(CodecError::InvalidTag { tag })
    }

    /// Read a single-byte boolean.
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::InvalidBool { byte }),
        }
    }

    /// Read a zigzag varint that must fit in 32 bits.
    pub fn read_int(&mut self) -> CodecResult<i32> {
        let value = self.read_long()?;
        i32::try_from(value).map_err(|_| CodecError::IntegerOutOfRange {
            value,
            target: "int",
        })
    }

    /// Read a zigzag varint.
    #[allow(clippy::cast_possible_wrap)]
    pub fn read_long(&mut self) -> CodecResult<i64> {
        let raw = self.read_varint()?;
        Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> CodecResult<String> {
        let bytes = self.read_byte_string()?;
        let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(text.to_string())
    }

    /// Read a block-encoded array.
    pub fn read_array<T: Decode>(&mut self) -> CodecResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(count) = self.read_block_count(items.len())? {
            items.reserve(count);
            for _ in 0..count {
                items.push(T::decode(self)?);
            }
        }
        Ok(items)
    }

    /// Read a block-encoded map, preserving entry order.
    ///
    /// A repeated key is rejected rather than overwriting the earlier entry.
    pub fn read_map<K, V>(&mut self) -> CodecResult<OrderedMap<K, V>>
    where
        K: Decode + std::hash::Hash + Eq + std::fmt::Debug,
        V: Decode,
    {
        let mut map = OrderedMap::new();
        while let Some(count) = self.read_block_count(map.len())? {
            for _ in 0..count {
                let key = K::decode(self)?;
                let value = V::decode(self)?;
                map.push_unchecked(key, value);
            }
        }
        if let Some(key) = map.first_duplicate() {
            return Err(CodecError::duplicate_key(key));
        }
        Ok(map)
    }

    /// Reads the next block header. `None` marks the end of the sequence.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn read_block_count(&mut self, already_read: usize) -> CodecResult<Option<usize>> {
        let count = self.read_long()?;
        if count == 0 {
            return Ok(None);
        }
        if count < 0 {
            return Err(CodecError::NegativeLength { length: count });
        }
        let total = (already_read as u64).saturating_add(count as u64);
        if total > self.limits.max_collection_len {
            return Err(CodecError::size_limit(total, self.limits.max_collection_len));
        }
        // Every item takes at least one byte, so a count larger than the
        // remaining input can never be satisfied.
        if count as u64 > self.remaining().len() as u64 {
            return Err(CodecError::UnexpectedEof);
        }
        Ok(Some(count as usize))
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn read_byte_string(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.read_long()?;
        if len < 0 {
            return Err(CodecError::NegativeLength { length: len });
        }
        if len as u64 > self.limits.max_text_len {
            return Err(CodecError::size_limit(len as u64, self.limits.max_text_len));
        }
        self.take(len as usize)
    }

    fn read_varint(&mut self) -> CodecResult<u64> {
        let mut result: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_byte()?;
            // The tenth byte may only contribute the top bit
            if shift == 63 && byte > 1 {
                return Err(CodecError::VarintOverflow);
            }
            result |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    #[inline]
    fn read_byte(&mut self) -> CodecResult<u8> {
        if self.pos >= self.data.len() {
            return Err(CodecError::UnexpectedEof);
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    fn take(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.data.len() - self.pos {
            return Err(CodecError::UnexpectedEof);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_zigzag() {
        assert_eq!(BinaryDecoder::new(&[0x00]).read_long().unwrap(), 0);
        assert_eq!(BinaryDecoder::new(&[0x01]).read_long().unwrap(), -1);
        assert_eq!(BinaryDecoder::new(&[0x02]).read_long().unwrap(), 1);
        assert_eq!(BinaryDecoder::new(&[0x80, 0x01]).read_long().unwrap(), 64);
        assert_eq!(
            BinaryDecoder::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01])
                .read_long()
                .unwrap(),
            i64::MIN
        );
    }

    #[test]
    fn reject_varint_overflow() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert!(matches!(
            BinaryDecoder::new(&bytes).read_long(),
            Err(CodecError::VarintOverflow)
        ));
    }

    #[test]
    fn reject_int_out_of_range() {
        // 2^31 zigzags to 2^32
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x10];
        assert!(matches!(
            BinaryDecoder::new(&bytes).read_int(),
            Err(CodecError::IntegerOutOfRange { value: 2_147_483_648, .. })
        ));
    }

    #[test]
    fn decode_bool() {
        let mut decoder = BinaryDecoder::new(&[0x00, 0x01, 0x07]);
        assert!(!decoder.read_bool().unwrap());
        assert!(decoder.read_bool().unwrap());
        assert!(matches!(
            decoder.read_bool(),
            Err(CodecError::InvalidBool { byte: 0x07 })
        ));
    }

    #[test]
    fn decode_string() {
        let mut decoder = BinaryDecoder::new(&[0x06, b'f', b'o', b'o', 0x00]);
        assert_eq!(decoder.read_string().unwrap(), "foo");
        assert_eq!(decoder.read_string().unwrap(), "");
        assert!(decoder.is_empty());
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert!(matches!(
            BinaryDecoder::new(&[0x04, 0xff, 0xfe]).read_string(),
            Err(CodecError::InvalidUtf8)
        ));
    }

    #[test]
    fn negative_string_length_rejected() {
        assert!(matches!(
            BinaryDecoder::new(&[0x01]).read_string(),
            Err(CodecError::NegativeLength { length: -1 })
        ));
    }

    #[test]
    fn truncated_string_is_eof() {
        assert!(matches!(
            BinaryDecoder::new(&[0x06, b'f']).read_string(),
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[test]
    fn decode_multi_block_array() {
        // Two blocks of one item each, then the terminator
        let bytes = [0x02, 0x02, 0x02, 0x04, 0x00];
        let items: Vec<i32> = BinaryDecoder::new(&bytes).read_array().unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn reject_negative_block_count() {
        let bytes = [0x03, 0x02, 0x00];
        assert!(matches!(
            BinaryDecoder::new(&bytes).read_array::<i32>(),
            Err(CodecError::NegativeLength { length: -2 })
        ));
    }

    #[test]
    fn reject_oversized_collection() {
        let limits = DecodeLimits {
            max_collection_len: 1,
            max_text_len: 16,
        };
        let bytes = [0x04, 0x02, 0x04, 0x00];
        assert!(matches!(
            BinaryDecoder::with_limits(&bytes, limits).read_array::<i32>(),
            Err(CodecError::SizeLimitExceeded { claimed: 2, max_allowed: 1 })
        ));
    }

    #[test]
    fn reject_oversized_text() {
        let limits = DecodeLimits {
            max_collection_len: 16,
            max_text_len: 2,
        };
        let bytes = [0x06, b'f', b'o', b'o'];
        assert!(matches!(
            BinaryDecoder::with_limits(&bytes, limits).read_string(),
            Err(CodecError::SizeLimitExceeded { claimed: 3, max_allowed: 2 })
        ));
    }

    #[test]
    fn reject_duplicate_map_key() {
        let bytes = [0x04, 0x02, b'a', 0x02, 0x02, b'a', 0x04, 0x00];
        let result = BinaryDecoder::new(&bytes).read_map::<String, i32>();
        assert!(matches!(result, Err(CodecError::DuplicateKey { .. })));
    }

    #[test]
    fn decode_map_keeps_order() {
        let bytes = [0x04, 0x02, b'b', 0x04, 0x02, b'a', 0x02, 0x00];
        let map: OrderedMap<String, i32> = BinaryDecoder::new(&bytes).read_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn large_map_decodes_in_linear_time() {
        let mut map = OrderedMap::new();
        for i in 0..200_000 {
            map.push_unchecked(i, -i);
        }
        let bytes = crate::to_bytes(&map);

        let started = std::time::Instant::now();
        let decoded: OrderedMap<i32, i32> = from_bytes(&bytes).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2), "took {:?}", started.elapsed());
        assert_eq!(decoded.len(), 200_000);
        assert_eq!(decoded.keys().next(), Some(&0));
        assert_eq!(decoded, map);
    }

    #[test]
    fn reject_invalid_presence() {
        assert!(matches!(
            BinaryDecoder::new(&[0x09]).read_presence(),
            Err(CodecError::InvalidTag { tag: 0x09 })
        ));
    }

    #[test]
    fn trailing_bytes_detected() {
        assert!(matches!(
            from_bytes::<i32>(&[0x02, 0x00]),
            Err(CodecError::TrailingBytes { remaining: 1 })
        ));
        assert!(matches!(from_bytes::<i32>(&[]), Err(CodecError::UnexpectedEof)));
    }
}
