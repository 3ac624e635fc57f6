//! Wire format test vectors for propdb.
//!
//! These vectors pin the per-property binary layout and the shard bucket
//! function so that any other reader or writer of the same records can be
//! checked against them.

use crate::golden::{hex_decode, hex_encode};
use propdb_core::{
    shard, CoreError, CoreResult, EntityId, PersistentObject, PropertyKind, PropertyMeta, SchemaBuilder,
};
use serde::{Deserialize, Serialize};

/// Field key used by single-property vector records.
const FIELD: &str = "v";

/// What a property vector sets before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum VectorInput {
    /// Leave the property unset.
    Unset,
    /// Set the property to null.
    Null,
    /// Parse the text form into the property.
    Text(String),
}

/// A single-property encoding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Kind label, as in [`PropertyKind::label`].
    pub kind: String,
    /// The value to encode.
    pub input: VectorInput,
    /// Expected encoding (hex).
    pub expected_hex: String,
}

/// Input bytes that must fail to decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Kind label of the single property being decoded.
    pub kind: String,
    /// Input data (hex).
    pub input_hex: String,
    /// Substring of the expected error message.
    pub expected_error: String,
}

/// Identity to shard bucket vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardVector {
    /// The identity text.
    pub id: String,
    /// Expected content hash.
    pub hash: i32,
    /// Expected bucket.
    pub bucket: i32,
}

fn property(id: &str, kind: PropertyKind, input: VectorInput, expected_hex: &str) -> PropertyVector {
    PropertyVector {
        id: id.into(),
        kind: kind.label().into(),
        input,
        expected_hex: expected_hex.into(),
    }
}

fn text(s: &str) -> VectorInput {
    VectorInput::Text(s.into())
}

/// Per-property encoding vectors.
pub fn property_vectors() -> Vec<PropertyVector> {
    use PropertyKind as K;
    vec![
        property("int_unset", K::Int, VectorInput::Unset, "00"),
        property("int_null", K::Int, VectorInput::Null, "01"),
        property("int_zero", K::Int, text("0"), "02 00"),
        property("int_minus_one", K::Int, text("-1"), "02 01"),
        property("int_64", K::Int, text("64"), "02 8001"),
        property("int_min", K::Int, text("-2147483648"), "02 ffffffff0f"),
        property("long_stamp", K::Long, text("261018140509123"), "02 868fdcd8a0d976"),
        property("bool_true", K::Bool, text("true"), "02 01"),
        property("bool_false", K::Bool, text("false"), "02 00"),
        property("string_empty", K::String, text(""), "02 00"),
        property("string_abc", K::String, text("abc"), "02 06 616263"),
        property("string_utf8", K::String, text("héllo"), "02 0c 68c3a96c6c6f"),
        property("list_int_empty", K::ListInt, text("[]"), "02 00"),
        property("list_int_null", K::ListInt, VectorInput::Null, "01"),
        property("list_int", K::ListInt, text("[1,2]"), "02 04 02 04 00"),
        property("list_long", K::ListLong, text("[-1,300]"), "02 04 01 d804 00"),
        property("list_string", K::ListString, text(r#"["ann","bo"]"#), "02 04 06616e6e 04626f 00"),
        property("map_string_string", K::MapStringString, text(r#"{"k":"v"}"#), "02 02 026b 0276 00"),
        property("map_string_int", K::MapStringInt, text(r#"{"a":1,"b":2}"#), "02 04 0261 02 0262 04 00"),
        property("map_string_int_empty", K::MapStringInt, text("{}"), "02 00"),
        property("map_string_long", K::MapStringLong, text(r#"{"d":-5}"#), "02 02 0264 09 00"),
        property("map_int_int", K::MapIntInt, text(r#"{"1":10,"2":20}"#), "02 04 02 14 04 28 00"),
        property("map_int_string", K::MapIntString, text(r#"{"1":"a"}"#), "02 02 02 0261 00"),
        property(
            "map_string_map_string_int",
            K::MapStringMapStringInt,
            text(r#"{"x":{"a":1}}"#),
            "02 02 0278 02 0261 02 00 00",
        ),
        property(
            "map_string_map_string_string",
            K::MapStringMapStringString,
            text(r#"{"g":{"k":"v"}}"#),
            "02 02 0267 02 026b 0276 00 00",
        ),
    ]
}

/// Malformed single-property inputs.
pub fn reject_vectors() -> Vec<RejectVector> {
    let reject = |id: &str, kind: PropertyKind, input_hex: &str, expected_error: &str| RejectVector {
        id: id.into(),
        kind: kind.label().into(),
        input_hex: input_hex.into(),
        expected_error: expected_error.into(),
    };
    vec![
        reject("empty_input", PropertyKind::Int, "", "unexpected end of input"),
        reject("bad_presence", PropertyKind::Int, "03", "invalid presence tag 0x03"),
        reject("bad_bool", PropertyKind::Bool, "02 02", "invalid boolean byte 0x02"),
        reject("int_overflow", PropertyKind::Int, "02 8080808010", "out of range for int"),
        reject("negative_count", PropertyKind::ListInt, "02 01 02 00", "negative length"),
        reject("truncated_list", PropertyKind::ListInt, "02 04 02", "unexpected end of input"),
        reject("duplicate_key", PropertyKind::MapStringInt, "02 04 0261 02 0261 04 00", "duplicate map key"),
        reject("bad_utf8", PropertyKind::String, "02 02 ff", "invalid UTF-8"),
        reject("trailing_byte", PropertyKind::Int, "02 00 00", "trailing"),
    ]
}

/// Identity to bucket vectors.
pub fn shard_vectors() -> Vec<ShardVector> {
    let shard = |id: &str, hash: i32, bucket: i32| ShardVector {
        id: id.into(),
        hash,
        bucket,
    };
    vec![
        shard("", 0, 0),
        shard("a", 97, 97),
        shard("abc", 96354, 54),
        shard("polygenelubricants", i32::MIN, 48),
    ]
}

/// A record holding one unset property of `kind` named `v`.
pub fn single_property_object(kind: PropertyKind) -> CoreResult<PersistentObject> {
    let mut schema = SchemaBuilder::new();
    schema.prop_of_kind(FIELD, kind, PropertyMeta::default())?;
    Ok(schema.build(EntityId::new("vector")))
}

/// Applies a vector's input and returns the encoding.
pub fn encode_vector(vector: &PropertyVector) -> CoreResult<Vec<u8>> {
    let kind = vector_kind(&vector.kind);
    let mut object = single_property_object(kind)?;
    match &vector.input {
        VectorInput::Unset => {}
        VectorInput::Null => object
            .property_by_name_mut(FIELD)
            .ok_or_else(|| CoreError::unknown_property(FIELD))?
            .set_null(),
        VectorInput::Text(text) => object.set_text(FIELD, text)?,
    }
    Ok(object.encode())
}

/// Decodes a reject vector's input, returning the error message if it failed.
pub fn decode_error(vector: &RejectVector) -> Option<String> {
    let mut object = single_property_object(vector_kind(&vector.kind)).ok()?;
    object.decode(&hex_decode(&vector.input_hex)).err().map(|e| e.to_string())
}

fn vector_kind(label: &str) -> PropertyKind {
    PropertyKind::from_label(label).unwrap_or_else(|| panic!("unknown kind label {label:?}"))
}

/// Generate all test vectors as JSON.
pub fn all_vectors_json() -> String {
    let vectors = AllTestVectors {
        property: property_vectors(),
        reject: reject_vectors(),
        shard: shard_vectors(),
    };

    serde_json::to_string_pretty(&vectors).expect("Failed to serialize vectors")
}

#[derive(Debug, Serialize, Deserialize)]
struct AllTestVectors {
    property: Vec<PropertyVector>,
    reject: Vec<RejectVector>,
    shard: Vec<ShardVector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_vectors() {
        for vector in property_vectors() {
            let encoded = encode_vector(&vector).unwrap();
            assert_eq!(
                hex_encode(&encoded),
                hex_encode(&hex_decode(&vector.expected_hex)),
                "Vector {} failed",
                vector.id
            );
        }
    }

    #[test]
    fn test_property_vectors_decode_back() {
        for vector in property_vectors() {
            let mut object = single_property_object(vector_kind(&vector.kind)).unwrap();
            object.decode(&hex_decode(&vector.expected_hex)).unwrap();
            let property = object.property_by_name(FIELD).unwrap();
            match &vector.input {
                VectorInput::Unset => assert!(!property.is_set(), "{}", vector.id),
                VectorInput::Null => assert_eq!(property.to_text(), None, "{}", vector.id),
                VectorInput::Text(text) => {
                    assert_eq!(property.to_text().as_deref(), Some(text.as_str()), "{}", vector.id)
                }
            }
        }
    }

    #[test]
    fn test_reject_vectors() {
        for vector in reject_vectors() {
            let message = decode_error(&vector).unwrap_or_else(|| panic!("Vector {} decoded", vector.id));
            assert!(
                message.contains(&vector.expected_error),
                "Vector {}: {message}",
                vector.id
            );
        }
    }

    #[test]
    fn test_shard_vectors() {
        for vector in shard_vectors() {
            assert_eq!(shard::content_hash(&vector.id), vector.hash, "{}", vector.id);
            assert_eq!(shard::group_for(&EntityId::new(vector.id.as_str())), vector.bucket);
        }
    }

    #[test]
    fn test_all_vectors_json() {
        let json = all_vectors_json();
        let parsed: AllTestVectors = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.property.len(), property_vectors().len());
        assert!(json.contains(r#""state": "text""#));
    }
}
