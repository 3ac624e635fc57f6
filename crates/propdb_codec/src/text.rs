//! Text conversion for property values.
//!
//! Primitives use their plain text form (`42`, `true`, the string itself).
//! Collections use JSON: arrays for lists, objects for maps with keys in
//! insertion order. Parsing never falls back to a default; malformed input
//! is a [`CodecError::Parse`].

use crate::error::{CodecError, CodecResult};
use crate::map::OrderedMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Lossless conversion to and from text.
pub trait TextCodec: Sized {
    /// Renders the value as text.
    fn to_text(&self) -> String;

    /// Parses a value from text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Parse`] when the text is malformed.
    fn from_text(text: &str) -> CodecResult<Self>;
}

impl TextCodec for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> CodecResult<Self> {
        Ok(text.to_string())
    }
}

impl TextCodec for i32 {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> CodecResult<Self> {
        text.parse().map_err(|e| CodecError::parse("int", text, e))
    }
}

impl TextCodec for i64 {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> CodecResult<Self> {
        text.parse().map_err(|e| CodecError::parse("long", text, e))
    }
}

impl TextCodec for bool {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> CodecResult<Self> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CodecError::parse("bool", text, "expected `true` or `false`")),
        }
    }
}

impl<T: Serialize + DeserializeOwned> TextCodec for Vec<T> {
    fn to_text(&self) -> String {
        to_json(self)
    }

    fn from_text(text: &str) -> CodecResult<Self> {
        serde_json::from_str(text).map_err(|e| CodecError::parse("list", text, e))
    }
}

impl<K, V> TextCodec for OrderedMap<K, V>
where
    K: Serialize + DeserializeOwned + std::hash::Hash + Eq + fmt::Debug,
    V: Serialize + DeserializeOwned,
{
    fn to_text(&self) -> String {
        to_json(self)
    }

    fn from_text(text: &str) -> CodecResult<Self> {
        serde_json::from_str(text).map_err(|e| CodecError::parse("map", text, e))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    // Lists and maps of strings and integers always serialize
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_text_roundtrip() {
        assert_eq!(i32::from_text(&(-17i32).to_text()).unwrap(), -17);
        assert_eq!(i64::from_text(&i64::MAX.to_text()).unwrap(), i64::MAX);
        assert!(bool::from_text(&true.to_text()).unwrap());
        assert_eq!(String::from_text("a,b=c").unwrap(), "a,b=c");
    }

    #[test]
    fn malformed_numbers_rejected() {
        assert!(matches!(i32::from_text("12x"), Err(CodecError::Parse { kind: "int", .. })));
        assert!(matches!(i32::from_text(""), Err(CodecError::Parse { .. })));
        assert!(matches!(i32::from_text("3000000000"), Err(CodecError::Parse { .. })));
        assert!(matches!(i64::from_text("1.5"), Err(CodecError::Parse { kind: "long", .. })));
    }

    #[test]
    fn bool_is_strict() {
        assert!(!bool::from_text("false").unwrap());
        assert!(bool::from_text("TRUE").is_err());
        assert!(bool::from_text("yes").is_err());
    }

    #[test]
    fn list_text() {
        let list = vec!["a,b".to_string(), String::new()];
        let text = list.to_text();
        assert_eq!(text, r#"["a,b",""]"#);
        assert_eq!(Vec::<String>::from_text(&text).unwrap(), list);
        assert_eq!(Vec::<i64>::from_text("[]").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn malformed_list_rejected() {
        assert!(matches!(
            Vec::<i32>::from_text("[1,2"),
            Err(CodecError::Parse { kind: "list", .. })
        ));
        assert!(Vec::<i32>::from_text("[1,\"x\"]").is_err());
    }

    #[test]
    fn integer_keyed_map_text() {
        let map = OrderedMap::from([(10, "ten".to_string()), (2, "two".to_string())]);
        let text = map.to_text();
        assert_eq!(text, r#"{"10":"ten","2":"two"}"#);

        let back = OrderedMap::<i32, String>::from_text(&text).unwrap();
        let keys: Vec<i32> = back.keys().copied().collect();
        assert_eq!(keys, vec![10, 2]);
    }

    #[test]
    fn nested_map_text() {
        let inner = OrderedMap::from([("x".to_string(), 1)]);
        let outer = OrderedMap::from([("k".to_string(), inner)]);
        let text = outer.to_text();
        assert_eq!(text, r#"{"k":{"x":1}}"#);
        assert_eq!(
            OrderedMap::<String, OrderedMap<String, i32>>::from_text(&text).unwrap(),
            outer
        );
    }

    #[test]
    fn malformed_map_rejected() {
        assert!(OrderedMap::<String, i32>::from_text(r#"{"a":1,"a":2}"#).is_err());
        assert!(OrderedMap::<String, i32>::from_text(r#"{"a":1"#).is_err());
        assert!(OrderedMap::<i32, i32>::from_text(r#"{"a":1}"#).is_err());
    }
}
