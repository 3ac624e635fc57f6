//! The closed set of property kinds.

use super::{Property, PropertyMeta};
use propdb_codec::{
    BinaryDecoder, BinaryEncoder, CodecResult, Decode, Encode, OrderedMap, TextCodec, ToValue,
    Value,
};
use std::fmt;

/// A Rust type that can back a property.
///
/// Implemented exactly for the types listed in [`PropertyKind`]; it maps
/// a typed [`Property<T>`] in and out of the [`AnyProperty`] enum stored in
/// a record's registry.
pub trait FieldValue:
    Encode + Decode + TextCodec + ToValue + Clone + PartialEq + fmt::Debug + Sized + 'static
{
    /// The kind tag for this type.
    const KIND: PropertyKind;

    /// Wraps a typed property.
    fn wrap(property: Property<Self>) -> AnyProperty;

    /// Borrows the typed property if `any` holds this kind.
    fn unwrap_ref(any: &AnyProperty) -> Option<&Property<Self>>;

    /// Mutably borrows the typed property if `any` holds this kind.
    fn unwrap_mut(any: &mut AnyProperty) -> Option<&mut Property<Self>>;
}

macro_rules! property_kinds {
    ($($variant:ident => $ty:ty, $label:literal;)+) => {
        /// Every kind of value a property can hold.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PropertyKind {
            $(
                #[doc = concat!("`", $label, "`")]
                $variant,
            )+
        }

        impl PropertyKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [PropertyKind] = &[$(Self::$variant,)+];

            /// Stable label of the kind.
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        /// A property of any supported kind.
        ///
        /// This is what a record's registry stores; typed access goes
        /// through [`FieldValue`].
        #[derive(Debug, Clone)]
        pub enum AnyProperty {
            $(
                #[doc = concat!("`", $label, "` property")]
                $variant(Property<$ty>),
            )+
        }

        $(
            impl FieldValue for $ty {
                const KIND: PropertyKind = PropertyKind::$variant;

                fn wrap(property: Property<Self>) -> AnyProperty {
                    AnyProperty::$variant(property)
                }

                fn unwrap_ref(any: &AnyProperty) -> Option<&Property<Self>> {
                    match any {
                        AnyProperty::$variant(p) => Some(p),
                        _ => None,
                    }
                }

                fn unwrap_mut(any: &mut AnyProperty) -> Option<&mut Property<Self>> {
                    match any {
                        AnyProperty::$variant(p) => Some(p),
                        _ => None,
                    }
                }
            }
        )+

        impl AnyProperty {
            /// The kind of the wrapped property.
            pub fn kind(&self) -> PropertyKind {
                match self {
                    $(Self::$variant(_) => PropertyKind::$variant,)+
                }
            }

            /// The field key.
            pub fn name(&self) -> &str {
                match self {
                    $(Self::$variant(p) => p.name(),)+
                }
            }

            /// The metadata flags.
            pub fn meta(&self) -> PropertyMeta {
                match self {
                    $(Self::$variant(p) => p.meta(),)+
                }
            }

            /// Whether the property was set.
            pub fn is_set(&self) -> bool {
                match self {
                    $(Self::$variant(p) => p.is_set(),)+
                }
            }

            /// Sets the property to null.
            pub fn set_null(&mut self) {
                match self {
                    $(Self::$variant(p) => p.set_null(),)+
                }
            }

            /// Returns the property to its unset state.
            pub fn reset(&mut self) {
                match self {
                    $(Self::$variant(p) => p.reset(),)+
                }
            }

            /// The current value as a dynamic [`Value`].
            pub fn value(&self) -> Value {
                match self {
                    $(Self::$variant(p) => p.get().map_or(Value::Null, ToValue::to_value),)+
                }
            }

            /// Writes the property's binary form.
            pub fn encode_binary(&self, encoder: &mut BinaryEncoder) {
                match self {
                    $(Self::$variant(p) => p.encode_binary(encoder),)+
                }
            }

            /// Reads the property's binary form.
            ///
            /// # Errors
            ///
            /// Returns an error on malformed input.
            pub fn decode_binary(&mut self, decoder: &mut BinaryDecoder<'_>) -> CodecResult<()> {
                match self {
                    $(Self::$variant(p) => p.decode_binary(decoder),)+
                }
            }

            /// Text form of the current value; `None` when null.
            pub fn to_text(&self) -> Option<String> {
                match self {
                    $(Self::$variant(p) => p.to_text(),)+
                }
            }

            /// Parses text into the property.
            ///
            /// # Errors
            ///
            /// Returns a parse error and leaves the property unchanged on
            /// malformed text.
            pub fn from_text(&mut self, text: &str) -> CodecResult<()> {
                match self {
                    $(Self::$variant(p) => p.from_text(text),)+
                }
            }

            /// Whether both hold the same kind and the same current value.
            pub fn value_eq(&self, other: &AnyProperty) -> bool {
                match (self, other) {
                    $((Self::$variant(a), Self::$variant(b)) => a.value_eq(b),)+
                    _ => false,
                }
            }
        }
    };
}

property_kinds! {
    String => String, "string";
    Int => i32, "int";
    Bool => bool, "bool";
    Long => i64, "long";
    ListInt => Vec<i32>, "list<int>";
    ListLong => Vec<i64>, "list<long>";
    ListString => Vec<String>, "list<string>";
    MapStringString => OrderedMap<String, String>, "map<string,string>";
    MapStringInt => OrderedMap<String, i32>, "map<string,int>";
    MapStringLong => OrderedMap<String, i64>, "map<string,long>";
    MapIntInt => OrderedMap<i32, i32>, "map<int,int>";
    MapIntString => OrderedMap<i32, String>, "map<int,string>";
    MapStringMapStringInt => OrderedMap<String, OrderedMap<String, i32>>, "map<string,map<string,int>>";
    MapStringMapStringString => OrderedMap<String, OrderedMap<String, String>>, "map<string,map<string,string>>";
}

impl PropertyKind {
    /// Looks a kind up by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.label() == label)
    }

    /// Whether this is a list or map kind.
    pub const fn is_collection(self) -> bool {
        !matches!(self, Self::String | Self::Int | Self::Bool | Self::Long)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_and_unwrap() {
        let any = i64::wrap(Property::new("c", Some(5), PropertyMeta::default()));
        assert_eq!(any.kind(), PropertyKind::Long);
        assert_eq!(any.name(), "c");
        assert_eq!(i64::unwrap_ref(&any).and_then(Property::get), Some(&5));
        assert!(i32::unwrap_ref(&any).is_none());
    }

    #[test]
    fn dynamic_value() {
        let mut property = Property::new("sc", None, PropertyMeta::default());
        property.set(OrderedMap::from([("a".to_string(), 1i32)]));
        let any = OrderedMap::<String, i32>::wrap(property);

        assert_eq!(any.value().get("a"), Some(&Value::Int(1)));
        assert_eq!(any.kind().label(), "map<string,int>");
        assert!(any.kind().is_collection());
    }

    #[test]
    fn unset_without_initial_is_null_value() {
        let any = String::wrap(Property::new("n", None, PropertyMeta::default()));
        assert_eq!(any.value(), Value::Null);
        assert!(!any.is_set());
    }

    #[test]
    fn set_null_marks_set() {
        let mut any = i32::wrap(Property::new("lv", Some(1), PropertyMeta::default()));
        any.set_null();
        assert!(any.is_set());
        assert_eq!(any.value(), Value::Null);
        any.reset();
        assert_eq!(any.value(), Value::Int(1));
    }

    #[test]
    fn value_eq_requires_same_kind() {
        let mut a = Property::new("x", None, PropertyMeta::default());
        a.set(1i32);
        let mut b = Property::new("x", None, PropertyMeta::default());
        b.set(1i64);
        assert!(!i32::wrap(a.clone()).value_eq(&i64::wrap(b)));
        assert!(i32::wrap(a.clone()).value_eq(&i32::wrap(a)));
    }

    #[test]
    fn text_dispatch() {
        let mut any = Vec::<String>::wrap(Property::new("fr", None, PropertyMeta::default()));
        any.from_text(r#"["ann","bo"]"#).unwrap();
        assert_eq!(any.to_text().as_deref(), Some(r#"["ann","bo"]"#));
        assert!(any.from_text("ann,bo").is_err());
        assert!(!PropertyKind::Int.is_collection());
    }

    #[test]
    fn labels_are_unique() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_label(kind.label()), Some(*kind));
        }
        assert_eq!(PropertyKind::ALL.len(), 14);
        assert_eq!(PropertyKind::from_label("map<long,long>"), None);
    }
}
