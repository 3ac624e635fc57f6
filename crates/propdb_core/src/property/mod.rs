//! Typed, named, metadata-carrying record fields.

mod kind;

pub use kind::{AnyProperty, FieldValue, PropertyKind};

use propdb_codec::{BinaryDecoder, BinaryEncoder, CodecResult, Decode, Encode, Presence, TextCodec};

/// Per-property flags consumed by client transfer, audit logging and
/// secondary indexing.
///
/// The flags are fixed when the property is declared. This crate only
/// carries them; filtering happens in the consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyMeta {
    /// Included in client-facing payloads.
    pub sent_to_client: bool,
    /// Included in change logs.
    pub auditable: bool,
    /// Maintained in secondary indexes.
    pub indexable: bool,
}

impl PropertyMeta {
    /// Creates metadata from the three flags.
    #[must_use]
    pub const fn new(sent_to_client: bool, auditable: bool, indexable: bool) -> Self {
        Self {
            sent_to_client,
            auditable,
            indexable,
        }
    }

    /// Marks the property as sent to clients.
    #[must_use]
    pub const fn sent_to_client(mut self) -> Self {
        self.sent_to_client = true;
        self
    }

    /// Marks the property as auditable.
    #[must_use]
    pub const fn auditable(mut self) -> Self {
        self.auditable = true;
        self
    }

    /// Marks the property as indexable.
    #[must_use]
    pub const fn indexable(mut self) -> Self {
        self.indexable = true;
        self
    }
}

/// What a property currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyState<T> {
    /// Never set (or reset); reads fall back to the initial value.
    Unset,
    /// Explicitly set to null.
    Null,
    /// Set to a value.
    Value(T),
}

/// A single named, typed field of a record.
///
/// The name is a short key that stays stable across schema versions. A
/// property starts unset and reads as its initial value until `set` is
/// called; setting a zero or empty value is distinguishable from never
/// having set one through [`Property::is_set`].
#[derive(Debug, Clone)]
pub struct Property<T> {
    name: String,
    state: PropertyState<T>,
    initial: Option<T>,
    meta: PropertyMeta,
}

impl<T> Property<T> {
    /// Creates an unset property.
    pub fn new(name: impl Into<String>, initial: Option<T>, meta: PropertyMeta) -> Self {
        Self {
            name: name.into(),
            state: PropertyState::Unset,
            initial,
            meta,
        }
    }

    /// The field key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The metadata flags.
    pub fn meta(&self) -> PropertyMeta {
        self.meta
    }

    /// Whether the field is included in client payloads.
    pub fn sent_to_client(&self) -> bool {
        self.meta.sent_to_client
    }

    /// Whether changes to the field are audited.
    pub fn auditable(&self) -> bool {
        self.meta.auditable
    }

    /// Whether the field is maintained in secondary indexes.
    pub fn is_indexable(&self) -> bool {
        self.meta.indexable
    }

    /// The value reported while the property is unset.
    pub fn initial_value(&self) -> Option<&T> {
        self.initial.as_ref()
    }

    /// The raw state, including whether the property was ever set.
    pub fn state(&self) -> &PropertyState<T> {
        &self.state
    }

    /// The current value, or the initial value if never set.
    ///
    /// `None` means null.
    pub fn get(&self) -> Option<&T> {
        match &self.state {
            PropertyState::Unset => self.initial.as_ref(),
            PropertyState::Null => None,
            PropertyState::Value(v) => Some(v),
        }
    }

    /// Replaces the current value.
    pub fn set(&mut self, value: T) {
        self.state = PropertyState::Value(value);
    }

    /// Sets the property to null.
    pub fn set_null(&mut self) {
        self.state = PropertyState::Null;
    }

    /// Sets a value or, for `None`, null.
    pub fn set_option(&mut self, value: Option<T>) {
        match value {
            Some(v) => self.set(v),
            None => self.set_null(),
        }
    }

    /// Returns the property to its unset state.
    pub fn reset(&mut self) {
        self.state = PropertyState::Unset;
    }

    /// Whether `set` was called since construction or the last reset.
    pub fn is_set(&self) -> bool {
        !matches!(self.state, PropertyState::Unset)
    }

    /// Whether the current value is null.
    pub fn is_null(&self) -> bool {
        self.get().is_none()
    }

    /// Collections are never indexed and start unset without an initial value.
    pub(crate) fn into_collection_shape(self) -> Self {
        Self {
            state: PropertyState::Unset,
            initial: None,
            meta: PropertyMeta {
                indexable: false,
                ..self.meta
            },
            name: self.name,
        }
    }
}

impl<T: Clone + Default> Property<T> {
    /// Mutable access to the value, materializing it first if needed.
    ///
    /// An unset property starts from a copy of its initial value, a null
    /// one from `T::default()`. Either way the property becomes set.
    pub fn value_mut(&mut self) -> &mut T {
        let seed = match std::mem::replace(&mut self.state, PropertyState::Unset) {
            PropertyState::Value(v) => v,
            PropertyState::Unset => self.initial.clone().unwrap_or_default(),
            PropertyState::Null => T::default(),
        };
        self.state = PropertyState::Value(seed);
        match &mut self.state {
            PropertyState::Value(v) => v,
            _ => unreachable!("state was just set to a value"),
        }
    }
}

impl<T: PartialEq> Property<T> {
    /// Compares current values, ignoring names and metadata.
    pub fn value_eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Encode> Property<T> {
    /// Writes the presence tag and, if present, the value.
    pub fn encode_binary(&self, encoder: &mut BinaryEncoder) {
        match &self.state {
            PropertyState::Unset => encoder.write_presence(Presence::Unset),
            PropertyState::Null => encoder.write_presence(Presence::Null),
            PropertyState::Value(v) => {
                encoder.write_presence(Presence::Value);
                v.encode(encoder);
            }
        }
    }
}

impl<T: Decode> Property<T> {
    /// Reads one encoded property, replacing the current state.
    ///
    /// # Errors
    ///
    /// On malformed input the property keeps its previous state.
    pub fn decode_binary(&mut self, decoder: &mut BinaryDecoder<'_>) -> CodecResult<()> {
        let state = match decoder.read_presence()? {
            Presence::Unset => PropertyState::Unset,
            Presence::Null => PropertyState::Null,
            Presence::Value => PropertyState::Value(T::decode(decoder)?),
        };
        self.state = state;
        Ok(())
    }
}

impl<T: TextCodec> Property<T> {
    /// Text form of the current value; `None` when null.
    pub fn to_text(&self) -> Option<String> {
        self.get().map(TextCodec::to_text)
    }

    /// Parses text and sets the property to the result.
    ///
    /// # Errors
    ///
    /// Malformed text leaves the property unchanged.
    pub fn from_text(&mut self, text: &str) -> CodecResult<()> {
        let value = T::from_text(text)?;
        self.set(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propdb_codec::{CodecError, OrderedMap};

    fn roundtrip<T: Encode + Decode + Clone>(property: &Property<T>) -> Property<T> {
        let mut encoder = BinaryEncoder::new();
        property.encode_binary(&mut encoder);
        let bytes = encoder.into_bytes();

        let mut decoded = property.clone();
        decoded.reset();
        let mut decoder = BinaryDecoder::new(&bytes);
        decoded.decode_binary(&mut decoder).unwrap();
        decoder.finish().unwrap();
        decoded
    }

    #[test]
    fn unset_reads_initial_value() {
        let property = Property::new("lv", Some(1i32), PropertyMeta::default());
        assert_eq!(property.get(), Some(&1));
        assert!(!property.is_set());
    }

    #[test]
    fn set_zero_is_distinct_from_unset() {
        let mut property = Property::new("c", None::<i64>, PropertyMeta::default());
        assert!(!property.is_set());
        property.set(0);
        assert!(property.is_set());
        assert_eq!(property.get(), Some(&0));
    }

    #[test]
    fn set_null_overrides_initial() {
        let mut property = Property::new("n", Some("guest".to_string()), PropertyMeta::default());
        property.set_null();
        assert!(property.is_null());
        assert!(property.is_set());
        property.reset();
        assert_eq!(property.get().map(String::as_str), Some("guest"));
    }

    #[test]
    fn binary_roundtrip_keeps_state() {
        let mut property = Property::new("n", Some("x".to_string()), PropertyMeta::default());
        assert_eq!(roundtrip(&property).state(), &PropertyState::Unset);

        property.set_option(None);
        assert_eq!(roundtrip(&property).state(), &PropertyState::Null);

        property.set("hello".to_string());
        assert_eq!(
            roundtrip(&property).state(),
            &PropertyState::Value("hello".to_string())
        );
    }

    #[test]
    fn binary_layout() {
        let mut property = Property::new("b", None::<bool>, PropertyMeta::default());
        property.set(true);
        let mut encoder = BinaryEncoder::new();
        property.encode_binary(&mut encoder);
        assert_eq!(encoder.as_bytes(), &[0x02, 0x01]);
    }

    #[test]
    fn failed_decode_keeps_state() {
        let mut property = Property::new("lv", None::<i32>, PropertyMeta::default());
        property.set(7);
        let mut decoder = BinaryDecoder::new(&[0x02]);
        assert!(matches!(
            property.decode_binary(&mut decoder),
            Err(CodecError::UnexpectedEof)
        ));
        assert_eq!(property.get(), Some(&7));
    }

    #[test]
    fn text_conversion() {
        let mut property = Property::new("lv", None::<i32>, PropertyMeta::default());
        assert_eq!(property.to_text(), None);

        property.from_text("42").unwrap();
        assert_eq!(property.to_text().as_deref(), Some("42"));

        assert!(property.from_text("forty-two").is_err());
        assert_eq!(property.get(), Some(&42));
    }

    #[test]
    fn value_mut_materializes_collections() {
        let mut property = Property::new("sc", None::<OrderedMap<String, i32>>, PropertyMeta::default());
        property.value_mut().insert("a".to_string(), 1);
        assert!(property.is_set());
        assert_eq!(property.get().map(OrderedMap::len), Some(1));

        let mut list = Property::new("fr", Some(vec![1i64]), PropertyMeta::default());
        list.value_mut().push(2);
        assert_eq!(list.get(), Some(&vec![1, 2]));
    }

    #[test]
    fn metadata_flags() {
        let property = Property::new(
            "n",
            None::<String>,
            PropertyMeta::default().sent_to_client().indexable(),
        );
        assert!(property.sent_to_client());
        assert!(!property.auditable());
        assert!(property.is_indexable());
        assert_eq!(property.name(), "n");
    }

    #[test]
    fn value_eq_ignores_metadata() {
        let mut a = Property::new("x", None::<i32>, PropertyMeta::default());
        let mut b = Property::new("x", None::<i32>, PropertyMeta::default().auditable());
        a.set(3);
        b.set(3);
        assert!(a.value_eq(&b));
        b.set(4);
        assert!(!a.value_eq(&b));
    }
}
