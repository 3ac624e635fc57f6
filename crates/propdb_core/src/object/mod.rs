//! Records as ordered registries of properties.

mod builder;

pub use builder::{PropertyHandle, SchemaBuilder};

use crate::config::Config;
use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::property::{AnyProperty, FieldValue, Property, PropertyMeta};
use propdb_codec::{BinaryDecoder, BinaryEncoder, Value};

/// One property as seen by metadata consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    /// The field key.
    pub name: &'a str,
    /// The current value; [`Value::Null`] when null.
    pub value: Value,
    /// The declared flags.
    pub meta: PropertyMeta,
}

/// A record: an identity plus its properties in declaration order.
///
/// Created by [`SchemaBuilder::build`]. The set and order of properties is
/// fixed from then on; only their values change.
///
/// Typed access goes through the [`PropertyHandle`]s returned while
/// declaring the schema. Handles are only meaningful for the object built
/// from the same builder; using a foreign handle is a programming error
/// and panics.
#[derive(Debug, Clone)]
pub struct PersistentObject {
    id: EntityId,
    properties: Vec<AnyProperty>,
}

impl PersistentObject {
    pub(crate) fn from_parts(id: EntityId, properties: Vec<AnyProperty>) -> Self {
        Self { id, properties }
    }

    /// The record identity.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the record declares no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// All properties in declaration order.
    pub fn properties(&self) -> &[AnyProperty] {
        &self.properties
    }

    /// Looks a property up by its field key.
    pub fn property_by_name(&self, name: &str) -> Option<&AnyProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Mutable lookup by field key.
    pub fn property_by_name_mut(&mut self, name: &str) -> Option<&mut AnyProperty> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    /// Text form of a named property; `Ok(None)` when it is null.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProperty`] if no property has that name.
    pub fn text(&self, name: &str) -> CoreResult<Option<String>> {
        self.property_by_name(name)
            .map(AnyProperty::to_text)
            .ok_or_else(|| CoreError::unknown_property(name))
    }

    /// Parses text into a named property.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProperty`] for an unknown name, or a
    /// codec parse error (leaving the property unchanged) for bad text.
    pub fn set_text(&mut self, name: &str, text: &str) -> CoreResult<()> {
        let property = self
            .property_by_name_mut(name)
            .ok_or_else(|| CoreError::unknown_property(name))?;
        property.from_text(text)?;
        Ok(())
    }

    /// The typed property behind a handle.
    pub fn property<T: FieldValue>(&self, handle: PropertyHandle<T>) -> &Property<T> {
        match T::unwrap_ref(&self.properties[handle.index()]) {
            Some(property) => property,
            None => wrong_kind::<T>(handle.index()),
        }
    }

    /// Mutable access to the typed property behind a handle.
    pub fn property_mut<T: FieldValue>(&mut self, handle: PropertyHandle<T>) -> &mut Property<T> {
        match T::unwrap_mut(&mut self.properties[handle.index()]) {
            Some(property) => property,
            None => wrong_kind::<T>(handle.index()),
        }
    }

    /// Current value of a property; `None` means null.
    pub fn get<T: FieldValue>(&self, handle: PropertyHandle<T>) -> Option<&T> {
        self.property(handle).get()
    }

    /// Sets a property value.
    pub fn set<T: FieldValue>(&mut self, handle: PropertyHandle<T>, value: T) {
        self.property_mut(handle).set(value);
    }

    /// Sets a property to null.
    pub fn set_null<T: FieldValue>(&mut self, handle: PropertyHandle<T>) {
        self.property_mut(handle).set_null();
    }

    /// Returns every property to its unset state.
    pub fn reset(&mut self) {
        self.properties.iter_mut().for_each(AnyProperty::reset);
    }

    /// Encodes all properties in declaration order.
    pub fn encode(&self) -> Vec<u8> {
        // every property writes at least its presence byte
        let mut encoder = BinaryEncoder::with_capacity(self.properties.len());
        for property in &self.properties {
            property.encode_binary(&mut encoder);
        }
        tracing::debug!(id = %self.id, bytes = encoder.len(), "encoded record");
        encoder.into_bytes()
    }

    /// Decodes all properties with the default [`Config`].
    ///
    /// # Errors
    ///
    /// See [`PersistentObject::decode_with`].
    pub fn decode(&mut self, bytes: &[u8]) -> CoreResult<()> {
        self.decode_with(bytes, &Config::default())
    }

    /// Decodes all properties in declaration order.
    ///
    /// Either every property is replaced or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] for an unusable `config`, and a
    /// codec error for truncated or malformed input, input that exceeds the
    /// configured limits, or (if the configuration says so) bytes left over
    /// after the last property.
    pub fn decode_with(&mut self, bytes: &[u8], config: &Config) -> CoreResult<()> {
        config.validate()?;
        let mut decoder = BinaryDecoder::with_limits(bytes, config.decode_limits());
        let mut staged = self.properties.clone();
        for property in &mut staged {
            property.decode_binary(&mut decoder)?;
        }
        if config.reject_trailing_bytes {
            decoder.finish()?;
        }
        tracing::debug!(
            id = %self.id,
            bytes = decoder.position(),
            "decoded record"
        );
        self.properties = staged;
        Ok(())
    }

    /// Identity and every current value match.
    ///
    /// Metadata and initial values are not compared.
    pub fn is_fully_equals(&self, other: &Self) -> bool {
        self.id == other.id
            && self.properties.len() == other.properties.len()
            && self
                .properties
                .iter()
                .zip(&other.properties)
                .all(|(a, b)| a.name() == b.name() && a.value_eq(b))
    }

    /// Every property with its value and flags, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.properties.iter().map(|p| FieldView {
            name: p.name(),
            value: p.value(),
            meta: p.meta(),
        })
    }

    /// Properties sent to clients.
    pub fn client_fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.fields().filter(|f| f.meta.sent_to_client)
    }

    /// Properties whose changes are audited.
    pub fn audit_fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.fields().filter(|f| f.meta.auditable)
    }

    /// Properties kept in secondary indexes.
    pub fn indexed_fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.fields().filter(|f| f.meta.indexable)
    }
}

fn wrong_kind<T: FieldValue>(index: usize) -> ! {
    panic!(
        "property handle {index} does not refer to a {} property of this object",
        T::KIND
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use propdb_codec::{CodecError, OrderedMap};

    struct Sample {
        object: PersistentObject,
        name: PropertyHandle<String>,
        level: PropertyHandle<i32>,
        scores: PropertyHandle<OrderedMap<String, i32>>,
    }

    fn sample(id: &str) -> Sample {
        let mut schema = SchemaBuilder::new();
        let name = schema
            .prop_string("n", None, PropertyMeta::default().sent_to_client().indexable())
            .unwrap();
        let level = schema
            .prop_int("lv", Some(1), PropertyMeta::default().auditable())
            .unwrap();
        let scores = schema
            .prop_map_string_int("sc", PropertyMeta::default().sent_to_client())
            .unwrap();
        Sample {
            object: schema.build(EntityId::new(id)),
            name,
            level,
            scores,
        }
    }

    #[test]
    fn typed_access() {
        let mut s = sample("p");
        assert_eq!(s.object.get(s.level), Some(&1));
        assert_eq!(s.object.get(s.name), None);

        s.object.set(s.name, "Ada".to_string());
        s.object.set_null(s.level);
        assert_eq!(s.object.get(s.name).map(String::as_str), Some("Ada"));
        assert_eq!(s.object.get(s.level), None);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut s = sample("p");
        s.object.set(s.name, "Ada".to_string());
        s.object
            .property_mut(s.scores)
            .value_mut()
            .extend([("b".to_string(), 2), ("a".to_string(), 1)]);
        let bytes = s.object.encode();

        let mut fresh = sample("p");
        fresh.object.decode(&bytes).unwrap();
        assert!(fresh.object.is_fully_equals(&s.object));
        let keys: Vec<&String> = fresh.object.get(fresh.scores).unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn failed_decode_leaves_object_unchanged() {
        let mut source = sample("p");
        source.object.set(source.name, "Ada".to_string());
        source.object.set(source.level, 9);
        let mut bytes = source.object.encode();
        bytes.truncate(bytes.len() - 1);

        let mut target = sample("p");
        target.object.set(target.level, 3);
        let err = target.object.decode(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::Codec(CodecError::UnexpectedEof)));
        assert_eq!(target.object.get(target.name), None);
        assert_eq!(target.object.get(target.level), Some(&3));
    }

    #[test]
    fn trailing_bytes() {
        let s = sample("p");
        let mut bytes = s.object.encode();
        bytes.push(0);

        let mut strict = sample("p");
        assert!(matches!(
            strict.object.decode(&bytes),
            Err(CoreError::Codec(CodecError::TrailingBytes { remaining: 1 }))
        ));

        let lenient = Config::new().reject_trailing_bytes(false);
        assert!(strict.object.decode_with(&bytes, &lenient).is_ok());
    }

    #[test]
    fn unusable_config_rejected_before_decoding() {
        let mut source = sample("p");
        source.object.set(source.level, 4);
        let bytes = source.object.encode();

        let mut target = sample("p");
        let err = target
            .object
            .decode_with(&bytes, &Config::new().max_collection_len(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }), "{err}");
        assert_eq!(target.object.get(target.level), Some(&1));
    }

    #[test]
    fn equality_covers_identity_and_values() {
        let a = sample("p");
        let mut b = sample("p");
        assert!(a.object.is_fully_equals(&b.object));

        b.object.set(b.level, 2);
        assert!(!a.object.is_fully_equals(&b.object));

        let c = sample("q");
        assert!(!a.object.is_fully_equals(&c.object));
    }

    #[test]
    fn metadata_views() {
        let mut s = sample("p");
        s.object.set(s.name, "Ada".to_string());

        let client: Vec<&str> = s.object.client_fields().map(|f| f.name).collect();
        assert_eq!(client, ["n", "sc"]);
        let audit: Vec<&str> = s.object.audit_fields().map(|f| f.name).collect();
        assert_eq!(audit, ["lv"]);
        let indexed: Vec<FieldView<'_>> = s.object.indexed_fields().collect();
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0].value, Value::Text("Ada".to_string()));
    }

    #[test]
    fn text_access_by_name() {
        let mut s = sample("p");
        s.object.set_text("sc", r#"{"x":5}"#).unwrap();
        assert_eq!(s.object.text("sc").unwrap().as_deref(), Some(r#"{"x":5}"#));
        assert_eq!(s.object.text("n").unwrap(), None);
        assert!(matches!(
            s.object.set_text("missing", "1"),
            Err(CoreError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn reset_clears_all() {
        let mut s = sample("p");
        s.object.set(s.level, 5);
        s.object.reset();
        assert!(!s.object.property(s.level).is_set());
        assert_eq!(s.object.get(s.level), Some(&1));
    }

    #[test]
    #[should_panic(expected = "does not refer to a")]
    fn foreign_handle_of_wrong_kind_panics() {
        let s = sample("p");
        let mut other = SchemaBuilder::new();
        let wrong = other.prop_long("x", None, PropertyMeta::default()).unwrap();
        let _ = s.object.get(wrong);
    }
}
