//! Schema declaration.

use super::PersistentObject;
use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::property::{AnyProperty, FieldValue, Property, PropertyKind, PropertyMeta};
use propdb_codec::OrderedMap;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// Typed access key for one declared property.
///
/// Returned by the `prop_*` helpers of [`SchemaBuilder`]. A record type
/// keeps its handles and passes them to [`PersistentObject::get`] and
/// friends.
pub struct PropertyHandle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyHandle<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the property in declaration order.
    pub fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for PropertyHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyHandle<T> {}

impl<T> PartialEq for PropertyHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for PropertyHandle<T> {}

impl<T> fmt::Debug for PropertyHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyHandle({})", self.index)
    }
}

/// Collects a record type's property declarations.
///
/// Declaration order is the wire order. Each name may be declared once;
/// a second declaration fails immediately with
/// [`CoreError::DuplicateProperty`].
///
/// # Example
///
/// ```
/// use propdb_core::{EntityId, PropertyMeta, SchemaBuilder};
///
/// let mut schema = SchemaBuilder::new();
/// let name = schema.prop_string("n", None, PropertyMeta::default().sent_to_client())?;
/// let level = schema.prop_int("lv", Some(1), PropertyMeta::default())?;
///
/// let mut object = schema.build(EntityId::new("p-1"));
/// object.set(name, "Ada".to_string());
/// assert_eq!(object.get(level), Some(&1));
/// # Ok::<(), propdb_core::CoreError>(())
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Vec<AnyProperty>,
    names: HashSet<String>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties declared so far.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether nothing has been declared yet.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Registers an already constructed property.
    ///
    /// Collection kinds lose any initial value, current value and
    /// `indexable` flag.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn register<T: FieldValue>(&mut self, property: Property<T>) -> CoreResult<PropertyHandle<T>> {
        if !self.names.insert(property.name().to_string()) {
            return Err(CoreError::duplicate_property(property.name()));
        }
        let property = if T::KIND.is_collection() {
            property.into_collection_shape()
        } else {
            property
        };
        let handle = PropertyHandle::new(self.properties.len());
        self.properties.push(T::wrap(property));
        Ok(handle)
    }

    /// Declares a property of any supported kind.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop<T: FieldValue>(
        &mut self,
        name: &str,
        initial: Option<T>,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<T>> {
        self.register(Property::new(name, initial, meta))
    }

    /// Declares a string property.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_string(
        &mut self,
        name: &str,
        initial: Option<&str>,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<String>> {
        self.prop(name, initial.map(str::to_string), meta)
    }

    /// Declares a 32-bit integer property.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_int(
        &mut self,
        name: &str,
        initial: Option<i32>,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<i32>> {
        self.prop(name, initial, meta)
    }

    /// Declares a boolean property.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_bool(
        &mut self,
        name: &str,
        initial: Option<bool>,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<bool>> {
        self.prop(name, initial, meta)
    }

    /// Declares a 64-bit integer property.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_long(
        &mut self,
        name: &str,
        initial: Option<i64>,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<i64>> {
        self.prop(name, initial, meta)
    }

    /// Declares a list of ints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_list_int(&mut self, name: &str, meta: PropertyMeta) -> CoreResult<PropertyHandle<Vec<i32>>> {
        self.collection(name, meta)
    }

    /// Declares a list of longs.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_list_long(&mut self, name: &str, meta: PropertyMeta) -> CoreResult<PropertyHandle<Vec<i64>>> {
        self.collection(name, meta)
    }

    /// Declares a list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_list_string(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<Vec<String>>> {
        self.collection(name, meta)
    }

    /// Declares a string to string map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_string_string(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<String, String>>> {
        self.collection(name, meta)
    }

    /// Declares a string to int map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_string_int(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<String, i32>>> {
        self.collection(name, meta)
    }

    /// Declares a string to long map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_string_long(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<String, i64>>> {
        self.collection(name, meta)
    }

    /// Declares an int to int map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_int_int(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<i32, i32>>> {
        self.collection(name, meta)
    }

    /// Declares an int to string map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_int_string(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<i32, String>>> {
        self.collection(name, meta)
    }

    /// Declares a string to (string to int map) map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_string_map_string_int(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<String, OrderedMap<String, i32>>>> {
        self.collection(name, meta)
    }

    /// Declares a string to (string to string map) map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_map_string_map_string_string(
        &mut self,
        name: &str,
        meta: PropertyMeta,
    ) -> CoreResult<PropertyHandle<OrderedMap<String, OrderedMap<String, String>>>> {
        self.collection(name, meta)
    }

    /// Declares a property whose kind is only known at run time.
    ///
    /// The property starts unset without an initial value and is reached
    /// through [`PersistentObject::property_by_name`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`] if the name is taken.
    pub fn prop_of_kind(&mut self, name: &str, kind: PropertyKind, meta: PropertyMeta) -> CoreResult<()> {
        match kind {
            PropertyKind::String => self.prop::<String>(name, None, meta).map(drop),
            PropertyKind::Int => self.prop::<i32>(name, None, meta).map(drop),
            PropertyKind::Bool => self.prop::<bool>(name, None, meta).map(drop),
            PropertyKind::Long => self.prop::<i64>(name, None, meta).map(drop),
            PropertyKind::ListInt => self.prop_list_int(name, meta).map(drop),
            PropertyKind::ListLong => self.prop_list_long(name, meta).map(drop),
            PropertyKind::ListString => self.prop_list_string(name, meta).map(drop),
            PropertyKind::MapStringString => self.prop_map_string_string(name, meta).map(drop),
            PropertyKind::MapStringInt => self.prop_map_string_int(name, meta).map(drop),
            PropertyKind::MapStringLong => self.prop_map_string_long(name, meta).map(drop),
            PropertyKind::MapIntInt => self.prop_map_int_int(name, meta).map(drop),
            PropertyKind::MapIntString => self.prop_map_int_string(name, meta).map(drop),
            PropertyKind::MapStringMapStringInt => self.prop_map_string_map_string_int(name, meta).map(drop),
            PropertyKind::MapStringMapStringString => {
                self.prop_map_string_map_string_string(name, meta).map(drop)
            }
        }
    }

    /// Finishes declaration and creates the object.
    #[must_use]
    pub fn build(self, id: EntityId) -> PersistentObject {
        tracing::debug!(
            id = %id,
            properties = self.properties.len(),
            "built persistent object schema"
        );
        PersistentObject::from_parts(id, self.properties)
    }

    fn collection<T: FieldValue>(&mut self, name: &str, meta: PropertyMeta) -> CoreResult<PropertyHandle<T>> {
        self.prop(name, None, meta)
    }
}
