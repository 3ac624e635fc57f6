//! Record trait for application entity types.

use crate::config::Config;
use crate::entity::{DatastoreEntity, EntityId};
use crate::error::CoreResult;
use crate::time::Clock;
use std::sync::Arc;

/// An application type stored as a [`DatastoreEntity`].
///
/// Implementors declare their schema in [`Record::create`] and keep the
/// returned handles as fields. Everything else has a default built on
/// [`Record::entity`].
///
/// # Example
///
/// ```
/// use propdb_core::{
///     Clock, CoreResult, DatastoreEntity, EntityId, PropertyHandle, PropertyMeta, Record,
///     SchemaBuilder,
/// };
/// use std::sync::Arc;
///
/// struct User {
///     entity: DatastoreEntity,
///     name: PropertyHandle<String>,
/// }
///
/// impl Record for User {
///     fn create(id: EntityId, clock: Arc<dyn Clock>) -> CoreResult<Self> {
///         let mut schema = SchemaBuilder::new();
///         let name = schema.prop_string("n", None, PropertyMeta::default())?;
///         Ok(Self {
///             entity: DatastoreEntity::new(schema, id, clock)?,
///             name,
///         })
///     }
///
///     fn entity(&self) -> &DatastoreEntity {
///         &self.entity
///     }
///
///     fn entity_mut(&mut self) -> &mut DatastoreEntity {
///         &mut self.entity
///     }
/// }
///
/// let clock: Arc<dyn Clock> = Arc::new(propdb_core::SystemClock);
/// let mut user = User::create(EntityId::new("u-1"), clock.clone())?;
/// let name = user.name;
/// user.entity_mut().object_mut().set(name, "Ada".to_string());
///
/// let loaded = User::decode(EntityId::new("u-1"), clock, &user.encode())?;
/// assert!(loaded.is_fully_equals(&user));
/// # Ok::<(), propdb_core::CoreError>(())
/// ```
pub trait Record: Sized {
    /// Creates a fresh record stamped with the clock's current time.
    ///
    /// # Errors
    ///
    /// Fails if the schema declares a name twice.
    fn create(id: EntityId, clock: Arc<dyn Clock>) -> CoreResult<Self>;

    /// The underlying entity.
    fn entity(&self) -> &DatastoreEntity;

    /// Mutable access to the underlying entity.
    fn entity_mut(&mut self) -> &mut DatastoreEntity;

    /// The record identity.
    fn id(&self) -> &EntityId {
        self.entity().id()
    }

    /// Encodes the record.
    fn encode(&self) -> Vec<u8> {
        self.entity().encode()
    }

    /// Rebuilds a record from its stored bytes.
    ///
    /// # Errors
    ///
    /// Returns a codec error on malformed input.
    fn decode(id: EntityId, clock: Arc<dyn Clock>, bytes: &[u8]) -> CoreResult<Self> {
        Self::decode_with(id, clock, bytes, &Config::default())
    }

    /// Rebuilds a record from its stored bytes with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns a codec error on malformed input.
    fn decode_with(id: EntityId, clock: Arc<dyn Clock>, bytes: &[u8], config: &Config) -> CoreResult<Self> {
        let mut record = Self::create(id, clock)?;
        record.entity_mut().decode_with(bytes, config)?;
        Ok(record)
    }

    /// Structural equality of the underlying entities.
    fn is_fully_equals(&self, other: &Self) -> bool {
        self.entity().is_fully_equals(other.entity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{PropertyHandle, SchemaBuilder};
    use crate::property::PropertyMeta;
    use crate::time::ManualClock;
    use chrono::NaiveDate;

    #[derive(Debug, Clone)]
    struct Counter {
        entity: DatastoreEntity,
        count: PropertyHandle<i64>,
        tags: PropertyHandle<Vec<String>>,
    }

    impl Record for Counter {
        fn create(id: EntityId, clock: Arc<dyn Clock>) -> CoreResult<Self> {
            let mut schema = SchemaBuilder::new();
            let count = schema.prop_long("c", Some(0), PropertyMeta::default().auditable())?;
            let tags = schema.prop_list_string("t", PropertyMeta::default())?;
            Ok(Self {
                entity: DatastoreEntity::new(schema, id, clock)?,
                count,
                tags,
            })
        }

        fn entity(&self) -> &DatastoreEntity {
            &self.entity
        }

        fn entity_mut(&mut self) -> &mut DatastoreEntity {
            &mut self.entity
        }
    }

    fn clock() -> Arc<dyn Clock> {
        let start = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Arc::new(ManualClock::new(start))
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut counter = Counter::create(EntityId::new("c-1"), clock()).unwrap();
        let (count, tags) = (counter.count, counter.tags);
        counter.entity_mut().object_mut().set(count, 42);
        counter.entity_mut().object_mut().set(tags, vec!["x".to_string()]);

        let decoded = Counter::decode(EntityId::new("c-1"), clock(), &counter.encode()).unwrap();
        assert!(decoded.is_fully_equals(&counter));
        assert_eq!(decoded.entity().object().get(decoded.count), Some(&42));
    }

    #[test]
    fn id_is_stable() {
        let counter = Counter::create(EntityId::new("c-2"), clock()).unwrap();
        assert_eq!(counter.id().as_str(), "c-2");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Counter::decode(EntityId::new("c-3"), clock(), &[0x07]).is_err());
    }
}
