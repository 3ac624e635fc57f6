//! Sharded, modification-tracked records.

use super::{shard, EntityId};
use crate::config::Config;
use crate::error::CoreResult;
use crate::object::{PersistentObject, PropertyHandle, SchemaBuilder};
use crate::property::PropertyMeta;
use crate::time::{Clock, ModificationTime, SystemClock};
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Field key of the shard bucket.
pub const GROUP_ID_FIELD: &str = "gi";

/// Field key of the last modification time.
pub const LAST_MODIFICATION_FIELD: &str = "lm";

/// Length of the text prefix compared by [`DatastoreEntity::has_accessed_today`].
const SAME_DAY_PREFIX: usize = 6;

/// A [`PersistentObject`] with a shard bucket and a modification stamp.
///
/// The two bookkeeping properties are appended after the record's own
/// properties, both indexable:
///
/// | key  | type | value                                        |
/// |------|------|----------------------------------------------|
/// | `gi` | int  | shard bucket of the identity, fixed at birth |
/// | `lm` | long | last modification, `yyMMddHHmmssSSS`         |
#[derive(Debug, Clone)]
pub struct DatastoreEntity {
    object: PersistentObject,
    group_id: PropertyHandle<i32>,
    last_modification: PropertyHandle<i64>,
    clock: Arc<dyn Clock>,
}

impl DatastoreEntity {
    /// Finishes `schema` into an entity and stamps it as modified now.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateProperty`](crate::CoreError::DuplicateProperty)
    /// if the schema already uses `gi` or `lm`.
    pub fn new(mut schema: SchemaBuilder, id: EntityId, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        let meta = PropertyMeta::default().indexable();
        let group_id = schema.prop_int(GROUP_ID_FIELD, None, meta)?;
        let last_modification = schema.prop_long(LAST_MODIFICATION_FIELD, None, meta)?;

        let bucket = shard::group_for(&id);
        let mut entity = Self {
            object: schema.build(id),
            group_id,
            last_modification,
            clock,
        };
        entity.object.set(group_id, bucket);
        entity.set_modified();
        Ok(entity)
    }

    /// Like [`DatastoreEntity::new`] with the [`SystemClock`].
    ///
    /// # Errors
    ///
    /// See [`DatastoreEntity::new`].
    pub fn with_system_clock(schema: SchemaBuilder, id: EntityId) -> CoreResult<Self> {
        Self::new(schema, id, Arc::new(SystemClock))
    }

    /// The record identity.
    pub fn id(&self) -> &EntityId {
        self.object.id()
    }

    /// The underlying record.
    pub fn object(&self) -> &PersistentObject {
        &self.object
    }

    /// Mutable access to the underlying record.
    pub fn object_mut(&mut self) -> &mut PersistentObject {
        &mut self.object
    }

    /// The clock used for stamping.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Handle of the `gi` property.
    pub fn group_id_handle(&self) -> PropertyHandle<i32> {
        self.group_id
    }

    /// Handle of the `lm` property.
    pub fn last_modification_handle(&self) -> PropertyHandle<i64> {
        self.last_modification
    }

    /// The shard bucket, in `0..MAX_GROUPS`.
    pub fn group_id(&self) -> i32 {
        self.object
            .get(self.group_id)
            .copied()
            .unwrap_or_else(|| shard::group_for(self.id()))
    }

    /// The stored modification stamp; `0` when never stamped or null.
    pub fn last_modification(&self) -> i64 {
        self.object.get(self.last_modification).copied().unwrap_or(0)
    }

    /// Stamps the entity with the clock's current time.
    pub fn set_modified(&mut self) {
        let now = ModificationTime::now(self.clock.as_ref()).encoded();
        let previous = self.last_modification();
        if now < previous {
            tracing::warn!(
                id = %self.id(),
                previous,
                now,
                "clock went backwards, modification stamp decreases"
            );
        }
        self.object.set(self.last_modification, now);
    }

    /// Whole minutes between now and the last modification.
    ///
    /// A stamp of `0` counts as "just modified".
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CorruptTimestamp`](crate::CoreError::CorruptTimestamp)
    /// if the stored stamp is not a valid time.
    pub fn minutes_since_last_modification(&self) -> CoreResult<i64> {
        let raw = self.last_modification();
        if raw == 0 {
            return Ok(0);
        }
        let now = ModificationTime::now(self.clock.as_ref());
        let modified = ModificationTime::from_encoded(raw)?;
        Ok(now.minutes_between(&modified))
    }

    /// Whole days between now and the last modification.
    ///
    /// # Errors
    ///
    /// See [`DatastoreEntity::minutes_since_last_modification`].
    pub fn days_since_last_modification(&self) -> CoreResult<i64> {
        Ok(self.minutes_since_last_modification()? / (60 * 24))
    }

    /// The last modification as a local date-time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CorruptTimestamp`](crate::CoreError::CorruptTimestamp)
    /// if the stored stamp (including `0`) is not a valid time.
    pub fn last_modification_as_datetime(&self) -> CoreResult<NaiveDateTime> {
        Ok(ModificationTime::from_encoded(self.last_modification())?.to_datetime())
    }

    /// Whether the first six digits of the stored stamp match those of now.
    ///
    /// The comparison is done on the unpadded decimal text, so for years
    /// 2010 and later it compares `yyMMdd`, while for 2000 to 2009 the
    /// missing leading zero shifts it to the month, day and first hour
    /// digit. Stamps shorter than six digits never match.
    pub fn has_accessed_today(&self) -> bool {
        let stored = self.last_modification().to_string();
        let today = ModificationTime::now(self.clock.as_ref()).encoded().to_string();
        match (stored.get(..SAME_DAY_PREFIX), today.get(..SAME_DAY_PREFIX)) {
            (Some(stored), Some(today)) => stored == today,
            _ => false,
        }
    }

    /// Identity, shard bucket, stamp and every other value match.
    pub fn is_fully_equals(&self, other: &Self) -> bool {
        self.object.is_fully_equals(&other.object)
    }

    /// Encodes all properties, bookkeeping included.
    pub fn encode(&self) -> Vec<u8> {
        self.object.encode()
    }

    /// Decodes all properties with the default [`Config`].
    ///
    /// # Errors
    ///
    /// See [`PersistentObject::decode_with`].
    pub fn decode(&mut self, bytes: &[u8]) -> CoreResult<()> {
        self.object.decode(bytes)
    }

    /// Decodes all properties.
    ///
    /// # Errors
    ///
    /// See [`PersistentObject::decode_with`].
    pub fn decode_with(&mut self, bytes: &[u8], config: &Config) -> CoreResult<()> {
        self.object.decode_with(bytes, config)
    }
}
