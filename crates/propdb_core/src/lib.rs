//! # propdb Core
//!
//! Typed property records for a sharded key-value datastore.
//!
//! This crate provides:
//! - Typed, named properties with client/audit/index metadata
//! - Records as ordered property registries with binary and text codecs
//! - Shard bucket assignment from the record identity
//! - Modification stamping and freshness queries against a [`Clock`]
//! - A pluggable [`CacheStrategy`] for whole records
//!
//! ## Usage
//!
//! ```
//! use propdb_core::{DatastoreEntity, EntityId, PropertyMeta, SchemaBuilder};
//!
//! let mut schema = SchemaBuilder::new();
//! let scores = schema.prop_map_string_int("sc", PropertyMeta::default())?;
//!
//! let mut entity = DatastoreEntity::with_system_clock(schema, EntityId::new("abc"))?;
//! assert_eq!(entity.group_id(), 54);
//!
//! entity.object_mut().property_mut(scores).value_mut().insert("a".to_string(), 1);
//! let bytes = entity.encode();
//! # let _ = bytes;
//! # Ok::<(), propdb_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod entity;
mod error;
mod object;
mod property;
mod record;
mod time;

pub use cache::{CacheStrategy, LocalCache, NoCache};
pub use config::Config;
pub use entity::{
    shard, DatastoreEntity, EntityId, GROUP_ID_FIELD, LAST_MODIFICATION_FIELD, MAX_GROUPS,
};
pub use error::{CoreError, CoreResult};
pub use object::{FieldView, PersistentObject, PropertyHandle, SchemaBuilder};
pub use property::{AnyProperty, FieldValue, Property, PropertyKind, PropertyMeta, PropertyState};
pub use record::Record;
pub use time::{Clock, ManualClock, ModificationTime, SystemClock, ENCODED_FORMAT};

pub use propdb_codec::{OrderedMap, Value};
