//! Record fixtures and clock helpers.
//!
//! Provides two record types built the way applications build theirs,
//! and a clock frozen at a fixed instant so freshness checks are
//! deterministic.

use chrono::{NaiveDate, NaiveDateTime};
use propdb_core::{
    Clock, CoreResult, DatastoreEntity, EntityId, ManualClock, OrderedMap, PersistentObject,
    PropertyHandle, PropertyMeta, Record, SchemaBuilder,
};
use std::sync::Arc;

/// The instant fixtures start at: 2026-10-18 14:05:09.123.
pub fn frozen_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_milli_opt(14, 5, 9, 123))
        .expect("valid fixture instant")
}

/// A manual clock stopped at [`frozen_instant`].
pub fn frozen_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(frozen_instant()))
}

/// A small game-profile record.
#[derive(Debug, Clone)]
pub struct Player {
    entity: DatastoreEntity,
    /// Display name, sent to clients and indexed.
    pub name: PropertyHandle<String>,
    /// Level, starts at 1 and is audited.
    pub level: PropertyHandle<i32>,
    /// Online flag.
    pub online: PropertyHandle<bool>,
    /// Experience points.
    pub xp: PropertyHandle<i64>,
    /// Friend identities.
    pub friends: PropertyHandle<Vec<String>>,
    /// Per-game scores, sent to clients.
    pub scores: PropertyHandle<OrderedMap<String, i32>>,
}

impl Player {
    /// The underlying record.
    pub fn object(&self) -> &PersistentObject {
        self.entity.object()
    }

    /// Mutable access to the underlying record.
    pub fn object_mut(&mut self) -> &mut PersistentObject {
        self.entity.object_mut()
    }
}

impl Record for Player {
    fn create(id: EntityId, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        let mut schema = SchemaBuilder::new();
        let name = schema.prop_string("n", None, PropertyMeta::default().sent_to_client().indexable())?;
        let level = schema.prop_int("lv", Some(1), PropertyMeta::default().sent_to_client().auditable())?;
        let online = schema.prop_bool("on", Some(false), PropertyMeta::default())?;
        let xp = schema.prop_long("xp", Some(0), PropertyMeta::default().auditable())?;
        let friends = schema.prop_list_string("fr", PropertyMeta::default())?;
        let scores = schema.prop_map_string_int("sc", PropertyMeta::default().sent_to_client())?;
        Ok(Self {
            entity: DatastoreEntity::new(schema, id, clock)?,
            name,
            level,
            online,
            xp,
            friends,
            scores,
        })
    }

    fn entity(&self) -> &DatastoreEntity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut DatastoreEntity {
        &mut self.entity
    }
}

/// A record declaring one property of every kind, none of them set.
#[derive(Debug, Clone)]
pub struct AllKinds {
    entity: DatastoreEntity,
    /// `string`
    pub string: PropertyHandle<String>,
    /// `int`
    pub int: PropertyHandle<i32>,
    /// `bool`
    pub boolean: PropertyHandle<bool>,
    /// `long`
    pub long: PropertyHandle<i64>,
    /// `list<int>`
    pub list_int: PropertyHandle<Vec<i32>>,
    /// `list<long>`
    pub list_long: PropertyHandle<Vec<i64>>,
    /// `list<string>`
    pub list_string: PropertyHandle<Vec<String>>,
    /// `map<string,string>`
    pub map_string_string: PropertyHandle<OrderedMap<String, String>>,
    /// `map<string,int>`
    pub map_string_int: PropertyHandle<OrderedMap<String, i32>>,
    /// `map<string,long>`
    pub map_string_long: PropertyHandle<OrderedMap<String, i64>>,
    /// `map<int,int>`
    pub map_int_int: PropertyHandle<OrderedMap<i32, i32>>,
    /// `map<int,string>`
    pub map_int_string: PropertyHandle<OrderedMap<i32, String>>,
    /// `map<string,map<string,int>>`
    pub nested_int: PropertyHandle<OrderedMap<String, OrderedMap<String, i32>>>,
    /// `map<string,map<string,string>>`
    pub nested_string: PropertyHandle<OrderedMap<String, OrderedMap<String, String>>>,
}

impl AllKinds {
    /// The underlying record.
    pub fn object(&self) -> &PersistentObject {
        self.entity.object()
    }

    /// Mutable access to the underlying record.
    pub fn object_mut(&mut self) -> &mut PersistentObject {
        self.entity.object_mut()
    }
}

impl Record for AllKinds {
    fn create(id: EntityId, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        let meta = PropertyMeta::default();
        let mut schema = SchemaBuilder::new();
        Ok(Self {
            string: schema.prop_string("s", None, meta)?,
            int: schema.prop_int("i", None, meta)?,
            boolean: schema.prop_bool("b", None, meta)?,
            long: schema.prop_long("l", None, meta)?,
            list_int: schema.prop_list_int("li", meta)?,
            list_long: schema.prop_list_long("ll", meta)?,
            list_string: schema.prop_list_string("ls", meta)?,
            map_string_string: schema.prop_map_string_string("mss", meta)?,
            map_string_int: schema.prop_map_string_int("msi", meta)?,
            map_string_long: schema.prop_map_string_long("msl", meta)?,
            map_int_int: schema.prop_map_int_int("mii", meta)?,
            map_int_string: schema.prop_map_int_string("mis", meta)?,
            nested_int: schema.prop_map_string_map_string_int("mmi", meta)?,
            nested_string: schema.prop_map_string_map_string_string("mms", meta)?,
            entity: DatastoreEntity::new(schema, id, clock)?,
        })
    }

    fn entity(&self) -> &DatastoreEntity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut DatastoreEntity {
        &mut self.entity
    }
}

/// Creates a [`Player`] on a fresh [`frozen_clock`].
pub fn player(id: &str) -> (Player, Arc<ManualClock>) {
    let clock = frozen_clock();
    let player = Player::create(EntityId::new(id), clock.clone()).expect("player schema is valid");
    (player, clock)
}

/// Creates an [`AllKinds`] record on a fresh [`frozen_clock`].
pub fn all_kinds(id: &str) -> (AllKinds, Arc<ManualClock>) {
    let clock = frozen_clock();
    let record = AllKinds::create(EntityId::new(id), clock.clone()).expect("all-kinds schema is valid");
    (record, clock)
}

/// Decodes `bytes` into a fresh record of the same type on `clock`.
pub fn reload<R: Record>(record: &R, clock: Arc<ManualClock>, bytes: &[u8]) -> CoreResult<R> {
    R::decode(record.id().clone(), clock, bytes)
}
