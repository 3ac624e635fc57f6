//! Entity identity, sharding and modification tracking.

mod datastore;
mod id;
pub mod shard;

pub use datastore::{DatastoreEntity, GROUP_ID_FIELD, LAST_MODIFICATION_FIELD};
pub use id::EntityId;
pub use shard::MAX_GROUPS;
