//! Property-based test generators using proptest.
//!
//! Provides strategies for generating identities, property values and
//! property states.

use propdb_core::{EntityId, OrderedMap, PropertyState};
use proptest::prelude::*;

/// Strategy for generating entity identities, including non-ASCII text.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9_-]{0,40}").expect("Invalid regex"),
        any::<String>(),
    ]
    .prop_map(EntityId::new)
}

/// Strategy for generating short field text.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z]{0,12}").expect("Invalid regex"),
        "\\PC{0,12}",
    ]
}

/// Strategy for generating lists of up to `max` items.
pub fn list_strategy<T: Strategy>(item: T, max: usize) -> impl Strategy<Value = Vec<T::Value>> {
    prop::collection::vec(item, 0..=max)
}

/// Strategy for generating insertion-ordered maps with unique keys.
///
/// Later duplicates of a generated key are dropped, so the resulting
/// order is the order in which keys first appeared.
pub fn ordered_map_strategy<K, V>(
    key: K,
    value: V,
    max: usize,
) -> impl Strategy<Value = OrderedMap<K::Value, V::Value>>
where
    K: Strategy,
    K::Value: PartialEq,
    V: Strategy,
{
    prop::collection::vec((key, value), 0..=max).prop_map(|pairs| {
        let mut map = OrderedMap::with_capacity(pairs.len());
        for (k, v) in pairs {
            if !map.contains_key(&k) {
                map.insert(k, v);
            }
        }
        map
    })
}

/// Strategy for `map<string,map<string,V>>` values.
pub fn nested_map_strategy<V>(value: V) -> impl Strategy<Value = OrderedMap<String, OrderedMap<String, V::Value>>>
where
    V: Strategy,
{
    ordered_map_strategy(text_strategy(), ordered_map_strategy(text_strategy(), value, 4), 4)
}

/// Strategy for the three states a property can be in.
pub fn property_state_strategy<T>(value: T) -> impl Strategy<Value = PropertyState<T::Value>>
where
    T: Strategy,
    T::Value: Clone,
{
    prop_oneof![
        1 => Just(PropertyState::Unset),
        1 => Just(PropertyState::Null),
        4 => value.prop_map(PropertyState::Value),
    ]
}
