//! Shard bucket assignment.
//!
//! The bucket of an entity is derived from its identity text alone, so every
//! process (and every past writer) agrees on it:
//!
//! ```text
//! hash   = fold(0, |h, unit| h * 31 + unit)   over UTF-16 code units, wrapping i32
//! bucket = |hash % MAX_GROUPS|
//! ```

use super::EntityId;

/// Number of shard buckets.
pub const MAX_GROUPS: i32 = 100;

/// 31-polynomial content hash over the UTF-16 code units of `text`.
pub fn content_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// The shard bucket of an identity, in `0..MAX_GROUPS`.
pub fn group_for(id: &EntityId) -> i32 {
    // `%` keeps the dividend's sign and |i32::MIN % 100| fits, so `abs` cannot overflow.
    (content_hash(id.as_str()) % MAX_GROUPS).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_buckets() {
        assert_eq!(content_hash("abc"), 96354);
        assert_eq!(group_for(&EntityId::new("abc")), 54);
        assert_eq!(group_for(&EntityId::new("")), 0);
    }

    #[test]
    fn hash_of_min_value_text() {
        assert_eq!(content_hash("polygenelubricants"), i32::MIN);
        assert_eq!(group_for(&EntityId::new("polygenelubricants")), 48);
    }

    #[test]
    fn hash_uses_utf16_units() {
        // one supplementary character is two code units
        assert_eq!(content_hash("\u{1F600}"), 0xD83D * 31 + 0xDE00);
    }

    proptest! {
        #[test]
        fn bucket_in_range(text in ".*") {
            let id = EntityId::new(text);
            let bucket = group_for(&id);
            prop_assert!((0..MAX_GROUPS).contains(&bucket));
            prop_assert_eq!(bucket, group_for(&id.clone()));
        }
    }
}
