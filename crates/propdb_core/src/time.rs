//! Modification timestamps and clocks.
//!
//! A modification time is the local wall-clock time rendered as
//! `yyMMddHHmmssSSS` and read back as a decimal number, so
//! 2026-10-18 14:05:09.123 is stored as `261018140509123`. Two-digit
//! years are interpreted as `20yy`.

use crate::error::{CoreError, CoreResult};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, Timelike};
use parking_lot::Mutex;
use std::fmt;

/// The textual pattern of an encoded modification time.
pub const ENCODED_FORMAT: &str = "yyMMddHHmmssSSS";

/// Largest value that still fits the 15 digits of [`ENCODED_FORMAT`].
const MAX_ENCODED: i64 = 999_999_999_999_999;

/// Source of "now" for modification tracking.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock to `now`. Moving backwards is allowed.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    /// Moves the clock by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// A millisecond-precision modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModificationTime(NaiveDateTime);

impl ModificationTime {
    /// The current time of `clock`.
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_datetime(clock.now())
    }

    /// Wraps a date-time, dropping sub-millisecond precision.
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime.trunc_subsecs(3))
    }

    /// Parses a stored `yyMMddHHmmssSSS` value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CorruptTimestamp`] if the value does not name a
    /// valid date and time.
    pub fn from_encoded(raw: i64) -> CoreResult<Self> {
        let parsed = Self::parse(raw);
        if let Err(err) = &parsed {
            tracing::error!(raw, error = %err, "failed to parse stored modification time");
        }
        parsed
    }

    fn parse(raw: i64) -> CoreResult<Self> {
        if !(0..=MAX_ENCODED).contains(&raw) {
            return Err(CoreError::corrupt_timestamp(raw, "value does not have 15 digits"));
        }
        // yy MM dd HH mm ss SSS
        let millis = raw % 1000;
        let second = raw / 1_000 % 100;
        let minute = raw / 100_000 % 100;
        let hour = raw / 10_000_000 % 100;
        let day = raw / 1_000_000_000 % 100;
        let month = raw / 100_000_000_000 % 100;
        let year = raw / 10_000_000_000_000;

        // every part is below 1000 here, the casts cannot truncate
        let date = NaiveDate::from_ymd_opt(2000 + year as i32, month as u32, day as u32)
            .ok_or_else(|| CoreError::corrupt_timestamp(raw, "invalid calendar date"))?;
        let datetime = date
            .and_hms_milli_opt(hour as u32, minute as u32, second as u32, millis as u32)
            .ok_or_else(|| CoreError::corrupt_timestamp(raw, "invalid time of day"))?;
        Ok(Self(datetime))
    }

    /// The stored form.
    pub fn encoded(&self) -> i64 {
        let dt = &self.0;
        let millis = i64::from((dt.nanosecond() / 1_000_000).min(999));
        i64::from(dt.year().rem_euclid(100)) * 10_000_000_000_000
            + i64::from(dt.month()) * 100_000_000_000
            + i64::from(dt.day()) * 1_000_000_000
            + i64::from(dt.hour()) * 10_000_000
            + i64::from(dt.minute()) * 100_000
            + i64::from(dt.second()) * 1_000
            + millis
    }

    /// The wrapped local date-time.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Milliseconds since the epoch, reading the local time as if it were UTC.
    ///
    /// Only differences between two values are meaningful.
    pub fn to_epoch_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    /// Whole minutes between two times, regardless of order.
    pub fn minutes_between(&self, other: &Self) -> i64 {
        (self.to_epoch_millis() - other.to_epoch_millis()).abs() / 60_000
    }
}

impl fmt::Display for ModificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:015}", self.encoded())
    }
}

impl From<NaiveDateTime> for ModificationTime {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::from_datetime(datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    #[test]
    fn encodes_documented_example() {
        let time = ModificationTime::from_datetime(at(2026, 10, 18, 14, 5, 9, 123));
        assert_eq!(time.encoded(), 261_018_140_509_123);
        assert_eq!(time.to_string(), "261018140509123");
    }

    #[test]
    fn early_years_keep_leading_zero_in_display() {
        let time = ModificationTime::from_datetime(at(2005, 1, 2, 3, 4, 5, 6));
        assert_eq!(time.encoded(), 50_102_030_405_006);
        assert_eq!(time.to_string(), "050102030405006");
    }

    #[test]
    fn parses_stored_value() {
        let time = ModificationTime::from_encoded(261_018_140_509_123).unwrap();
        assert_eq!(time.to_datetime(), at(2026, 10, 18, 14, 5, 9, 123));
    }

    #[test]
    fn rejects_corrupt_values() {
        for raw in [-1, 261_318_140_509_123, 261_032_000_000_000, 261_018_250_000_000, 1_000_000_000_000_000] {
            let err = ModificationTime::from_encoded(raw).unwrap_err();
            assert!(
                matches!(err, CoreError::CorruptTimestamp { raw: r, expected_format, .. }
                    if r == raw && expected_format == ENCODED_FORMAT),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn drops_sub_millisecond_precision() {
        let precise = at(2026, 10, 18, 14, 5, 9, 123) + TimeDelta::microseconds(456);
        let time = ModificationTime::from_datetime(precise);
        assert_eq!(time.to_datetime(), at(2026, 10, 18, 14, 5, 9, 123));
    }

    #[test]
    fn minutes_between_is_symmetric() {
        let a = ModificationTime::from_datetime(at(2026, 10, 18, 14, 0, 0, 0));
        let b = ModificationTime::from_datetime(at(2026, 10, 18, 15, 30, 59, 999));
        assert_eq!(a.minutes_between(&b), 90);
        assert_eq!(b.minutes_between(&a), 90);
    }

    #[test]
    fn manual_clock_moves_on_request() {
        let clock = ManualClock::new(at(2026, 10, 18, 23, 59, 0, 0));
        clock.advance(TimeDelta::minutes(2));
        assert_eq!(clock.now(), at(2026, 10, 19, 0, 1, 0, 0));
        clock.set(at(2026, 1, 1, 0, 0, 0, 0));
        assert_eq!(ModificationTime::now(&clock).encoded(), 260_101_000_000_000);
    }

    #[test]
    fn system_clock_is_encodable() {
        let now = ModificationTime::now(&SystemClock);
        assert_eq!(ModificationTime::from_encoded(now.encoded()).unwrap(), now);
    }

    proptest! {
        #[test]
        fn encoded_roundtrip(millis in 946_684_800_000i64..4_102_444_799_999i64) {
            let datetime = chrono::DateTime::from_timestamp_millis(millis).unwrap().naive_utc();
            let time = ModificationTime::from_datetime(datetime);
            prop_assert_eq!(ModificationTime::from_encoded(time.encoded()).unwrap(), time);
        }
    }
}
