//! Timestamp utilities: the fixed-width storage format and duration helpers.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, TimeDelta};

/// Storage format for task timestamps. Fixed width, so TEXT comparison in
/// SQLite orders the same way as the timestamps themselves.
pub const DB_TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn to_db_str(ts: &NaiveDateTime) -> String {
    ts.format(DB_TIMESTAMP_FMT).to_string()
}

pub fn from_db_str(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DB_TIMESTAMP_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// Seconds (with microsecond precision) contained in a duration.
pub fn delta_seconds(d: TimeDelta) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => d.num_seconds() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_format_roundtrips_and_sorts() {
        let a = NaiveDateTime::parse_from_str("2025-03-10 09:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let b = a + TimeDelta::microseconds(1);

        assert_eq!(to_db_str(&a), "2025-03-10 09:05:00.000000");
        assert_eq!(from_db_str(&to_db_str(&b)).unwrap(), b);
        assert!(to_db_str(&a) < to_db_str(&b));
    }

    #[test]
    fn accepts_timestamps_without_fraction() {
        assert!(from_db_str("2025-03-10 09:05:00").is_ok());
        assert!(from_db_str("10/03/2025").is_err());
    }

    #[test]
    fn delta_seconds_keeps_fraction() {
        assert_eq!(delta_seconds(TimeDelta::milliseconds(1500)), 1.5);
        assert_eq!(delta_seconds(TimeDelta::hours(1)), 3600.0);
    }
}
