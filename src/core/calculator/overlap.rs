//! Overlap between a task interval and a calendar day.

use crate::utils::time::delta_seconds;
use chrono::NaiveDateTime;

/// Seconds of `[start, end]` that fall inside `[window_start, window_end]`.
///
/// Disjoint intervals yield 0, never a negative number.
pub fn overlap_seconds(
    start: NaiveDateTime,
    end: NaiveDateTime,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> f64 {
    let actual_start = start.max(window_start);
    let actual_end = end.min(window_end);

    if actual_end <= actual_start {
        return 0.0;
    }
    delta_seconds(actual_end - actual_start)
}
