// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and formatting.
//!
//! Time values are Unix timestamps in **seconds** (UTC). Steps range from one second to
//! multiple years; labels are formatted with `chrono` at a granularity matching the step.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::DateTime;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

const STEPS: &[f64] = &[
    1.0,
    5.0,
    15.0,
    30.0,
    MINUTE,
    5.0 * MINUTE,
    15.0 * MINUTE,
    30.0 * MINUTE,
    HOUR,
    3.0 * HOUR,
    6.0 * HOUR,
    12.0 * HOUR,
    DAY,
    2.0 * DAY,
    WEEK,
    MONTH,
    3.0 * MONTH,
    YEAR,
];

/// Returns tick timestamps for a domain of Unix seconds.
pub fn nice_time_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_time_step((max - min) / count as f64);
    let start = (min / step).ceil() * step;
    let mut out = Vec::new();
    let mut t = start;
    while t <= max + step * 1e-9 && out.len() < 1000 {
        out.push(t);
        t += step;
    }
    out
}

/// Returns the tick step (seconds) chosen for `step` seconds per tick.
pub fn nice_time_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 1.0;
    }
    for &s in STEPS {
        if s >= step {
            return s;
        }
    }
    (step / YEAR).ceil() * YEAR
}

/// Formats a timestamp (seconds) for a tick spacing of `step` seconds.
pub fn format_time(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let secs = v.round().clamp(-8.0e12, 8.0e12);
    #[allow(clippy::cast_possible_truncation, reason = "clamped well inside the i64 range")]
    let secs = secs as i64;
    let Some(dt) = DateTime::from_timestamp(secs, 0) else {
        return format!("{v}");
    };
    let pattern = if step >= YEAR {
        "%Y"
    } else if step >= MONTH {
        "%b %Y"
    } else if step >= DAY {
        "%b %d"
    } else if step >= MINUTE {
        "%H:%M"
    } else {
        "%H:%M:%S"
    };
    format!("{}", dt.format(pattern))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn day_spans_get_day_steps() {
        let ticks = nice_time_ticks(0.0, 10.0 * DAY, 5);
        assert!(ticks.len() >= 2, "several ticks");
        assert_eq!(ticks[1] - ticks[0], 2.0 * DAY, "two-day step");
    }

    #[test]
    fn formats_by_granularity() {
        // 2021-03-04T05:06:07Z
        let t = 1_614_834_367.0;
        assert_eq!(format_time(t, DAY), "Mar 04", "day granularity");
        assert_eq!(format_time(t, HOUR), "05:06", "minute granularity");
        assert_eq!(format_time(t, 1.0), "05:06:07", "second granularity");
        assert_eq!(format_time(t, YEAR), "2021", "year granularity");
    }
}
