// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for ticks, tooltips and labels.

extern crate alloc;

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats a tick value with just enough decimals to distinguish ticks `step` apart.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let step = step.abs();
    let decimals = if step > 0.0 && step.is_finite() {
        let d = (-step.log10().floor()).clamp(0.0, 6.0);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to [0, 6]")]
        {
            d as usize
        }
    } else {
        0
    };
    let v = if v.abs() < step * 1e-9 { 0.0 } else { v };
    group_thousands(&format!("{v:.decimals$}"))
}

/// Formats a value for display: thousands separators and at most two decimals.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let s = format!("{:.2}", v);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    let s = if s == "-0" { "0" } else { s };
    group_thousands(s)
}

/// Formats `value` as a percentage of `total` with at most one decimal.
pub fn format_percentage(value: f64, total: f64) -> String {
    if total == 0.0 || !total.is_finite() {
        return String::from("0%");
    }
    let pct = (value / total * 1000.0).round() / 10.0;
    let s = format!("{pct:.1}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{s}%")
}

fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = match rest.find('.') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let mut out = String::with_capacity(s.len() + int.len() / 3);
    out.push_str(sign);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(frac);
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn tick_decimals_follow_step() {
        assert_eq!(format_tick_with_step(5.0, 1.0), "5", "integer steps");
        assert_eq!(format_tick_with_step(0.5, 0.1), "0.5", "tenths");
        assert_eq!(format_tick_with_step(0.25, 0.05), "0.25", "hundredths");
        assert_eq!(format_tick_with_step(12000.0, 2000.0), "12,000", "grouped");
        assert_eq!(format_tick_with_step(-1e-17, 0.2), "0.0", "no negative zero");
    }

    #[test]
    fn numbers_trim_and_group() {
        assert_eq!(format_number(1234.5), "1,234.5", "grouped with decimals");
        assert_eq!(format_number(20.0), "20", "integers have no decimals");
        assert_eq!(format_number(-1000000.0), "-1,000,000", "negative grouping");
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percentage(1.0, 4.0), "25%", "whole percent");
        assert_eq!(format_percentage(1.0, 3.0), "33.3%", "one decimal");
        assert_eq!(format_percentage(1.0, 0.0), "0%", "empty total");
    }
}
