// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polar helpers for pie and radar charts.
//!
//! Screen angles are in radians, start at the positive x axis and grow clockwise (y points
//! down). Chart angles, as produced by the pie layout and the radar band scale, start at
//! twelve o'clock; [`screen_angle`] converts between the two.

use core::f64::consts::{FRAC_PI_2, TAU};

use chartloom_core::{TextAnchor, TextBaseline};
use kurbo::Point;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Converts a chart angle (zero at twelve o'clock) to a screen angle.
pub fn screen_angle(chart_angle: f64) -> f64 {
    chart_angle - FRAC_PI_2
}

/// The point at screen angle `angle` and distance `r` from `origin`.
pub fn polar_to_cartesian(angle: f64, r: f64, origin: Point) -> Point {
    Point::new(origin.x + r * angle.cos(), origin.y + r * angle.sin())
}

/// Normalizes degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Anchor and baseline that keep a label at screen angle `angle` clear of the shape it
/// labels.
///
/// Labels in a quadrant hang away from the center; labels within ten degrees of an axis are
/// centered on it.
pub fn radial_label_placement(angle: f64) -> (TextAnchor, TextBaseline) {
    let degrees = normalize_degrees(angle.to_degrees());
    if degrees <= 10.0 || degrees >= 350.0 {
        return (TextAnchor::Start, TextBaseline::Middle);
    }
    if (80.0..=100.0).contains(&degrees) {
        return (TextAnchor::Middle, TextBaseline::Hanging);
    }
    if (170.0..=190.0).contains(&degrees) {
        return (TextAnchor::End, TextBaseline::Middle);
    }
    if (260.0..=280.0).contains(&degrees) {
        return (TextAnchor::Middle, TextBaseline::Alphabetic);
    }
    if degrees <= 90.0 {
        (TextAnchor::Start, TextBaseline::Hanging)
    } else if degrees <= 180.0 {
        (TextAnchor::End, TextBaseline::Hanging)
    } else if degrees <= 270.0 {
        (TextAnchor::End, TextBaseline::Alphabetic)
    } else {
        (TextAnchor::Start, TextBaseline::Alphabetic)
    }
}

/// Angle of `key_index` out of `count` evenly spaced spokes, as a chart angle.
pub fn spoke_angle(key_index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    key_index as f64 * TAU / count as f64
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn twelve_o_clock_is_straight_up() {
        let p = polar_to_cartesian(screen_angle(0.0), 10.0, Point::new(50.0, 50.0));
        assert!((p.x - 50.0).abs() < 1e-9, "centered horizontally");
        assert!((p.y - 40.0).abs() < 1e-9, "above the origin");
    }

    #[test]
    fn labels_hang_away_from_the_center() {
        assert_eq!(
            radial_label_placement(screen_angle(0.0)),
            (TextAnchor::Middle, TextBaseline::Alphabetic),
            "top spoke sits on its label's baseline"
        );
        assert_eq!(
            radial_label_placement(0.0),
            (TextAnchor::Start, TextBaseline::Middle),
            "right spoke starts at the point"
        );
        assert_eq!(
            radial_label_placement(135_f64.to_radians()),
            (TextAnchor::End, TextBaseline::Hanging),
            "lower left quadrant"
        );
        assert_eq!(
            radial_label_placement(-45_f64.to_radians()),
            (TextAnchor::Start, TextBaseline::Alphabetic),
            "negative angles wrap"
        );
    }
}
