// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie slice geometry.
//!
//! Values become contiguous angular spans that start at twelve o'clock and run clockwise.
//! Every slice is padded by the same angle; the remaining circle is shared in proportion to
//! the positive values, so spans always sum to a full turn.

extern crate alloc;

use alloc::vec::Vec;
use core::f64::consts::TAU;

use kurbo::Vec2;

use crate::options::CalloutOptions;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// One slice produced by [`pie_layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    /// Position of the value in the input.
    pub index: usize,
    /// The value.
    pub value: f64,
    /// Start chart angle in radians.
    pub start_angle: f64,
    /// End chart angle in radians.
    pub end_angle: f64,
    /// Padding included in the span.
    pub pad_angle: f64,
}

impl PieSlice {
    /// Angular span, padding included.
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Middle chart angle.
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.span() / 2.0
    }

    /// Returns `true` if `angle` (a chart angle in `[0, 2π)`) falls inside this slice.
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Lays out `values` as slices, in input order unless `sort_by_value` (largest first).
///
/// The result is indexed like the input. Negative and non-finite values get only padding.
pub fn pie_layout(values: &[f64], pad_angle: f64, sort_by_value: bool) -> Vec<PieSlice> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let weight = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let sum: f64 = values.iter().map(|v| weight(*v)).sum();
    let pad = pad_angle.abs().min(TAU / n as f64);
    let k = if sum > 0.0 {
        (TAU - n as f64 * pad) / sum
    } else {
        0.0
    };

    let mut order: Vec<usize> = (0..n).collect();
    if sort_by_value {
        order.sort_by(|a, b| weight(values[*b]).total_cmp(&weight(values[*a])));
    }

    let mut slices: Vec<PieSlice> = values
        .iter()
        .enumerate()
        .map(|(index, value)| PieSlice {
            index,
            value: *value,
            start_angle: 0.0,
            end_angle: 0.0,
            pad_angle: pad,
        })
        .collect();
    let mut a0 = 0.0;
    for i in order {
        let a1 = a0 + weight(values[i]) * k + pad;
        slices[i].start_angle = a0;
        slices[i].end_angle = a1;
        a0 = a1;
    }
    slices
}

/// Side a callout label is pulled to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutDirection {
    /// Leader runs left.
    Left,
    /// Leader runs right.
    Right,
}

/// Callout direction for each labeled slice, in label order.
///
/// Only the last two labeled slices can get a callout, and only when their span is under
/// `min_slice_degree`; the very last one goes right, the one before it left.
pub fn callout_directions(labeled: &[PieSlice], min_slice_degree: f64) -> Vec<Option<CalloutDirection>> {
    let n = labeled.len();
    labeled
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            if i + 2 < n || slice.span().to_degrees() >= min_slice_degree {
                return None;
            }
            Some(if i + 1 == n {
                CalloutDirection::Right
            } else {
                CalloutDirection::Left
            })
        })
        .collect()
}

/// Where a slice label goes, relative to the pie center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    /// Label anchor (the label is centered on it).
    pub position: Vec2,
    /// Unadjusted radial position the label would have without a callout.
    pub radial: Vec2,
    /// Extra drop applied to labels in the lower half.
    pub offset_y: f64,
    /// Callout, if any.
    pub callout: Option<CalloutDirection>,
}

/// Distance between the outer radius and slice labels.
pub const LABEL_MARGIN: f64 = 7.0;

/// Places the label of `slice` of width `text_width` outside a pie of `radius`.
pub fn label_placement(
    slice: &PieSlice,
    radius: f64,
    text_width: f64,
    callout: Option<CalloutDirection>,
    options: &CalloutOptions,
) -> LabelPlacement {
    let theta = slice.mid_angle();
    let degrees = theta.to_degrees();
    let offset_x = text_width / 2.0;
    let offset_y = if degrees > 90.0 && degrees < 270.0 {
        10.0
    } else {
        0.0
    };
    let r = radius + LABEL_MARGIN;
    let radial = Vec2::new((offset_x + r) * theta.sin(), -(offset_y + r) * theta.cos());
    let position = match callout {
        Some(CalloutDirection::Right) => Vec2::new(
            radial.x + options.offset_x + options.text_margin + offset_x,
            radial.y - options.offset_y,
        ),
        Some(CalloutDirection::Left) => Vec2::new(
            radial.x - options.offset_x - offset_x - options.text_margin,
            radial.y - options.offset_y,
        ),
        None => radial,
    };
    LabelPlacement {
        position,
        radial,
        offset_y,
        callout,
    }
}

/// Leader line points (start, elbow, end) of a callout, relative to the pie center.
pub fn callout_leader(placement: &LabelPlacement, options: &CalloutOptions) -> Option<[Vec2; 3]> {
    let direction = placement.callout?;
    let start = Vec2::new(placement.radial.x, placement.radial.y + placement.offset_y);
    let end_y = placement.radial.y - options.offset_y + placement.offset_y;
    let (end_x, elbow_x) = match direction {
        CalloutDirection::Right => {
            let end_x = placement.radial.x + options.offset_x;
            (end_x, end_x - options.horizontal_line_length)
        }
        CalloutDirection::Left => {
            let end_x = placement.radial.x - options.offset_x;
            (end_x, end_x + options.horizontal_line_length)
        }
    };
    Some([start, Vec2::new(elbow_x, end_y), Vec2::new(end_x, end_y)])
}

/// Chart angle of the vector `v` from the pie center, in `[0, 2π)`.
pub fn chart_angle_of(v: Vec2) -> f64 {
    // Zero points up and angles grow clockwise in y-down screen space.
    let a = v.x.atan2(-v.y);
    if a < 0.0 { a + TAU } else { a }
}
