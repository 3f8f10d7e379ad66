// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-group views of the display data shared by series components.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Point;

use crate::cartesian::CartesianScales;
use crate::data::{Datum, stack};
use crate::model::ChartModel;

/// Records of one active group, in drawing order.
#[derive(Clone, Debug)]
pub struct Series<'a> {
    /// Group name.
    pub group: &'a str,
    /// Records.
    pub data: Vec<&'a Datum>,
}

/// Active groups and their records, in group order.
///
/// On a continuous domain axis records are sorted by domain position; on a discrete axis they
/// keep their input order.
pub fn active_series<'a>(model: &'a ChartModel, scales: Option<&CartesianScales>) -> Vec<Series<'a>> {
    let display = model.display_data();
    model
        .active_groups()
        .into_iter()
        .map(|group| {
            let mut data: Vec<&Datum> = display.iter().filter(|d| d.group == group).collect();
            if let Some(scales) = scales
                && scales.domain_scale().is_continuous()
            {
                data.sort_by(|a, b| {
                    let a = scales.domain_value(a).unwrap_or(f64::NAN);
                    let b = scales.domain_value(b).unwrap_or(f64::NAN);
                    a.total_cmp(&b)
                });
            }
            Series { group, data }
        })
        .collect()
}

/// A record placed on a stack, in screen coordinates.
#[derive(Clone, Copy, Debug)]
pub struct StackedPoint<'a> {
    /// The record.
    pub datum: &'a Datum,
    /// Top of its band.
    pub top: Point,
    /// Bottom of its band.
    pub bottom: Point,
}

/// Stacked positions per active group, in group order.
pub fn stacked_series<'a>(
    model: &'a ChartModel,
    scales: &CartesianScales,
) -> Vec<(&'a str, Vec<StackedPoint<'a>>)> {
    let groups = model.active_groups();
    let display = model.display_data();
    let field = scales.range_field(groups.first().copied().unwrap_or_default()).clone();
    let stacked = stack(display, &groups, &field);
    groups
        .iter()
        .map(|group| {
            let mut points: Vec<StackedPoint<'a>> = stacked
                .iter()
                .filter(|s| s.datum.group == *group)
                .filter_map(|s| {
                    let d = scales.domain_value(s.datum)?;
                    let y0 = scales.range_pixel(group, s.y0)?;
                    let y1 = scales.range_pixel(group, s.y1)?;
                    Some(StackedPoint {
                        datum: s.datum,
                        top: scales.point_at(d, y1),
                        bottom: scales.point_at(d, y0),
                    })
                })
                .collect();
            if scales.domain_scale().is_continuous() {
                points.sort_by(|a, b| {
                    scales
                        .domain_coordinate(a.top)
                        .total_cmp(&scales.domain_coordinate(b.top))
                });
            }
            (*group, points)
        })
        .collect()
}

/// Screen positions of every plotted record, per active group.
///
/// With `stacked`, records sit on the tops of their stacked bands. Gaps are skipped.
pub fn plotted_points<'a>(
    model: &'a ChartModel,
    scales: &CartesianScales,
    stacked: bool,
) -> Vec<(&'a str, Vec<(&'a Datum, Point)>)> {
    if stacked {
        stacked_series(model, scales)
            .into_iter()
            .map(|(group, points)| {
                let points = points
                    .iter()
                    .filter(|p| p.datum.value.is_some())
                    .map(|p| (p.datum, p.top))
                    .collect();
                (group, points)
            })
            .collect()
    } else {
        active_series(model, Some(scales))
            .into_iter()
            .map(|series| {
                let points = series
                    .data
                    .iter()
                    .filter_map(|&d| Some((d, scales.point(d)?)))
                    .collect();
                (series.group, points)
            })
            .collect()
    }
}
