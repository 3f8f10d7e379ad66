// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ruler: a guide line that snaps to the records nearest the pointer along the domain axis.
//!
//! While the pointer is inside the plot, every record whose domain coordinate lies within
//! `ruler.threshold` pixels of the pointer is a candidate. Only the candidates at the nearest
//! coordinate are reported, and they are reported together, so records of several groups that
//! share a key show up in one tooltip.

extern crate alloc;

use alloc::vec::Vec;

use chartloom_core::Mark;
use kurbo::{BezPath, Point};
use smallvec::SmallVec;

use crate::color::neutral;
use crate::component::{ChartContext, Component, Hit, HitPoint, RenderTarget};
use crate::series::plotted_points;
use crate::z_order;

/// Coordinates closer than this are the same position.
const TIE_EPSILON: f64 = 1e-6;

/// How the reported record set changed between two pointer positions.
#[derive(Clone, Debug, PartialEq)]
pub enum HoverChange {
    /// Same records as before, or still none.
    Unchanged,
    /// Records appeared where there were none.
    Enter(SmallVec<[HitPoint; 4]>),
    /// The previous records are gone.
    Leave(SmallVec<[HitPoint; 4]>),
    /// A different set replaced the previous one.
    ///
    /// Consumers report the mouseout for `previous` before the hover for `next`.
    Switch {
        /// Set that is no longer hovered.
        previous: SmallVec<[HitPoint; 4]>,
        /// Newly hovered set.
        next: SmallVec<[HitPoint; 4]>,
    },
}

fn same_records(a: &[HitPoint], b: &[HitPoint]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| a.datum.group == b.datum.group && a.datum.identity() == b.datum.identity())
}

/// Compares the hovered sets before and after a pointer move.
pub fn hover_change(previous: &[HitPoint], next: &[HitPoint]) -> HoverChange {
    match (previous.is_empty(), next.is_empty()) {
        (true, true) => HoverChange::Unchanged,
        (true, false) => HoverChange::Enter(next.iter().cloned().collect()),
        (false, true) => HoverChange::Leave(previous.iter().cloned().collect()),
        (false, false) if same_records(previous, next) => HoverChange::Unchanged,
        (false, false) => HoverChange::Switch {
            previous: previous.iter().cloned().collect(),
            next: next.iter().cloned().collect(),
        },
    }
}

/// Records reported for a pointer at `pos`.
///
/// Empty when the pointer is outside the plot or nothing lies within `threshold`.
pub fn ruler_matches(
    ctx: &ChartContext<'_>,
    stacked: bool,
    pos: Point,
    threshold: f64,
) -> SmallVec<[HitPoint; 4]> {
    let mut matches = SmallVec::new();
    let Some(scales) = ctx.scales else {
        return matches;
    };
    if !scales.plot().contains(pos) {
        return matches;
    }
    let cursor = scales.domain_coordinate(pos);
    let mut best: Option<f64> = None;
    for (group, points) in plotted_points(ctx.model, scales, stacked) {
        for (datum, position) in points {
            let distance = (scales.domain_coordinate(position) - cursor).abs();
            if distance > threshold {
                continue;
            }
            let hit = HitPoint {
                datum: datum.clone(),
                position,
                color: ctx.model.stroke_color(group, Some(datum)),
            };
            match best {
                Some(b) if distance > b + TIE_EPSILON => {}
                Some(b) if distance >= b - TIE_EPSILON => matches.push(hit),
                _ => {
                    best = Some(distance);
                    matches.clear();
                    matches.push(hit);
                }
            }
        }
    }
    matches
}

/// Dashed guide across the plot at the hovered domain position.
#[derive(Clone, Debug, Default)]
pub struct RulerComponent {
    stacked: bool,
}

impl RulerComponent {
    /// A ruler over plain series.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ruler that follows stacked tops.
    pub fn stacked() -> Self {
        Self { stacked: true }
    }
}

impl Component for RulerComponent {
    fn name(&self) -> &'static str {
        "ruler"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(scales) = ctx.scales else {
            return;
        };
        if !ctx.options.ruler.enabled {
            return;
        }
        let Some(first) = ctx.interaction.hovered_points.first() else {
            return;
        };
        let plot = scales.plot();
        let at = scales.domain_coordinate(first.position);
        let (from, to) = if scales.domain_axis().is_vertical() {
            (Point::new(plot.x0, at), Point::new(plot.x1, at))
        } else {
            (Point::new(at, plot.y0), Point::new(at, plot.y1))
        };
        let mut line = BezPath::new();
        line.move_to(from);
        line.line_to(to);
        let id = target.id("ruler", "");
        target.push(
            Mark::builder(id)
                .path(line)
                .stroke(neutral::TEXT_SECONDARY, 1.0)
                .dash(2.0, 2.0)
                .z_index(z_order::RULER)
                .class("ruler-line")
                .build(),
        );
    }

    fn hit_test(&self, ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        if !ctx.options.ruler.enabled {
            return None;
        }
        let matches = ruler_matches(ctx, self.stacked, pos, ctx.options.ruler.threshold);
        (!matches.is_empty()).then_some(Hit::Points(matches))
    }

    fn is_overlay(&self) -> bool {
        true
    }
}

/// Distinct domain coordinates of every plotted record, ascending.
pub fn domain_coordinates(ctx: &ChartContext<'_>, stacked: bool) -> Vec<f64> {
    let Some(scales) = ctx.scales else {
        return Vec::new();
    };
    let mut out: Vec<f64> = plotted_points(ctx.model, scales, stacked)
        .into_iter()
        .flat_map(|(_, points)| points.into_iter().map(|(_, p)| scales.domain_coordinate(p)))
        .collect();
    out.sort_by(f64::total_cmp);
    out.dedup_by(|a, b| (*a - *b).abs() < TIE_EPSILON);
    out
}
