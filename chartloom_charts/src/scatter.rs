// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dots, for scatter charts and as markers on lines and areas.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::Mark;
use kurbo::{Circle, Point, Shape};
use smallvec::SmallVec;

use crate::color::{faded, neutral};
use crate::component::{ChartContext, Component, Hit, HitPoint, RenderTarget};
use crate::series::plotted_points;
use crate::z_order;

/// Extra hit radius around each dot.
const HIT_SLOP: f64 = 3.0;

/// How much a hovered dot grows.
const HOVER_GROWTH: f64 = 1.5;

/// One dot per record of every active group.
///
/// Standalone scatter dots are filled with the group color at `points.fill_opacity` (or
/// hollow when `points.filled` is off). Markers on lines are always hollow and follow the
/// stacked tops when `stacked`.
#[derive(Clone, Debug)]
pub struct ScatterComponent {
    markers: bool,
    stacked: bool,
}

impl Default for ScatterComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterComponent {
    /// Standalone scatter dots.
    pub fn new() -> Self {
        Self {
            markers: false,
            stacked: false,
        }
    }

    /// Hollow markers on line or area charts.
    pub fn markers(stacked: bool) -> Self {
        Self {
            markers: true,
            stacked,
        }
    }

    fn positions<'a>(&self, ctx: &ChartContext<'a>) -> Vec<(&'a str, Vec<HitPoint>)> {
        let Some(scales) = ctx.scales else {
            return Vec::new();
        };
        plotted_points(ctx.model, scales, self.stacked)
            .into_iter()
            .map(|(group, points)| {
                let points = points
                    .into_iter()
                    .map(|(datum, position)| HitPoint {
                        datum: datum.clone(),
                        position,
                        color: ctx.model.stroke_color(group, Some(datum)),
                    })
                    .collect();
                (group, points)
            })
            .collect()
    }

    fn radius(&self, ctx: &ChartContext<'_>) -> f64 {
        if self.markers {
            ctx.options.points.radius
        } else {
            ctx.options.points.radius + 1.0
        }
    }
}

impl Component for ScatterComponent {
    fn name(&self) -> &'static str {
        if self.markers { "markers" } else { "scatter" }
    }

    fn within_chart_clip(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        if self.markers && !ctx.options.points.enabled {
            return;
        }
        let points = &ctx.options.points;
        let radius = self.radius(ctx);
        for (group, dots) in self.positions(ctx) {
            let opacity = ctx.group_opacity(group);
            for dot in dots {
                let key = dot.datum.identity().unwrap_or_else(String::new);
                let hovered = ctx.interaction.is_hovered(&dot.datum);
                let r = if hovered { radius + HOVER_GROWTH } else { radius };
                let fill = if hovered {
                    ctx.model.fill_color(group, Some(&dot.datum))
                } else if self.markers || !points.filled {
                    neutral::BACKGROUND
                } else {
                    faded(ctx.model.fill_color(group, Some(&dot.datum)), points.fill_opacity)
                };
                let id = target.id2("dot", group, &key);
                target.push(
                    Mark::builder(id)
                        .path(Circle::new(dot.position, r).to_path(0.1))
                        .fill(fill)
                        .stroke(dot.color, 1.0)
                        .opacity(opacity)
                        .z_index(z_order::SERIES_POINTS)
                        .class(if hovered { "dot-hovered" } else { "dot" })
                        .transition("scatter-update-enter")
                        .build(),
                );
            }
        }
    }

    fn hit_test(&self, ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        if self.markers && !ctx.options.points.enabled {
            return None;
        }
        let reach = self.radius(ctx) + HIT_SLOP;
        let mut best: Option<f64> = None;
        let mut hits: SmallVec<[HitPoint; 4]> = SmallVec::new();
        for (_, dots) in self.positions(ctx) {
            for dot in dots {
                let distance = dot.position.distance(pos);
                if distance > reach {
                    continue;
                }
                match best {
                    Some(b) if distance > b + 1e-9 => {}
                    Some(b) if distance >= b - 1e-9 => hits.push(dot),
                    _ => {
                        best = Some(distance);
                        hits.clear();
                        hits.push(dot);
                    }
                }
            }
        }
        (!hits.is_empty()).then_some(Hit::Points(hits))
    }
}
