// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filled areas, plain (down to the zero baseline) and stacked.

extern crate alloc;

use alloc::vec::Vec;

use chartloom_core::Mark;
use kurbo::{BezPath, Point};

use crate::color::faded;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::curve::{Curve, split_defined};
use crate::series::{active_series, stacked_series};
use crate::z_order;

/// Fill opacity of area bands.
pub const AREA_OPACITY: f64 = 0.3;

/// One filled band per active group.
#[derive(Clone, Debug, Default)]
pub struct AreaComponent {
    /// Stack groups on top of each other.
    pub stacked: bool,
}

impl AreaComponent {
    /// Stacked bands.
    pub fn stacked() -> Self {
        Self { stacked: true }
    }
}

/// Appends one closed band: `top` left to right, then `bottom` back.
fn band(path: &mut BezPath, curve: Curve, top: &[Point], bottom: &[Point]) {
    if top.is_empty() {
        return;
    }
    curve.append(path, top, true);
    let back: Vec<Point> = bottom.iter().rev().copied().collect();
    curve.append(path, &back, false);
    path.close_path();
}

impl Component for AreaComponent {
    fn name(&self) -> &'static str {
        if self.stacked { "stacked-area" } else { "area" }
    }

    fn within_chart_clip(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(scales) = ctx.scales else {
            return;
        };
        let curve = ctx.options.curve;
        let mut bands: Vec<(&str, BezPath)> = Vec::new();
        if self.stacked {
            for (group, points) in stacked_series(ctx.model, scales) {
                let top: Vec<Point> = points.iter().map(|p| p.top).collect();
                let bottom: Vec<Point> = points.iter().map(|p| p.bottom).collect();
                let mut path = BezPath::new();
                band(&mut path, curve, &top, &bottom);
                bands.push((group, path));
            }
        } else {
            for series in active_series(ctx.model, Some(scales)) {
                let baseline = scales.baseline(series.group);
                let mut path = BezPath::new();
                let tops = series.data.iter().map(|d| scales.point(d));
                for run in split_defined(tops) {
                    let bottom: Vec<Point> = run
                        .iter()
                        .map(|p| scales.point_at(scales.domain_coordinate(*p), baseline))
                        .collect();
                    band(&mut path, curve, &run, &bottom);
                }
                bands.push((series.group, path));
            }
        }
        for (group, path) in bands {
            let color = ctx.model.fill_color(group, None);
            let opacity = ctx.group_opacity(group);
            let id = target.id("area", group);
            target.push(
                Mark::builder(id)
                    .path(path)
                    .fill(faded(color, AREA_OPACITY))
                    .opacity(opacity)
                    .z_index(z_order::SERIES_FILL)
                    .class("area")
                    .transition("area-update-enter")
                    .build(),
            );
        }
    }
}
