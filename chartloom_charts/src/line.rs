// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line series.

extern crate alloc;

use alloc::vec::Vec;

use chartloom_core::Mark;
use kurbo::{BezPath, Point};
use peniko::Color;

use crate::component::{ChartContext, Component, RenderTarget};
use crate::curve::split_defined;
use crate::series::{active_series, stacked_series};
use crate::z_order;

/// One path per active group, interpolated with the configured curve.
///
/// Gaps (records without a value) break the line. When `stacked`, lines follow the tops of the
/// stacked bands instead of the raw values.
#[derive(Clone, Debug, Default)]
pub struct LineComponent {
    /// Follow stacked tops.
    pub stacked: bool,
}

impl LineComponent {
    /// Lines over stacked bands.
    pub fn stacked() -> Self {
        Self { stacked: true }
    }
}

fn push_line(
    ctx: &ChartContext<'_>,
    target: &mut RenderTarget<'_>,
    group: &str,
    points: impl IntoIterator<Item = Option<Point>>,
) {
    let mut path = BezPath::new();
    for run in split_defined(points) {
        ctx.options.curve.append(&mut path, &run, true);
    }
    let id = target.id("line", group);
    target.push(
        Mark::builder(id)
            .path(path)
            .fill(Color::TRANSPARENT)
            .stroke(ctx.model.stroke_color(group, None), 1.5)
            .opacity(ctx.group_opacity(group))
            .z_index(z_order::SERIES_STROKE)
            .class("line")
            .transition("line-update-enter")
            .build(),
    );
}

impl Component for LineComponent {
    fn name(&self) -> &'static str {
        "line"
    }

    fn within_chart_clip(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(scales) = ctx.scales else {
            return;
        };
        if self.stacked {
            for (group, points) in stacked_series(ctx.model, scales) {
                let tops: Vec<Option<Point>> = points.iter().map(|p| Some(p.top)).collect();
                push_line(ctx, target, group, tops);
            }
        } else {
            for series in active_series(ctx.model, Some(scales)) {
                let points: Vec<Option<Point>> =
                    series.data.iter().map(|d| scales.point(d)).collect();
                push_line(ctx, target, series.group, points);
            }
        }
    }
}
