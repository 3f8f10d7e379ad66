// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stems joining each dot of a lollipop chart to the value baseline.

extern crate alloc;

use alloc::string::String;

use chartloom_core::Mark;
use kurbo::BezPath;

use crate::component::{ChartContext, Component, RenderTarget};
use crate::series::active_series;
use crate::z_order;

/// One stem per plotted record, from the baseline to the rim of its dot.
///
/// The dots themselves come from a [`ScatterComponent`](crate::ScatterComponent) drawn above.
/// Stems follow the chart orientation, so horizontal charts grow them from the left.
#[derive(Clone, Copy, Debug, Default)]
pub struct LollipopComponent;

impl Component for LollipopComponent {
    fn name(&self) -> &'static str {
        "lollipop"
    }

    fn within_chart_clip(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(scales) = ctx.scales else {
            return;
        };
        let radius = ctx.options.points.radius;
        for series in active_series(ctx.model, Some(scales)) {
            let base = scales.baseline(series.group);
            let opacity = ctx.group_opacity(series.group);
            for &datum in &series.data {
                let (Some(d), Some(r)) = (scales.domain_value(datum), scales.range_value(datum))
                else {
                    continue;
                };
                // Stop at the rim so the stem does not show through hollow dots.
                if (r - base).abs() <= radius {
                    continue;
                }
                let rim = r + radius * (base - r).signum();
                let mut path = BezPath::new();
                path.move_to(scales.point_at(d, base));
                path.line_to(scales.point_at(d, rim));

                let key = datum.identity().unwrap_or_else(String::new);
                let id = target.id2("stem", series.group, &key);
                target.push(
                    Mark::builder(id)
                        .path(path)
                        .stroke(ctx.model.fill_color(series.group, Some(datum)), 1.0)
                        .opacity(opacity)
                        .z_index(z_order::SERIES_STROKE)
                        .class("lollipop-stem")
                        .transition("lollipop-line-update-enter")
                        .build(),
                );
            }
        }
    }
}
