// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold lines declared on axes.

extern crate alloc;

use alloc::format;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{BezPath, Point};

use crate::color::neutral;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::options::AxisValue;
use crate::scale::Scale;
use crate::z_order;

/// Pixel position of `value` on `scale`, or `None` when it falls outside the visible range.
pub fn threshold_pixel(scale: &Scale, value: &AxisValue) -> Option<f64> {
    let px = match value {
        AxisValue::Number(v) if scale.is_continuous() => scale.map_number(*v)?,
        AxisValue::Key(k) => scale.map_key(k)?,
        AxisValue::Number(_) => return None,
    };
    let (r0, r1) = scale.range();
    let (lo, hi) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
    (px >= lo - 1e-9 && px <= hi + 1e-9).then_some(px)
}

/// Dashed lines (and optional labels) across the plot for every axis threshold.
#[derive(Clone, Debug, Default)]
pub struct ThresholdComponent;

impl Component for ThresholdComponent {
    fn name(&self) -> &'static str {
        "thresholds"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let (Some(spec), Some(scales)) = (ctx.cartesian, ctx.scales) else {
            return;
        };
        let plot = scales.plot();
        for axis in spec.axes() {
            let Some(scale) = scales.scale(axis.position) else {
                continue;
            };
            for (i, threshold) in axis.options.thresholds.iter().enumerate() {
                let key = format!("{}-{i}", axis.position.name());
                let Some(px) = threshold_pixel(scale, &threshold.value) else {
                    tracing::trace!(threshold = key.as_str(), "threshold outside the domain");
                    continue;
                };
                let color = threshold.color.unwrap_or(neutral::THRESHOLD);
                let (a, b) = if axis.position.is_vertical() {
                    (Point::new(plot.x0, px), Point::new(plot.x1, px))
                } else {
                    (Point::new(px, plot.y0), Point::new(px, plot.y1))
                };
                let mut path = BezPath::new();
                path.move_to(a);
                path.line_to(b);
                let id = target.id("threshold", &key);
                target.push(
                    Mark::builder(id)
                        .path(path)
                        .stroke(color, 1.0)
                        .dash(4.0, 4.0)
                        .z_index(z_order::THRESHOLDS)
                        .class("threshold-line")
                        .transition("threshold-update")
                        .build(),
                );
                if let Some(label) = threshold.label.as_deref() {
                    let id = target.id("threshold-label", &key);
                    let at = if axis.position.is_vertical() {
                        Point::new(b.x - 4.0, b.y - 4.0)
                    } else {
                        Point::new(a.x + 4.0, a.y + 4.0)
                    };
                    let anchor = if axis.position.is_vertical() {
                        TextAnchor::End
                    } else {
                        TextAnchor::Start
                    };
                    let baseline = if axis.position.is_vertical() {
                        TextBaseline::Alphabetic
                    } else {
                        TextBaseline::Hanging
                    };
                    target.push(
                        Mark::builder(id)
                            .text(at, label)
                            .font_size(11.0)
                            .anchor(anchor)
                            .baseline(baseline)
                            .fill(color)
                            .z_index(z_order::THRESHOLDS)
                            .class("threshold-label")
                            .transition("threshold-update")
                            .build(),
                    );
                }
            }
        }
    }
}
