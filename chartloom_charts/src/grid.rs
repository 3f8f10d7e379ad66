// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot backdrop and gridlines.

use chartloom_core::Mark;
use kurbo::{BezPath, Rect};
use peniko::Color;

use crate::axes::axis_ticks;
use crate::cartesian::{AxisPosition, CartesianScales, CartesianSpec};
use crate::color::neutral;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::z_order;

const BACKDROP: Color = Color::from_rgb8(0xf3, 0xf3, 0xf3);

/// Draws the plot backdrop and gridlines at the main axes' ticks.
#[derive(Clone, Debug, Default)]
pub struct GridComponent;

fn lines(
    spec: &CartesianSpec,
    scales: &CartesianScales,
    position: AxisPosition,
    plot: Rect,
    scope: &'static str,
    target: &mut RenderTarget<'_>,
) {
    let (Some(axis), Some(scale)) = (spec.axis(position), scales.scale(position)) else {
        return;
    };
    for tick in axis_ticks(axis, scale) {
        let mut path = BezPath::new();
        if position.is_vertical() {
            path.move_to((plot.x0, tick.pixel));
            path.line_to((plot.x1, tick.pixel));
        } else {
            path.move_to((tick.pixel, plot.y0));
            path.line_to((tick.pixel, plot.y1));
        }
        let id = target.id(scope, &tick.label);
        target.push(
            Mark::builder(id)
                .path(path)
                .stroke(neutral::GRID, 1.0)
                .z_index(z_order::GRID_LINES)
                .class(scope)
                .transition("grid-update")
                .build(),
        );
    }
}

impl Component for GridComponent {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let (Some(spec), Some(scales)) = (ctx.cartesian, ctx.scales) else {
            return;
        };
        let plot = scales.plot();
        let id = target.id("grid-backdrop", "");
        target.push(
            Mark::builder(id)
                .rect(plot)
                .fill(BACKDROP)
                .z_index(z_order::PLOT_BACKGROUND)
                .class("grid-backdrop")
                .build(),
        );
        if ctx.options.grid.x {
            lines(spec, scales, spec.main_x(), plot, "grid-x", target);
        }
        if ctx.options.grid.y {
            lines(spec, scales, spec.main_y(), plot, "grid-y", target);
        }
    }
}
