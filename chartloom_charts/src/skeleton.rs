// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placeholders drawn while a chart has nothing to show.
//!
//! A skeleton mirrors the geometry of the chart it stands in for. While data is loading it
//! carries a shimmer band; otherwise it is drawn as a flat empty state. As soon as any display
//! data exists the skeleton renders nothing, so reconciliation removes every skeleton mark.

extern crate alloc;

use alloc::format;

use chartloom_core::Mark;
use kurbo::{BezPath, Circle, Point, Rect, Shape};

use crate::color::neutral;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::scale::nice_ticks;
use crate::z_order;

/// Width of the shimmer band as a fraction of the placeholder.
const SHIMMER_WIDTH: f64 = 0.2;

/// Placeholder shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkeletonVariant {
    /// Backdrop with vertical and horizontal gridlines (bar, scatter).
    Grid,
    /// Backdrop with horizontal gridlines only (line, area).
    Lines,
    /// Full disc.
    Pie,
    /// Ring.
    Donut,
}

/// Loading and empty-state placeholder.
#[derive(Clone, Debug)]
pub struct SkeletonComponent {
    variant: SkeletonVariant,
}

impl SkeletonComponent {
    /// A placeholder of `variant`.
    pub fn new(variant: SkeletonVariant) -> Self {
        Self { variant }
    }

    /// The placeholder shape.
    pub fn variant(&self) -> SkeletonVariant {
        self.variant
    }
}

fn paint(shimmer: bool) -> (peniko::Color, &'static str) {
    if shimmer {
        (neutral::SKELETON, "shimmer-effect-lines")
    } else {
        (neutral::GRID, "empty-state-lines")
    }
}

fn grid(target: &mut RenderTarget<'_>, plot: Rect, vertical: bool, shimmer: bool) {
    let (color, class) = paint(shimmer);
    let id = target.id("skeleton-backdrop", "");
    target.push(
        Mark::builder(id)
            .rect(plot)
            .fill(neutral::BACKGROUND)
            .stroke(color, 1.0)
            .z_index(z_order::PLOT_BACKGROUND)
            .class(class)
            .build(),
    );
    for t in nice_ticks(0.0, 1.0, 5) {
        let y = plot.y1 - t * plot.height();
        let mut path = BezPath::new();
        path.move_to((plot.x0, y));
        path.line_to((plot.x1, y));
        let id = target.id2("skeleton-grid", "y", &format!("{t}"));
        target.push(
            Mark::builder(id)
                .path(path)
                .stroke(color, 1.0)
                .z_index(z_order::GRID_LINES)
                .class(class)
                .build(),
        );
        if vertical {
            let x = plot.x0 + t * plot.width();
            let mut path = BezPath::new();
            path.move_to((x, plot.y0));
            path.line_to((x, plot.y1));
            let id = target.id2("skeleton-grid", "x", &format!("{t}"));
            target.push(
                Mark::builder(id)
                    .path(path)
                    .stroke(color, 1.0)
                    .z_index(z_order::GRID_LINES)
                    .class(class)
                    .build(),
            );
        }
    }
    if shimmer {
        let band = Rect::new(
            plot.x0,
            plot.y0,
            plot.x0 + plot.width() * SHIMMER_WIDTH,
            plot.y1,
        );
        let id = target.id("skeleton-shimmer", "");
        target.push(
            Mark::builder(id)
                .rect(band)
                .fill(neutral::SHIMMER)
                .opacity(0.6)
                .z_index(z_order::GRID_LINES + 1)
                .class("shimmer")
                .build(),
        );
    }
}

fn ring(ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>, region: Rect, donut: bool, shimmer: bool) {
    let offset = ctx.options.pie.radius_offset;
    let side = region.width().min(region.height());
    let outer = side / 2.0 + offset;
    if outer <= 0.0 {
        return;
    }
    let inner = if donut { outer * 0.75 } else { 0.0 };
    let center = Point::new(
        region.x0 + outer + offset.abs(),
        region.y0 + outer + (side - outer * 2.0) / 2.0,
    );
    let shape = Circle::new(center, outer).segment(inner, 0.0, core::f64::consts::TAU);
    let (fill, class) = if shimmer {
        (neutral::SKELETON, "shimmer-effect-areas")
    } else {
        (neutral::GRID, "empty-state-areas")
    };
    let id = target.id("skeleton-area", "");
    target.push(
        Mark::builder(id)
            .path(shape.to_path(0.1))
            .fill(fill)
            .z_index(z_order::SERIES_FILL)
            .class(class)
            .build(),
    );
}

impl Component for SkeletonComponent {
    fn name(&self) -> &'static str {
        "skeleton"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        if !ctx.model.display_data().is_empty() {
            return;
        }
        let shimmer = ctx.options.data.loading;
        tracing::trace!(variant = ?self.variant, shimmer, "drawing skeleton");
        let region = target.region;
        let plot = ctx.scales.map_or(region, |s| s.plot());
        match self.variant {
            SkeletonVariant::Grid => grid(target, plot, true, shimmer),
            SkeletonVariant::Lines => grid(target, plot, false, shimmer),
            SkeletonVariant::Pie => ring(ctx, target, region, false, shimmer),
            SkeletonVariant::Donut => ring(ctx, target, region, true, shimmer),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::component::InteractionState;
    use crate::data::{ChartData, Datum};
    use crate::layout::Size;
    use crate::measure::HeuristicTextMeasurer;
    use crate::model::{ChartModel, Mutation};
    use crate::options::ChartOptions;
    use alloc::vec;
    use alloc::vec::Vec;
    use chartloom_core::IdArena;

    fn render(model: &ChartModel, variant: SkeletonVariant) -> Vec<Mark> {
        let interaction = InteractionState::default();
        let ctx = ChartContext {
            model,
            options: model.options(),
            cartesian: None,
            scales: None,
            measurer: &HeuristicTextMeasurer,
            interaction: &interaction,
            size: Size::new(400.0, 300.0),
        };
        let mut ids = IdArena::new();
        let mut target = RenderTarget::new(Rect::new(0.0, 0.0, 200.0, 100.0), false, &mut ids);
        SkeletonComponent::new(variant).render(&ctx, &mut target);
        target.into_marks()
    }

    #[test]
    fn loading_grid_shimmers() {
        let mut options = ChartOptions::default();
        options.data.loading = true;
        let model = ChartModel::new(ChartData::default(), options);
        let marks = render(&model, SkeletonVariant::Grid);
        assert!(marks.iter().any(|m| m.class == "shimmer"), "shimmer band");
        // Backdrop, 6 horizontal and 6 vertical lines, and the band.
        assert_eq!(marks.len(), 14, "full grid");
    }

    #[test]
    fn empty_state_is_flat_and_data_replaces_it() {
        let mut model = ChartModel::new(ChartData::default(), ChartOptions::default());
        let marks = render(&model, SkeletonVariant::Donut);
        assert_eq!(marks.len(), 1, "one ring");
        assert_eq!(marks[0].class, "empty-state-areas", "no shimmer");

        model.apply(Mutation::SetData(ChartData::Records(vec![Datum::grouped("A", 1.0)])));
        assert!(render(&model, SkeletonVariant::Donut).is_empty(), "data replaces the skeleton");
    }
}
