// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{BezPath, Circle, Point, Rect, Shape, Vec2};
use smallvec::smallvec;

use crate::angle::{polar_to_cartesian, screen_angle};
use crate::color::neutral;
use crate::component::{ChartContext, Component, Hit, HitPoint, RenderTarget};
use crate::data::Datum;
use crate::format::{format_number, format_percentage};
use crate::measure::TextStyle;
use crate::pie_layout::{
    PieSlice, callout_directions, callout_leader, chart_angle_of, label_placement, pie_layout,
};
use crate::z_order;

/// Font size of slice labels.
const LABEL_FONT_SIZE: f64 = 12.0;

/// Outer radius of a donut over its inner radius.
const DONUT_HOLE: f64 = 0.75;

/// Resolved pie geometry for one render pass.
#[derive(Clone, Debug)]
pub struct PieGeometry {
    /// Pie center.
    pub center: Point,
    /// Outer radius.
    pub radius: f64,
    /// Inner radius.
    pub inner_radius: f64,
    /// Sum of all slice values.
    pub total: f64,
    /// Slices with their group and aggregated value, in input order.
    pub slices: Vec<(String, PieSlice)>,
}

impl PieGeometry {
    /// Lays out the active groups of `ctx` in `region`.
    ///
    /// Returns `None` when the region is too small to hold a pie.
    pub fn compute(ctx: &ChartContext<'_>, region: Rect, donut: bool) -> Option<Self> {
        let options = &ctx.options.pie;
        let radius = region.width().min(region.height()) / 2.0 + options.radius_offset;
        if radius <= 0.0 {
            tracing::debug!(radius, "pie region too small");
            return None;
        }
        let mut groups: Vec<(String, f64)> = Vec::new();
        for group in ctx.model.active_groups() {
            let sum: f64 = ctx
                .model
                .display_data()
                .iter()
                .filter(|d| d.group == group)
                .filter_map(|d| d.value)
                .sum();
            groups.push((String::from(group), sum));
        }
        let values: Vec<f64> = groups.iter().map(|(_, v)| *v).collect();
        let slices = pie_layout(&values, options.pad_angle, options.sort_by_value);
        let total = values.iter().filter(|v| **v > 0.0).sum();

        let labeled: Vec<PieSlice> = slices.iter().copied().filter(|s| s.value > 0.0).collect();
        let has_callouts = options.labels_enabled
            && callout_directions(&labeled, options.callout.min_slice_degree)
                .iter()
                .any(Option::is_some);
        let mut y = region.y0 + radius + options.y_offset;
        if has_callouts {
            y += options.y_offset_callout;
        }
        let center = Point::new(region.x0 + radius + options.x_offset, y);
        let inner_radius = if donut {
            radius * DONUT_HOLE
        } else {
            options.inner_radius
        };
        Some(Self {
            center,
            radius,
            inner_radius,
            total,
            slices: groups
                .into_iter()
                .map(|(g, _)| g)
                .zip(slices)
                .collect(),
        })
    }

    /// Slice under `pos`, if any.
    pub fn slice_at(&self, pos: Point) -> Option<&(String, PieSlice)> {
        let v = pos - self.center;
        let r = v.hypot();
        if r < self.inner_radius || r > self.radius {
            return None;
        }
        let angle = chart_angle_of(v);
        self.slices.iter().find(|(_, s)| s.contains_angle(angle))
    }
}

fn slice_path(center: Point, inner: f64, outer: f64, slice: &PieSlice) -> BezPath {
    let start = screen_angle(slice.start_angle + slice.pad_angle / 2.0);
    let sweep = (slice.span() - slice.pad_angle).max(0.0);
    let segment = Circle::new(center, outer).segment(inner, start, sweep);
    segment.path_elements(0.1).collect()
}

/// A pie, or a donut with a total in the middle.
#[derive(Clone, Debug, Default)]
pub struct PieComponent {
    donut: bool,
    geometry: Option<PieGeometry>,
}

impl PieComponent {
    /// A plain pie.
    pub fn pie() -> Self {
        Self {
            donut: false,
            geometry: None,
        }
    }

    /// A donut.
    pub fn donut() -> Self {
        Self {
            donut: true,
            geometry: None,
        }
    }

    fn label_text(ctx: &ChartContext<'_>, value: f64, total: f64) -> String {
        let pct = format_percentage(value, total);
        match &ctx.options.pie.label_formatter {
            Some(f) => (f.0)(value, &pct),
            None => pct,
        }
    }

    fn render_labels(
        &self,
        ctx: &ChartContext<'_>,
        target: &mut RenderTarget<'_>,
        geometry: &PieGeometry,
    ) {
        let options = &ctx.options.pie;
        let labeled: Vec<&(String, PieSlice)> =
            geometry.slices.iter().filter(|(_, s)| s.value > 0.0).collect();
        let only_slices: Vec<PieSlice> = labeled.iter().map(|(_, s)| *s).collect();
        let directions = callout_directions(&only_slices, options.callout.min_slice_degree);
        for ((group, slice), direction) in labeled.into_iter().zip(directions) {
            let text = Self::label_text(ctx, slice.value, geometry.total);
            let width = ctx
                .measurer
                .measure(&text, TextStyle::new(LABEL_FONT_SIZE))
                .width;
            let placement = label_placement(slice, geometry.radius, width, direction, &options.callout);
            let id = target.id("pie-label", group);
            target.push(
                Mark::builder(id)
                    .text(geometry.center + placement.position, text)
                    .font_size(LABEL_FONT_SIZE)
                    .anchor(TextAnchor::Middle)
                    .baseline(TextBaseline::Middle)
                    .fill(neutral::TEXT)
                    .opacity(ctx.group_opacity(group))
                    .z_index(z_order::SERIES_LABELS)
                    .class("pie-label")
                    .transition("pie-slice-enter-update")
                    .build(),
            );
            if let Some([start, elbow, end]) = callout_leader(&placement, &options.callout) {
                let mut path = BezPath::new();
                path.move_to(geometry.center + start);
                path.line_to(geometry.center + elbow);
                path.line_to(geometry.center + end);
                let id = target.id("pie-callout", group);
                target.push(
                    Mark::builder(id)
                        .path(path)
                        .stroke(neutral::AXIS, 1.0)
                        .z_index(z_order::SERIES_LABELS)
                        .class("pie-callout")
                        .build(),
                );
            }
        }
    }

    fn render_center(
        &self,
        ctx: &ChartContext<'_>,
        target: &mut RenderTarget<'_>,
        geometry: &PieGeometry,
    ) {
        let donut = &ctx.options.donut;
        let number = match &donut.center_number_formatter {
            Some(f) => (f.0)(geometry.total, &donut.center_label),
            None => format_number(geometry.total),
        };
        let number_size = (geometry.radius / 4.0).max(LABEL_FONT_SIZE);
        let label_size = (geometry.radius / 10.0).max(LABEL_FONT_SIZE);
        let id = target.id("donut-figure", "");
        target.push(
            Mark::builder(id)
                .text(geometry.center, number)
                .font_size(number_size)
                .anchor(TextAnchor::Middle)
                .baseline(TextBaseline::Middle)
                .fill(neutral::TEXT)
                .z_index(z_order::SERIES_LABELS)
                .class("donut-figure")
                .transition("donut-figure-enter-update")
                .build(),
        );
        let id = target.id("donut-title", "");
        target.push(
            Mark::builder(id)
                .text(
                    geometry.center + Vec2::new(0.0, number_size * 0.75 + 4.0),
                    donut.center_label.as_str(),
                )
                .font_size(label_size)
                .anchor(TextAnchor::Middle)
                .baseline(TextBaseline::Hanging)
                .fill(neutral::TEXT_SECONDARY)
                .z_index(z_order::SERIES_LABELS)
                .class("donut-title")
                .build(),
        );
    }
}

impl Component for PieComponent {
    fn name(&self) -> &'static str {
        if self.donut { "donut" } else { "pie" }
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        self.geometry = PieGeometry::compute(ctx, target.region, self.donut);
        let Some(geometry) = self.geometry.clone() else {
            return;
        };
        let hover = ctx.options.pie.hover_arc_offset;
        for (group, slice) in &geometry.slices {
            let datum = Datum::grouped(group.as_str(), slice.value);
            let outer = if ctx.interaction.is_hovered(&datum) {
                geometry.radius + hover
            } else {
                geometry.radius
            };
            let id = target.id("slice", group);
            target.push(
                Mark::builder(id)
                    .path(slice_path(geometry.center, geometry.inner_radius, outer, slice))
                    .fill(ctx.model.fill_color(group, Some(&datum)))
                    .opacity(ctx.group_opacity(group))
                    .z_index(z_order::SERIES_FILL)
                    .class("slice")
                    .transition("pie-slice-enter-update")
                    .build(),
            );
        }
        if ctx.options.pie.labels_enabled {
            self.render_labels(ctx, target, &geometry);
        }
        if self.donut {
            self.render_center(ctx, target, &geometry);
        }
    }

    fn hit_test(&self, ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        let geometry = self.geometry.as_ref()?;
        let (group, slice) = geometry.slice_at(pos)?;
        let mid = screen_angle(slice.mid_angle());
        Some(Hit::Points(smallvec![HitPoint {
            datum: Datum::grouped(group.as_str(), slice.value),
            position: polar_to_cartesian(mid, geometry.radius, geometry.center),
            color: ctx.model.stroke_color(group, None),
        }]))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::component::InteractionState;
    use crate::data::ChartData;
    use crate::layout::Size;
    use crate::measure::HeuristicTextMeasurer;
    use crate::model::ChartModel;
    use crate::options::ChartOptions;
    use alloc::vec;
    use chartloom_core::IdArena;

    fn model() -> ChartModel {
        ChartModel::new(
            ChartData::Records(vec![
                Datum::grouped("A", 30.0),
                Datum::grouped("B", 10.0),
            ]),
            ChartOptions::default().with_size(400.0, 300.0),
        )
    }

    fn context<'a>(model: &'a ChartModel, interaction: &'a InteractionState) -> ChartContext<'a> {
        ChartContext {
            model,
            options: model.options(),
            cartesian: None,
            scales: None,
            measurer: &HeuristicTextMeasurer,
            interaction,
            size: Size::new(400.0, 300.0),
        }
    }

    #[test]
    fn donut_draws_slices_labels_and_a_total() {
        let model = model();
        let interaction = InteractionState::default();
        let ctx = context(&model, &interaction);
        let mut ids = IdArena::new();
        let mut target = RenderTarget::new(Rect::new(0.0, 0.0, 300.0, 300.0), false, &mut ids);
        let mut donut = PieComponent::donut();
        donut.render(&ctx, &mut target);
        let count = |class: &str| target.marks.iter().filter(|m| m.class == class).count();
        assert_eq!(count("slice"), 2, "one slice per group");
        assert_eq!(count("pie-label"), 2, "one label per slice");
        assert_eq!(count("donut-figure"), 1, "center total");

        let geometry = donut.geometry.clone().expect("laid out");
        assert_eq!(geometry.radius, 135.0, "half the side less the offset");
        assert_eq!(geometry.inner_radius, 135.0 * 0.75, "donut hole");
        assert_eq!(geometry.total, 40.0, "sum of values");

        // A spans the first three quarters of the turn, starting at twelve o'clock.
        let right = geometry.center + Vec2::new(120.0, 0.0);
        let Some(Hit::Points(points)) = donut.hit_test(&ctx, right) else {
            panic!("slice under the pointer");
        };
        assert_eq!(points[0].datum.group, "A", "first slice");
        assert!(
            donut.hit_test(&ctx, geometry.center).is_none(),
            "the hole is empty"
        );
    }

    #[test]
    fn disabled_groups_leave_the_pie() {
        let mut model = model();
        model.apply(crate::model::Mutation::ToggleGroup(String::from("A")));
        let interaction = InteractionState::default();
        let ctx = context(&model, &interaction);
        let geometry =
            PieGeometry::compute(&ctx, Rect::new(0.0, 0.0, 300.0, 300.0), false).expect("fits");
        assert_eq!(geometry.slices.len(), 1, "only the isolated group");
        assert_eq!(geometry.slices[0].0, "A", "isolated group");
    }
}
