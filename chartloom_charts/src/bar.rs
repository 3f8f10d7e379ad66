// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bars.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::Mark;
use kurbo::{Point, Rect};
use smallvec::smallvec;

use crate::cartesian::{CartesianScales, Orientation};
use crate::component::{ChartContext, Component, Hit, HitPoint, RenderTarget};
use crate::data::Datum;
use crate::series::active_series;
use crate::z_order;

/// Bars of the active groups side by side within each domain band.
///
/// Bars run from the zero baseline to the value and are capped at `bars.max_width`. On a
/// continuous domain every bar is centered on its domain position.
#[derive(Clone, Debug, Default)]
pub struct BarComponent;

struct PlacedBar<'a> {
    group: &'a str,
    datum: &'a Datum,
    rect: Rect,
}

fn place<'a>(ctx: &ChartContext<'a>, scales: &CartesianScales) -> Vec<PlacedBar<'a>> {
    let series = active_series(ctx.model, Some(scales));
    let n = series.len().max(1);
    let band = scales.domain_band_width();
    let max_width = ctx.options.bars.max_width;
    let (slot, width) = if band > 0.0 {
        let slot = band / n as f64;
        (slot, slot.min(max_width))
    } else {
        (max_width, max_width)
    };
    let mut out = Vec::new();
    for (i, s) in series.iter().enumerate() {
        // Offset of this group's slot from the band center.
        let offset = if band > 0.0 {
            (i as f64 + 0.5) * slot - band / 2.0
        } else {
            0.0
        };
        let base = scales.baseline(s.group);
        for &datum in &s.data {
            let (Some(center), Some(value)) = (scales.domain_value(datum), scales.range_value(datum))
            else {
                continue;
            };
            let center = center + offset;
            let a = scales.point_at(center - width / 2.0, base);
            let b = scales.point_at(center + width / 2.0, value);
            out.push(PlacedBar {
                group: s.group,
                datum,
                rect: Rect::from_points(a, b),
            });
        }
    }
    out
}

impl Component for BarComponent {
    fn name(&self) -> &'static str {
        "bar"
    }

    fn within_chart_clip(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(scales) = ctx.scales else {
            return;
        };
        for bar in place(ctx, scales) {
            let key = bar.datum.identity().unwrap_or_else(String::new);
            let hovered = ctx.interaction.is_hovered(bar.datum);
            let id = target.id2("bar", bar.group, &key);
            let mut builder = Mark::builder(id)
                .rect(bar.rect)
                .fill(ctx.model.fill_color(bar.group, Some(bar.datum)))
                .opacity(ctx.group_opacity(bar.group))
                .z_index(z_order::SERIES_FILL)
                .class("bar")
                .transition("bar-update-enter");
            if hovered {
                builder = builder.stroke(ctx.model.stroke_color(bar.group, Some(bar.datum)), 2.0);
            }
            target.push(builder.build());
        }
    }

    fn hit_test(&self, ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        let scales = ctx.scales?;
        let bar = place(ctx, scales)
            .into_iter()
            .rev()
            .find(|b| b.rect.contains(pos))?;
        let tip = match scales.orientation() {
            Orientation::Vertical => Point::new(bar.rect.center().x, bar.rect.y0),
            Orientation::Horizontal => {
                Point::new(bar.rect.x1, bar.rect.center().y)
            }
        };
        Some(Hit::Points(smallvec![HitPoint {
            datum: bar.datum.clone(),
            position: tip,
            color: ctx.model.fill_color(bar.group, Some(bar.datum)),
        }]))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::cartesian::{CartesianSpec, ScaleRequirements};
    use crate::component::InteractionState;
    use crate::data::ChartData;
    use crate::layout::Size;
    use crate::measure::HeuristicTextMeasurer;
    use crate::model::ChartModel;
    use crate::options::ChartOptions;
    use alloc::vec;
    use chartloom_core::{IdArena, MarkPayload};

    #[test]
    fn grouped_bars_share_a_band_and_start_at_zero() {
        let model = ChartModel::new(
            ChartData::Records(vec![
                Datum::new("A", "x", 10.0),
                Datum::new("B", "x", 20.0),
            ]),
            ChartOptions::default().with_size(400.0, 300.0),
        );
        let requirements = ScaleRequirements {
            zero_baseline: true,
            stacked: false,
        };
        let spec = CartesianSpec::resolve(&model, requirements);
        let scales = spec.instantiate(Rect::new(0.0, 0.0, 200.0, 100.0));
        let interaction = InteractionState::default();
        let ctx = ChartContext {
            model: &model,
            options: model.options(),
            cartesian: Some(&spec),
            scales: Some(&scales),
            measurer: &HeuristicTextMeasurer,
            interaction: &interaction,
            size: Size::new(400.0, 300.0),
        };
        let mut ids = IdArena::new();
        let mut target = RenderTarget::new(scales.plot(), false, &mut ids);
        BarComponent.render(&ctx, &mut target);
        let rects: Vec<Rect> = target
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 2, "one bar per record");
        assert!(rects[0].x1 <= rects[1].x0 + 1e-9, "A sits left of B");
        assert!((rects[0].y1 - 100.0).abs() < 1e-9, "bars start at the baseline");
        assert!((rects[1].y0 - 0.0).abs() < 1e-9, "the tallest bar reaches the top");
        assert!(rects[0].width() <= 16.0 + 1e-9, "capped at the maximum width");

        let Some(Hit::Points(points)) = BarComponent.hit_test(&ctx, rects[1].center()) else {
            panic!("bar under the pointer");
        };
        assert_eq!(points[0].datum.group, "B", "hits the bar under the pointer");
    }
}
