// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Confidence bands around a single line or area series.

extern crate alloc;

use alloc::vec::Vec;

use chartloom_core::Mark;
use kurbo::{BezPath, Point};

use crate::area::AREA_OPACITY;
use crate::color::faded;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::series::active_series;
use crate::z_order;

/// A dashed, translucent band spanning each record's interval.
///
/// Records carry their interval in the `min` and `max` fields (see [`Datum::with_interval`]).
/// Bands are only meaningful for one series, so nothing is drawn while several groups are
/// active. Records without an interval break the band.
///
/// [`Datum::with_interval`]: crate::Datum::with_interval
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfidenceBandComponent;

impl Component for ConfidenceBandComponent {
    fn name(&self) -> &'static str {
        "confidence-band"
    }

    fn within_chart_clip(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(scales) = ctx.scales else {
            return;
        };
        let series = active_series(ctx.model, Some(scales));
        if !series
            .iter()
            .any(|s| s.data.iter().any(|d| d.interval().is_some()))
        {
            return;
        }
        let [series] = series.as_slice() else {
            tracing::warn!(
                groups = series.len(),
                "confidence bands need exactly one active group"
            );
            return;
        };
        let group = series.group;

        let mut path = BezPath::new();
        let mut upper: Vec<Point> = Vec::new();
        let mut lower: Vec<Point> = Vec::new();
        let mut flush = |top: &mut Vec<Point>, bottom: &mut Vec<Point>| {
            if !top.is_empty() {
                ctx.options.curve.append(&mut path, &top[..], true);
                bottom.reverse();
                ctx.options.curve.append(&mut path, &bottom[..], false);
                path.close_path();
            }
            top.clear();
            bottom.clear();
        };
        for &datum in &series.data {
            let edges = datum.interval().and_then(|(lo, hi)| {
                let d = scales.domain_value(datum)?;
                let lo = scales.range_pixel(group, lo)?;
                let hi = scales.range_pixel(group, hi)?;
                Some((scales.point_at(d, hi), scales.point_at(d, lo)))
            });
            match edges {
                Some((top, bottom)) => {
                    upper.push(top);
                    lower.push(bottom);
                }
                None => flush(&mut upper, &mut lower),
            }
        }
        flush(&mut upper, &mut lower);

        let id = target.id("confidence-band", group);
        target.push(
            Mark::builder(id)
                .path(path)
                .fill(faded(ctx.model.fill_color(group, None), AREA_OPACITY))
                .stroke(ctx.model.stroke_color(group, None), 0.7)
                .dash(2.0, 2.0)
                .opacity(ctx.group_opacity(group))
                .z_index(z_order::SERIES_FILL)
                .class("confidence-band")
                .transition("area-update-enter")
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::cartesian::{CartesianSpec, ScaleRequirements};
    use crate::component::InteractionState;
    use crate::data::{ChartData, Datum, Field};
    use crate::layout::Size;
    use crate::measure::HeuristicTextMeasurer;
    use crate::model::ChartModel;
    use crate::options::{AxisOptions, ChartOptions};
    use crate::scale::ScaleType;
    use alloc::vec;
    use chartloom_core::{IdArena, MarkPayload};
    use kurbo::{PathEl, Rect};

    fn render(data: ChartData) -> Vec<Mark> {
        let options = ChartOptions::default()
            .with_bottom_axis(AxisOptions::new(ScaleType::Labels).with_maps_to(Field::Key))
            .with_left_axis(AxisOptions::new(ScaleType::Linear).with_maps_to(Field::Value));
        let model = ChartModel::new(data, options);
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
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
        ConfidenceBandComponent.render(&ctx, &mut target);
        target.into_marks()
    }

    #[test]
    fn band_spans_the_interval() {
        let marks = render(ChartData::Records(vec![
            Datum::new("A", "x", 10.0).with_interval(0.0, 15.0),
            Datum::new("A", "y", 15.0).with_interval(5.0, 20.0),
        ]));
        assert_eq!(marks.len(), 1, "one band");
        let bounds = marks[0].payload.bounds().expect("band has geometry");
        // Domain [0, 20] over 100px: 20 sits at the top, 0 at the bottom.
        assert!(bounds.y0.abs() < 1e-9, "top reaches the highest max: {bounds:?}");
        assert!((bounds.y1 - 100.0).abs() < 1e-9, "bottom reaches the lowest min: {bounds:?}");
    }

    #[test]
    fn gaps_split_the_band() {
        let marks = render(ChartData::Records(vec![
            Datum::new("A", "a", 10.0).with_interval(8.0, 12.0),
            Datum::new("A", "b", 10.0).with_interval(8.0, 12.0),
            Datum::new("A", "c", 10.0),
            Datum::new("A", "d", 10.0).with_interval(8.0, 12.0),
        ]));
        let MarkPayload::Path(band) = &marks[0].payload else {
            panic!("band is a path");
        };
        let pieces = band
            .path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::ClosePath))
            .count();
        assert_eq!(pieces, 2, "the record without an interval breaks the band");
    }

    #[test]
    fn several_groups_draw_nothing() {
        let marks = render(ChartData::Records(vec![
            Datum::new("A", "x", 10.0).with_interval(8.0, 12.0),
            Datum::new("B", "x", 12.0).with_interval(9.0, 14.0),
        ]));
        assert!(marks.is_empty(), "bands need a single series");
    }
}
