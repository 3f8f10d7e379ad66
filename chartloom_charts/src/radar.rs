// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radar charts.
//!
//! Keys become evenly spaced spokes starting at twelve o'clock. Each active group is a closed
//! polygon whose vertex on a spoke sits at the group's value for that key; values map
//! linearly from `[0, max]` onto `[min_range, radius]`, so zero still sits off the center.
//! Missing `(group, key)` pairs are filled with gaps, which are drawn at the center.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::PI;

use chartloom_core::Mark;
use kurbo::{BezPath, Point, Rect};
use smallvec::SmallVec;

use crate::angle::{polar_to_cartesian, radial_label_placement, screen_angle, spoke_angle};
use crate::color::{faded, neutral};
use crate::component::{ChartContext, Component, Hit, HitPoint, RenderTarget};
use crate::data::Datum;
use crate::format::format_tick_with_step;
use crate::scale::{ScaleLinear, nice_step};
use crate::z_order;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Space kept around the polygon for key labels.
const LABEL_ROOM: f64 = 60.0;

const RING_COLOR: peniko::Color = peniko::Color::from_rgb8(0xdc, 0xdc, 0xdc);

/// One group's values on every spoke, `None` for gaps.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarSeries {
    /// Group name.
    pub group: String,
    /// Value per key, aligned with [`RadarGeometry::keys`].
    pub values: Vec<Option<f64>>,
}

/// Fills every missing `(group, key)` combination with a gap.
///
/// Keys keep their first-seen order; groups follow `groups`.
pub fn normalize_sparse(data: &[Datum], groups: &[&str]) -> (Vec<String>, Vec<RadarSeries>) {
    let mut keys: Vec<String> = Vec::new();
    for datum in data {
        if let Some(key) = &datum.key
            && !keys.contains(key)
        {
            keys.push(key.clone());
        }
    }
    let series = groups
        .iter()
        .map(|group| RadarSeries {
            group: String::from(*group),
            values: keys
                .iter()
                .map(|key| {
                    data.iter()
                        .find(|d| d.group == *group && d.key.as_ref() == Some(key))
                        .and_then(|d| d.value)
                })
                .collect(),
        })
        .collect();
    (keys, series)
}

/// Resolved radar geometry for one render pass.
#[derive(Clone, Debug)]
pub struct RadarGeometry {
    /// Polygon center.
    pub center: Point,
    /// Outer radius.
    pub radius: f64,
    /// Spoke keys.
    pub keys: Vec<String>,
    /// Normalized values per active group.
    pub series: Vec<RadarSeries>,
    /// Value to radius.
    pub scale: ScaleLinear,
    /// Ring values.
    pub ticks: Vec<f64>,
}

impl RadarGeometry {
    /// Lays out the active groups of `ctx` in `region`.
    pub fn compute(ctx: &ChartContext<'_>, region: Rect) -> Option<Self> {
        let options = &ctx.options.radar;
        let radius = (region.width().min(region.height()) - LABEL_ROOM) / 2.0;
        if radius <= options.min_range {
            tracing::debug!(radius, "radar region too small");
            return None;
        }
        let groups = ctx.model.active_groups();
        let (keys, series) = normalize_sparse(ctx.model.display_data(), &groups);
        let max = series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0_f64, |m, v| m.max(*v));
        let ring_count = options.ticks.max(1);
        let step = nice_step(max / ring_count as f64);
        let top = if step > 0.0 {
            (max / step).ceil() * step
        } else {
            1.0
        };
        let scale = ScaleLinear::new((0.0, top), (options.min_range, radius));
        Some(Self {
            center: region.center(),
            radius,
            keys,
            series,
            ticks: scale.ticks(ring_count),
            scale,
        })
    }

    /// Screen angle of spoke `i`.
    pub fn spoke(&self, i: usize) -> f64 {
        screen_angle(spoke_angle(i, self.keys.len()))
    }

    /// Vertex of `value` on spoke `i`; gaps sit at the center.
    pub fn vertex(&self, i: usize, value: Option<f64>) -> Point {
        match value {
            Some(v) => polar_to_cartesian(self.spoke(i), self.scale.map(v), self.center),
            None => self.center,
        }
    }

    /// Index of the spoke closest in angle to `pos`.
    pub fn nearest_spoke(&self, pos: Point) -> Option<usize> {
        let n = self.keys.len();
        if n == 0 {
            return None;
        }
        let v = pos - self.center;
        if v.hypot() > self.radius + LABEL_ROOM / 2.0 {
            return None;
        }
        let step = 2.0 * PI / n as f64;
        // Chart angle: zero up, clockwise.
        let mut angle = v.x.atan2(-v.y);
        if angle < 0.0 {
            angle += 2.0 * PI;
        }
        let i = (angle / step).round();
        #[allow(clippy::cast_possible_truncation, reason = "bounded by the spoke count")]
        let i = i as usize % n;
        Some(i)
    }
}

fn closed_polygon(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Rings, spokes, key labels and one blob per active group.
#[derive(Clone, Debug, Default)]
pub struct RadarComponent {
    geometry: Option<RadarGeometry>,
}

impl Component for RadarComponent {
    fn name(&self) -> &'static str {
        "radar"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        self.geometry = RadarGeometry::compute(ctx, target.region);
        let Some(geometry) = &self.geometry else {
            return;
        };
        let options = &ctx.options.radar;
        let n = geometry.keys.len();
        let ring_step = match geometry.ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => 1.0,
        };

        for tick in &geometry.ticks {
            let label = format_tick_with_step(*tick, ring_step);
            let ring = closed_polygon((0..n).map(|i| geometry.vertex(i, Some(*tick))));
            let id = target.id("radar-ring", &label);
            target.push(
                Mark::builder(id)
                    .path(ring)
                    .stroke(RING_COLOR, 1.0)
                    .z_index(z_order::GRID_LINES)
                    .class("radar-ring")
                    .transition("radar-axis-update")
                    .build(),
            );
        }

        let (inner, outer) = geometry.scale.range();
        for (i, key) in geometry.keys.iter().enumerate() {
            let angle = geometry.spoke(i);
            let mut spoke = BezPath::new();
            spoke.move_to(polar_to_cartesian(angle, inner, geometry.center));
            spoke.line_to(polar_to_cartesian(angle, outer, geometry.center));
            let id = target.id("radar-spoke", key);
            target.push(
                Mark::builder(id)
                    .path(spoke)
                    .stroke(RING_COLOR, 1.0)
                    .z_index(z_order::GRID_LINES)
                    .class("radar-spoke")
                    .transition("radar-axis-update")
                    .build(),
            );
            let (anchor, baseline) = radial_label_placement(angle);
            let at = polar_to_cartesian(angle, outer + options.label_padding, geometry.center);
            let id = target.id("radar-key", key);
            target.push(
                Mark::builder(id)
                    .text(at, key.as_str())
                    .font_size(12.0)
                    .anchor(anchor)
                    .baseline(baseline)
                    .fill(neutral::TEXT)
                    .z_index(z_order::AXIS_LABELS)
                    .class("radar-key")
                    .transition("radar-axis-update")
                    .build(),
            );
        }

        for series in &geometry.series {
            let group = series.group.as_str();
            let blob = closed_polygon(
                series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| geometry.vertex(i, *v)),
            );
            let fill_opacity = match &ctx.interaction.hovered_group {
                Some(hovered) if hovered != group => options.opacity_unselected,
                _ => options.opacity_selected,
            };
            let id = target.id("radar-blob", group);
            target.push(
                Mark::builder(id)
                    .path(blob)
                    .fill(faded(ctx.model.fill_color(group, None), fill_opacity))
                    .stroke(ctx.model.stroke_color(group, None), 1.5)
                    .z_index(z_order::SERIES_FILL)
                    .class("radar-blob")
                    .transition("radar-blob-update")
                    .build(),
            );
        }

        if let Some(hovered) = ctx.interaction.hovered_points.first()
            && let Some(key) = hovered.datum.key.as_deref()
            && let Some(i) = geometry.keys.iter().position(|k| k == key)
        {
            let mut line = BezPath::new();
            line.move_to(geometry.center);
            line.line_to(polar_to_cartesian(geometry.spoke(i), outer, geometry.center));
            let id = target.id("radar-hover", "");
            target.push(
                Mark::builder(id)
                    .path(line)
                    .stroke(neutral::TEXT_SECONDARY, 1.0)
                    .z_index(z_order::RULER)
                    .class("radar-hover")
                    .build(),
            );
        }
    }

    fn hit_test(&self, ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        let geometry = self.geometry.as_ref()?;
        let i = geometry.nearest_spoke(pos)?;
        let key = &geometry.keys[i];
        let points: SmallVec<[HitPoint; 4]> = geometry
            .series
            .iter()
            .filter_map(|s| {
                let value = s.values[i]?;
                Some(HitPoint {
                    datum: Datum::new(s.group.as_str(), key.as_str(), value),
                    position: geometry.vertex(i, Some(value)),
                    color: ctx.model.stroke_color(&s.group, None),
                })
            })
            .collect();
        if points.is_empty() {
            tracing::trace!(key = key.as_str(), "no values on the hovered spoke");
            return None;
        }
        Some(Hit::Points(points))
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

    #[test]
    fn sparse_data_is_filled_with_gaps() {
        let data = vec![
            Datum::new("A", "speed", 4.0),
            Datum::new("A", "range", 2.0),
            Datum::new("B", "speed", 3.0),
        ];
        let (keys, series) = normalize_sparse(&data, &["A", "B"]);
        assert_eq!(keys, vec![String::from("speed"), String::from("range")], "first-seen order");
        assert_eq!(series[1].values, vec![Some(3.0), None], "missing pair is a gap");
    }

    #[test]
    fn blobs_close_and_gaps_sit_at_the_center() {
        let model = ChartModel::new(
            ChartData::Records(vec![
                Datum::new("A", "n", 10.0),
                Datum::new("A", "e", 10.0),
                Datum::new("A", "s", 10.0),
                Datum::new("A", "w", 10.0),
                Datum::new("B", "n", 5.0),
            ]),
            ChartOptions::default().with_size(400.0, 300.0),
        );
        let interaction = InteractionState::default();
        let ctx = ChartContext {
            model: &model,
            options: model.options(),
            cartesian: None,
            scales: None,
            measurer: &HeuristicTextMeasurer,
            interaction: &interaction,
            size: Size::new(400.0, 300.0),
        };
        let region = Rect::new(0.0, 0.0, 260.0, 260.0);
        let geometry = RadarGeometry::compute(&ctx, region).expect("fits");
        assert_eq!(geometry.radius, 100.0, "room left for labels");
        assert_eq!(geometry.scale.range(), (10.0, 100.0), "zero sits on the inner ring");
        assert_eq!(geometry.ticks.len(), 6, "rings from zero to the max");

        let top = geometry.vertex(0, Some(10.0));
        assert!((top.x - 130.0).abs() < 1e-9, "first spoke points up");
        assert!((top.y - 30.0).abs() < 1e-9, "at the outer radius");
        assert_eq!(geometry.vertex(1, None), geometry.center, "gap at the center");

        let mut ids = IdArena::new();
        let mut target = RenderTarget::new(region, false, &mut ids);
        let mut radar = RadarComponent::default();
        radar.render(&ctx, &mut target);
        let count = |class: &str| target.marks.iter().filter(|m| m.class == class).count();
        assert_eq!(count("radar-blob"), 2, "one blob per group");
        assert_eq!(count("radar-spoke"), 4, "one spoke per key");
        assert_eq!(count("radar-key"), 4, "one label per key");

        let Some(Hit::Points(points)) = radar.hit_test(&ctx, Point::new(130.0, 60.0)) else {
            panic!("spoke under the pointer");
        };
        assert_eq!(points.len(), 2, "both groups have a value on the top spoke");
    }
}
