// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartesian axes: tick generation, margin measurement and axis marks.
//!
//! The plot rectangle depends on how much room tick labels need, and tick labels depend on the
//! plot size (continuous tick counts and formats follow the pixel extent). [`fit_plot`] resolves
//! that cycle with one measured pass plus at most one corrective pass: if the margins measured
//! against the provisional plot differ from the first estimate by more than
//! [`MARGIN_EPSILON`], the plot is shrunk once more with the new margins and the result is used
//! as final.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{BezPath, Point, Rect};

use crate::cartesian::{AxisPosition, CartesianScales, CartesianSpec, ResolvedAxis};
use crate::color::neutral;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::format::{format_number, format_tick_with_step};
use crate::measure::{TextMeasurer, TextStyle};
use crate::options::TickValue;
use crate::scale::{Scale, ScaleType};
use crate::time::format_time;
use crate::z_order;

/// Length of tick marks.
pub const TICK_SIZE: f64 = 6.0;
/// Gap between a tick and its label.
pub const LABEL_PADDING: f64 = 4.0;
/// Gap between tick labels and the axis title.
pub const TITLE_GAP: f64 = 8.0;
/// Margin kept on sides without an axis.
pub const MIN_MARGIN: f64 = 8.0;
/// Margin changes below this are treated as converged.
pub const MARGIN_EPSILON: f64 = 0.5;
/// Tick label font size.
pub const LABEL_FONT_SIZE: f64 = 12.0;
/// Axis title font size.
pub const TITLE_FONT_SIZE: f64 = 12.0;

const DEFAULT_TICK_COUNT: usize = 5;

/// One tick of an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Domain value for continuous axes.
    pub value: Option<f64>,
    /// Pixel position along the axis.
    pub pixel: f64,
    /// Formatted label.
    pub label: String,
}

fn tick_step(values: &[f64]) -> f64 {
    let step = values
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

/// Ticks of `axis` on `scale`, formatted with the axis formatter if one is set.
pub fn axis_ticks(axis: &ResolvedAxis, scale: &Scale) -> Vec<Tick> {
    let formatter = axis.options.ticks.formatter.as_ref();
    if let Scale::Band(band) = scale {
        return band
            .keys()
            .iter()
            .enumerate()
            .filter_map(|(i, key)| {
                let pixel = band.map(key)?;
                let label = match formatter {
                    Some(f) => (f.0)(TickValue::Key(key), i),
                    None => key.clone(),
                };
                Some(Tick {
                    value: None,
                    pixel,
                    label,
                })
            })
            .collect();
    }

    let count = axis.options.ticks.count.unwrap_or(DEFAULT_TICK_COUNT);
    let values = match scale {
        Scale::Linear(s) => s.ticks(count),
        Scale::Log(s) => s.ticks(count),
        Scale::Time(s) => s.ticks(count),
        Scale::Band(_) => Vec::new(),
    };
    let step = tick_step(&values);
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let pixel = scale.map_number(*v)?;
            let label = match formatter {
                Some(f) => (f.0)(TickValue::Number(*v), i),
                None => match axis.scale_type {
                    ScaleType::Time => format_time(*v, step),
                    ScaleType::Log => format_number(*v),
                    _ => format_tick_with_step(*v, step),
                },
            };
            Some(Tick {
                value: Some(*v),
                pixel,
                label,
            })
        })
        .collect()
}

/// Space reserved around the plot, per side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Left side.
    pub left: f64,
    /// Right side.
    pub right: f64,
    /// Top side.
    pub top: f64,
    /// Bottom side.
    pub bottom: f64,
}

impl Margins {
    /// `frame` shrunk by these margins, never inverted and never outside `frame`.
    pub fn inset(self, frame: Rect) -> Rect {
        let x0 = (frame.x0 + self.left).min(frame.x1);
        let y0 = (frame.y0 + self.top).min(frame.y1);
        let x1 = (frame.x1 - self.right).max(x0);
        let y1 = (frame.y1 - self.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }

    /// Returns `true` if every side differs by at most `epsilon`.
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.left - other.left).abs() <= epsilon
            && (self.right - other.right).abs() <= epsilon
            && (self.top - other.top).abs() <= epsilon
            && (self.bottom - other.bottom).abs() <= epsilon
    }

    fn side_mut(&mut self, position: AxisPosition) -> &mut f64 {
        match position {
            AxisPosition::Left => &mut self.left,
            AxisPosition::Right => &mut self.right,
            AxisPosition::Top => &mut self.top,
            AxisPosition::Bottom => &mut self.bottom,
        }
    }
}

/// Thickness of `axis` along its normal, given its ticks.
fn axis_thickness(axis: &ResolvedAxis, ticks: &[Tick], measurer: &dyn TextMeasurer) -> f64 {
    let style = TextStyle::new(LABEL_FONT_SIZE);
    let label_extent = ticks
        .iter()
        .map(|t| {
            let m = measurer.measure(&t.label, style);
            if axis.position.is_vertical() {
                m.width
            } else {
                m.line_height()
            }
        })
        .fold(0.0, f64::max);
    let mut thickness = TICK_SIZE + LABEL_PADDING + label_extent;
    if let Some(title) = axis.options.title.as_deref() {
        let m = measurer.measure(title, TextStyle::bold(TITLE_FONT_SIZE));
        thickness += TITLE_GAP + m.line_height();
    }
    thickness
}

/// Margins needed by every visible axis for the given scales.
pub fn axis_margins(
    spec: &CartesianSpec,
    scales: &CartesianScales,
    measurer: &dyn TextMeasurer,
) -> Margins {
    let mut margins = Margins {
        left: MIN_MARGIN,
        right: MIN_MARGIN,
        top: MIN_MARGIN,
        bottom: MIN_MARGIN,
    };
    for axis in spec.axes().iter().filter(|a| a.options.visible) {
        let Some(scale) = scales.scale(axis.position) else {
            continue;
        };
        let ticks = axis_ticks(axis, scale);
        let side = margins.side_mut(axis.position);
        *side = side.max(axis_thickness(axis, &ticks, measurer));
    }
    margins
}

/// Fits the plot rectangle inside `frame`, re-measuring axes at most once.
pub fn fit_plot(
    spec: &CartesianSpec,
    frame: Rect,
    measurer: &dyn TextMeasurer,
) -> (CartesianScales, Margins) {
    let provisional = spec.instantiate(frame);
    let first = axis_margins(spec, &provisional, measurer);
    let scales = spec.instantiate(first.inset(frame));
    let second = axis_margins(spec, &scales, measurer);
    if second.approx_eq(first, MARGIN_EPSILON) {
        tracing::trace!("axis margins converged");
        return (scales, first);
    }
    tracing::debug!(
        left = second.left,
        bottom = second.bottom,
        "axis margins changed; running one extra layout pass"
    );
    (spec.instantiate(second.inset(frame)), second)
}

fn rule(a: Point, b: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(a);
    path.line_to(b);
    path
}

/// Draws every visible cartesian axis around the plot.
#[derive(Clone, Debug, Default)]
pub struct AxesComponent;

impl AxesComponent {
    fn render_axis(
        &self,
        ctx: &ChartContext<'_>,
        axis: &ResolvedAxis,
        scale: &Scale,
        plot: Rect,
        target: &mut RenderTarget<'_>,
    ) {
        let position = axis.position;
        let name = position.name();
        let (a, b) = match position {
            AxisPosition::Left => (Point::new(plot.x0, plot.y0), Point::new(plot.x0, plot.y1)),
            AxisPosition::Right => (Point::new(plot.x1, plot.y0), Point::new(plot.x1, plot.y1)),
            AxisPosition::Top => (Point::new(plot.x0, plot.y0), Point::new(plot.x1, plot.y0)),
            AxisPosition::Bottom => (Point::new(plot.x0, plot.y1), Point::new(plot.x1, plot.y1)),
        };
        let id = target.id("axis-line", name);
        target.push(
            Mark::builder(id)
                .path(rule(a, b))
                .stroke(neutral::AXIS, 1.0)
                .z_index(z_order::AXIS_RULES)
                .class("axis-line")
                .transition("axis-update")
                .build(),
        );

        let ticks = axis_ticks(axis, scale);
        let continuous_horizontal = !position.is_vertical() && scale.is_continuous();
        let last = ticks.len().saturating_sub(1);
        let mut label_extent = 0.0_f64;
        for (i, tick) in ticks.iter().enumerate() {
            let p = tick.pixel;
            let (start, end, label_at, anchor, baseline) = match position {
                AxisPosition::Left => (
                    Point::new(plot.x0, p),
                    Point::new(plot.x0 - TICK_SIZE, p),
                    Point::new(plot.x0 - TICK_SIZE - LABEL_PADDING, p),
                    TextAnchor::End,
                    TextBaseline::Middle,
                ),
                AxisPosition::Right => (
                    Point::new(plot.x1, p),
                    Point::new(plot.x1 + TICK_SIZE, p),
                    Point::new(plot.x1 + TICK_SIZE + LABEL_PADDING, p),
                    TextAnchor::Start,
                    TextBaseline::Middle,
                ),
                AxisPosition::Bottom => (
                    Point::new(p, plot.y1),
                    Point::new(p, plot.y1 + TICK_SIZE),
                    Point::new(p, plot.y1 + TICK_SIZE + LABEL_PADDING),
                    TextAnchor::Middle,
                    TextBaseline::Hanging,
                ),
                AxisPosition::Top => (
                    Point::new(p, plot.y0),
                    Point::new(p, plot.y0 - TICK_SIZE),
                    Point::new(p, plot.y0 - TICK_SIZE - LABEL_PADDING),
                    TextAnchor::Middle,
                    TextBaseline::Alphabetic,
                ),
            };
            // End labels of continuous horizontal axes stay inside the plot span.
            let anchor = match (continuous_horizontal, i) {
                (true, 0) if ticks.len() > 1 => TextAnchor::Start,
                (true, i) if i == last && ticks.len() > 1 => TextAnchor::End,
                _ => anchor,
            };

            let id = target.id2("axis-tick", name, &tick.label);
            target.push(
                Mark::builder(id)
                    .path(rule(start, end))
                    .stroke(neutral::AXIS, 1.0)
                    .z_index(z_order::AXIS_RULES)
                    .class("axis-tick")
                    .transition("axis-update")
                    .build(),
            );
            let id = target.id2("axis-label", name, &tick.label);
            target.push(
                Mark::builder(id)
                    .text(label_at, tick.label.clone())
                    .font_size(LABEL_FONT_SIZE)
                    .anchor(anchor)
                    .baseline(baseline)
                    .fill(neutral::TEXT_SECONDARY)
                    .z_index(z_order::AXIS_LABELS)
                    .class("axis-label")
                    .transition("axis-update")
                    .build(),
            );
            let m = ctx.measurer.measure(&tick.label, TextStyle::new(LABEL_FONT_SIZE));
            label_extent = label_extent.max(if position.is_vertical() {
                m.width
            } else {
                m.line_height()
            });
        }

        let Some(title) = axis.options.title.as_deref() else {
            return;
        };
        let title_metrics = ctx
            .measurer
            .measure(title, TextStyle::bold(TITLE_FONT_SIZE));
        let offset =
            TICK_SIZE + LABEL_PADDING + label_extent + TITLE_GAP + title_metrics.line_height() / 2.0;
        let (at, angle) = match position {
            AxisPosition::Left => (Point::new(plot.x0 - offset, plot.center().y), -90.0),
            AxisPosition::Right => (Point::new(plot.x1 + offset, plot.center().y), 90.0),
            AxisPosition::Bottom => (Point::new(plot.center().x, plot.y1 + offset), 0.0),
            AxisPosition::Top => (Point::new(plot.center().x, plot.y0 - offset), 0.0),
        };
        let id = target.id("axis-title", name);
        target.push(
            Mark::builder(id)
                .text(at, title)
                .font_size(TITLE_FONT_SIZE)
                .anchor(TextAnchor::Middle)
                .baseline(TextBaseline::Middle)
                .angle(angle)
                .fill(neutral::TEXT)
                .z_index(z_order::AXIS_TITLES)
                .class("axis-title")
                .transition("axis-update")
                .build(),
        );
    }
}

impl Component for AxesComponent {
    fn name(&self) -> &'static str {
        "axes"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let (Some(spec), Some(scales)) = (ctx.cartesian, ctx.scales) else {
            return;
        };
        let plot = scales.plot();
        for axis in spec.axes().iter().filter(|a| a.options.visible) {
            if let Some(scale) = scales.scale(axis.position) {
                self.render_axis(ctx, axis, scale, plot, target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::cartesian::ScaleRequirements;
    use crate::data::{ChartData, Datum, Field};
    use crate::measure::HeuristicTextMeasurer;
    use crate::model::ChartModel;
    use crate::options::{AxisOptions, ChartOptions, TickFormatter};
    use alloc::format;
    use alloc::vec;

    fn model(options: ChartOptions) -> ChartModel {
        let data = ChartData::Records(vec![
            Datum::new("A", "north", 10.0),
            Datum::new("A", "south", 20.0),
        ]);
        ChartModel::new(data, options)
    }

    fn options() -> ChartOptions {
        ChartOptions::default()
            .with_bottom_axis(AxisOptions::new(ScaleType::Labels).with_maps_to(Field::Key))
            .with_left_axis(AxisOptions::new(ScaleType::Linear).with_title("Sales"))
    }

    #[test]
    fn ticks_use_the_formatter() {
        let mut options = options();
        if let Some(left) = options.axes.left.as_mut() {
            left.ticks.formatter = Some(TickFormatter::new(|v, i| match v {
                TickValue::Number(n) => format!("{i}:{n}"),
                TickValue::Key(k) => String::from(k),
            }));
        }
        let model = model(options);
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        let scales = spec.instantiate(Rect::new(0.0, 0.0, 200.0, 100.0));
        let axis = spec.axis(AxisPosition::Left).expect("left axis");
        let ticks = axis_ticks(axis, scales.scale(AxisPosition::Left).expect("scale"));
        assert_eq!(ticks[0].label, "0:10", "formatter sees value and index");
    }

    #[test]
    fn band_ticks_sit_on_band_centers() {
        let model = model(options());
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        let scales = spec.instantiate(Rect::new(0.0, 0.0, 200.0, 100.0));
        let axis = spec.axis(AxisPosition::Bottom).expect("bottom axis");
        let ticks = axis_ticks(axis, scales.scale(AxisPosition::Bottom).expect("scale"));
        let pixels: Vec<f64> = ticks.iter().map(|t| t.pixel).collect();
        assert_eq!(pixels, vec![50.0, 150.0], "centers of two bands");
        assert_eq!(ticks[1].label, "south", "keys as labels");
    }

    #[test]
    fn fitted_plot_leaves_room_for_labels_and_titles() {
        let model = model(options());
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        let frame = Rect::new(0.0, 0.0, 400.0, 300.0);
        let (scales, margins) = fit_plot(&spec, frame, &HeuristicTextMeasurer);
        let plot = scales.plot();
        assert!(margins.left > TICK_SIZE + LABEL_PADDING + TITLE_GAP, "labels and title");
        assert_eq!(margins.right, MIN_MARGIN, "no right axis");
        assert_eq!(plot, margins.inset(frame), "plot is the inset frame");
        let again = axis_margins(&spec, &scales, &HeuristicTextMeasurer);
        assert!(again.approx_eq(margins, MARGIN_EPSILON), "converged");
    }

    #[test]
    fn inset_never_inverts() {
        let margins = Margins {
            left: 80.0,
            right: 80.0,
            top: 0.0,
            bottom: 0.0,
        };
        let frame = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = margins.inset(frame);
        assert!(rect.width() >= 0.0, "collapsed, not inverted");

        let tall = Margins {
            left: 150.0,
            right: 0.0,
            top: 70.0,
            bottom: 0.0,
        };
        let rect = tall.inset(frame);
        assert!(
            rect.x0 <= frame.x1 && rect.x1 <= frame.x1,
            "x stays inside the frame: {rect:?}"
        );
        assert!(
            rect.y0 <= frame.y1 && rect.y1 <= frame.y1,
            "y stays inside the frame: {rect:?}"
        );
    }
}
