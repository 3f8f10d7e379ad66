// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Meter charts: one value as a proportion of 100.

extern crate alloc;

use alloc::format;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{BezPath, Rect};

use crate::color::neutral;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::format::format_number;
use crate::options::{MeterStatus, StatusRange};
use crate::scale::ScaleLinear;
use crate::z_order;

/// Height of the label row above the bar.
const LABEL_ROW: f64 = 24.0;

/// Peak marker position: never below `value`, and hidden above 100.
pub fn meter_peak(value: f64, peak: Option<f64>) -> Option<f64> {
    let peak = peak?.max(value);
    (peak <= 100.0).then_some(peak)
}

/// Status of the first range that contains `value`.
pub fn meter_status(value: f64, ranges: &[StatusRange]) -> Option<MeterStatus> {
    ranges
        .iter()
        .find(|r| value >= r.range.0 && value <= r.range.1)
        .map(|r| r.status)
}

/// A horizontal bar filled to the value, with an optional peak marker.
#[derive(Clone, Debug, Default)]
pub struct MeterComponent;

impl Component for MeterComponent {
    fn name(&self) -> &'static str {
        "meter"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(datum) = ctx
            .model
            .display_data()
            .iter()
            .find(|d| d.value.is_some())
        else {
            return;
        };
        let value = datum.value.unwrap_or(0.0);
        let options = &ctx.options.meter;
        let region = target.region;
        let bar_top = region.y0 + LABEL_ROW;
        let scale = ScaleLinear::new((0.0, 100.0), (region.x0, region.x1));
        let status = meter_status(value, &options.status_ranges);
        let fill = status.map_or_else(|| ctx.model.fill_color(&datum.group, Some(datum)), MeterStatus::color);

        let id = target.id("meter-title", "");
        target.push(
            Mark::builder(id)
                .text((region.x0, bar_top - 8.0).into(), datum.group.as_str())
                .font_size(14.0)
                .anchor(TextAnchor::Start)
                .baseline(TextBaseline::Alphabetic)
                .fill(neutral::TEXT)
                .z_index(z_order::TITLES)
                .class("meter-title")
                .build(),
        );
        let id = target.id("meter-percentage", "");
        target.push(
            Mark::builder(id)
                .text(
                    (region.x1, bar_top - 8.0).into(),
                    format!("{}%", format_number(value)),
                )
                .font_size(14.0)
                .anchor(TextAnchor::End)
                .baseline(TextBaseline::Alphabetic)
                .fill(neutral::TEXT_SECONDARY)
                .z_index(z_order::TITLES)
                .class("meter-percentage")
                .build(),
        );

        let id = target.id("meter-container", "");
        target.push(
            Mark::builder(id)
                .rect(Rect::new(region.x0, bar_top, region.x1, bar_top + options.height))
                .fill(neutral::SKELETON)
                .z_index(z_order::PLOT_BACKGROUND)
                .class("meter-container")
                .build(),
        );
        let x = scale.map(value.clamp(0.0, 100.0));
        let id = target.id("meter-value", "");
        target.push(
            Mark::builder(id)
                .rect(Rect::new(region.x0, bar_top, x, bar_top + options.height))
                .fill(fill)
                .z_index(z_order::SERIES_FILL)
                .class(status.map_or("meter-value", |s| match s {
                    MeterStatus::Success => "meter-value status--success",
                    MeterStatus::Warning => "meter-value status--warning",
                    MeterStatus::Danger => "meter-value status--danger",
                }))
                .transition("meter-bar-update")
                .build(),
        );

        if let Some(peak) = meter_peak(value, options.peak) {
            let px = scale.map(peak);
            let mut line = BezPath::new();
            line.move_to((px, bar_top));
            line.line_to((px, bar_top + options.height));
            let id = target.id("meter-peak", "");
            target.push(
                Mark::builder(id)
                    .path(line)
                    .stroke(neutral::TEXT, 2.0)
                    .z_index(z_order::SERIES_STROKE)
                    .class("meter-peak")
                    .transition("peak-line-update")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn peak_is_at_least_the_value_and_hidden_past_100() {
        assert_eq!(meter_peak(50.0, None), None, "no peak configured");
        assert_eq!(meter_peak(50.0, Some(70.0)), Some(70.0), "peak above value");
        assert_eq!(meter_peak(80.0, Some(70.0)), Some(80.0), "raised to the value");
        assert_eq!(meter_peak(50.0, Some(120.0)), None, "outside the scale");
    }

    #[test]
    fn first_matching_range_wins() {
        let ranges = [
            StatusRange {
                range: (0.0, 50.0),
                status: MeterStatus::Success,
            },
            StatusRange {
                range: (50.0, 80.0),
                status: MeterStatus::Warning,
            },
            StatusRange {
                range: (80.0, 100.0),
                status: MeterStatus::Danger,
            },
        ];
        assert_eq!(meter_status(50.0, &ranges), Some(MeterStatus::Success), "shared bound");
        assert_eq!(meter_status(90.0, &ranges), Some(MeterStatus::Danger), "danger");
        assert_eq!(meter_status(120.0, &ranges), None, "outside every range");
    }
}
