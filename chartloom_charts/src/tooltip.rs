// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip: a floating panel describing the hovered records.
//!
//! The panel has two faces. [`TooltipContent::html`] is the HTML fragment handed to listeners
//! of [`TooltipShow`](crate::ChartEvent::TooltipShow), so a host page can render its own
//! panel; [`TooltipComponent`] draws an equivalent panel on the chart surface.
//!
//! The panel is placed next to the pointer, trying the right side first, then left, top and
//! bottom. When no side fits inside the chart it goes right and is clamped to the chart bounds.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{Point, Rect, Size as KurboSize};
use peniko::Color;

use crate::color::neutral;
use crate::component::{ChartContext, Component, HitPoint, InteractionState, RenderTarget};
use crate::format::format_number;
use crate::measure::{TextStyle, truncate_label};
use crate::options::{ChartOptions, LegendOptions, TooltipOptions, TooltipSize};
use crate::z_order;

const FONT_SIZE: f64 = 12.0;
const LINE_HEIGHT: f64 = 18.0;
const PADDING: f64 = 8.0;
const SWATCH: f64 = 10.0;
const SWATCH_GAP: f64 = 6.0;
const COLUMN_GAP: f64 = 16.0;

/// Side of the pointer the panel is placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Right of the pointer.
    Right,
    /// Left of the pointer.
    Left,
    /// Above the pointer.
    Top,
    /// Below the pointer.
    Bottom,
}

/// Fallback order used by [`place_tooltip`].
pub const PLACEMENTS: [Placement; 4] = [
    Placement::Right,
    Placement::Left,
    Placement::Top,
    Placement::Bottom,
];

/// Where the panel ended up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPosition {
    /// Chosen side.
    pub placement: Placement,
    /// Panel rectangle in chart coordinates.
    pub rect: Rect,
}

fn candidate(placement: Placement, anchor: Point, size: KurboSize, offset: f64) -> Rect {
    let origin = match placement {
        Placement::Right => Point::new(anchor.x + offset, anchor.y - size.height / 2.0),
        Placement::Left => Point::new(anchor.x - offset - size.width, anchor.y - size.height / 2.0),
        Placement::Top => Point::new(anchor.x - size.width / 2.0, anchor.y - offset - size.height),
        Placement::Bottom => Point::new(anchor.x - size.width / 2.0, anchor.y + offset),
    };
    Rect::from_origin_size(origin, size)
}

fn fits(rect: Rect, bounds: Rect) -> bool {
    rect.x0 >= bounds.x0 && rect.y0 >= bounds.y0 && rect.x1 <= bounds.x1 && rect.y1 <= bounds.y1
}

/// Places a panel of `size` next to `anchor` inside `bounds`.
pub fn place_tooltip(anchor: Point, size: KurboSize, bounds: Rect, offset: f64) -> TooltipPosition {
    for placement in PLACEMENTS {
        let rect = candidate(placement, anchor, size, offset);
        if fits(rect, bounds) {
            return TooltipPosition { placement, rect };
        }
    }
    let rect = candidate(Placement::Right, anchor, size, offset);
    let x = rect.x0.min(bounds.x1 - size.width).max(bounds.x0);
    let y = rect.y0.min(bounds.y1 - size.height).max(bounds.y0);
    TooltipPosition {
        placement: Placement::Right,
        rect: Rect::from_origin_size((x, y), size),
    }
}

/// One row of the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipItem {
    /// Group name.
    pub label: String,
    /// Formatted value.
    pub value: String,
    /// Group color.
    pub color: Color,
}

/// Escapes text for inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn css_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

fn format_value(options: &TooltipOptions, value: f64, label: &str) -> String {
    match &options.value_formatter {
        Some(formatter) => (formatter.0)(value, label),
        None => format_number(value),
    }
}

fn item_html(item: &TooltipItem, size: TooltipSize) -> String {
    let label = escape_html(&item.label);
    let value = escape_html(&item.value);
    match size {
        TooltipSize::Compact => format!("<b>{label}:</b> {value}<br/>"),
        TooltipSize::Full => format!(
            "<div class=\"datapoint-tooltip\">\
             <a style=\"background-color:{}\" class=\"tooltip-color\"></a>\
             <p class=\"label\">{label}</p><p class=\"value\">{value}</p></div>",
            css_color(item.color)
        ),
    }
}

/// Text and HTML of one tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
    /// Rows, in hover order.
    pub items: Vec<TooltipItem>,
    /// Total row, for multi-item full tooltips.
    pub total: Option<String>,
    /// Rendered HTML, after `custom_html`.
    pub html: String,
}

impl TooltipContent {
    /// Content for the hovered records.
    ///
    /// One record uses the single-item template; several records use the list template.
    pub fn for_points(options: &TooltipOptions, points: &[HitPoint]) -> Self {
        let items: Vec<TooltipItem> = points
            .iter()
            .map(|p| TooltipItem {
                label: p.datum.group.clone(),
                value: p
                    .datum
                    .value
                    .map_or_else(|| String::from("-"), |v| format_value(options, v, &p.datum.group)),
                color: p.color,
            })
            .collect();
        let total = (items.len() > 1 && options.size == TooltipSize::Full && options.show_total)
            .then(|| {
                let sum: f64 = points.iter().filter_map(|p| p.datum.value).sum();
                format_value(options, sum, "Total")
            });

        let html = match items.as_slice() {
            [] => String::new(),
            [single] => item_html(single, options.size),
            many => {
                let mut html = String::from("<ul class=\"multi-tooltip\">");
                for item in many {
                    html.push_str("<li>");
                    html.push_str(&item_html(item, options.size));
                    html.push_str("</li>");
                }
                if let Some(total) = &total {
                    html.push_str(&format!(
                        "<li><div class=\"total-val\"><p class=\"label\">Total</p>\
                         <p class=\"value\">{}</p></div></li>",
                        escape_html(total)
                    ));
                }
                html.push_str("</ul>");
                html
            }
        };
        let html = match &options.custom_html {
            Some(custom) => {
                let data: Vec<_> = points.iter().map(|p| p.datum.clone()).collect();
                (custom.0)(&data, &html)
            }
            None => html,
        };
        Self { items, total, html }
    }

    /// Content naming a legend item in full.
    pub fn for_label(label: &str) -> Self {
        Self {
            items: Vec::new(),
            total: None,
            html: format!("<div class=\"title-tooltip\"><p>{}</p></div>", escape_html(label)),
        }
    }
}

/// Full name of a hovered legend item whose label was truncated.
pub fn truncated_legend_label(legend: &LegendOptions, hovered: Option<&str>) -> Option<String> {
    let group = hovered?;
    let truncation = legend.truncation;
    let shown = truncate_label(group, truncation.kind, truncation.threshold, truncation.num_chars);
    (shown != group).then(|| String::from(group))
}

/// What the tooltip should say for the current interaction state, if anything.
pub fn tooltip_content(options: &ChartOptions, interaction: &InteractionState) -> Option<TooltipContent> {
    if !options.tooltip.enabled {
        return None;
    }
    if !interaction.hovered_points.is_empty() {
        return Some(TooltipContent::for_points(&options.tooltip, &interaction.hovered_points));
    }
    truncated_legend_label(&options.legend, interaction.hovered_group.as_deref())
        .map(|label| TooltipContent::for_label(&label))
}

/// Draws the tooltip panel near the pointer.
#[derive(Clone, Debug, Default)]
pub struct TooltipComponent {
    position: Option<TooltipPosition>,
}

impl TooltipComponent {
    /// A hidden tooltip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement from the last render, if the panel is showing.
    pub fn position(&self) -> Option<TooltipPosition> {
        self.position
    }
}

/// Rows of `(label, value, swatch color)` drawn in the panel.
fn rows(ctx: &ChartContext<'_>) -> Vec<(String, String, Option<Color>)> {
    let points = &ctx.interaction.hovered_points;
    if points.is_empty() {
        return truncated_legend_label(&ctx.options.legend, ctx.interaction.hovered_group.as_deref())
            .map(|label| (label, String::new(), None))
            .into_iter()
            .collect();
    }
    let content = TooltipContent::for_points(&ctx.options.tooltip, points);
    let swatch = ctx.options.tooltip.size == TooltipSize::Full;
    let mut rows: Vec<_> = content
        .items
        .into_iter()
        .map(|item| (item.label, item.value, swatch.then_some(item.color)))
        .collect();
    if let Some(total) = content.total {
        rows.push((String::from("Total"), total, None));
    }
    rows
}

impl Component for TooltipComponent {
    fn name(&self) -> &'static str {
        "tooltip"
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        self.position = None;
        if !ctx.options.tooltip.enabled {
            return;
        }
        let rows = rows(ctx);
        if rows.is_empty() {
            return;
        }
        let anchor = ctx
            .interaction
            .cursor
            .or_else(|| ctx.interaction.hovered_points.first().map(|p| p.position));
        let Some(anchor) = anchor else {
            return;
        };

        let style = TextStyle::new(FONT_SIZE);
        let bold = TextStyle::bold(FONT_SIZE);
        let has_swatch = rows.iter().any(|(_, _, c)| c.is_some());
        let swatch_space = if has_swatch { SWATCH + SWATCH_GAP } else { 0.0 };
        let mut label_width: f64 = 0.0;
        let mut value_width: f64 = 0.0;
        for (label, value, _) in &rows {
            label_width = label_width.max(ctx.measurer.measure(label, style).width);
            value_width = value_width.max(ctx.measurer.measure(value, bold).width);
        }
        let gap = if value_width > 0.0 { COLUMN_GAP } else { 0.0 };
        #[allow(clippy::cast_precision_loss, reason = "row counts are small")]
        let height = rows.len() as f64 * LINE_HEIGHT + 2.0 * PADDING;
        let size = KurboSize::new(
            swatch_space + label_width + gap + value_width + 2.0 * PADDING,
            height,
        );
        let bounds = Rect::new(0.0, 0.0, ctx.size.width, ctx.size.height);
        let position = place_tooltip(anchor, size, bounds, ctx.options.tooltip.offset);
        self.position = Some(position);
        let panel = position.rect;

        let id = target.id("tooltip", "panel");
        target.push(
            Mark::builder(id)
                .rect(panel)
                .fill(neutral::BACKGROUND)
                .stroke(neutral::GRID, 1.0)
                .corner_radius(2.0)
                .z_index(z_order::TOOLTIP)
                .class("tooltip")
                .build(),
        );
        let mut y = panel.y0 + PADDING + LINE_HEIGHT / 2.0;
        for (i, (label, value, color)) in rows.iter().enumerate() {
            let row = format!("{i}");
            let x = panel.x0 + PADDING;
            if let Some(color) = color {
                let id = target.id2("tooltip", "swatch", &row);
                target.push(
                    Mark::builder(id)
                        .rect(Rect::new(x, y - SWATCH / 2.0, x + SWATCH, y + SWATCH / 2.0))
                        .fill(*color)
                        .z_index(z_order::TOOLTIP + 1)
                        .class("tooltip-color")
                        .build(),
                );
            }
            let id = target.id2("tooltip", "label", &row);
            target.push(
                Mark::builder(id)
                    .text((x + swatch_space, y).into(), label.as_str())
                    .font_size(FONT_SIZE)
                    .anchor(TextAnchor::Start)
                    .baseline(TextBaseline::Middle)
                    .fill(neutral::TEXT_SECONDARY)
                    .z_index(z_order::TOOLTIP + 1)
                    .class("tooltip-label")
                    .build(),
            );
            if !value.is_empty() {
                let id = target.id2("tooltip", "value", &row);
                target.push(
                    Mark::builder(id)
                        .text((panel.x1 - PADDING, y).into(), value.as_str())
                        .font_size(FONT_SIZE)
                        .anchor(TextAnchor::End)
                        .baseline(TextBaseline::Middle)
                        .fill(neutral::TEXT)
                        .z_index(z_order::TOOLTIP + 1)
                        .class("tooltip-value")
                        .build(),
                );
            }
            y += LINE_HEIGHT;
        }
    }

    fn is_overlay(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::data::Datum;
    use crate::options::{CustomHtml, ValueFormatter};

    fn hit(group: &str, value: f64) -> HitPoint {
        HitPoint {
            datum: Datum::new(group, "mon", value),
            position: Point::new(50.0, 50.0),
            color: Color::from_rgb8(0x69, 0x29, 0xc4),
        }
    }

    #[test]
    fn right_then_left_then_top_then_bottom() {
        let bounds = Rect::new(0.0, 0.0, 400.0, 300.0);
        let size = KurboSize::new(100.0, 40.0);
        let right = place_tooltip(Point::new(50.0, 150.0), size, bounds, 10.0);
        assert_eq!(right.placement, Placement::Right, "room on the right");
        assert!((right.rect.x0 - 60.0).abs() < 1e-9, "offset from the pointer");

        let left = place_tooltip(Point::new(350.0, 150.0), size, bounds, 10.0);
        assert_eq!(left.placement, Placement::Left, "no room on the right");

        let narrow = Rect::new(0.0, 0.0, 150.0, 300.0);
        let top = place_tooltip(Point::new(75.0, 150.0), size, narrow, 10.0);
        assert_eq!(top.placement, Placement::Top, "neither side fits");

        let bottom = place_tooltip(Point::new(75.0, 20.0), size, narrow, 10.0);
        assert_eq!(bottom.placement, Placement::Bottom, "no room above either");
    }

    #[test]
    fn clamped_right_when_nothing_fits() {
        let bounds = Rect::new(0.0, 0.0, 120.0, 60.0);
        let placed = place_tooltip(Point::new(60.0, 30.0), KurboSize::new(100.0, 40.0), bounds, 10.0);
        assert_eq!(placed.placement, Placement::Right, "default side");
        assert!(fits(placed.rect, bounds), "clamped inside");
    }

    #[test]
    fn single_and_multi_templates() {
        let options = TooltipOptions::default();
        let single = TooltipContent::for_points(&options, &[hit("A", 1200.0)]);
        assert!(single.html.contains("datapoint-tooltip"), "single template");
        assert!(!single.html.contains("multi-tooltip"), "not a list");
        assert!(single.html.contains("#6929c4"), "swatch color");

        let multi = TooltipContent::for_points(&options, &[hit("A", 1.0), hit("B", 2.0)]);
        assert!(multi.html.starts_with("<ul class=\"multi-tooltip\">"), "list template");
        assert_eq!(multi.total.as_deref(), Some("3"), "total row");
    }

    #[test]
    fn compact_formatters_and_escaping() {
        let options = TooltipOptions {
            size: TooltipSize::Compact,
            value_formatter: Some(ValueFormatter::new(|v, _| format!("{v} units"))),
            ..TooltipOptions::default()
        };
        let content = TooltipContent::for_points(&options, &[hit("<A&B>", 3.0)]);
        assert_eq!(content.html, "<b>&lt;A&amp;B&gt;:</b> 3 units<br/>", "compact row");

        let custom = TooltipOptions {
            custom_html: Some(CustomHtml::new(|data, _| format!("{} records", data.len()))),
            ..TooltipOptions::default()
        };
        let content = TooltipContent::for_points(&custom, &[hit("A", 1.0), hit("B", 1.0)]);
        assert_eq!(content.html, "2 records", "custom html replaces the template");
    }
}
