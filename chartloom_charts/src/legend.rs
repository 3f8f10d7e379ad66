// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend: one checkbox and label per data group.
//!
//! Items flow left to right and wrap onto a new line when the next item would overflow the
//! region (horizontal orientation), or stack one per line (vertical orientation). Active groups
//! get a filled checkbox in their color; once any group is disabled, active checkboxes also show
//! a check mark.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{BezPath, Point, Rect, Vec2};

use crate::color::neutral;
use crate::component::{ChartContext, Component, Hit, RenderTarget};
use crate::layout::Size;
use crate::measure::{TextStyle, truncate_label};
use crate::model::GroupStatus;
use crate::options::{LegendOptions, LegendOrientation};
use crate::z_order;

/// One placed legend item, relative to the legend origin.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSlot {
    /// Group name.
    pub group: String,
    /// Displayed (possibly truncated) label.
    pub label: String,
    /// Checkbox rectangle.
    pub checkbox: Rect,
    /// Whole item (checkbox and label), used for hit testing.
    pub item: Rect,
    /// Line number, starting at zero.
    pub line: usize,
}

impl LegendSlot {
    /// Returns `true` if the label was shortened.
    pub fn is_truncated(&self) -> bool {
        self.label != self.group
    }
}

/// Places legend items for `groups` within `width`.
pub fn arrange_items<'a>(
    ctx: &ChartContext<'_>,
    options: &LegendOptions,
    groups: impl IntoIterator<Item = &'a str>,
    width: f64,
) -> Vec<LegendSlot> {
    let style = TextStyle::new(options.font_size);
    let side = 2.0 * options.checkbox_radius;
    let checkbox_space = side + options.space_after;
    let vertical = options.resolved_orientation() == LegendOrientation::Vertical;
    let truncation = options.truncation;

    let mut slots = Vec::new();
    let mut x = 0.0;
    let mut line = 0;
    for (i, group) in groups.into_iter().enumerate() {
        let label = truncate_label(
            group,
            truncation.kind,
            truncation.threshold,
            truncation.num_chars,
        );
        let text_width = ctx.measurer.measure(&label, style).width;
        let item_width = checkbox_space + text_width;
        if i > 0 {
            if vertical {
                line += 1;
                x = 0.0;
            } else if x + item_width > width {
                line += 1;
                x = 0.0;
            }
        }
        let y = line as f64 * options.vertical_space;
        slots.push(LegendSlot {
            group: String::from(group),
            label,
            checkbox: Rect::new(x, y, x + side, y + side),
            item: Rect::new(x, y, x + item_width, y + side.max(style.font_size)),
            line,
        });
        x += item_width + options.horizontal_space;
    }
    slots
}

/// The legend component.
#[derive(Clone, Debug, Default)]
pub struct LegendComponent {
    placed: Vec<LegendSlot>,
}

impl LegendComponent {
    /// Items placed by the last render, in chart coordinates.
    pub fn placed(&self) -> &[LegendSlot] {
        &self.placed
    }
}

fn check_mark(checkbox: Rect) -> BezPath {
    let w = checkbox.width();
    let origin = checkbox.origin().to_vec2();
    let mut path = BezPath::new();
    path.move_to(Point::new(0.22 * w, 0.52 * w) + origin);
    path.line_to(Point::new(0.42 * w, 0.72 * w) + origin);
    path.line_to(Point::new(0.78 * w, 0.3 * w) + origin);
    path
}

impl Component for LegendComponent {
    fn name(&self) -> &'static str {
        "legend"
    }

    fn measure(&self, ctx: &ChartContext<'_>, available: Size) -> Option<Size> {
        let options = &ctx.options.legend;
        if !options.enabled || ctx.model.groups().is_empty() {
            return Some(Size::default());
        }
        let slots = arrange_items(
            ctx,
            options,
            ctx.model.groups().iter().map(|g| g.name.as_str()),
            available.width,
        );
        let width = slots.iter().map(|s| s.item.x1).fold(0.0, f64::max);
        let lines = slots.last().map_or(0, |s| s.line + 1);
        Some(Size::new(
            width.min(available.width),
            lines as f64 * options.vertical_space,
        ))
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        self.placed.clear();
        let options = &ctx.options.legend;
        if !options.enabled {
            return;
        }
        let region = target.region;
        let offset = Vec2::new(region.x0, region.y0);
        let groups = ctx.model.groups();
        let any_disabled = groups.iter().any(|g| g.status == GroupStatus::Disabled);
        let slots = arrange_items(
            ctx,
            options,
            groups.iter().map(|g| g.name.as_str()),
            region.width(),
        );

        for slot in slots {
            let active = ctx.model.is_active(&slot.group);
            let checkbox = slot.checkbox + offset;
            let color = ctx.model.stroke_color(&slot.group, None);

            let id = target.id("legend-checkbox", &slot.group);
            let mut checkbox_mark = Mark::builder(id).rect(checkbox).corner_radius(1.0);
            checkbox_mark = if active {
                checkbox_mark.fill(color)
            } else {
                checkbox_mark
                    .fill(neutral::BACKGROUND)
                    .stroke(neutral::DISABLED, 1.0)
            };
            target.push(
                checkbox_mark
                    .z_index(z_order::LEGEND_SWATCHES)
                    .class("legend-item")
                    .transition("legend-update")
                    .build(),
            );

            if active && any_disabled {
                let id = target.id("legend-check", &slot.group);
                target.push(
                    Mark::builder(id)
                        .path(check_mark(checkbox))
                        .stroke(neutral::BACKGROUND, 1.5)
                        .z_index(z_order::LEGEND_SWATCHES + 1)
                        .class("legend-check")
                        .build(),
                );
            }

            if ctx.interaction.hovered_group.as_deref() == Some(slot.group.as_str()) {
                let id = target.id("legend-hover", &slot.group);
                target.push(
                    Mark::builder(id)
                        .rect(checkbox.inflate(2.0, 2.0))
                        .corner_radius(3.0)
                        .stroke(neutral::TEXT_SECONDARY, 1.0)
                        .z_index(z_order::LEGEND_SWATCHES - 1)
                        .class("legend-hover")
                        .build(),
                );
            }

            let id = target.id("legend-label", &slot.group);
            target.push(
                Mark::builder(id)
                    .text(
                        Point::new(checkbox.x1 + options.space_after, checkbox.center().y),
                        slot.label.clone(),
                    )
                    .font_size(options.font_size)
                    .anchor(TextAnchor::Start)
                    .baseline(TextBaseline::Middle)
                    .fill(neutral::TEXT)
                    .z_index(z_order::LEGEND_LABELS)
                    .class("legend-label")
                    .build(),
            );

            self.placed.push(LegendSlot {
                checkbox,
                item: slot.item + offset,
                ..slot
            });
        }
    }

    fn hit_test(&self, _ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        self.placed
            .iter()
            .find(|s| s.item.contains(pos))
            .map(|s| Hit::LegendItem(s.group.clone()))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::component::InteractionState;
    use crate::data::{ChartData, Datum};
    use crate::measure::HeuristicTextMeasurer;
    use crate::model::ChartModel;
    use crate::options::{ChartOptions, LegendPosition};
    use alloc::vec;
    use chartloom_core::IdArena;

    fn model(groups: &[&str], options: ChartOptions) -> ChartModel {
        let records = groups.iter().map(|g| Datum::new(*g, "k", 1.0)).collect();
        ChartModel::new(ChartData::Records(records), options)
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
    fn horizontal_items_wrap_when_out_of_room() {
        let model = model(&["alpha", "beta", "gamma"], ChartOptions::default());
        let interaction = InteractionState::default();
        let ctx = context(&model, &interaction);
        // Each item is 13 + 4 + 5 * 7.2 = 53 wide (plus 12 spacing).
        let slots = arrange_items(&ctx, &ctx.options.legend, ["alpha", "beta", "gamma"], 130.0);
        assert_eq!(
            slots.iter().map(|s| s.line).collect::<Vec<_>>(),
            vec![0, 0, 1],
            "third item wraps"
        );
        assert_eq!(slots[2].checkbox.x0, 0.0, "wrapped item starts the line");
        assert_eq!(slots[2].checkbox.y0, 24.0, "line height is the vertical spacing");
    }

    #[test]
    fn side_legends_stack_vertically() {
        let options = ChartOptions::default().with_legend_position(LegendPosition::Right);
        let model = model(&["a", "b"], options);
        let interaction = InteractionState::default();
        let ctx = context(&model, &interaction);
        let legend = LegendComponent::default();
        let size = legend
            .measure(&ctx, Size::new(1000.0, 300.0))
            .expect("legend measures");
        assert_eq!(size.height, 48.0, "one line per item");
        assert!(size.width < 40.0, "narrow column");
    }

    #[test]
    fn long_labels_truncate() {
        let model = model(&["a very long series name"], ChartOptions::default());
        let interaction = InteractionState::default();
        let ctx = context(&model, &interaction);
        let slots = arrange_items(&ctx, &ctx.options.legend, ["a very long series name"], 500.0);
        assert_eq!(slots[0].label, "a very long se...", "fourteen characters kept");
        assert!(slots[0].is_truncated(), "reported as truncated");
    }

    #[test]
    fn render_places_items_and_hit_tests_them() {
        let model = model(&["A", "B"], ChartOptions::default());
        let interaction = InteractionState::default();
        let ctx = context(&model, &interaction);
        let mut ids = IdArena::new();
        let mut target = RenderTarget::new(Rect::new(10.0, 200.0, 400.0, 230.0), false, &mut ids);
        let mut legend = LegendComponent::default();
        legend.render(&ctx, &mut target);
        assert_eq!(target.marks.len(), 4, "checkbox and label per group");
        let b = &legend.placed()[1];
        assert_eq!(
            legend.hit_test(&ctx, b.checkbox.center()),
            Some(Hit::LegendItem(String::from("B"))),
            "hit on the checkbox"
        );
        assert_eq!(legend.hit_test(&ctx, Point::new(0.0, 0.0)), None, "miss");
    }
}
