// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart title.

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::Point;

use crate::color::neutral;
use crate::component::{ChartContext, Component, RenderTarget};
use crate::layout::Size;
use crate::measure::{TextStyle, fit_to_width};
use crate::z_order;

/// Draws `options.title` left-aligned in its region, ellipsized to fit.
#[derive(Clone, Debug)]
pub struct TitleComponent {
    /// Font size.
    pub font_size: f64,
    /// Vertical padding above and below the text.
    pub padding: f64,
}

impl Default for TitleComponent {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            padding: 4.0,
        }
    }
}

impl TitleComponent {
    fn style(&self) -> TextStyle {
        TextStyle::bold(self.font_size)
    }
}

impl Component for TitleComponent {
    fn name(&self) -> &'static str {
        "title"
    }

    fn measure(&self, ctx: &ChartContext<'_>, available: Size) -> Option<Size> {
        let Some(title) = ctx.options.title.as_deref().filter(|t| !t.is_empty()) else {
            return Some(Size::default());
        };
        let metrics = ctx.measurer.measure(title, self.style());
        Some(Size::new(
            metrics.width.min(available.width),
            metrics.line_height() + 2.0 * self.padding,
        ))
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        let Some(title) = ctx.options.title.as_deref().filter(|t| !t.is_empty()) else {
            return;
        };
        let region = target.region;
        let text = fit_to_width(ctx.measurer, title, self.style(), region.width());
        let id = target.id("title", "");
        target.push(
            Mark::builder(id)
                .text(Point::new(region.x0, region.center().y), text)
                .font_size(self.font_size)
                .anchor(TextAnchor::Start)
                .baseline(TextBaseline::Middle)
                .fill(neutral::TEXT)
                .z_index(z_order::TITLES)
                .class("title")
                .build(),
        );
    }
}
