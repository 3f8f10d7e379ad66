// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toolbar buttons and the zoom arithmetic behind them.

extern crate alloc;

use alloc::vec::Vec;

use chartloom_core::{Mark, TextAnchor, TextBaseline};
use kurbo::{Point, Rect};

use crate::color::neutral;
use crate::component::{ChartContext, Component, Hit, RenderTarget};
use crate::layout::Size;
use crate::options::ToolbarControl;
use crate::z_order;

/// Side of a toolbar button.
pub const BUTTON_SIZE: f64 = 32.0;

/// Zoom domain after activating `control`.
///
/// `current` is the visible domain and `full` the unzoomed one. `None` means "not zoomed".
pub fn next_zoom_domain(
    control: ToolbarControl,
    current: (f64, f64),
    full: (f64, f64),
    ratio: f64,
) -> Option<(f64, f64)> {
    let center = (current.0 + current.1) / 2.0;
    let width = current.1 - current.0;
    let ratio = ratio.clamp(0.0, 0.95);
    match control {
        ToolbarControl::ResetZoom => None,
        ToolbarControl::ZoomIn => {
            let half = width * (1.0 - ratio) / 2.0;
            Some((center - half, center + half))
        }
        ToolbarControl::ZoomOut => {
            let half = width / (1.0 - ratio) / 2.0;
            let (mut lo, mut hi) = (center - half, center + half);
            if hi - lo >= full.1 - full.0 {
                return None;
            }
            if lo < full.0 {
                hi += full.0 - lo;
                lo = full.0;
            }
            if hi > full.1 {
                lo -= hi - full.1;
                hi = full.1;
            }
            Some((lo, hi))
        }
    }
}

/// Row of toolbar buttons, right-aligned in its region.
#[derive(Clone, Debug, Default)]
pub struct ToolbarComponent {
    buttons: Vec<(ToolbarControl, Rect)>,
}

impl Component for ToolbarComponent {
    fn name(&self) -> &'static str {
        "toolbar"
    }

    fn measure(&self, ctx: &ChartContext<'_>, _available: Size) -> Option<Size> {
        let toolbar = &ctx.options.toolbar;
        if !toolbar.enabled || toolbar.controls.is_empty() {
            return Some(Size::default());
        }
        Some(Size::new(
            toolbar.controls.len() as f64 * BUTTON_SIZE,
            BUTTON_SIZE,
        ))
    }

    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>) {
        self.buttons.clear();
        let toolbar = &ctx.options.toolbar;
        // Loading keeps the space reserved but draws nothing.
        if !toolbar.enabled || ctx.options.data.loading {
            return;
        }
        let region = target.region;
        let mut x = region.x1 - toolbar.controls.len() as f64 * BUTTON_SIZE;
        for control in &toolbar.controls {
            let rect = Rect::new(x, region.y0, x + BUTTON_SIZE, region.y0 + BUTTON_SIZE);
            let hovered = ctx.interaction.hovered_control == Some(*control);
            let id = target.id("toolbar-button", control.name());
            target.push(
                Mark::builder(id)
                    .rect(rect)
                    .fill(if hovered {
                        neutral::GRID
                    } else {
                        neutral::BACKGROUND
                    })
                    .z_index(z_order::TITLES)
                    .class("toolbar-button")
                    .build(),
            );
            let id = target.id("toolbar-icon", control.name());
            target.push(
                Mark::builder(id)
                    .text(rect.center(), control.glyph())
                    .font_size(16.0)
                    .anchor(TextAnchor::Middle)
                    .baseline(TextBaseline::Middle)
                    .fill(neutral::TEXT)
                    .z_index(z_order::TITLES + 1)
                    .class("toolbar-icon")
                    .build(),
            );
            self.buttons.push((*control, rect));
            x += BUTTON_SIZE;
        }
    }

    fn hit_test(&self, _ctx: &ChartContext<'_>, pos: Point) -> Option<Hit> {
        self.buttons
            .iter()
            .find(|(_, r)| r.contains(pos))
            .map(|(c, _)| Hit::ToolbarControl(*c))
    }
}
