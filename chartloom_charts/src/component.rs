// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component contract shared by every region of a chart.
//!
//! A chart is a list of components placed by the layout engine. On every update cycle each
//! component is measured (if laid out as preferred), then rendered into its region as a set of
//! keyed marks. The chart reconciles those marks against the previous cycle, so components never
//! track what they drew last time; they only describe what should be on screen now.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartloom_core::{IdArena, Mark, MarkId};
use kurbo::{Point, Rect};
use peniko::Color;
use smallvec::SmallVec;

use crate::cartesian::{CartesianScales, CartesianSpec};
use crate::data::Datum;
use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::model::ChartModel;
use crate::options::{ChartOptions, ToolbarControl};

/// Read-only inputs of one render pass.
#[derive(Clone, Copy)]
pub struct ChartContext<'a> {
    /// The model.
    pub model: &'a ChartModel,
    /// The model's options.
    pub options: &'a ChartOptions,
    /// Resolved axes, for cartesian charts.
    pub cartesian: Option<&'a CartesianSpec>,
    /// Pixel scales, once the plot rectangle is known.
    pub scales: Option<&'a CartesianScales>,
    /// Text measurement.
    pub measurer: &'a dyn TextMeasurer,
    /// Pointer and hover state.
    pub interaction: &'a InteractionState,
    /// Outer chart size.
    pub size: Size,
}

impl core::fmt::Debug for ChartContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChartContext")
            .field("size", &self.size)
            .field("cartesian", &self.cartesian.is_some())
            .field("interaction", self.interaction)
            .finish_non_exhaustive()
    }
}

impl ChartContext<'_> {
    /// Opacity for marks of `group`, dimmed while another legend item is hovered.
    pub fn group_opacity(&self, group: &str) -> f64 {
        match &self.interaction.hovered_group {
            Some(hovered) if hovered != group => 0.3,
            _ => 1.0,
        }
    }
}

/// Where a component draws and what it produced.
#[derive(Debug)]
pub struct RenderTarget<'a> {
    /// Assigned region.
    pub region: Rect,
    /// Whether changes should animate.
    pub animate: bool,
    /// Mark identity for this chart.
    pub ids: &'a mut IdArena,
    /// Marks emitted so far.
    pub marks: Vec<Mark>,
}

impl<'a> RenderTarget<'a> {
    /// An empty target for `region`.
    pub fn new(region: Rect, animate: bool, ids: &'a mut IdArena) -> Self {
        Self {
            region,
            animate,
            ids,
            marks: Vec::new(),
        }
    }

    /// Id for `key` in `scope`.
    pub fn id(&mut self, scope: &'static str, key: &str) -> MarkId {
        self.ids.id(scope, key)
    }

    /// Id for a two-part key in `scope`.
    pub fn id2(&mut self, scope: &'static str, a: &str, b: &str) -> MarkId {
        self.ids.id2(scope, a, b)
    }

    /// Adds a mark.
    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Consumes the target and returns its marks.
    pub fn into_marks(self) -> Vec<Mark> {
        self.marks
    }
}

/// One hovered record.
#[derive(Clone, Debug, PartialEq)]
pub struct HitPoint {
    /// The record.
    pub datum: Datum,
    /// Where it is drawn.
    pub position: Point,
    /// Its group color.
    pub color: Color,
}

/// What is under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
    /// A legend item, by group name.
    LegendItem(String),
    /// Records that should be reported together.
    Points(SmallVec<[HitPoint; 4]>),
    /// A toolbar button.
    ToolbarControl(ToolbarControl),
}

/// Pointer-driven state shared with components.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    /// Group whose legend item is hovered.
    pub hovered_group: Option<String>,
    /// Pointer position in chart coordinates.
    pub cursor: Option<Point>,
    /// Records currently reported by the tooltip.
    pub hovered_points: SmallVec<[HitPoint; 4]>,
    /// Hovered toolbar button.
    pub hovered_control: Option<ToolbarControl>,
}

impl InteractionState {
    /// Returns `true` if `datum` is among the hovered records.
    pub fn is_hovered(&self, datum: &Datum) -> bool {
        self.hovered_points
            .iter()
            .any(|p| p.datum.group == datum.group && p.datum.identity() == datum.identity())
    }
}

/// A renderable region of a chart.
pub trait Component {
    /// Stable name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Natural size within `available`.
    ///
    /// Components laid out as preferred must override this; the default reports that the
    /// component cannot be measured.
    fn measure(&self, _ctx: &ChartContext<'_>, _available: Size) -> Option<Size> {
        None
    }

    /// Emits the marks for the current state into `target`.
    fn render(&mut self, ctx: &ChartContext<'_>, target: &mut RenderTarget<'_>);

    /// What this component shows at `pos`, based on its last render.
    fn hit_test(&self, _ctx: &ChartContext<'_>, _pos: Point) -> Option<Hit> {
        None
    }

    /// Overlays redraw on pointer moves without a full update cycle.
    fn is_overlay(&self) -> bool {
        false
    }

    /// Graphs drawn inside the plot of a cartesian chart.
    ///
    /// Their marks are clipped to the plot rectangle, so records outside a zoomed domain stay
    /// hidden, and they are not hit-tested while the pointer is outside the plot.
    fn within_chart_clip(&self) -> bool {
        false
    }
}
