// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A declarative chart engine on top of `chartloom_core`.
//!
//! A [`Chart`] owns a [`ChartModel`] (data, options and legend state) and a list of
//! [`Component`]s. Every change runs one update cycle:
//! - the layout tree partitions the drawing area among the components,
//! - cartesian charts resolve their axes into scales and fit the plot around the axis labels,
//! - each component renders keyed marks into its region,
//! - the scene reconciles them per component, and the resulting diffs animate on the surface.
//!
//! Chart types are looked up by name in a [`ChartRegistry`]. The built-in types cover line,
//! scatter, lollipop, area, stacked area, bar, pie, donut, radar and meter charts. Line and area
//! charts draw confidence bands when their records carry intervals.
//!
//! Graphs of cartesian charts are clipped to the plot, so a zoomed domain hides the records
//! outside it.
//!
//! Hosts feed pointer input through [`Chart::pointer_move`], [`Chart::click`] and
//! [`Chart::pointer_leave`], and observe the chart through [`ChartEvent`] listeners.
//!
//! Text shaping is out of scope: text marks store unshaped strings and sizes come from a
//! [`TextMeasurer`].

#![no_std]

extern crate alloc;

mod angle;
mod area;
mod axes;
mod bar;
mod cartesian;
mod chart;
#[cfg(test)]
mod chart_tests;
mod color;
mod component;
mod confidence;
mod curve;
mod data;
mod error;
mod events;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod grid;
mod layout;
mod legend;
mod line;
mod lollipop;
mod measure;
mod meter;
mod model;
mod options;
mod pie;
mod pie_layout;
mod radar;
mod registry;
mod ruler;
mod scale;
mod scatter;
mod series;
mod skeleton;
mod threshold;
mod time;
mod title;
mod toolbar;
mod tooltip;
mod transitions;
mod z_order;

pub use angle::{
    normalize_degrees, polar_to_cartesian, radial_label_placement, screen_angle, spoke_angle,
};
pub use area::{AREA_OPACITY, AreaComponent};
pub use axes::{
    AxesComponent, LABEL_FONT_SIZE, LABEL_PADDING, MARGIN_EPSILON, MIN_MARGIN, Margins,
    TICK_SIZE, TITLE_FONT_SIZE, TITLE_GAP, Tick, axis_margins, axis_ticks, fit_plot,
};
pub use bar::BarComponent;
pub use cartesian::{
    AxisPosition, CartesianScales, CartesianSpec, Orientation, ResolvedAxis, ResolvedDomain,
    ScaleRequirements,
};
pub use chart::{Chart, ChartConfig};
pub use color::{ColorScale, DEFAULT_PALETTE, faded};
pub use component::{ChartContext, Component, Hit, HitPoint, InteractionState, RenderTarget};
pub use confidence::ConfidenceBandComponent;
pub use curve::{Curve, split_defined};
pub use data::{
    ChartData, Dataset, Datum, Field, FieldValue, INTERVAL_MAX, INTERVAL_MIN, Stacked, stack,
};
pub use error::ConfigError;
pub use events::{ChartEvent, Command, Commands, EventBus, ListenerId};
pub use format::{format_number, format_percentage, format_tick_with_step};
pub use grid::GridComponent;
pub use layout::{
    ChildSize, ComponentId, Growth, GrowthPolicy, LayoutChild, LayoutContent, LayoutDirection,
    LayoutNode, LayoutResult, LayoutSize, Size,
};
pub use legend::{LegendComponent, LegendSlot, arrange_items};
pub use line::LineComponent;
pub use lollipop::LollipopComponent;
pub use measure::{
    HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle, TruncationKind, fit_to_width,
    truncate_label,
};
pub use meter::{MeterComponent, meter_peak, meter_status};
pub use model::{ChartModel, DataGroup, GroupStatus, ModelChange, Mutation};
pub use options::{
    AxesOptions, AxisDomain, AxisOptions, AxisRole, AxisValue, BarOptions, CalloutOptions,
    ChartOptions, ColorOptions, DataOptions, DonutOptions, GridOptions, LegendOptions,
    LegendOrientation, LegendPosition, MeterOptions, MeterStatus, PieOptions, PointOptions,
    RadarOptions, RulerOptions, StatusRange, ThresholdOptions, TickOptions, TickValue,
    ToolbarControl, ToolbarOptions, TooltipOptions, TooltipSize, TransitionOptions, Truncation,
};
pub use pie::{PieComponent, PieGeometry};
pub use pie_layout::{
    CalloutDirection, LABEL_MARGIN, LabelPlacement, PieSlice, callout_directions,
    callout_leader, chart_angle_of, label_placement, pie_layout,
};
pub use radar::{RadarComponent, RadarGeometry, RadarSeries, normalize_sparse};
pub use registry::{ChartBlueprint, ChartFactory, ChartRegistry, ChartType, FrameKind};
pub use ruler::{HoverChange, RulerComponent, domain_coordinates, hover_change, ruler_matches};
pub use scale::{
    Scale, ScaleBand, ScaleLinear, ScaleLog, ScaleTime, ScaleType, nice_step, nice_ticks,
};
pub use scatter::ScatterComponent;
pub use series::{Series, StackedPoint, active_series, plotted_points, stacked_series};
pub use skeleton::{SkeletonComponent, SkeletonVariant};
pub use threshold::{ThresholdComponent, threshold_pixel};
pub use time::{format_time, nice_time_step, nice_time_ticks};
pub use title::TitleComponent;
pub use toolbar::{BUTTON_SIZE, ToolbarComponent, next_zoom_domain};
pub use tooltip::{
    PLACEMENTS, Placement, TooltipComponent, TooltipContent, TooltipItem, TooltipPosition,
    escape_html, place_tooltip, tooltip_content, truncated_legend_label,
};
pub use transitions::TransitionService;
pub use z_order::*;
