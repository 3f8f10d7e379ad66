// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart options.
//!
//! [`ChartOptions`] is a tree of plain structs. Every struct has a `Default` that matches the
//! behavior of an options object that leaves the field out, and the most common fields have
//! `with_*` helpers. Options are immutable for the duration of an update cycle; the model holds
//! them in an `Arc` and replaces them wholesale.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use peniko::Color;

use crate::curve::Curve;
use crate::data::{Datum, Field};
use crate::error::ConfigError;
use crate::measure::TruncationKind;
use crate::scale::ScaleType;

macro_rules! callback {
    ($(#[$meta:meta])* $name:ident, $($sig:tt)*) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(pub Arc<dyn $($sig)* + Send + Sync>);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }
    };
}

callback!(
    /// Formats a value shown in a tooltip: `(value, label) -> text`.
    ValueFormatter,
    Fn(f64, &str) -> String
);

callback!(
    /// Replaces tooltip HTML: `(hovered records, default html) -> html`.
    CustomHtml,
    Fn(&[Datum], &str) -> String
);

callback!(
    /// Formats an axis tick: `(tick, index) -> label`.
    TickFormatter,
    Fn(TickValue<'_>, usize) -> String
);

callback!(
    /// Overrides a color: `(group, record if any, default color) -> color`.
    ColorCallback,
    Fn(&str, Option<&Datum>, Color) -> Color
);

callback!(
    /// Formats a pie or donut label: `(value, percentage text) -> label`.
    LabelFormatter,
    Fn(f64, &str) -> String
);

impl ValueFormatter {
    /// Wraps a closure.
    pub fn new(f: impl Fn(f64, &str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl CustomHtml {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&[Datum], &str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl TickFormatter {
    /// Wraps a closure.
    pub fn new(f: impl Fn(TickValue<'_>, usize) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl ColorCallback {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&str, Option<&Datum>, Color) -> Color + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl LabelFormatter {
    /// Wraps a closure.
    pub fn new(f: impl Fn(f64, &str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

/// A tick passed to a [`TickFormatter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickValue<'a> {
    /// A continuous tick.
    Number(f64),
    /// A category tick.
    Key(&'a str),
}

/// Where the legend sits relative to the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendPosition {
    /// Left of the graph.
    Left,
    /// Right of the graph.
    Right,
    /// Above the graph.
    Top,
    /// Below the graph.
    #[default]
    Bottom,
}

/// How legend items flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendOrientation {
    /// Items flow left to right and wrap.
    Horizontal,
    /// One item per line.
    Vertical,
}

/// Label truncation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Truncation {
    /// Where characters are elided.
    pub kind: TruncationKind,
    /// Labels longer than this many characters are truncated.
    pub threshold: usize,
    /// Characters kept when truncating.
    pub num_chars: usize,
}

impl Default for Truncation {
    fn default() -> Self {
        Self {
            kind: TruncationKind::End,
            threshold: 16,
            num_chars: 14,
        }
    }
}

/// Legend options.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendOptions {
    /// Whether the legend is shown.
    pub enabled: bool,
    /// Placement.
    pub position: LegendPosition,
    /// Whether clicking an item toggles its group.
    pub clickable: bool,
    /// Item flow; `None` picks vertical for left/right legends and horizontal otherwise.
    pub orientation: Option<LegendOrientation>,
    /// Label truncation.
    pub truncation: Truncation,
    /// Checkbox radius; the checkbox is a `2r` square.
    pub checkbox_radius: f64,
    /// Gap between the checkbox and the label.
    pub space_after: f64,
    /// Gap between items on one line.
    pub horizontal_space: f64,
    /// Line height of item rows.
    pub vertical_space: f64,
    /// Label font size.
    pub font_size: f64,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            position: LegendPosition::Bottom,
            clickable: true,
            orientation: None,
            truncation: Truncation::default(),
            checkbox_radius: 6.5,
            space_after: 4.0,
            horizontal_space: 12.0,
            vertical_space: 24.0,
            font_size: 12.0,
        }
    }
}

impl LegendOptions {
    /// Resolved item flow.
    pub fn resolved_orientation(&self) -> LegendOrientation {
        self.orientation.unwrap_or(match self.position {
            LegendPosition::Left | LegendPosition::Right => LegendOrientation::Vertical,
            LegendPosition::Top | LegendPosition::Bottom => LegendOrientation::Horizontal,
        })
    }
}

/// Tooltip density.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TooltipSize {
    /// Label and value only.
    Compact,
    /// Adds a color swatch and, for multi-item tooltips, a total.
    #[default]
    Full,
}

/// Tooltip options.
#[derive(Clone, Debug)]
pub struct TooltipOptions {
    /// Whether tooltips are shown.
    pub enabled: bool,
    /// Value formatting override.
    pub value_formatter: Option<ValueFormatter>,
    /// HTML override.
    pub custom_html: Option<CustomHtml>,
    /// Density.
    pub size: TooltipSize,
    /// Distance between the pointer and the tooltip box.
    pub offset: f64,
    /// Whether multi-item tooltips show a total row (full size only).
    pub show_total: bool,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            value_formatter: None,
            custom_html: None,
            size: TooltipSize::Full,
            offset: 10.0,
            show_total: true,
        }
    }
}

/// Ruler options (line and area charts).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RulerOptions {
    /// Whether the ruler is active.
    pub enabled: bool,
    /// Match distance in pixels along the domain axis.
    pub threshold: f64,
}

impl Default for RulerOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 5.0,
        }
    }
}

/// How an axis takes part in orientation resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisRole {
    /// Main if nothing else claims the orientation.
    #[default]
    Auto,
    /// Always the main axis of its orientation.
    Primary,
    /// Never the main axis while another axis of the same orientation exists.
    Secondary,
}

/// A value on an axis (for thresholds and discrete domains).
#[derive(Clone, Debug, PartialEq)]
pub enum AxisValue {
    /// A number or timestamp.
    Number(f64),
    /// A category key.
    Key(String),
}

/// A user domain override.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisDomain {
    /// Continuous bounds.
    Range(f64, f64),
    /// Category keys, in order.
    Keys(Vec<String>),
}

/// Tick options.
#[derive(Clone, Debug, Default)]
pub struct TickOptions {
    /// Approximate tick count for continuous axes (default 5).
    pub count: Option<usize>,
    /// Label formatting override.
    pub formatter: Option<TickFormatter>,
}

/// A threshold line on an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdOptions {
    /// Position on the axis.
    pub value: AxisValue,
    /// Label shown next to the line.
    pub label: Option<String>,
    /// Line color; red when unset.
    pub color: Option<Color>,
}

/// One axis.
#[derive(Clone, Debug)]
pub struct AxisOptions {
    /// Record field plotted on this axis; `None` picks `key`, `date` or `value` from the scale type.
    pub maps_to: Option<Field>,
    /// Scale type; `None` is linear.
    pub scale_type: Option<ScaleType>,
    /// Main-axis role.
    pub role: AxisRole,
    /// Title drawn along the axis.
    pub title: Option<String>,
    /// Tick options.
    pub ticks: TickOptions,
    /// Domain override.
    pub domain: Option<AxisDomain>,
    /// Forces zero into continuous domains.
    pub include_zero: bool,
    /// Groups plotted against this axis when it is a secondary range axis.
    pub corresponding_groups: Vec<String>,
    /// Threshold lines.
    pub thresholds: Vec<ThresholdOptions>,
    /// Whether the axis is drawn. Hidden axes still position data.
    pub visible: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            maps_to: None,
            scale_type: None,
            role: AxisRole::Auto,
            title: None,
            ticks: TickOptions::default(),
            domain: None,
            include_zero: false,
            corresponding_groups: Vec::new(),
            thresholds: Vec::new(),
            visible: true,
        }
    }
}

impl AxisOptions {
    /// An axis of the given scale type.
    pub fn new(scale_type: ScaleType) -> Self {
        Self {
            scale_type: Some(scale_type),
            ..Self::default()
        }
    }

    /// Sets the mapped field.
    #[must_use]
    pub fn with_maps_to(mut self, field: Field) -> Self {
        self.maps_to = Some(field);
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: AxisRole) -> Self {
        self.role = role;
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a domain override.
    #[must_use]
    pub fn with_domain(mut self, domain: AxisDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Adds a threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: ThresholdOptions) -> Self {
        self.thresholds.push(threshold);
        self
    }

    /// Sets the groups plotted against this axis.
    #[must_use]
    pub fn with_corresponding_groups<S: Into<String>>(
        mut self,
        groups: impl IntoIterator<Item = S>,
    ) -> Self {
        self.corresponding_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Resolved scale type.
    pub fn scale(&self) -> ScaleType {
        self.scale_type.unwrap_or_default()
    }

    /// Resolved field.
    pub fn field(&self) -> Field {
        self.maps_to.clone().unwrap_or(match self.scale() {
            ScaleType::Labels | ScaleType::Band => Field::Key,
            ScaleType::Time => Field::Date,
            ScaleType::Linear | ScaleType::Log => Field::Value,
        })
    }
}

/// Axis declarations by position.
#[derive(Clone, Debug, Default)]
pub struct AxesOptions {
    /// Left axis.
    pub left: Option<AxisOptions>,
    /// Right axis.
    pub right: Option<AxisOptions>,
    /// Top axis.
    pub top: Option<AxisOptions>,
    /// Bottom axis.
    pub bottom: Option<AxisOptions>,
}

impl AxesOptions {
    /// Returns `true` if no axis is declared.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// Grid options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridOptions {
    /// Vertical lines at horizontal-axis ticks.
    pub x: bool,
    /// Horizontal lines at vertical-axis ticks.
    pub y: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { x: true, y: true }
    }
}

/// Color options.
#[derive(Clone, Debug, Default)]
pub struct ColorOptions {
    /// Fixed colors by group name.
    pub scale: Vec<(String, Color)>,
    /// Palette override.
    pub palette: Option<Vec<Color>>,
    /// Fill override callback.
    pub get_fill_color: Option<ColorCallback>,
    /// Stroke override callback.
    pub get_stroke_color: Option<ColorCallback>,
}

/// Point (dot) options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointOptions {
    /// Whether line and area charts draw dots.
    pub enabled: bool,
    /// Dot radius.
    pub radius: f64,
    /// Whether scatter dots are filled.
    pub filled: bool,
    /// Fill opacity of filled dots.
    pub fill_opacity: f64,
}

impl Default for PointOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 3.0,
            filled: true,
            fill_opacity: 0.3,
        }
    }
}

/// Bar options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarOptions {
    /// Maximum bar thickness.
    pub max_width: f64,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self { max_width: 16.0 }
    }
}

/// Pie callout geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalloutOptions {
    /// Slices narrower than this (degrees) get a callout.
    pub min_slice_degree: f64,
    /// Horizontal length of the elbow.
    pub offset_x: f64,
    /// Vertical rise of the elbow.
    pub offset_y: f64,
    /// Gap between the line and the label.
    pub text_margin: f64,
    /// Length of the horizontal leader.
    pub horizontal_line_length: f64,
}

impl Default for CalloutOptions {
    fn default() -> Self {
        Self {
            min_slice_degree: 5.0,
            offset_x: 15.0,
            offset_y: 12.0,
            text_margin: 2.0,
            horizontal_line_length: 8.0,
        }
    }
}

/// Pie options.
#[derive(Clone, Debug)]
pub struct PieOptions {
    /// Inner radius of a plain pie.
    pub inner_radius: f64,
    /// Padding between slices, in radians.
    pub pad_angle: f64,
    /// Added to half the smaller region side to get the radius.
    pub radius_offset: f64,
    /// Left inset of the pie.
    pub x_offset: f64,
    /// Top inset of the pie.
    pub y_offset: f64,
    /// Extra top inset when callouts are present.
    pub y_offset_callout: f64,
    /// Outward shift of a hovered slice.
    pub hover_arc_offset: f64,
    /// Whether slice labels are drawn.
    pub labels_enabled: bool,
    /// Label override.
    pub label_formatter: Option<LabelFormatter>,
    /// Callout geometry.
    pub callout: CalloutOptions,
    /// Sort slices by descending value instead of insertion order.
    pub sort_by_value: bool,
}

impl Default for PieOptions {
    fn default() -> Self {
        Self {
            inner_radius: 2.0,
            pad_angle: 0.007,
            radius_offset: -15.0,
            x_offset: 30.0,
            y_offset: 20.0,
            y_offset_callout: 10.0,
            hover_arc_offset: 3.0,
            labels_enabled: true,
            label_formatter: None,
            callout: CalloutOptions::default(),
            sort_by_value: false,
        }
    }
}

/// Donut options.
#[derive(Clone, Debug)]
pub struct DonutOptions {
    /// Label under the center total.
    pub center_label: String,
    /// Center number override.
    pub center_number_formatter: Option<ValueFormatter>,
}

impl Default for DonutOptions {
    fn default() -> Self {
        Self {
            center_label: String::from("Total"),
            center_number_formatter: None,
        }
    }
}

/// Radar options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadarOptions {
    /// Blob fill opacity for active groups.
    pub opacity_selected: f64,
    /// Blob fill opacity when another group is hovered.
    pub opacity_unselected: f64,
    /// Number of concentric rings.
    pub ticks: usize,
    /// Radius of the innermost ring (the value-zero radius).
    pub min_range: f64,
    /// Gap between the outer ring and the key labels.
    pub label_padding: f64,
}

impl Default for RadarOptions {
    fn default() -> Self {
        Self {
            opacity_selected: 0.3,
            opacity_unselected: 0.1,
            ticks: 5,
            min_range: 10.0,
            label_padding: 10.0,
        }
    }
}

/// Meter status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeterStatus {
    /// Within normal bounds.
    Success,
    /// Approaching a limit.
    Warning,
    /// Past a limit.
    Danger,
}

impl MeterStatus {
    /// Bar color for the status.
    pub fn color(self) -> Color {
        match self {
            Self::Success => Color::from_rgb8(0x24, 0xa1, 0x48),
            Self::Warning => Color::from_rgb8(0xf1, 0xc2, 0x1b),
            Self::Danger => Color::from_rgb8(0xda, 0x1e, 0x28),
        }
    }

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// A value range mapped to a status.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusRange {
    /// Inclusive bounds.
    pub range: (f64, f64),
    /// Status for values inside `range`.
    pub status: MeterStatus,
}

/// Meter options.
#[derive(Clone, Debug, PartialEq)]
pub struct MeterOptions {
    /// Bar height.
    pub height: f64,
    /// Peak marker value.
    pub peak: Option<f64>,
    /// Status ranges; the first range containing the value wins.
    pub status_ranges: Vec<StatusRange>,
}

impl Default for MeterOptions {
    fn default() -> Self {
        Self {
            height: 8.0,
            peak: None,
            status_ranges: Vec::new(),
        }
    }
}

/// A toolbar control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarControl {
    /// Narrow the zoom domain.
    ZoomIn,
    /// Widen the zoom domain.
    ZoomOut,
    /// Clear the zoom domain.
    ResetZoom,
}

impl ToolbarControl {
    /// Parses a registered control name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "zoom-in" | "Zoom in" => Ok(Self::ZoomIn),
            "zoom-out" | "Zoom out" => Ok(Self::ZoomOut),
            "reset-zoom" | "Reset zoom" => Ok(Self::ResetZoom),
            _ => Err(ConfigError::UnknownToolbarControl(String::from(name))),
        }
    }

    /// Registered name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::ResetZoom => "reset-zoom",
        }
    }

    /// Button glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::ZoomIn => "+",
            Self::ZoomOut => "-",
            Self::ResetZoom => "R",
        }
    }
}

/// Toolbar options.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolbarOptions {
    /// Whether the toolbar is shown.
    pub enabled: bool,
    /// Controls, in display order.
    pub controls: Vec<ToolbarControl>,
    /// Fraction of the zoom domain removed (zoom in) or added (zoom out) per click.
    pub zoom_ratio: f64,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            controls: alloc::vec![
                ToolbarControl::ZoomIn,
                ToolbarControl::ZoomOut,
                ToolbarControl::ResetZoom
            ],
            zoom_ratio: 0.4,
        }
    }
}

impl ToolbarOptions {
    /// Enabled toolbar with controls given by name. Unknown names fail.
    pub fn with_control_names<'a>(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        let controls = names
            .into_iter()
            .map(ToolbarControl::from_name)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            enabled: true,
            controls,
            ..Self::default()
        })
    }
}

/// Transition timing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionOptions {
    /// Default duration.
    pub duration: Duration,
    /// Durations for specific transition names.
    pub overrides: Vec<(&'static str, Duration)>,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            overrides: Vec::new(),
        }
    }
}

impl TransitionOptions {
    /// Duration of the transition named `name`.
    pub fn duration_for(&self, name: &str) -> Duration {
        self.overrides
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(self.duration, |(_, d)| *d)
    }
}

/// Data state options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataOptions {
    /// Data is being fetched; empty charts show a shimmering skeleton.
    pub loading: bool,
}

/// All chart options.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Chart title.
    pub title: Option<String>,
    /// Width of the drawing area; required before anything renders.
    pub width: Option<f64>,
    /// Height of the drawing area; required before anything renders.
    pub height: Option<f64>,
    /// Whether updates animate.
    pub animations: bool,
    /// Transition timing.
    pub transitions: TransitionOptions,
    /// Legend.
    pub legend: LegendOptions,
    /// Tooltip.
    pub tooltip: TooltipOptions,
    /// Ruler.
    pub ruler: RulerOptions,
    /// Axes.
    pub axes: AxesOptions,
    /// Grid.
    pub grid: GridOptions,
    /// Colors.
    pub color: ColorOptions,
    /// Line and area interpolation.
    pub curve: Curve,
    /// Dots.
    pub points: PointOptions,
    /// Bars.
    pub bars: BarOptions,
    /// Pie.
    pub pie: PieOptions,
    /// Donut.
    pub donut: DonutOptions,
    /// Radar.
    pub radar: RadarOptions,
    /// Meter.
    pub meter: MeterOptions,
    /// Toolbar.
    pub toolbar: ToolbarOptions,
    /// Data state.
    pub data: DataOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            width: None,
            height: None,
            animations: true,
            transitions: TransitionOptions::default(),
            legend: LegendOptions::default(),
            tooltip: TooltipOptions::default(),
            ruler: RulerOptions::default(),
            axes: AxesOptions::default(),
            grid: GridOptions::default(),
            color: ColorOptions::default(),
            curve: Curve::default(),
            points: PointOptions::default(),
            bars: BarOptions::default(),
            pie: PieOptions::default(),
            donut: DonutOptions::default(),
            radar: RadarOptions::default(),
            meter: MeterOptions::default(),
            toolbar: ToolbarOptions::default(),
            data: DataOptions::default(),
        }
    }
}

impl ChartOptions {
    /// Sets the size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables or disables animation.
    #[must_use]
    pub fn with_animations(mut self, animations: bool) -> Self {
        self.animations = animations;
        self
    }

    /// Sets the left axis.
    #[must_use]
    pub fn with_left_axis(mut self, axis: AxisOptions) -> Self {
        self.axes.left = Some(axis);
        self
    }

    /// Sets the right axis.
    #[must_use]
    pub fn with_right_axis(mut self, axis: AxisOptions) -> Self {
        self.axes.right = Some(axis);
        self
    }

    /// Sets the bottom axis.
    #[must_use]
    pub fn with_bottom_axis(mut self, axis: AxisOptions) -> Self {
        self.axes.bottom = Some(axis);
        self
    }

    /// Sets the top axis.
    #[must_use]
    pub fn with_top_axis(mut self, axis: AxisOptions) -> Self {
        self.axes.top = Some(axis);
        self
    }

    /// Sets the legend position.
    #[must_use]
    pub fn with_legend_position(mut self, position: LegendPosition) -> Self {
        self.legend.position = position;
        self
    }

    /// Sets the curve by name. Unknown names fail.
    pub fn with_curve_name(mut self, name: &str) -> Result<Self, ConfigError> {
        self.curve = Curve::from_name(name)?;
        Ok(self)
    }

    /// Size, if both dimensions are set, finite and positive.
    pub fn size(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => {
                Some((w, h))
            }
            _ => None,
        }
    }

    /// Transition duration for `name`, zero when animations are off.
    pub fn transition_duration(&self, name: &str) -> Duration {
        if self.animations {
            self.transitions.duration_for(name)
        } else {
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn axis_field_follows_scale_type() {
        assert_eq!(AxisOptions::new(ScaleType::Labels).field(), Field::Key, "labels map keys");
        assert_eq!(AxisOptions::new(ScaleType::Time).field(), Field::Date, "time maps dates");
        assert_eq!(AxisOptions::default().field(), Field::Value, "linear maps values");
        assert_eq!(
            AxisOptions::new(ScaleType::Labels)
                .with_maps_to(Field::Named(String::from("cat")))
                .field(),
            Field::Named(String::from("cat")),
            "explicit mapping wins"
        );
    }

    #[test]
    fn toolbar_controls_fail_fast() {
        let ok = ToolbarOptions::with_control_names(["zoom-in", "reset-zoom"]);
        assert_eq!(
            ok.map(|t| t.controls),
            Ok(alloc::vec![ToolbarControl::ZoomIn, ToolbarControl::ResetZoom]),
            "known names parse"
        );
        assert_eq!(
            ToolbarOptions::with_control_names(["zoom-in", "pan"]),
            Err(ConfigError::UnknownToolbarControl(String::from("pan"))),
            "unknown names fail"
        );
    }

    #[test]
    fn size_requires_both_dimensions() {
        assert_eq!(ChartOptions::default().size(), None, "unset");
        assert_eq!(
            ChartOptions {
                width: Some(0.0),
                height: Some(10.0),
                ..ChartOptions::default()
            }
            .size(),
            None,
            "zero width"
        );
        assert_eq!(ChartOptions::default().with_size(4.0, 3.0).size(), Some((4.0, 3.0)), "set");
    }

    #[test]
    fn animation_off_means_zero_duration() {
        let mut options = ChartOptions::default();
        options.transitions.overrides.push(("pie-slice", Duration::from_millis(50)));
        assert_eq!(options.transition_duration("line"), Duration::from_millis(300), "default");
        assert_eq!(options.transition_duration("pie-slice"), Duration::from_millis(50), "override");
        options.animations = false;
        assert_eq!(options.transition_duration("line"), Duration::ZERO, "disabled");
    }

    #[test]
    fn legend_orientation_follows_position() {
        let legend = LegendOptions {
            position: LegendPosition::Right,
            ..LegendOptions::default()
        };
        assert_eq!(legend.resolved_orientation(), LegendOrientation::Vertical, "side legends stack");
        assert_eq!(
            LegendOptions::default().resolved_orientation(),
            LegendOrientation::Horizontal,
            "bottom legends flow"
        );
    }
}
