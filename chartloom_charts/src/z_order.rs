// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint order of the marks each component emits.
//!
//! Surfaces sort by `(z_index, MarkId)`, so these coarse bands are all components need to agree
//! on.

/// Skeleton placeholders and plot backgrounds.
pub const PLOT_BACKGROUND: i32 = -100;
/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Filled series marks (bars, areas, slices, radar blobs).
pub const SERIES_FILL: i32 = 0;
/// Stroked series marks (lines, blob outlines).
pub const SERIES_STROKE: i32 = 10;
/// Dots drawn above lines.
pub const SERIES_POINTS: i32 = 20;
/// Slice labels and callouts.
pub const SERIES_LABELS: i32 = 25;

/// Threshold lines and their labels.
pub const THRESHOLDS: i32 = 28;
/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis title labels.
pub const AXIS_TITLES: i32 = 50;

/// Legend checkboxes.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;
/// Chart title and toolbar.
pub const TITLES: i32 = 80;
/// Ruler line and highlighted dots.
pub const RULER: i32 = 90;
/// Tooltip panel.
pub const TOOLTIP: i32 = 100;
