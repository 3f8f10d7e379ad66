// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cartesian scale service.
//!
//! Resolution happens in two steps, because pixel ranges are only known after layout:
//! 1. [`CartesianSpec::resolve`] reads the model and decides which axes exist, which axis is the
//!    main one per orientation, which main axis is the domain axis, and each axis' domain.
//! 2. [`CartesianSpec::instantiate`] binds those domains to a plot rectangle and returns
//!    [`CartesianScales`], which graph components use without caring about orientation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::data::{Datum, Field, stack};
use crate::model::ChartModel;
use crate::options::{AxisDomain, AxisOptions, AxisRole};
use crate::scale::{Scale, ScaleBand, ScaleLinear, ScaleLog, ScaleTime, ScaleType};

/// Where an axis is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisPosition {
    /// Left of the plot.
    Left,
    /// Right of the plot.
    Right,
    /// Above the plot.
    Top,
    /// Below the plot.
    Bottom,
}

impl AxisPosition {
    /// Declaration order, which also breaks ties between axes of one orientation.
    pub const DECLARATION_ORDER: [Self; 4] = [Self::Left, Self::Right, Self::Bottom, Self::Top];

    /// Returns `true` for left and right.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Stable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Direction in which the domain axis runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Domain axis is horizontal; values grow upward.
    Vertical,
    /// Domain axis is vertical; values grow rightward.
    Horizontal,
}

/// What a chart type asks of the scale service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScaleRequirements {
    /// Continuous range domains must include zero (bars, areas).
    pub zero_baseline: bool,
    /// Range domains cover stacked sums rather than single values.
    pub stacked: bool,
}

/// A resolved axis domain.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedDomain {
    /// Continuous bounds.
    Continuous(f64, f64),
    /// Category keys in order.
    Keys(Vec<String>),
}

/// One axis after resolution.
#[derive(Clone, Debug)]
pub struct ResolvedAxis {
    /// Position.
    pub position: AxisPosition,
    /// The axis options as declared (or defaulted).
    pub options: AxisOptions,
    /// Resolved scale type.
    pub scale_type: ScaleType,
    /// Resolved field.
    pub field: Field,
    /// Resolved domain.
    pub domain: ResolvedDomain,
}

/// Axes, roles and domains for one update cycle.
#[derive(Clone, Debug)]
pub struct CartesianSpec {
    axes: SmallVec<[ResolvedAxis; 4]>,
    main_x: AxisPosition,
    main_y: AxisPosition,
    domain_axis: AxisPosition,
    range_axis: AxisPosition,
    secondary_range: Option<AxisPosition>,
    unzoomed: Option<(f64, f64)>,
}

fn default_axes(model: &ChartModel) -> SmallVec<[(AxisPosition, AxisOptions); 4]> {
    let axes = &model.options().axes;
    let mut declared: SmallVec<[(AxisPosition, AxisOptions); 4]> = SmallVec::new();
    for position in AxisPosition::DECLARATION_ORDER {
        let axis = match position {
            AxisPosition::Left => &axes.left,
            AxisPosition::Right => &axes.right,
            AxisPosition::Top => &axes.top,
            AxisPosition::Bottom => &axes.bottom,
        };
        if let Some(axis) = axis {
            declared.push((position, axis.clone()));
        }
    }
    if !declared.iter().any(|(p, _)| p.is_vertical()) {
        declared.insert(0, (AxisPosition::Left, AxisOptions::new(ScaleType::Linear)));
    }
    if !declared.iter().any(|(p, _)| !p.is_vertical()) {
        let at = declared
            .iter()
            .position(|(p, _)| *p == AxisPosition::Top)
            .unwrap_or(declared.len());
        declared.insert(at, (AxisPosition::Bottom, AxisOptions::new(ScaleType::Labels)));
    }
    declared
}

fn pick_main(axes: &[(AxisPosition, AxisOptions)], vertical: bool) -> AxisPosition {
    let candidates = || axes.iter().filter(move |(p, _)| p.is_vertical() == vertical);
    candidates()
        .find(|(_, a)| a.role == AxisRole::Primary)
        .or_else(|| candidates().find(|(_, a)| a.role != AxisRole::Secondary))
        .or_else(|| candidates().next())
        .map_or(
            if vertical {
                AxisPosition::Left
            } else {
                AxisPosition::Bottom
            },
            |(p, _)| *p,
        )
}

impl CartesianSpec {
    /// Resolves axes and domains from the model's display data.
    pub fn resolve(model: &ChartModel, requirements: ScaleRequirements) -> Self {
        let declared = default_axes(model);
        let main_y = pick_main(&declared, true);
        let main_x = pick_main(&declared, false);

        let scale_of = |pos: AxisPosition| {
            declared
                .iter()
                .find(|(p, _)| *p == pos)
                .map_or(ScaleType::Linear, |(_, a)| a.scale())
        };
        let (x_type, y_type) = (scale_of(main_x), scale_of(main_y));
        let domain_axis = match (x_type.is_discrete(), y_type.is_discrete()) {
            (true, false) => main_x,
            (false, true) => main_y,
            (true, true) => {
                tracing::warn!("both main axes are discrete; using the horizontal axis as domain");
                main_x
            }
            (false, false) => match (x_type == ScaleType::Time, y_type == ScaleType::Time) {
                (false, true) => main_y,
                (true, false) => main_x,
                _ => {
                    tracing::debug!(
                        "domain axis is ambiguous; defaulting to the horizontal main axis"
                    );
                    main_x
                }
            },
        };
        let range_axis = if domain_axis == main_x { main_y } else { main_x };
        let secondary_range = declared
            .iter()
            .map(|(p, _)| *p)
            .find(|p| p.is_vertical() == range_axis.is_vertical() && *p != range_axis);

        let secondary_groups: Vec<String> = secondary_range
            .and_then(|pos| declared.iter().find(|(p, _)| *p == pos))
            .map(|(_, a)| a.corresponding_groups.clone())
            .unwrap_or_default();

        let data = model.display_data();
        let active = model.active_groups();
        let mut unzoomed = None;
        let axes = declared
            .into_iter()
            .map(|(position, options)| {
                let scale_type = options.scale();
                let field = options.field();
                let on_range_side = position.is_vertical() == range_axis.is_vertical();
                let subset: Vec<&Datum> = if Some(position) == secondary_range
                    && !secondary_groups.is_empty()
                {
                    data.iter()
                        .filter(|d| secondary_groups.contains(&d.group))
                        .collect()
                } else if on_range_side && !secondary_groups.is_empty() {
                    data.iter()
                        .filter(|d| !secondary_groups.contains(&d.group))
                        .collect()
                } else {
                    data.iter().collect()
                };
                let mut domain = compute_domain(
                    &options,
                    scale_type,
                    &field,
                    &subset,
                    &active,
                    on_range_side && requirements.zero_baseline,
                    on_range_side && requirements.stacked,
                );
                if position == domain_axis
                    && let ResolvedDomain::Continuous(lo, hi) = domain
                {
                    unzoomed = Some((lo, hi));
                }
                if position == domain_axis
                    && unzoomed.is_some()
                    && let Some((z0, z1)) = model.zoom_domain()
                    && z0 < z1
                {
                    domain = ResolvedDomain::Continuous(z0, z1);
                }
                ResolvedAxis {
                    position,
                    options,
                    scale_type,
                    field,
                    domain,
                }
            })
            .collect();

        tracing::trace!(
            main_x = main_x.name(),
            main_y = main_y.name(),
            domain = domain_axis.name(),
            "cartesian axes resolved"
        );
        Self {
            axes,
            main_x,
            main_y,
            domain_axis,
            range_axis,
            secondary_range,
            unzoomed,
        }
    }

    /// Continuous domain of the domain axis before zooming, if it is continuous.
    pub fn unzoomed_domain(&self) -> Option<(f64, f64)> {
        self.unzoomed
    }

    /// Resolved axes in declaration order.
    pub fn axes(&self) -> &[ResolvedAxis] {
        &self.axes
    }

    /// The axis at `position`.
    pub fn axis(&self, position: AxisPosition) -> Option<&ResolvedAxis> {
        self.axes.iter().find(|a| a.position == position)
    }

    /// Main horizontal axis.
    pub fn main_x(&self) -> AxisPosition {
        self.main_x
    }

    /// Main vertical axis.
    pub fn main_y(&self) -> AxisPosition {
        self.main_y
    }

    /// Domain axis.
    pub fn domain_axis(&self) -> AxisPosition {
        self.domain_axis
    }

    /// Main range axis.
    pub fn range_axis(&self) -> AxisPosition {
        self.range_axis
    }

    /// Chart orientation.
    pub fn orientation(&self) -> Orientation {
        if self.domain_axis.is_vertical() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Binds the domains to `plot`.
    pub fn instantiate(&self, plot: Rect) -> CartesianScales {
        let scales = self
            .axes
            .iter()
            .map(|axis| {
                let scale = instantiate_axis(axis, plot);
                (axis.position, scale, axis.field.clone())
            })
            .collect();
        let secondary_groups = self
            .secondary_range
            .and_then(|p| self.axis(p))
            .map(|a| a.options.corresponding_groups.clone())
            .unwrap_or_default();
        CartesianScales {
            plot,
            scales,
            main_x: self.main_x,
            main_y: self.main_y,
            domain_axis: self.domain_axis,
            range_axis: self.range_axis,
            secondary_range: self.secondary_range,
            secondary_groups,
        }
    }
}

fn compute_domain(
    options: &AxisOptions,
    scale_type: ScaleType,
    field: &Field,
    data: &[&Datum],
    active_groups: &[&str],
    zero_baseline: bool,
    stacked: bool,
) -> ResolvedDomain {
    if scale_type.is_discrete() {
        if let Some(AxisDomain::Keys(keys)) = &options.domain {
            return ResolvedDomain::Keys(keys.clone());
        }
        let mut keys: Vec<String> = Vec::new();
        for datum in data {
            if let Some(key) = datum.text(field)
                && !keys.contains(&key)
            {
                keys.push(key);
            }
        }
        return ResolvedDomain::Keys(keys);
    }

    if let Some(AxisDomain::Range(lo, hi)) = options.domain {
        return ResolvedDomain::Continuous(lo, hi);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut include = |v: f64| {
        if v.is_finite() && (scale_type != ScaleType::Log || v > 0.0) {
            min = min.min(v);
            max = max.max(v);
        }
    };
    if stacked {
        let owned: Vec<Datum> = data.iter().map(|d| (*d).clone()).collect();
        for s in stack(&owned, active_groups, field) {
            include(s.y0);
            include(s.y1);
        }
    } else {
        for datum in data {
            if let Some(v) = datum.number(field) {
                include(v);
            }
            // Confidence bands are drawn on the value axis and must fit it.
            if *field == Field::Value
                && let Some((lo, hi)) = datum.interval()
            {
                include(lo);
                include(hi);
            }
        }
    }
    if scale_type != ScaleType::Log && (zero_baseline || options.include_zero) {
        include(0.0);
    }
    if !min.is_finite() || !max.is_finite() {
        return if scale_type == ScaleType::Log {
            ResolvedDomain::Continuous(1.0, 10.0)
        } else {
            ResolvedDomain::Continuous(0.0, 1.0)
        };
    }
    if min == max {
        return if scale_type == ScaleType::Log {
            ResolvedDomain::Continuous(min / 10.0, max * 10.0)
        } else {
            ResolvedDomain::Continuous(min - 1.0, max + 1.0)
        };
    }
    ResolvedDomain::Continuous(min, max)
}

fn instantiate_axis(axis: &ResolvedAxis, plot: Rect) -> Scale {
    let vertical = axis.position.is_vertical();
    match &axis.domain {
        ResolvedDomain::Keys(keys) => {
            let range = if vertical {
                (plot.y0, plot.y1)
            } else {
                (plot.x0, plot.x1)
            };
            let band = ScaleBand::new(keys.clone(), range);
            Scale::Band(if axis.scale_type == ScaleType::Band {
                band.with_padding(0.2, 0.1)
            } else {
                band
            })
        }
        ResolvedDomain::Continuous(lo, hi) => {
            let range = if vertical {
                (plot.y1, plot.y0)
            } else {
                (plot.x0, plot.x1)
            };
            match axis.scale_type {
                ScaleType::Log => Scale::Log(ScaleLog::new((*lo, *hi), range)),
                ScaleType::Time => Scale::Time(ScaleTime::new((*lo, *hi), range)),
                _ => Scale::Linear(ScaleLinear::new((*lo, *hi), range)),
            }
        }
    }
}

/// Pixel scales for one layout.
#[derive(Clone, Debug)]
pub struct CartesianScales {
    plot: Rect,
    scales: SmallVec<[(AxisPosition, Scale, Field); 4]>,
    main_x: AxisPosition,
    main_y: AxisPosition,
    domain_axis: AxisPosition,
    range_axis: AxisPosition,
    secondary_range: Option<AxisPosition>,
    secondary_groups: Vec<String>,
}

impl CartesianScales {
    /// The plot rectangle.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// The scale at `position`.
    pub fn scale(&self, position: AxisPosition) -> Option<&Scale> {
        self.scales
            .iter()
            .find(|(p, _, _)| *p == position)
            .map(|(_, s, _)| s)
    }

    fn entry(&self, position: AxisPosition) -> &(AxisPosition, Scale, Field) {
        self.scales
            .iter()
            .find(|(p, _, _)| *p == position)
            .unwrap_or(&self.scales[0])
    }

    /// Main horizontal scale.
    pub fn main_x_scale(&self) -> &Scale {
        &self.entry(self.main_x).1
    }

    /// Main vertical scale.
    pub fn main_y_scale(&self) -> &Scale {
        &self.entry(self.main_y).1
    }

    /// Domain scale.
    pub fn domain_scale(&self) -> &Scale {
        &self.entry(self.domain_axis).1
    }

    /// Domain field.
    pub fn domain_field(&self) -> &Field {
        &self.entry(self.domain_axis).2
    }

    /// Position of the domain axis.
    pub fn domain_axis(&self) -> AxisPosition {
        self.domain_axis
    }

    /// Range axis used by `group`.
    pub fn range_axis_for(&self, group: &str) -> AxisPosition {
        match self.secondary_range {
            Some(secondary) if self.secondary_groups.iter().any(|g| g == group) => secondary,
            _ => self.range_axis,
        }
    }

    /// Range scale used by `group`.
    pub fn range_scale(&self, group: &str) -> &Scale {
        &self.entry(self.range_axis_for(group)).1
    }

    /// Range field used by `group`.
    pub fn range_field(&self, group: &str) -> &Field {
        &self.entry(self.range_axis_for(group)).2
    }

    /// Chart orientation.
    pub fn orientation(&self) -> Orientation {
        if self.domain_axis.is_vertical() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Pixel position of `datum` along the domain axis.
    pub fn domain_value(&self, datum: &Datum) -> Option<f64> {
        let (_, scale, field) = self.entry(self.domain_axis);
        if scale.is_continuous() {
            datum.number(field).and_then(|v| scale.map_number(v))
        } else {
            datum.text(field).and_then(|k| scale.map_key(&k))
        }
    }

    /// Pixel position of `datum` along its range axis.
    pub fn range_value(&self, datum: &Datum) -> Option<f64> {
        let axis = self.range_axis_for(&datum.group);
        let (_, scale, field) = self.entry(axis);
        if scale.is_continuous() {
            datum.number(field).and_then(|v| scale.map_number(v))
        } else {
            datum.text(field).and_then(|k| scale.map_key(&k))
        }
    }

    /// Pixel position of a raw range value for `group` (stacked tops, baselines).
    pub fn range_pixel(&self, group: &str, value: f64) -> Option<f64> {
        self.range_scale(group).map_number(value)
    }

    /// Screen point from domain and range pixels.
    pub fn point_at(&self, domain_px: f64, range_px: f64) -> Point {
        match self.orientation() {
            Orientation::Vertical => Point::new(domain_px, range_px),
            Orientation::Horizontal => Point::new(range_px, domain_px),
        }
    }

    /// Screen point of `datum`, or `None` for gaps and unknown keys.
    pub fn point(&self, datum: &Datum) -> Option<Point> {
        Some(self.point_at(self.domain_value(datum)?, self.range_value(datum)?))
    }

    /// Pixel position of the zero baseline (clamped into the domain) for `group`.
    pub fn baseline(&self, group: &str) -> f64 {
        let scale = self.range_scale(group);
        match scale.continuous_domain() {
            Some((d0, d1)) => {
                let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
                let zero = if matches!(scale, Scale::Log(_)) {
                    lo
                } else {
                    0.0_f64.clamp(lo, hi)
                };
                scale.map_number(zero).unwrap_or(scale.range().0)
            }
            None => scale.range().0,
        }
    }

    /// Pixel coordinate of `p` along the domain axis.
    pub fn domain_coordinate(&self, p: Point) -> f64 {
        match self.orientation() {
            Orientation::Vertical => p.x,
            Orientation::Horizontal => p.y,
        }
    }

    /// Domain value under the pixel `px` (continuous axes only).
    pub fn invert_domain(&self, px: f64) -> Option<f64> {
        let scale = self.domain_scale();
        if scale.is_continuous() {
            scale.invert(px)
        } else {
            None
        }
    }

    /// Band width along the domain axis (zero for continuous domains).
    pub fn domain_band_width(&self) -> f64 {
        self.domain_scale().band_width().abs()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::data::ChartData;
    use crate::model::Mutation;
    use crate::options::ChartOptions;
    use alloc::vec;

    fn scenario() -> ChartData {
        ChartData::Records(vec![
            Datum::new("A", "x", 10.0),
            Datum::new("A", "y", 20.0),
            Datum::new("B", "x", 5.0),
            Datum::new("B", "y", 15.0),
        ])
    }

    fn labelled_options() -> ChartOptions {
        ChartOptions::default()
            .with_bottom_axis(AxisOptions::new(ScaleType::Labels).with_maps_to(Field::Key))
            .with_left_axis(AxisOptions::new(ScaleType::Linear).with_maps_to(Field::Value))
    }

    const BAR: ScaleRequirements = ScaleRequirements {
        zero_baseline: true,
        stacked: false,
    };

    #[test]
    fn zero_baseline_domain_covers_data() {
        let model = ChartModel::new(scenario(), labelled_options());
        let spec = CartesianSpec::resolve(&model, BAR);
        assert_eq!(spec.domain_axis(), AxisPosition::Bottom, "labels axis is the domain");
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(0.0, 20.0)),
            "zero to max"
        );
        assert_eq!(
            spec.axis(AxisPosition::Bottom).map(|a| &a.domain),
            Some(&ResolvedDomain::Keys(vec![String::from("x"), String::from("y")])),
            "keys in order"
        );
    }

    #[test]
    fn line_domain_spans_exactly_the_data() {
        let model = ChartModel::new(scenario(), labelled_options());
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(5.0, 20.0)),
            "min to max"
        );
    }

    #[test]
    fn value_domain_covers_confidence_intervals() {
        let data = ChartData::Records(vec![
            Datum::new("A", "x", 10.0).with_interval(4.0, 12.0),
            Datum::new("A", "y", 20.0).with_interval(18.0, 26.0),
        ]);
        let model = ChartModel::new(data, labelled_options());
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(4.0, 26.0)),
            "interval bounds widen the value axis"
        );
    }

    #[test]
    fn domain_follows_active_groups() {
        let mut model = ChartModel::new(scenario(), labelled_options());
        model.apply(Mutation::ToggleGroup(String::from("A")));
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(10.0, 20.0)),
            "A isolated"
        );
        // A and B are both active again, so the next click on B isolates it.
        model.apply(Mutation::ToggleGroup(String::from("B")));
        model.apply(Mutation::ToggleGroup(String::from("B")));
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(5.0, 15.0)),
            "only B remains"
        );
    }

    #[test]
    fn stacked_domain_uses_sums() {
        let model = ChartModel::new(scenario(), labelled_options());
        let spec = CartesianSpec::resolve(
            &model,
            ScaleRequirements {
                zero_baseline: true,
                stacked: true,
            },
        );
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(0.0, 35.0)),
            "A + B at y"
        );
    }

    #[test]
    fn horizontal_orientation_flips_points() {
        let options = ChartOptions::default()
            .with_left_axis(AxisOptions::new(ScaleType::Labels))
            .with_bottom_axis(AxisOptions::new(ScaleType::Linear));
        let model = ChartModel::new(scenario(), options);
        let spec = CartesianSpec::resolve(&model, BAR);
        assert_eq!(spec.orientation(), Orientation::Horizontal, "domain is vertical");
        let scales = spec.instantiate(Rect::new(0.0, 0.0, 200.0, 100.0));
        let p = scales
            .point(&Datum::new("A", "y", 20.0))
            .expect("point resolves");
        assert!((p.x - 200.0).abs() < 1e-9, "value runs along x");
        assert!((p.y - 75.0).abs() < 1e-9, "second key in the lower half");
        assert!((scales.baseline("A") - 0.0).abs() < 1e-9, "zero at the left edge");
    }

    #[test]
    fn explicit_primary_wins_and_secondary_covers_its_groups() {
        let options = ChartOptions::default()
            .with_bottom_axis(AxisOptions::new(ScaleType::Labels))
            .with_left_axis(
                AxisOptions::new(ScaleType::Linear)
                    .with_role(AxisRole::Secondary)
                    .with_corresponding_groups(["A"]),
            )
            .with_right_axis(AxisOptions::new(ScaleType::Linear).with_role(AxisRole::Primary));
        let model = ChartModel::new(scenario(), options);
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(spec.main_y(), AxisPosition::Right, "primary role wins");
        assert_eq!(spec.range_axis(), AxisPosition::Right, "range follows the main axis");
        let scales = spec.instantiate(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(scales.range_axis_for("A"), AxisPosition::Left, "A plotted on the secondary");
        assert_eq!(scales.range_axis_for("B"), AxisPosition::Right, "B on the main");
    }

    #[test]
    fn empty_and_flat_domains_are_padded() {
        let model = ChartModel::new(ChartData::default(), labelled_options());
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(0.0, 1.0)),
            "empty"
        );
        let model = ChartModel::new(
            ChartData::Records(vec![Datum::new("A", "x", 3.0)]),
            labelled_options(),
        );
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(
            spec.axis(AxisPosition::Left).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(2.0, 4.0)),
            "single value"
        );
    }

    #[test]
    fn zoom_narrows_continuous_domain_axis() {
        let options = ChartOptions::default()
            .with_bottom_axis(AxisOptions::new(ScaleType::Time))
            .with_left_axis(AxisOptions::new(ScaleType::Linear));
        let data = ChartData::Records(vec![
            Datum::dated("A", 0.0, 1.0),
            Datum::dated("A", 100.0, 2.0),
        ]);
        let mut model = ChartModel::new(data, options);
        model.apply(Mutation::SetZoomDomain(Some((20.0, 60.0))));
        let spec = CartesianSpec::resolve(&model, ScaleRequirements::default());
        assert_eq!(spec.domain_axis(), AxisPosition::Bottom, "time axis is the domain");
        assert_eq!(
            spec.axis(AxisPosition::Bottom).map(|a| &a.domain),
            Some(&ResolvedDomain::Continuous(20.0, 60.0)),
            "zoomed"
        );
    }
}
