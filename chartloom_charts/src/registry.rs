// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart types: what each kind of chart draws inside its graph frame.
//!
//! A chart type is a name mapped to a factory that returns a [`ChartBlueprint`]. The chart
//! wraps the blueprint's graph components with the shared chrome (title, toolbar, legend and
//! tooltip), so adding a chart type never touches the orchestrator.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::area::AreaComponent;
use crate::axes::AxesComponent;
use crate::bar::BarComponent;
use crate::confidence::ConfidenceBandComponent;
use crate::cartesian::ScaleRequirements;
use crate::component::Component;
use crate::error::ConfigError;
use crate::grid::GridComponent;
use crate::line::LineComponent;
use crate::lollipop::LollipopComponent;
use crate::meter::MeterComponent;
use crate::pie::PieComponent;
use crate::radar::RadarComponent;
use crate::ruler::RulerComponent;
use crate::scatter::ScatterComponent;
use crate::skeleton::{SkeletonComponent, SkeletonVariant};
use crate::threshold::ThresholdComponent;

/// How the graph frame maps data to space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Two-dimensional axes; the chart resolves scales and fits the plot.
    Cartesian(ScaleRequirements),
    /// Angles and radii computed by the graph components themselves.
    Radial,
    /// A single proportional bar.
    Meter,
}

/// The graph frame of one chart type.
pub struct ChartBlueprint {
    /// Coordinate system.
    pub frame: FrameKind,
    /// Components drawn in the graph frame, in paint-registration order.
    pub graphs: Vec<Box<dyn Component>>,
    /// Whether the chart shows a legend.
    pub legend: bool,
}

impl core::fmt::Debug for ChartBlueprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.graphs.iter().map(|c| c.name()).collect();
        f.debug_struct("ChartBlueprint")
            .field("frame", &self.frame)
            .field("graphs", &names)
            .field("legend", &self.legend)
            .finish()
    }
}

/// Builds a fresh blueprint.
pub type ChartFactory = fn() -> ChartBlueprint;

/// A registered chart type name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChartType(&'static str);

impl ChartType {
    /// Lines with hollow markers.
    pub const LINE: Self = Self("line");
    /// Filled dots.
    pub const SCATTER: Self = Self("scatter");
    /// Dots on stems rising from the baseline.
    pub const LOLLIPOP: Self = Self("lollipop");
    /// Areas down to the baseline.
    pub const AREA: Self = Self("area");
    /// Areas stacked on each other.
    pub const STACKED_AREA: Self = Self("stacked-area");
    /// Grouped bars.
    pub const BAR: Self = Self("bar");
    /// Pie.
    pub const PIE: Self = Self("pie");
    /// Donut with a center total.
    pub const DONUT: Self = Self("donut");
    /// Radar.
    pub const RADAR: Self = Self("radar");
    /// Meter.
    pub const METER: Self = Self("meter");

    /// Every built-in type.
    pub const BUILT_IN: [Self; 10] = [
        Self::LINE,
        Self::SCATTER,
        Self::LOLLIPOP,
        Self::AREA,
        Self::STACKED_AREA,
        Self::BAR,
        Self::PIE,
        Self::DONUT,
        Self::RADAR,
        Self::METER,
    ];

    /// A custom type name.
    pub const fn custom(name: &'static str) -> Self {
        Self(name)
    }

    /// The type's name.
    pub fn name(self) -> &'static str {
        self.0
    }
}

fn cartesian(
    requirements: ScaleRequirements,
    series: Vec<Box<dyn Component>>,
    skeleton: SkeletonVariant,
) -> ChartBlueprint {
    let mut graphs: Vec<Box<dyn Component>> = vec![
        Box::new(AxesComponent),
        Box::new(GridComponent),
        Box::new(SkeletonComponent::new(skeleton)),
    ];
    graphs.extend(series);
    graphs.push(Box::new(ThresholdComponent));
    ChartBlueprint {
        frame: FrameKind::Cartesian(requirements),
        graphs,
        legend: true,
    }
}

fn radial(graph: Box<dyn Component>, skeleton: Option<SkeletonVariant>) -> ChartBlueprint {
    let mut graphs: Vec<Box<dyn Component>> = Vec::new();
    if let Some(variant) = skeleton {
        graphs.push(Box::new(SkeletonComponent::new(variant)));
    }
    graphs.push(graph);
    ChartBlueprint {
        frame: FrameKind::Radial,
        graphs,
        legend: true,
    }
}

fn line() -> ChartBlueprint {
    cartesian(
        ScaleRequirements::default(),
        vec![
            Box::new(ConfidenceBandComponent),
            Box::new(LineComponent::default()),
            Box::new(ScatterComponent::markers(false)),
            Box::new(RulerComponent::new()),
        ],
        SkeletonVariant::Lines,
    )
}

fn scatter() -> ChartBlueprint {
    cartesian(
        ScaleRequirements::default(),
        vec![
            Box::new(ScatterComponent::new()),
            Box::new(RulerComponent::new()),
        ],
        SkeletonVariant::Grid,
    )
}

fn lollipop() -> ChartBlueprint {
    cartesian(
        ScaleRequirements {
            zero_baseline: true,
            stacked: false,
        },
        vec![
            Box::new(LollipopComponent),
            Box::new(ScatterComponent::new()),
            Box::new(RulerComponent::new()),
        ],
        SkeletonVariant::Grid,
    )
}

fn area() -> ChartBlueprint {
    cartesian(
        ScaleRequirements {
            zero_baseline: true,
            stacked: false,
        },
        vec![
            Box::new(AreaComponent::default()),
            Box::new(ConfidenceBandComponent),
            Box::new(LineComponent::default()),
            Box::new(ScatterComponent::markers(false)),
            Box::new(RulerComponent::new()),
        ],
        SkeletonVariant::Lines,
    )
}

fn stacked_area() -> ChartBlueprint {
    cartesian(
        ScaleRequirements {
            zero_baseline: true,
            stacked: true,
        },
        vec![
            Box::new(AreaComponent::stacked()),
            Box::new(LineComponent::stacked()),
            Box::new(ScatterComponent::markers(true)),
            Box::new(RulerComponent::stacked()),
        ],
        SkeletonVariant::Lines,
    )
}

fn bar() -> ChartBlueprint {
    cartesian(
        ScaleRequirements {
            zero_baseline: true,
            stacked: false,
        },
        vec![Box::new(BarComponent)],
        SkeletonVariant::Grid,
    )
}

fn pie() -> ChartBlueprint {
    radial(Box::new(PieComponent::pie()), Some(SkeletonVariant::Pie))
}

fn donut() -> ChartBlueprint {
    radial(Box::new(PieComponent::donut()), Some(SkeletonVariant::Donut))
}

fn radar() -> ChartBlueprint {
    radial(Box::new(RadarComponent::default()), None)
}

fn meter() -> ChartBlueprint {
    ChartBlueprint {
        frame: FrameKind::Meter,
        graphs: vec![Box::new(MeterComponent)],
        legend: false,
    }
}

/// Chart type names and their factories.
#[derive(Clone, Debug, Default)]
pub struct ChartRegistry {
    factories: HashMap<&'static str, ChartFactory>,
}

impl ChartRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every built-in type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let builtins: [(ChartType, ChartFactory); 10] = [
            (ChartType::LINE, line),
            (ChartType::SCATTER, scatter),
            (ChartType::LOLLIPOP, lollipop),
            (ChartType::AREA, area),
            (ChartType::STACKED_AREA, stacked_area),
            (ChartType::BAR, bar),
            (ChartType::PIE, pie),
            (ChartType::DONUT, donut),
            (ChartType::RADAR, radar),
            (ChartType::METER, meter),
        ];
        for (ty, factory) in builtins {
            registry.factories.insert(ty.name(), factory);
        }
        registry
    }

    /// Registers `factory` under `chart_type`. Names are registered once.
    pub fn register(
        &mut self,
        chart_type: ChartType,
        factory: ChartFactory,
    ) -> Result<(), ConfigError> {
        let name = chart_type.name();
        if self.factories.contains_key(name) {
            return Err(ConfigError::DuplicateChartType(String::from(name)));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Looks a type up by name.
    pub fn resolve(&self, name: &str) -> Result<ChartType, ConfigError> {
        self.factories
            .get_key_value(name)
            .map(|(name, _)| ChartType(name))
            .ok_or_else(|| ConfigError::UnsupportedChartType(String::from(name)))
    }

    /// A fresh blueprint for `chart_type`.
    pub fn blueprint(&self, chart_type: ChartType) -> Result<ChartBlueprint, ConfigError> {
        self.factories
            .get(chart_type.name())
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnsupportedChartType(String::from(chart_type.name())))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
