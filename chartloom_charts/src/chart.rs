// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart: model, components and surface tied together by one update cycle.
//!
//! Every change funnels through the same cycle:
//! 1. lay out the component tree for the current size,
//! 2. resolve scales for the graph frame (cartesian charts fit the plot around the axes),
//! 3. render every component into its region and reconcile the marks per layer,
//! 4. hand the resulting diffs to the transition service, grouped by transition name.
//!
//! Pointer interaction re-renders components with the existing layout and never starts a cycle.
//! Listeners request follow-up work through [`Commands`]; the queue is drained after the
//! operation that triggered it, for a bounded number of rounds.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

use chartloom_core::{IdArena, LayerId, MarkDiff, Scene, Surface};
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::axes::fit_plot;
use crate::cartesian::{CartesianScales, CartesianSpec};
use crate::component::{ChartContext, Component, Hit, HitPoint, InteractionState, RenderTarget};
use crate::data::ChartData;
use crate::error::ConfigError;
use crate::events::{ChartEvent, Command, Commands, EventBus, ListenerId};
use crate::layout::{
    ComponentId, Growth, GrowthPolicy, LayoutChild, LayoutDirection, LayoutNode, LayoutResult,
    LayoutSize, Size,
};
use crate::legend::LegendComponent;
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::model::{ChartModel, ModelChange, Mutation};
use crate::options::{ChartOptions, LegendPosition, ToolbarControl};
use crate::registry::{ChartRegistry, ChartType, FrameKind};
use crate::ruler::{HoverChange, hover_change};
use crate::title::TitleComponent;
use crate::toolbar::{ToolbarComponent, next_zoom_domain};
use crate::tooltip::{TooltipComponent, tooltip_content};
use crate::transitions::TransitionService;

const TITLE: ComponentId = 0;
const TOOLBAR: ComponentId = 1;
const LEGEND: ComponentId = 2;
const FIRST_GRAPH: ComponentId = 3;

/// Gap between the header row and the rest of the chart.
const HEADER_GAP: f64 = 8.0;
/// Gap between the legend and the graph frame.
const LEGEND_GAP: f64 = 16.0;
/// Rounds of listener commands processed after one operation.
const MAX_COMMAND_ROUNDS: usize = 8;

#[allow(clippy::cast_possible_truncation, reason = "charts hold a handful of components")]
fn layer(index: usize) -> LayerId {
    LayerId(index as u32)
}

/// Closed containment; points on the plot edge still reach the graphs drawn there.
fn contains(rect: Rect, pos: Point) -> bool {
    (rect.x0..=rect.x1).contains(&pos.x) && (rect.y0..=rect.y1).contains(&pos.y)
}

/// Initial data and options.
#[derive(Clone, Debug, Default)]
pub struct ChartConfig {
    /// Data, in either input shape.
    pub data: ChartData,
    /// Options.
    pub options: ChartOptions,
}

/// A live chart drawing into a surface.
pub struct Chart<S> {
    chart_type: ChartType,
    frame: FrameKind,
    has_legend: bool,
    model: ChartModel,
    components: Vec<Box<dyn Component>>,
    tooltip: TooltipComponent,
    regions: Vec<Option<Rect>>,
    layout: Option<LayoutResult>,
    cartesian: Option<CartesianSpec>,
    scales: Option<CartesianScales>,
    measurer: Box<dyn TextMeasurer>,
    interaction: InteractionState,
    tooltip_shown: bool,
    ids: IdArena,
    scene: Scene,
    transitions: TransitionService,
    events: EventBus,
    commands: Commands,
    surface: S,
    cycle: u64,
}

impl<S> core::fmt::Debug for Chart<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.components.iter().map(|c| c.name()).collect();
        f.debug_struct("Chart")
            .field("chart_type", &self.chart_type)
            .field("components", &names)
            .field("cycle", &self.cycle)
            .field("marks", &self.scene.len())
            .field("interaction", &self.interaction)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Chart<S> {
    /// Creates a built-in chart type and runs the first update cycle.
    pub fn new(chart_type: &str, config: ChartConfig, surface: S) -> Result<Self, ConfigError> {
        Self::with_registry(&ChartRegistry::with_builtins(), chart_type, config, surface)
    }

    /// Creates a chart type from `registry` and runs the first update cycle.
    ///
    /// Unknown type names fail. A chart without a size is created inert and renders on the
    /// first [`resize`](Self::resize).
    pub fn with_registry(
        registry: &ChartRegistry,
        chart_type: &str,
        config: ChartConfig,
        surface: S,
    ) -> Result<Self, ConfigError> {
        let chart_type = registry.resolve(chart_type)?;
        let blueprint = registry.blueprint(chart_type)?;
        let mut components: Vec<Box<dyn Component>> = vec![
            Box::new(TitleComponent::default()),
            Box::new(ToolbarComponent::default()),
            Box::new(LegendComponent::default()),
        ];
        components.extend(blueprint.graphs);
        tracing::debug!(
            chart_type = chart_type.name(),
            components = components.len(),
            "chart created"
        );
        let mut chart = Self {
            chart_type,
            frame: blueprint.frame,
            has_legend: blueprint.legend,
            model: ChartModel::new(config.data, config.options),
            regions: vec![None; components.len() + 1],
            components,
            tooltip: TooltipComponent::new(),
            layout: None,
            cartesian: None,
            scales: None,
            measurer: Box::new(HeuristicTextMeasurer),
            interaction: InteractionState::default(),
            tooltip_shown: false,
            ids: IdArena::new(),
            scene: Scene::new(),
            transitions: TransitionService::new(),
            events: EventBus::new(),
            commands: Commands::new(),
            surface,
            cycle: 0,
        };
        chart.run_cycle(true);
        Ok(chart)
    }

    /// Replaces text measurement. Takes effect on the next update.
    pub fn set_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.measurer = Box::new(measurer);
    }

    /// Chart type.
    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    /// The model.
    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    /// Current options.
    pub fn options(&self) -> &ChartOptions {
        self.model.options()
    }

    /// Resolved axes from the last cycle, for cartesian charts.
    pub fn cartesian(&self) -> Option<&CartesianSpec> {
        self.cartesian.as_ref()
    }

    /// Pixel scales from the last cycle, for cartesian charts.
    pub fn scales(&self) -> Option<&CartesianScales> {
        self.scales.as_ref()
    }

    /// Layout from the last cycle.
    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_ref()
    }

    /// Region of the first component named `name`.
    pub fn component_region(&self, name: &str) -> Option<Rect> {
        let index = self.components.iter().position(|c| c.name() == name)?;
        self.regions.get(index).copied().flatten()
    }

    /// Pointer and hover state.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Number of update cycles run so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns `true` if no transition is in flight.
    pub fn is_idle(&self) -> bool {
        self.transitions.is_idle()
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the drawing surface.
    ///
    /// Marks written here are not tracked and may be overwritten by the next update.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consumes the chart and returns its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Adds an event listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ChartEvent, &mut Commands) + 'static,
    ) -> ListenerId {
        self.events.subscribe(listener)
    }

    /// Removes an event listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Replaces the data and updates.
    pub fn set_data(&mut self, data: ChartData) {
        self.mutate(Mutation::SetData(data));
        self.settle();
    }

    /// Replaces the options and updates.
    pub fn set_options(&mut self, options: ChartOptions) {
        self.mutate(Mutation::SetOptions(options));
        self.settle();
    }

    /// Replaces data and options in one update cycle.
    pub fn set_data_and_options(&mut self, data: ChartData, options: ChartOptions) {
        let change = self
            .model
            .apply_all([Mutation::SetData(data), Mutation::SetOptions(options)]);
        self.after_change(change);
        self.settle();
    }

    /// Toggles a group as a legend click would, without emitting a click event.
    pub fn toggle_group(&mut self, group: &str) {
        self.mutate(Mutation::ToggleGroup(String::from(group)));
        self.settle();
    }

    /// Sets or clears the zoom domain.
    pub fn set_zoom_domain(&mut self, domain: Option<(f64, f64)>) {
        self.mutate(Mutation::SetZoomDomain(domain));
        self.settle();
    }

    /// Gives the chart a new size and updates.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.apply_resize(width, height);
        self.settle();
    }

    /// Runs an update cycle. With `animate`, changes animate if the options allow it.
    pub fn update(&mut self, animate: bool) {
        self.run_cycle(animate);
        self.settle();
    }

    /// Advances running transitions by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.transitions.advance(dt, &mut self.surface);
        self.emit_finished();
        self.settle();
    }

    /// Jumps running transitions to their end state.
    pub fn finish_transitions(&mut self) {
        self.transitions.finish_all(&mut self.surface);
        self.emit_finished();
        self.settle();
    }

    /// Pointer moved to `pos`, in chart coordinates.
    pub fn pointer_move(&mut self, pos: Point) {
        self.interaction.cursor = Some(pos);
        let hit = self.hit_test(pos);

        let group = match &hit {
            Some(Hit::LegendItem(group)) => Some(group.clone()),
            _ => None,
        };
        let mut changed = self.set_hovered_group(group);
        let control = match &hit {
            Some(Hit::ToolbarControl(control)) => Some(*control),
            _ => None,
        };
        if control != self.interaction.hovered_control {
            self.interaction.hovered_control = control;
            changed = true;
        }
        let points = match hit {
            Some(Hit::Points(points)) => points,
            _ => SmallVec::new(),
        };
        changed |= self.set_hovered_points(points);

        self.redraw(!changed);
        self.tooltip_events();
        self.settle();
    }

    /// Pointer left the chart.
    pub fn pointer_leave(&mut self) {
        self.interaction.cursor = None;
        self.interaction.hovered_control = None;
        self.set_hovered_group(None);
        self.set_hovered_points(SmallVec::new());
        self.redraw(false);
        self.tooltip_events();
        self.settle();
    }

    /// Click at `pos`. Returns what was clicked.
    ///
    /// Legend items toggle their group when the legend is clickable; toolbar buttons change
    /// the zoom domain.
    pub fn click(&mut self, pos: Point) -> Option<Hit> {
        let hit = self.hit_test(pos);
        match &hit {
            Some(Hit::LegendItem(group)) => {
                self.emit(ChartEvent::LegendItemClick {
                    group: group.clone(),
                });
                if self.model.options().legend.clickable {
                    self.mutate(Mutation::ToggleGroup(group.clone()));
                }
            }
            Some(Hit::ToolbarControl(control)) => {
                self.emit(ChartEvent::ToolbarControlClick { control: *control });
                self.zoom(*control);
            }
            Some(Hit::Points(_)) | None => {}
        }
        self.settle();
        hit
    }

    fn zoom(&mut self, control: ToolbarControl) {
        let Some(full) = self.cartesian.as_ref().and_then(CartesianSpec::unzoomed_domain) else {
            tracing::debug!(control = control.name(), "zoom needs a continuous domain axis");
            return;
        };
        let current = self.model.zoom_domain().unwrap_or(full);
        let ratio = self.model.options().toolbar.zoom_ratio;
        self.mutate(Mutation::SetZoomDomain(next_zoom_domain(control, current, full, ratio)));
    }

    fn mutate(&mut self, mutation: Mutation) {
        let change = self.model.apply(mutation);
        self.after_change(change);
    }

    fn after_change(&mut self, change: ModelChange) {
        if change.data {
            self.emit(ChartEvent::DataUpdated);
        }
        if change.options {
            self.emit(ChartEvent::OptionsUpdated);
        }
        if change.zoom {
            self.emit(ChartEvent::ZoomDomainChanged {
                domain: self.model.zoom_domain(),
            });
        }
        if change.is_empty() {
            tracing::trace!("mutation changed nothing");
            return;
        }
        // Hovered records may have moved or disappeared.
        self.set_hovered_points(SmallVec::new());
        self.run_cycle(true);
        self.tooltip_events();
    }

    fn apply_resize(&mut self, width: f64, height: f64) {
        let mut options = self.model.options().clone();
        options.width = Some(width);
        options.height = Some(height);
        self.model.apply(Mutation::SetOptions(options));
        self.emit(ChartEvent::Resize { width, height });
        self.run_cycle(true);
    }

    fn run_cycle(&mut self, animate: bool) {
        let Some((width, height)) = self.model.options().size() else {
            tracing::warn!(
                chart_type = self.chart_type.name(),
                "chart has no size; nothing is rendered until it is resized"
            );
            return;
        };
        self.cycle += 1;
        let cycle = self.cycle;
        tracing::debug!(cycle, width, height, "update");
        self.transitions.begin_cycle(cycle);
        self.surface.set_size(width, height);

        self.layout_pass(Rect::new(0.0, 0.0, width, height));
        let animate = animate && self.model.options().animations;
        let diffs = self.render_pass(animate, false);
        self.apply_cycle_diffs(cycle, &diffs, animate);
        self.transitions.seal(cycle);
        self.emit_finished();
    }

    fn layout_tree(&self) -> LayoutNode {
        let options = self.model.options();
        let preferred = GrowthPolicy::both(Growth::Preferred);
        let stretch = GrowthPolicy::both(Growth::Stretch);
        let graph_frame =
            LayoutChild::components("graph-frame", FIRST_GRAPH..self.components.len(), stretch);
        let full_frame = if self.has_legend && options.legend.enabled {
            let direction = match options.legend.position {
                LegendPosition::Left => LayoutDirection::Row,
                LegendPosition::Right => LayoutDirection::RowReverse,
                LegendPosition::Top => LayoutDirection::Column,
                LegendPosition::Bottom => LayoutDirection::ColumnReverse,
            };
            LayoutNode::new(
                direction,
                vec![
                    LayoutChild::components("legend", [LEGEND], preferred),
                    LayoutChild::spacer("legend-spacer", LayoutSize::Pixels(LEGEND_GAP)),
                    graph_frame,
                ],
            )
        } else {
            LayoutNode::new(LayoutDirection::Column, vec![graph_frame])
        };

        let has_title = options.title.as_deref().is_some_and(|t| !t.is_empty());
        let has_toolbar = options.toolbar.enabled && !options.toolbar.controls.is_empty();
        let mut root = Vec::new();
        if has_title || has_toolbar {
            let header = LayoutNode::new(
                LayoutDirection::Row,
                vec![
                    LayoutChild::components(
                        "title",
                        [TITLE],
                        GrowthPolicy {
                            x: Growth::Stretch,
                            y: Growth::Preferred,
                        },
                    ),
                    LayoutChild::components("toolbar", [TOOLBAR], preferred),
                ],
            );
            root.push(LayoutChild::node(
                "header",
                header,
                GrowthPolicy {
                    x: Growth::Stretch,
                    y: Growth::Preferred,
                },
            ));
            root.push(LayoutChild::spacer(
                "header-spacer",
                LayoutSize::Pixels(HEADER_GAP),
            ));
        }
        root.push(LayoutChild::node("full-frame", full_frame, stretch));
        LayoutNode::new(LayoutDirection::Column, root)
    }

    fn layout_pass(&mut self, bounds: Rect) {
        let tree = self.layout_tree();
        let ctx = ChartContext {
            model: &self.model,
            options: self.model.options(),
            cartesian: None,
            scales: None,
            measurer: &*self.measurer,
            interaction: &self.interaction,
            size: Size::new(bounds.width(), bounds.height()),
        };
        let components = &self.components;
        let mut measure = |id: ComponentId, available: Size| {
            let component = components.get(id)?;
            let natural = component.measure(&ctx, available);
            if natural.is_none() {
                tracing::error!(
                    component = component.name(),
                    "component is laid out as preferred but does not implement measure"
                );
            }
            natural
        };
        let layout = tree.layout(bounds, &mut measure);

        let tooltip = self.components.len();
        for (i, region) in self.regions.iter_mut().enumerate() {
            *region = if i == tooltip {
                Some(bounds)
            } else {
                layout.region(i)
            };
        }

        match (self.frame, layout.child_rect("graph-frame")) {
            (FrameKind::Cartesian(requirements), Some(frame)) => {
                let spec = CartesianSpec::resolve(&self.model, requirements);
                let (scales, margins) = fit_plot(&spec, frame, &*self.measurer);
                tracing::trace!(
                    left = margins.left,
                    bottom = margins.bottom,
                    "plot fitted"
                );
                self.cartesian = Some(spec);
                self.scales = Some(scales);
            }
            _ => {
                self.cartesian = None;
                self.scales = None;
            }
        }
        self.layout = Some(layout);
    }

    /// Renders components and reconciles their layers.
    fn render_pass(&mut self, animate: bool, overlays_only: bool) -> Vec<MarkDiff> {
        let Some((width, height)) = self.model.options().size() else {
            return Vec::new();
        };
        let ctx = ChartContext {
            model: &self.model,
            options: self.model.options(),
            cartesian: self.cartesian.as_ref(),
            scales: self.scales.as_ref(),
            measurer: &*self.measurer,
            interaction: &self.interaction,
            size: Size::new(width, height),
        };
        let clip = self.scales.as_ref().map(CartesianScales::plot);
        let mut diffs = Vec::new();
        let count = self.components.len();
        for i in 0..=count {
            // The tooltip paints last, above every component.
            let component: &mut dyn Component = match self.components.get_mut(i) {
                Some(component) => &mut **component,
                None => &mut self.tooltip,
            };
            if overlays_only && !component.is_overlay() {
                continue;
            }
            let marks = match self.regions.get(i).copied().flatten() {
                Some(region) => {
                    let mut target = RenderTarget::new(region, animate, &mut self.ids);
                    component.render(&ctx, &mut target);
                    let mut marks = target.into_marks();
                    if let Some(clip) = clip
                        && component.within_chart_clip()
                    {
                        for mark in &mut marks {
                            mark.clip = Some(clip);
                        }
                    }
                    marks
                }
                None => Vec::new(),
            };
            diffs.extend(self.scene.tick_layer(layer(i), marks));
        }
        diffs
    }

    fn apply_cycle_diffs(&mut self, cycle: u64, diffs: &[MarkDiff], animate: bool) {
        if !animate {
            self.transitions.apply_now(diffs, &mut self.surface);
            return;
        }
        let mut immediate: Vec<&MarkDiff> = Vec::new();
        let mut batches: Vec<(&'static str, Vec<&MarkDiff>)> = Vec::new();
        for diff in diffs {
            let Some(name) = diff.transition() else {
                immediate.push(diff);
                continue;
            };
            match batches.iter_mut().find(|(n, _)| *n == name) {
                Some((_, batch)) => batch.push(diff),
                None => batches.push((name, vec![diff])),
            }
        }
        if !immediate.is_empty() {
            self.transitions.apply_now(immediate, &mut self.surface);
        }
        for (name, batch) in batches {
            let duration = self.model.options().transition_duration(name);
            self.transitions
                .start(cycle, name, duration, batch, &mut self.surface);
        }
    }

    /// Re-renders with the current layout, without starting a cycle.
    fn redraw(&mut self, overlays_only: bool) {
        if self.layout.is_none() {
            return;
        }
        let diffs = self.render_pass(false, overlays_only);
        if !diffs.is_empty() {
            self.transitions.apply_now(&diffs, &mut self.surface);
        }
    }

    fn hit_test(&self, pos: Point) -> Option<Hit> {
        let (width, height) = self.model.options().size()?;
        let ctx = ChartContext {
            model: &self.model,
            options: self.model.options(),
            cartesian: self.cartesian.as_ref(),
            scales: self.scales.as_ref(),
            measurer: &*self.measurer,
            interaction: &self.interaction,
            size: Size::new(width, height),
        };
        let in_plot = self.scales.as_ref().is_none_or(|s| contains(s.plot(), pos));
        self.components
            .iter()
            .enumerate()
            .rev()
            .filter(|(i, _)| self.regions.get(*i).copied().flatten().is_some())
            .filter(|(_, c)| in_plot || !c.within_chart_clip())
            .find_map(|(_, c)| c.hit_test(&ctx, pos))
    }

    fn set_hovered_group(&mut self, group: Option<String>) -> bool {
        if group == self.interaction.hovered_group {
            return false;
        }
        if let Some(previous) = self.interaction.hovered_group.take() {
            self.emit(ChartEvent::LegendItemMouseout { group: previous });
        }
        if let Some(next) = &group {
            self.emit(ChartEvent::LegendItemHover {
                group: next.clone(),
            });
        }
        self.interaction.hovered_group = group;
        true
    }

    fn set_hovered_points(&mut self, points: SmallVec<[HitPoint; 4]>) -> bool {
        let changed = match hover_change(&self.interaction.hovered_points, &points) {
            HoverChange::Unchanged => false,
            HoverChange::Enter(next) => {
                self.emit(ChartEvent::PointHover { points: next });
                true
            }
            HoverChange::Leave(previous) => {
                self.emit(ChartEvent::PointMouseout { points: previous });
                true
            }
            HoverChange::Switch { previous, next } => {
                self.emit(ChartEvent::PointMouseout { points: previous });
                self.emit(ChartEvent::PointHover { points: next });
                true
            }
        };
        self.interaction.hovered_points = points;
        changed
    }

    fn tooltip_events(&mut self) {
        let content = tooltip_content(self.model.options(), &self.interaction);
        let position = self.tooltip.position();
        match (content, self.tooltip_shown) {
            (Some(content), false) => {
                self.tooltip_shown = true;
                self.emit(ChartEvent::TooltipShow {
                    html: content.html,
                    position,
                });
            }
            (Some(content), true) => self.emit(ChartEvent::TooltipMove {
                html: content.html,
                position,
            }),
            (None, true) => {
                self.tooltip_shown = false;
                self.emit(ChartEvent::TooltipHide);
            }
            (None, false) => {}
        }
    }

    fn emit(&mut self, event: ChartEvent) {
        self.events.emit(&event, &mut self.commands);
    }

    fn emit_finished(&mut self) {
        for cycle in self.transitions.take_finished() {
            self.emit(ChartEvent::RenderFinished { cycle });
        }
    }

    /// Runs commands queued by listeners.
    fn settle(&mut self) {
        for _ in 0..MAX_COMMAND_ROUNDS {
            if self.commands.is_empty() {
                return;
            }
            for command in self.commands.drain() {
                match command {
                    Command::Mutate(mutation) => self.mutate(mutation),
                    Command::Resize { width, height } => self.apply_resize(width, height),
                }
            }
        }
        if !self.commands.is_empty() {
            tracing::warn!(
                pending = self.commands.len(),
                rounds = MAX_COMMAND_ROUNDS,
                "listeners keep queueing commands; dropping the rest"
            );
            self.commands.drain();
        }
    }
}
