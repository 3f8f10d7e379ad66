// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use chartloom_core::{MarkPayload, SvgSurface};
use kurbo::{Point, Rect};

use crate::{
    AxisOptions, AxisPosition, Chart, ChartConfig, ChartData, ChartEvent, ChartOptions,
    ConfigError, Datum, Field, GroupStatus, Hit, LegendPosition, ResolvedDomain, ScaleType,
    ToolbarControl, ToolbarOptions,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn labelled_options() -> ChartOptions {
    ChartOptions::default()
        .with_size(400.0, 300.0)
        .with_animations(false)
        .with_bottom_axis(AxisOptions::new(ScaleType::Labels).with_maps_to(Field::Key))
        .with_left_axis(AxisOptions::new(ScaleType::Linear).with_maps_to(Field::Value))
}

fn records(values: &[(&str, &str, f64)]) -> ChartData {
    ChartData::Records(
        values
            .iter()
            .map(|(group, key, value)| Datum::new(*group, *key, *value))
            .collect(),
    )
}

fn scenario_data() -> ChartData {
    records(&[("A", "x", 10.0), ("A", "y", 20.0), ("B", "x", 5.0), ("B", "y", 15.0)])
}

fn chart(chart_type: &str, data: ChartData, options: ChartOptions) -> Chart<SvgSurface> {
    Chart::new(chart_type, ChartConfig { data, options }, SvgSurface::new())
        .expect("built-in chart type")
}

fn left_domain(chart: &Chart<SvgSurface>) -> (f64, f64) {
    match chart
        .cartesian()
        .and_then(|c| c.axis(AxisPosition::Left))
        .map(|a| &a.domain)
    {
        Some(ResolvedDomain::Continuous(lo, hi)) => (*lo, *hi),
        other => panic!("left axis should be continuous, got {other:?}"),
    }
}

fn count(chart: &Chart<SvgSurface>, class: &str) -> usize {
    chart.surface().marks_with_class(class).len()
}

/// A point inside the legend item of `group`.
fn legend_point(chart: &Chart<SvgSurface>, group: &str) -> Point {
    chart
        .surface()
        .marks_with_class("legend-label")
        .into_iter()
        .find_map(|m| match &m.payload {
            MarkPayload::Text(t) if t.text == group => Some(Point::new(t.pos.x + 1.0, t.pos.y)),
            _ => None,
        })
        .expect("legend label is drawn")
}

fn record_events(chart: &mut Chart<SvgSurface>) -> Rc<RefCell<Vec<ChartEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    chart.subscribe(move |e, _| sink.borrow_mut().push(e.clone()));
    log
}

fn names(log: &Rc<RefCell<Vec<ChartEvent>>>) -> Vec<&'static str> {
    log.borrow().iter().map(ChartEvent::name).collect()
}

#[test]
fn legend_clicks_isolate_then_restore_groups() {
    let mut chart = chart("bar", scenario_data(), labelled_options());
    let (lo, hi) = left_domain(&chart);
    assert!(close(lo, 0.0) && close(hi, 20.0), "domain is [0, 20], got [{lo}, {hi}]");
    assert_eq!(count(&chart, "bar"), 4, "two bars per group");

    let hit = chart.click(legend_point(&chart, "A"));
    assert_eq!(hit, Some(Hit::LegendItem("A".into())), "legend item under the pointer");
    assert_eq!(chart.model().group_status("A"), Some(GroupStatus::Active), "A isolated");
    assert_eq!(chart.model().group_status("B"), Some(GroupStatus::Disabled), "B hidden");
    assert_eq!(count(&chart, "bar"), 2, "only A is drawn");
    let (lo, hi) = left_domain(&chart);
    assert!(close(lo, 0.0) && close(hi, 20.0), "A alone still spans [0, 20]");

    chart.click(legend_point(&chart, "B"));
    assert_eq!(chart.model().active_groups(), vec!["A", "B"], "both visible again");
    assert_eq!(count(&chart, "bar"), 4, "B's bars return");
}

#[test]
fn zero_baseline_and_tight_domains() {
    let data = records(&[("A", "x", 4.0), ("A", "y", 9.0), ("B", "x", 6.0)]);
    let bar = chart("bar", data.clone(), labelled_options());
    let (lo, hi) = left_domain(&bar);
    assert!(lo <= 0.0 && hi >= 9.0, "bars include zero and the max, got [{lo}, {hi}]");
    let area = chart("area", data.clone(), labelled_options());
    let (lo, hi) = left_domain(&area);
    assert!(lo <= 0.0 && hi >= 9.0, "areas include zero and the max, got [{lo}, {hi}]");
    let line = chart("line", data, labelled_options());
    let (lo, hi) = left_domain(&line);
    assert!(close(lo, 4.0) && close(hi, 9.0), "lines span the data, got [{lo}, {hi}]");
}

#[test]
fn removing_a_series_leaves_the_others_untouched() {
    let data = records(&[("A", "x", 5.0), ("A", "y", 20.0), ("B", "x", 10.0), ("B", "y", 15.0)]);
    let mut chart = chart("line", data, labelled_options());
    let before: Vec<_> = chart
        .surface()
        .marks_with_class("line")
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(before.len(), 2, "one path per group");

    chart.set_data(records(&[("A", "x", 5.0), ("A", "y", 20.0)]));
    let after = chart.surface().marks_with_class("line");
    assert_eq!(after.len(), 1, "B's path exits");
    assert!(before.contains(after[0]), "A's path keeps its identity and attributes");
}

#[test]
fn colors_survive_toggles_and_refreshes() {
    let mut chart = chart("bar", scenario_data(), labelled_options());
    let a = chart.model().fill_color("A", None);
    let b = chart.model().fill_color("B", None);
    chart.toggle_group("A");
    chart.toggle_group("B");
    assert_eq!(chart.model().fill_color("B", None), b, "stable across toggles");
    chart.set_data(records(&[("C", "x", 1.0), ("A", "x", 2.0), ("B", "y", 3.0)]));
    assert_eq!(chart.model().fill_color("A", None), a, "stable across refreshes");
    assert_eq!(chart.model().fill_color("B", None), b, "stable across refreshes");
}

#[test]
fn layout_nodes_fill_their_parents() {
    let options = labelled_options()
        .with_title("Sales")
        .with_legend_position(LegendPosition::Left);
    let options = ChartOptions {
        toolbar: ToolbarOptions {
            enabled: true,
            ..ToolbarOptions::default()
        },
        ..options
    };
    let chart = chart("bar", scenario_data(), options);
    let layout = chart.layout().expect("laid out");
    let mut nodes = 0;
    for (name, children) in layout.nodes() {
        nodes += 1;
        let sum: f64 = children.iter().map(|c| c.percent).sum();
        assert!((sum - 100.0).abs() < 1e-6, "{name} children sum to {sum}%");
        for child in children {
            assert!(
                child.rect.width() >= 0.0 && child.rect.height() >= 0.0,
                "{} has a negative size",
                child.id
            );
        }
    }
    assert!(nodes >= 3, "root, header and full frame are laid out");
    let legend = chart.component_region("legend").expect("legend placed");
    let graph = layout.child_rect("graph-frame").expect("graph frame placed");
    assert!(legend.x1 <= graph.x0, "legend sits left of the graph");
}

#[test]
fn pie_draws_one_slice_per_group() {
    let data = ChartData::Records(vec![
        Datum::grouped("A", 2.0),
        Datum::grouped("A", 3.0),
        Datum::grouped("B", 5.0),
    ]);
    let options = ChartOptions::default()
        .with_size(300.0, 300.0)
        .with_animations(false);
    let chart = chart("pie", data, options);
    assert_eq!(count(&chart, "slice"), 2, "values aggregate per group");
    assert!(chart.cartesian().is_none(), "pies have no axes");
}

#[test]
fn meter_has_no_legend() {
    let data = ChartData::Records(vec![Datum::grouped("Usage", 42.0)]);
    let options = ChartOptions::default()
        .with_size(300.0, 120.0)
        .with_animations(false);
    let chart = chart("meter", data, options);
    assert_eq!(count(&chart, "meter-container"), 1, "track drawn");
    assert_eq!(count(&chart, "legend-item"), 0, "no legend");
}

#[test]
fn unknown_chart_types_fail() {
    let result = Chart::new("treemap", ChartConfig::default(), SvgSurface::new());
    assert!(
        matches!(result, Err(ConfigError::UnsupportedChartType(name)) if name == "treemap"),
        "unknown type is a configuration error"
    );
}

#[test]
fn charts_without_a_size_render_on_resize() {
    let config = ChartConfig {
        data: scenario_data(),
        options: ChartOptions::default().with_animations(false),
    };
    let mut chart = Chart::new("bar", config, SvgSurface::new()).expect("bar is built in");
    assert_eq!(chart.cycle(), 0, "no cycle without a size");
    assert!(chart.surface().is_empty(), "nothing drawn");

    let log = record_events(&mut chart);
    chart.resize(400.0, 300.0);
    assert_eq!(chart.cycle(), 1, "first cycle");
    assert_eq!(count(&chart, "bar"), 4, "bars drawn");
    assert_eq!(
        names(&log),
        ["chart-resize", "render-finished"],
        "resize then an immediate finish"
    );
}

#[test]
fn render_finished_waits_for_transitions() {
    let options = labelled_options().with_animations(true);
    let mut chart = chart("bar", scenario_data(), options);
    let log = record_events(&mut chart);
    assert!(!chart.is_idle(), "bars are entering");

    chart.advance(Duration::from_millis(100));
    assert!(log.borrow().is_empty(), "still animating");
    chart.advance(Duration::from_millis(400));
    assert_eq!(
        *log.borrow(),
        [ChartEvent::RenderFinished { cycle: 1 }],
        "first cycle resolves once"
    );

    chart.set_data(records(&[("A", "x", 1.0)]));
    chart.finish_transitions();
    let events = log.borrow();
    assert_eq!(events[1], ChartEvent::DataUpdated, "data update comes first");
    assert_eq!(
        events.last(),
        Some(&ChartEvent::RenderFinished { cycle: 2 }),
        "second cycle resolves"
    );
    assert!(chart.is_idle(), "nothing left running");
}

#[test]
fn listeners_drive_follow_up_updates() {
    let options = labelled_options().with_animations(true);
    let mut chart = chart("bar", scenario_data(), options);
    chart.subscribe(|e, commands| {
        if *e == (ChartEvent::RenderFinished { cycle: 1 }) {
            commands.toggle_group("A");
        }
    });
    chart.finish_transitions();
    assert_eq!(chart.model().active_groups(), vec!["A"], "toggle ran after the cycle");
    assert_eq!(chart.cycle(), 2, "one follow-up cycle");
}

#[test]
fn runaway_listeners_are_cut_off() {
    let mut chart = chart("bar", scenario_data(), labelled_options());
    let updates = Rc::new(RefCell::new(0));
    let seen = Rc::clone(&updates);
    chart.subscribe(move |e, commands| {
        if *e == ChartEvent::DataUpdated {
            *seen.borrow_mut() += 1;
            commands.set_data(scenario_data());
        }
    });
    chart.set_data(scenario_data());
    assert_eq!(*updates.borrow(), 9, "the call plus eight follow-up rounds");
    assert_eq!(count(&chart, "bar"), 4, "chart still consistent");
}

#[test]
fn hovering_a_domain_value_shows_the_tooltip() {
    let mut chart = chart("line", scenario_data(), labelled_options());
    let log = record_events(&mut chart);
    let pos = chart
        .scales()
        .and_then(|s| s.point(&Datum::new("A", "x", 10.0)))
        .expect("A at x is plotted");

    chart.pointer_move(pos);
    assert_eq!(chart.interaction().hovered_points.len(), 2, "both groups at x");
    assert_eq!(count(&chart, "ruler-line"), 1, "ruler drawn");
    assert_eq!(count(&chart, "tooltip"), 1, "tooltip panel drawn");
    let show = log
        .borrow()
        .iter()
        .find_map(|e| match e {
            ChartEvent::TooltipShow { html, .. } => Some(html.clone()),
            _ => None,
        })
        .expect("tooltip shown");
    assert!(show.contains("multi-tooltip"), "several records use the list template");

    chart.pointer_move(Point::new(pos.x + 0.5, pos.y));
    assert_eq!(
        names(&log),
        ["point-mouseover", "show-tooltip", "move-tooltip"],
        "same records, the tooltip follows the pointer"
    );

    chart.pointer_leave();
    assert_eq!(
        names(&log)[3..],
        ["point-mouseout", "hide-tooltip"],
        "leaving clears the hover"
    );
    assert_eq!(count(&chart, "tooltip"), 0, "panel removed");
    assert_eq!(count(&chart, "ruler-line"), 0, "ruler removed");
}

#[test]
fn toolbar_zooms_the_domain_axis() {
    let data = ChartData::Records(vec![
        Datum::dated("A", 0.0, 1.0),
        Datum::dated("A", 100.0, 3.0),
        Datum::dated("A", 200.0, 2.0),
    ]);
    let options = ChartOptions {
        toolbar: ToolbarOptions {
            enabled: true,
            ..ToolbarOptions::default()
        },
        ..ChartOptions::default()
            .with_size(400.0, 300.0)
            .with_animations(false)
            .with_bottom_axis(AxisOptions::new(ScaleType::Time).with_maps_to(Field::Date))
    };
    let mut chart = chart("line", data, options);
    let buttons: Vec<Point> = chart
        .surface()
        .marks_with_class("toolbar-button")
        .into_iter()
        .filter_map(|m| m.payload.bounds())
        .map(|r| r.center())
        .collect();
    assert_eq!(buttons.len(), 3, "default controls");
    let zoom_in = buttons
        .iter()
        .copied()
        .find(|p| {
            chart.pointer_move(*p);
            chart.interaction().hovered_control == Some(ToolbarControl::ZoomIn)
        })
        .expect("zoom-in button");

    let log = record_events(&mut chart);
    let hit = chart.click(zoom_in);
    assert_eq!(hit, Some(Hit::ToolbarControl(ToolbarControl::ZoomIn)), "button hit");
    let (lo, hi) = chart.model().zoom_domain().expect("zoomed");
    assert!(lo > 0.0 && hi < 200.0, "narrower than [0, 200], got [{lo}, {hi}]");
    assert_eq!(
        names(&log)[..2],
        ["toolbar-control-click", "zoom-domain-change"],
        "click then domain change"
    );
}

#[test]
fn zoomed_graphs_are_clipped_to_the_plot() {
    let data = ChartData::Records(vec![
        Datum::dated("A", 0.0, 1.0),
        Datum::dated("A", 100.0, 3.0),
        Datum::dated("A", 200.0, 2.0),
    ]);
    let options = ChartOptions::default()
        .with_size(400.0, 300.0)
        .with_animations(false)
        .with_bottom_axis(AxisOptions::new(ScaleType::Time).with_maps_to(Field::Date));
    let mut chart = chart("line", data, options);
    chart.set_zoom_domain(Some((80.0, 120.0)));
    let plot = chart.scales().expect("cartesian scales").plot();
    let inside = |r: Rect| {
        r.x0 >= plot.x0 - 1e-6
            && r.x1 <= plot.x1 + 1e-6
            && r.y0 >= plot.y0 - 1e-6
            && r.y1 <= plot.y1 + 1e-6
    };

    for class in ["dot", "line"] {
        let marks = chart.surface().marks_with_class(class);
        assert!(!marks.is_empty(), "{class} marks are drawn");
        for mark in marks {
            assert_eq!(mark.clip, Some(plot), "{class} is clipped to the plot");
            if let Some(bounds) = mark.visible_bounds() {
                assert!(inside(bounds), "{class} shows {bounds:?} outside {plot:?}");
            }
        }
    }
    let shown = chart
        .surface()
        .marks_with_class("dot")
        .into_iter()
        .filter(|m| m.visible_bounds().is_some())
        .count();
    assert_eq!(shown, 1, "only the record inside the zoom window is visible");
    assert!(
        chart.surface().to_svg_string().contains("clip-path="),
        "the document carries the clip"
    );

    chart.set_zoom_domain(None);
    let shown = chart
        .surface()
        .marks_with_class("dot")
        .into_iter()
        .filter(|m| m.visible_bounds().is_some())
        .count();
    assert_eq!(shown, 3, "every record returns after zooming out");
}

#[test]
fn lollipops_put_a_stem_under_every_dot() {
    let chart = chart("lollipop", scenario_data(), labelled_options());
    assert_eq!(count(&chart, "dot"), 4, "one dot per record");
    assert_eq!(count(&chart, "lollipop-stem"), 4, "one stem per record");
    let (lo, _) = left_domain(&chart);
    assert!(close(lo, 0.0), "stems rise from zero, got {lo}");
}

#[test]
fn confidence_bands_follow_the_single_active_series() {
    let data = ChartData::Records(vec![
        Datum::new("A", "x", 10.0).with_interval(8.0, 13.0),
        Datum::new("A", "y", 20.0).with_interval(17.0, 24.0),
        Datum::new("B", "x", 5.0),
        Datum::new("B", "y", 15.0),
    ]);
    let mut chart = chart("line", data, labelled_options());
    assert_eq!(count(&chart, "confidence-band"), 0, "two active series hide the band");
    let (_, hi) = left_domain(&chart);
    assert!(close(hi, 24.0), "the axis still covers the interval, got {hi}");

    chart.toggle_group("A");
    assert_eq!(count(&chart, "confidence-band"), 1, "A alone shows its band");
    chart.toggle_group("A");
    assert_eq!(count(&chart, "confidence-band"), 0, "band leaves with the second series");
}
