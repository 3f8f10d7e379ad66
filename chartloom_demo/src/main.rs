// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders every built-in chart type to an SVG file.
//!
//! Set `RUST_LOG=debug` to follow the update cycles.

use std::path::Path;
use std::time::Duration;

use chartloom_charts::{
    AxisOptions, Chart, ChartConfig, ChartData, ChartEvent, ChartOptions, ChartType, Dataset,
    Datum, Field, ScaleType, ToolbarOptions,
};
use chartloom_core::SvgSurface;
use tracing_subscriber::EnvFilter;

const OUT_DIR: &str = "chartloom_demo_out";

fn tabular() -> ChartData {
    ChartData::Tabular {
        labels: ["Qty", "More", "Sold", "Restocking", "Misc"]
            .map(String::from)
            .to_vec(),
        datasets: vec![
            Dataset::new("Dataset 1", [65000.0, 29123.0, 35213.0, 51213.0, 16932.0]),
            Dataset::new("Dataset 2", [32432.0, 21312.0, 56456.0, 21312.0, 34234.0]),
            Dataset::new("Dataset 3", [12312.0, 34232.0, 39232.0, 12312.0, 34234.0]),
        ],
    }
}

fn timeline() -> ChartData {
    let day = 86_400.0;
    let start = 1_546_300_800.0;
    let mut records = Vec::new();
    for (group, values) in [
        ("Dataset 1", [10.0, 65.0, 30.0, 49.0, 70.0]),
        ("Dataset 2", [20.0, 35.0, 55.0, 40.0, 25.0]),
    ] {
        for (i, value) in values.into_iter().enumerate() {
            records.push(Datum::dated(group, start + i as f64 * 7.0 * day, value));
        }
    }
    ChartData::Records(records)
}

fn config(chart_type: ChartType) -> ChartConfig {
    let base = ChartOptions::default()
        .with_size(600.0, 400.0)
        .with_title(format!("{} chart", chart_type.name()));
    let labelled = || {
        base.clone()
            .with_bottom_axis(AxisOptions::new(ScaleType::Labels).with_maps_to(Field::Key))
            .with_left_axis(AxisOptions::new(ScaleType::Linear).with_maps_to(Field::Value))
    };
    let dated = || ChartOptions {
        toolbar: ToolbarOptions {
            enabled: true,
            ..ToolbarOptions::default()
        },
        ..base
            .clone()
            .with_bottom_axis(AxisOptions::new(ScaleType::Time).with_maps_to(Field::Date))
            .with_left_axis(AxisOptions::new(ScaleType::Linear).with_maps_to(Field::Value))
    };
    match chart_type {
        ChartType::BAR | ChartType::LOLLIPOP => ChartConfig {
            data: tabular(),
            options: labelled(),
        },
        ChartType::LINE | ChartType::SCATTER | ChartType::AREA | ChartType::STACKED_AREA => {
            ChartConfig {
                data: timeline(),
                options: dated(),
            }
        }
        ChartType::PIE | ChartType::DONUT => ChartConfig {
            data: ChartData::Records(vec![
                Datum::grouped("2V2N 9KYPM version 1", 20000.0),
                Datum::grouped("L22I P66EP L22I P66EP L22I P66EP", 65000.0),
                Datum::grouped("JQAI 2M4L1", 75000.0),
                Datum::grouped("J9DZ F37AP", 1200.0),
                Datum::grouped("YEL48 Q6XK YEL48", 10000.0),
                Datum::grouped("Misc", 25000.0),
            ]),
            options: base,
        },
        ChartType::METER => ChartConfig {
            data: ChartData::Records(vec![Datum::grouped("Dataset 1", 56.0)]),
            options: base.with_size(600.0, 120.0),
        },
        _ => ChartConfig {
            data: tabular(),
            options: base,
        },
    }
}

fn render(chart_type: ChartType, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut chart = Chart::new(chart_type.name(), config(chart_type), SvgSurface::new())?;
    chart.subscribe(move |event, _| {
        if let ChartEvent::RenderFinished { cycle } = event {
            tracing::info!(chart = chart_type.name(), cycle, "render finished");
        }
    });
    // Step through the entry animation the way a frame loop would.
    while !chart.is_idle() {
        chart.advance(Duration::from_millis(16));
    }
    let path = out.join(format!("{}.svg", chart_type.name()));
    std::fs::write(&path, chart.surface().to_svg_string())?;
    tracing::info!(path = %path.display(), "wrote chart");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let out = Path::new(OUT_DIR);
    std::fs::create_dir_all(out)?;
    for chart_type in ChartType::BUILT_IN {
        render(chart_type, out)?;
    }
    Ok(())
}
