// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the Whitehat death-rate bar chart and choropleth map to a static HTML report.

mod config;
mod html;
mod svg;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use whitehat_core::MarkDiff;
use whitehat_views::{
    Canvas, ChoroplethMap, Dataset, DeathRateBarChart, LinkedViewState, SharedViewState,
    StateGeography, TooltipState, ZOOM_IN_DURATION, normalize_state_name,
};

use crate::config::{CanvasConfig, DemoConfig};
use crate::html::Section;
use crate::svg::SvgScene;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Dataset JSON (overrides the config).
    #[arg(long)]
    data: Option<PathBuf>,
    /// States GeoJSON (overrides the config).
    #[arg(long)]
    map: Option<PathBuf>,
    /// Output HTML file (overrides the config).
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Brush a state, as if hovered on the map.
    #[arg(long)]
    brush: Option<String>,
    /// Zoom the map to a state, as if clicked.
    #[arg(long)]
    zoom: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load_from_file(path)?,
        None => DemoConfig::default(),
    };
    if let Some(data) = cli.data {
        config.input.data = data;
    }
    if let Some(map) = cli.map {
        config.input.map = map;
    }
    if let Some(out) = cli.out {
        config.output.path = out;
    }

    let data = load_dataset(&config.input.data)?;
    let geography = load_geography(&config.input.map)?;
    tracing::info!(
        states = data.states.len(),
        cities = data.cities.len(),
        features = geography.len(),
        "inputs loaded"
    );

    let mut linked = SharedViewState::default();
    if let Some(name) = &cli.brush {
        linked.set_brushed_state(Some(normalize_state_name(name)));
    }

    let map_section = render_map(
        config.map,
        &geography,
        &data,
        &mut linked,
        cli.zoom.as_deref(),
    );
    let bar_section = render_bar_chart(config.bar_chart, &data);

    let report = html::render_report(&config.output.title, &[map_section, bar_section]);
    write_report(&config.output.path, &report)?;
    tracing::info!(path = %config.output.path.display(), "report written");
    Ok(())
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("Failed to open dataset: {}", path.display()))?;
    Dataset::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset: {}", path.display()))
}

fn load_geography(path: &Path) -> Result<StateGeography> {
    let file =
        File::open(path).with_context(|| format!("Failed to open map: {}", path.display()))?;
    StateGeography::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse map: {}", path.display()))
}

fn write_report(path: &Path, report: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, report).with_context(|| format!("Failed to write report: {}", path.display()))
}

fn render_map(
    size: CanvasConfig,
    geography: &StateGeography,
    data: &Dataset,
    linked: &mut SharedViewState,
    zoom: Option<&str>,
) -> Section {
    let canvas = Canvas::new(size.width, size.height, TooltipState::default());
    let mut map = ChoroplethMap::new(canvas);
    let mut svg = SvgScene::with_canvas(size.width, size.height);
    svg.apply_diffs(&map.render(geography, data, linked.brushed_state()));

    let mut notes = Vec::new();
    if let Some(name) = zoom {
        let key = normalize_state_name(name);
        match map.toggle_zoom(&key, Duration::ZERO, linked) {
            Some(diffs) => {
                svg.apply_diffs(&diffs);
                let settled: Vec<MarkDiff> = map.advance(ZOOM_IN_DURATION);
                svg.apply_diffs(&settled);
            }
            None => tracing::warn!(state = %name, "cannot zoom to a state missing from the map"),
        }
    }
    if let Some(brushed) = linked.brushed_state() {
        notes.push(format!("Highlighted: {}", brushed.replace('_', " ")));
    }
    if let Some(zoomed) = linked.zoomed_state() {
        notes.push(format!("Zoomed to: {zoomed}"));
    }
    notes.push(format!(
        "{} states, {} cities",
        map.state_mark_ids().len(),
        map.city_count()
    ));
    tracing::debug!(marks = svg.len(), "map rendered");

    Section {
        title: "Gun deaths per capita".to_string(),
        svg: svg.to_svg_string(),
        notes,
    }
}

fn render_bar_chart(size: CanvasConfig, data: &Dataset) -> Section {
    let canvas = Canvas::new(size.width, size.height, TooltipState::default());
    let mut chart = DeathRateBarChart::new(canvas);
    let mut svg = SvgScene::with_canvas(size.width, size.height);
    svg.apply_diffs(&chart.render(data));
    tracing::debug!(marks = svg.len(), "bar chart rendered");

    let notes = chart
        .rates()
        .iter()
        .max_by(|a, b| a.male_rate.total_cmp(&b.male_rate))
        .map(|top| {
            vec![format!(
                "Highest male rate: {} ({:.2} per 100,000)",
                top.name, top.male_rate
            )]
        })
        .unwrap_or_default();

    Section {
        title: "Gun deaths by gender".to_string(),
        svg: svg.to_svg_string(),
        notes,
    }
}
