// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives both views the way a host page would: shared state, data loading, pointer events and
//! an animation clock.

use std::time::Duration;

use whitehat_core::{MarkDiff, MarkPayload};
use whitehat_geo::Projection;
use whitehat_views::{
    Canvas, ChoroplethMap, Dataset, DeathRateBarChart, EventFlow, LinkedViewState,
    PointerEvent, SharedViewState, StateGeography, StateHighlight, TooltipState,
    ZoomTransform,
};

const DATA: &str = r#"{
    "states": [
        {"state": "Kansas", "abreviation": "KS", "population": "2900000", "count": 400, "male_count": 340},
        {"state": "New_York", "abreviation": "NY", "population": 19450000, "count": 900, "male_count": 780},
        {"state": "X", "abreviation": "X", "population": "1000", "count": 10, "male_count": 6}
    ],
    "cities": [
        {"city": "Wichita", "lat": 37.69, "lng": -97.33, "count": 50, "key": 1}
    ]
}"#;

const MAP: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"NAME": "Kansas"},
         "geometry": {"type": "Polygon", "coordinates": [[[-102,37],[-94.6,37],[-94.6,40],[-102,40],[-102,37]]]}},
        {"type": "Feature", "properties": {"NAME": "New York"},
         "geometry": {"type": "MultiPolygon", "coordinates": [
            [[[-79,42],[-73.5,42],[-73.5,45],[-79,45],[-79,42]]],
            [[[-73,40.5],[-72,40.5],[-72,41],[-73,41],[-73,40.5]]]
         ]}}
    ]
}"#;

struct Host {
    state: SharedViewState,
    data: Dataset,
    geography: StateGeography,
    map: ChoroplethMap<TooltipState>,
    bars: DeathRateBarChart<TooltipState>,
}

impl Host {
    fn new() -> Self {
        let data = Dataset::from_json_str(DATA).unwrap();
        let geography = StateGeography::from_geojson_str(MAP).unwrap();
        let mut host = Self {
            state: SharedViewState::default(),
            data,
            geography,
            map: ChoroplethMap::new(Canvas::new(960.0, 600.0, TooltipState::default())),
            bars: DeathRateBarChart::new(Canvas::new(800.0, 400.0, TooltipState::default())),
        };
        host.map
            .render(&host.geography, &host.data, host.state.brushed_state());
        host.bars.render(&host.data);
        host
    }

    /// Forwards a pointer move and re-runs the highlight pass if the brush changed.
    fn hover_map(&mut self, lon: f64, lat: f64) -> Vec<MarkDiff> {
        let before = self.state.brushed.clone();
        let p = self.screen(lon, lat);
        self.map.pointer_move(&PointerEvent::at(p.x, p.y), &mut self.state);
        if self.state.brushed != before {
            self.map.apply_brushed_state(self.state.brushed_state())
        } else {
            Vec::new()
        }
    }

    fn screen(&self, lon: f64, lat: f64) -> kurbo::Point {
        let p = self.map.projection().project(lon, lat).unwrap();
        self.map.zoom().displayed().apply(p)
    }

    fn highlight(&self, name: &str) -> StateHighlight {
        let id = self.map.state_mark_id(name).unwrap();
        let paint = self.map.canvas().scene.payload(id).unwrap().paint();
        StateHighlight {
            opacity: paint.opacity,
            stroke_width: paint.stroke_width,
        }
    }
}

#[test]
fn hovering_a_state_brushes_it_through_the_host() {
    let mut host = Host::new();
    assert_eq!(host.highlight("Kansas"), StateHighlight::IDLE);

    let diffs = host.hover_map(-99.5, 39.5);
    assert_eq!(host.state.brushed_state(), Some("Kansas"));
    assert_eq!(diffs.len(), 2);
    assert_eq!(host.highlight("Kansas"), StateHighlight::BRUSHED);
    assert_eq!(host.highlight("New York"), StateHighlight::DIMMED);

    // Straight from one state to another.
    host.hover_map(-75.0, 43.5);
    assert_eq!(host.state.brushed_state(), Some("New_York"));
    assert_eq!(host.highlight("Kansas"), StateHighlight::DIMMED);
    assert_eq!(host.highlight("New York"), StateHighlight::BRUSHED);

    host.map.pointer_leave(&mut host.state);
    assert_eq!(host.state.brushed_state(), None);
    host.map.apply_brushed_state(host.state.brushed_state());
    assert_eq!(host.highlight("New York"), StateHighlight::IDLE);
}

#[test]
fn two_clicks_zoom_in_and_back_out() {
    let mut host = Host::new();
    let p = host.screen(-99.5, 39.5);
    let (flow, _) = host
        .map
        .click(&PointerEvent::new(p, Duration::from_millis(100)), &mut host.state);
    assert_eq!(flow, EventFlow::Stop);
    assert_eq!(host.state.zoomed_state(), Some("Kansas"));

    // Mid-flight frames move the state outline.
    let frame = host.map.advance(Duration::from_millis(400));
    assert!(frame.iter().all(|d| matches!(d, MarkDiff::Update { .. })));
    assert!(!frame.is_empty());
    host.map.advance(Duration::from_millis(850));
    assert!(host.map.zoom().displayed().k > 1.0);

    let p = host.screen(-99.5, 39.5);
    let (flow, _) = host
        .map
        .click(&PointerEvent::new(p, Duration::from_secs(2)), &mut host.state);
    assert_eq!(flow, EventFlow::Stop);
    assert_eq!(host.state.zoomed_state(), None);
    host.map.advance(Duration::from_millis(2300));
    assert_eq!(host.map.zoom().displayed(), ZoomTransform::IDENTITY);
    assert!(host.map.advance(Duration::from_secs(3)).is_empty());
}

#[test]
fn bar_chart_matches_the_dataset() {
    let host = Host::new();
    let rates = host.bars.rates();
    assert_eq!(rates.len(), 3);
    let x = &rates[2];
    assert_eq!((x.male_rate, x.female_rate), (600.0, 400.0));
    for (r, record) in rates.iter().zip(&host.data.states) {
        let recovered = (r.male_rate + r.female_rate) / 100_000.0 * r.population;
        assert!((recovered - record.count).abs() < 1e-6);
    }
    let y = host.bars.y_scale().unwrap();
    assert!(rates.iter().all(|r| y.domain_max() >= r.male_rate.max(r.female_rate)));

    let (male, _) = host.bars.bar_ids(2).unwrap();
    let Some(MarkPayload::Rect(bar)) = host.bars.canvas().scene.payload(male) else {
        panic!("missing bar");
    };
    assert!((bar.rect.y1 - (400.0 - 50.0)).abs() < 1e-9);
}

#[test]
fn views_are_independent_scenes() {
    let mut host = Host::new();
    let bar_marks = host.bars.canvas().scene.mark_count();
    host.hover_map(-99.5, 39.5);
    assert_eq!(host.bars.canvas().scene.mark_count(), bar_marks);
    assert!(!host.bars.canvas().tooltip.visible);
    assert!(host.map.canvas().tooltip.visible);
}

#[test]
fn multipolygon_states_hit_every_part() {
    let mut host = Host::new();
    // The Long Island part of the test shape.
    host.hover_map(-72.5, 40.75);
    assert_eq!(host.state.brushed_state(), Some("New_York"));
}
