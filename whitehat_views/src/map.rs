// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The choropleth map: states colored by population per death, proportional city markers, a
//! color legend, click-to-zoom and brushing.

use std::time::Duration;

use kurbo::{Affine, BezPath, Point, Rect, Shape};
use peniko::Brush;
use peniko::color::palette::css;
use whitehat_charts::{
    LegendItem, LegendSwatches, PointMarkSpec, ScaleLinear, ScaleSequential, Symbol,
    TextMarkSpec, interpolate_rd_yl_gn, z_order,
};
use whitehat_core::{
    ColId, EvalCtx, InputRef, Mark, MarkDiff, MarkId, SignalId, TableData, TableId,
};
use whitehat_geo::{AlbersUsa, GeoPath, Projection};

use crate::{
    Canvas, Dataset, EventFlow, LinkedViewState, PointerEvent, StateGeography, Tooltip,
    ZoomState, ZoomTransform, normalize_state_name,
};

const STATES: TableId = TableId(1);
const CITIES: TableId = TableId(2);
const CITY_X: ColId = ColId(0);
const CITY_Y: ColId = ColId(1);
const CITY_COUNT: ColId = ColId(2);

/// `Affine` of the displayed zoom transform.
const ZOOM: SignalId = SignalId(1);
/// `Option<String>`: the normalized name of the brushed state.
const BRUSH: SignalId = SignalId(2);

const PROJECTION_SCALE: f64 = 1070.0;
const COLOR_DOMAIN: (f64, f64) = (0.0, 100_000.0);
const CITY_MIN_RADIUS: f64 = 1.5;
const CITY_OPACITY: f64 = 0.4;

const LEGEND_ID: u64 = 1 << 40;
const LEGEND_TEXT_ID: u64 = 2 << 40;
const LEGEND_SWATCH_WIDTH: f64 = 20.0;

/// Where the legend samples the state count range.
pub const LEGEND_RATIOS: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.99];

/// Ramp positions of the legend swatches.
///
/// Each ratio `r` picks the count `(1 - r) * min + r * max`, which a linear scale from
/// `[min, max]` to `[1, 0]` turns into a position on the color ramp. Positions fall as the
/// ratio grows; equal bounds put every swatch at `0.5`.
pub fn legend_ramp_positions(min: f64, max: f64) -> [f64; 10] {
    let scale = ScaleLinear::new((min, max), (1.0, 0.0));
    LEGEND_RATIOS.map(|r| scale.map((1.0 - r) * min + r * max))
}

/// Opacity and stroke width of a state outline under the current brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateHighlight {
    /// Group opacity.
    pub opacity: f64,
    /// Outline width in pixels.
    pub stroke_width: f64,
}

impl StateHighlight {
    /// Nothing is brushed.
    pub const IDLE: Self = Self {
        opacity: 0.8,
        stroke_width: 2.0,
    };
    /// Another state is brushed.
    pub const DIMMED: Self = Self {
        opacity: 0.4,
        stroke_width: 1.0,
    };
    /// This state is brushed.
    pub const BRUSHED: Self = Self {
        opacity: 1.0,
        stroke_width: 3.0,
    };

    /// The highlight of the state `key` (a normalized name) given the brushed state.
    pub fn for_state(key: &str, brushed: Option<&str>) -> Self {
        match brushed {
            None => Self::IDLE,
            Some(b) if b == key => Self::BRUSHED,
            Some(_) => Self::DIMMED,
        }
    }
}

#[derive(Clone, Debug)]
struct StateShape {
    name: String,
    key: String,
    path: BezPath,
    bounds: Option<Rect>,
    count: f64,
    population: Option<f64>,
}

#[derive(Clone, Debug)]
struct CityPoint {
    name: String,
    count: f64,
    center: Point,
    radius: f64,
}

#[derive(Debug)]
struct CityTable(Vec<[f64; 3]>);

impl TableData for CityTable {
    fn row_count(&self) -> usize {
        self.0.len()
    }

    fn f64(&self, row: usize, col: ColId) -> Option<f64> {
        let [x, y, count] = self.0.get(row)?;
        match col {
            CITY_X => Some(*x),
            CITY_Y => Some(*y),
            CITY_COUNT => Some(*count),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hover {
    State(usize),
    City(usize),
}

/// Choropleth map of the states plus a city overlay.
///
/// States are filled from `population / count` through a sequential `RdYlGn` scale over
/// `[0, 100000]`; unmatched states get the color at `0`. Cities are circles whose radius grows
/// linearly from `1.5` with their count.
///
/// Zoom and brush are scene signals, so a zoom frame or a brush change only re-evaluates the
/// state and city marks; the legend stays put.
#[derive(Debug)]
pub struct ChoroplethMap<T> {
    canvas: Canvas<T>,
    projection: AlbersUsa,
    states: Vec<StateShape>,
    cities: Vec<CityPoint>,
    map_bounds: Option<Rect>,
    zoom: ZoomState,
    hovered: Option<Hover>,
}

impl<T: Tooltip> ChoroplethMap<T> {
    /// Creates an empty map drawing into `canvas`.
    pub fn new(canvas: Canvas<T>) -> Self {
        let projection = Self::projection_for(&canvas);
        Self {
            canvas,
            projection,
            states: Vec::new(),
            cities: Vec::new(),
            map_bounds: None,
            zoom: ZoomState::new(),
            hovered: None,
        }
    }

    fn projection_for(canvas: &Canvas<T>) -> AlbersUsa {
        AlbersUsa::new(
            PROJECTION_SCALE,
            Point::new(canvas.width / 2.0, canvas.height / 2.0),
        )
    }

    /// The drawing surface.
    pub fn canvas(&self) -> &Canvas<T> {
        &self.canvas
    }

    /// The drawing surface, e.g. to resize it before the next render.
    pub fn canvas_mut(&mut self) -> &mut Canvas<T> {
        &mut self.canvas
    }

    /// The projection of the last render.
    pub fn projection(&self) -> &AlbersUsa {
        &self.projection
    }

    /// The zoom state.
    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    /// Unzoomed bounds of states and cities together, as of the last render.
    pub fn map_bounds(&self) -> Option<Rect> {
        self.map_bounds
    }

    /// Number of cities drawn.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    fn state_index(&self, name: &str) -> Option<usize> {
        let key = normalize_state_name(name);
        self.states.iter().position(|s| s.key == key)
    }

    /// Mark id of a state outline, looked up by name (whitespace or underscores).
    pub fn state_mark_id(&self, name: &str) -> Option<MarkId> {
        self.state_index(name).map(|i| MarkId::for_row(STATES, i as u64))
    }

    /// Unzoomed projected bounds of a state.
    pub fn state_bounds(&self, name: &str) -> Option<Rect> {
        self.state_index(name).and_then(|i| self.states[i].bounds)
    }

    /// Mark ids of all state outlines, in feature order.
    pub fn state_mark_ids(&self) -> Vec<MarkId> {
        (0..self.states.len())
            .map(|i| MarkId::for_row(STATES, i as u64))
            .collect()
    }

    /// Mark id of the city drawn at `index`.
    pub fn city_mark_id(&self, index: usize) -> MarkId {
        MarkId::for_row(CITIES, index as u64)
    }

    /// Tears down and rebuilds states, cities and legend, and resets the zoom.
    ///
    /// `brushed` is the host's current brushed state; the highlight starts from it.
    pub fn render(
        &mut self,
        geography: &StateGeography,
        data: &Dataset,
        brushed: Option<&str>,
    ) -> Vec<MarkDiff> {
        self.zoom.reset();
        self.hovered = None;
        self.projection = Self::projection_for(&self.canvas);
        let geo = GeoPath::new(self.projection);
        let color = ScaleSequential::rd_yl_gn(COLOR_DOMAIN);

        self.states = geography
            .features
            .iter()
            .map(|feature| {
                let record = data.find_state(&feature.name);
                if record.is_none() {
                    tracing::debug!(name = %feature.name, "no record for state");
                }
                let path = geo.path(&feature.shape);
                let bounds = (!path.elements().is_empty()).then(|| path.bounding_box());
                if bounds.is_none() {
                    tracing::warn!(name = %feature.name, "state lies outside the projection");
                }
                StateShape {
                    name: feature.name.clone(),
                    key: normalize_state_name(&feature.name),
                    path,
                    bounds,
                    count: record.map_or(0.0, |r| r.count),
                    population: record.map(|r| r.population),
                }
            })
            .collect();

        let max_radius = self.canvas.width / 70.0;
        let size_scale = ScaleLinear::new(
            (0.0, data.city_count_max().unwrap_or(0.0)),
            (CITY_MIN_RADIUS, max_radius),
        );
        self.cities = data
            .cities
            .iter()
            .filter_map(|city| {
                let Some(center) = self.projection.project(city.lng, city.lat) else {
                    tracing::warn!(city = %city.city, "city lies outside the projection");
                    return None;
                };
                Some(CityPoint {
                    name: city.city.clone(),
                    count: city.count,
                    center,
                    radius: size_scale.map(city.count).max(0.0),
                })
            })
            .collect();

        self.map_bounds = self
            .states
            .iter()
            .filter_map(|s| s.bounds)
            .chain(self.cities.iter().map(|c| {
                Rect::from_center_size(c.center, (2.0 * c.radius, 2.0 * c.radius))
            }))
            .reduce(|a, b| a.union(b));

        let scene = &mut self.canvas.scene;
        scene.insert_signal(ZOOM, Affine::IDENTITY);
        scene.insert_signal(BRUSH, brushed.map(str::to_owned));

        let mut marks: Vec<Mark> = Vec::new();
        for (i, state) in self.states.iter().enumerate() {
            let ratio = data.state_color_ratio(&state.name).unwrap_or(0.0);
            marks.push(state_mark(
                MarkId::for_row(STATES, i as u64),
                state,
                color.map(ratio).into(),
            ));
        }

        let keys: Vec<u64> = (0..self.cities.len() as u64).collect();
        scene.set_table(
            CITIES,
            keys.clone(),
            Box::new(CityTable(
                self.cities
                    .iter()
                    .map(|c| [c.center.x, c.center.y, c.count])
                    .collect(),
            )),
        );
        marks.extend(
            PointMarkSpec::new(CITIES, CITY_X, CITY_Y, CITY_COUNT, size_scale)
                .with_fill(css::BLACK)
                .with_opacity(CITY_OPACITY)
                .with_transform_signal(ZOOM)
                .marks(&keys),
        );

        marks.extend(self.legend_marks(data));

        let diffs = self.canvas.scene.tick(marks);
        tracing::debug!(
            states = self.states.len(),
            cities = self.cities.len(),
            diffs = diffs.len(),
            "rendered map"
        );
        diffs
    }

    fn legend_marks(&self, data: &Dataset) -> Vec<Mark> {
        let Some((min, max)) = data.state_count_extent() else {
            return Vec::new();
        };
        let (w, h) = (self.canvas.width, self.canvas.height);
        let bounds = self.map_bounds.unwrap_or(Rect::ZERO);
        let bar_height = (h / 15.0).min(40.0);
        let legend_x = bounds.x0 + 9.0 + bounds.width();
        let bar_width = ((w - legend_x) / 3.0).min(40.0);
        let font_height = (bar_width / 2.0).min(16.0);
        let legend_y = bounds.y0 + 10.0 * font_height;

        let items = legend_ramp_positions(min, max)
            .into_iter()
            .map(|t| LegendItem::swatch(interpolate_rd_yl_gn(t)))
            .collect();
        let legend = LegendSwatches::new(LEGEND_ID, legend_x, legend_y, items)
            .with_swatch_size(LEGEND_SWATCH_WIDTH, bar_height)
            .with_row_step(bar_height);
        let end_y = legend.end_y();
        let mut marks = legend.marks();

        let labels = [
            (bar_width + 7.0, 10.0, "<10 per 100K"),
            (bar_width + 7.0, -bar_width - 180.0, ">2 per 100K"),
            (bar_width + 15.0, -bar_width - 205.0, "rate (per 100000 people)"),
        ];
        for (i, (dx, dy, text)) in labels.into_iter().enumerate() {
            let x = legend_x - dx + bar_width + 5.0;
            let y = end_y + dy + bar_height / 2.0 + font_height / 4.0;
            marks.push(
                TextMarkSpec::new(MarkId::from_raw(LEGEND_TEXT_ID + i as u64), (x, y), text)
                    .with_font_size(font_height)
                    .with_z_index(z_order::LEGEND_LABELS)
                    .mark(),
            );
        }
        marks
    }

    /// Re-evaluates the state highlight for a new brushed state.
    ///
    /// Only state outlines change; nothing is rebuilt.
    pub fn apply_brushed_state(&mut self, brushed: Option<&str>) -> Vec<MarkDiff> {
        match self
            .canvas
            .scene
            .set_signal(BRUSH, brushed.map(str::to_owned))
        {
            Ok(()) => self.canvas.scene.update(),
            Err(err) => {
                tracing::debug!(%err, "map not rendered yet; ignoring brush");
                Vec::new()
            }
        }
    }

    /// Samples a running zoom transition at host time `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<MarkDiff> {
        if self.zoom.advance(now) {
            self.sync_zoom()
        } else {
            Vec::new()
        }
    }

    fn sync_zoom(&mut self) -> Vec<MarkDiff> {
        let affine = self.zoom.displayed().to_affine();
        match self.canvas.scene.set_signal(ZOOM, affine) {
            Ok(()) => self.canvas.scene.update(),
            Err(err) => {
                tracing::debug!(%err, "map not rendered yet; ignoring zoom");
                Vec::new()
            }
        }
    }

    fn hit_test(&self, pos: Point) -> Option<Hover> {
        let p = self.zoom.displayed().invert(pos);
        let city = self.cities.iter().rposition(|c| {
            Symbol::Circle.contains(c.center.x, c.center.y, 2.0 * c.radius, p.x, p.y)
        });
        if let Some(i) = city {
            return Some(Hover::City(i));
        }
        self.states
            .iter()
            .rposition(|s| s.bounds.is_some_and(|b| b.contains(p)) && s.path.contains(p))
            .map(Hover::State)
    }

    fn state_lines(state: &StateShape) -> Vec<String> {
        vec![
            state.name.clone(),
            format!("Gun Deaths: {}", state.count),
            format!(
                "Population: {}",
                state.population.map(|p| p.to_string()).unwrap_or_default()
            ),
        ]
    }

    /// Tracks the pointer: brushes the state under it and keeps the tooltip at the pointer.
    ///
    /// Entering a state brushes it unless the host already has it brushed; leaving it clears
    /// the brush. Cities only show a tooltip.
    pub fn pointer_move(&mut self, event: &PointerEvent, linked: &mut dyn LinkedViewState) {
        let hit = self.hit_test(event.pos);
        if hit != self.hovered {
            self.leave(linked);
            match hit {
                Some(Hover::State(i)) => {
                    let state = &self.states[i];
                    if linked.brushed_state() != Some(state.key.as_str()) {
                        linked.set_brushed_state(Some(state.key.clone()));
                    }
                    let lines = Self::state_lines(state);
                    self.canvas.tooltip.set_content(lines);
                }
                Some(Hover::City(i)) => {
                    let city = &self.cities[i];
                    let lines = vec![city.name.clone(), format!("City Count: {}", city.count)];
                    self.canvas.tooltip.set_content(lines);
                }
                None => {}
            }
            self.hovered = hit;
        }
        if hit.is_some() {
            self.canvas.tooltip.move_to_pointer(event.pos);
        }
    }

    fn leave(&mut self, linked: &mut dyn LinkedViewState) {
        match self.hovered.take() {
            Some(Hover::State(_)) => {
                linked.set_brushed_state(None);
                self.canvas.tooltip.hide();
            }
            Some(Hover::City(_)) => self.canvas.tooltip.hide(),
            None => {}
        }
    }

    /// The pointer left the canvas.
    pub fn pointer_leave(&mut self, linked: &mut dyn LinkedViewState) {
        self.leave(linked);
    }

    /// Toggles the zoom when a state is clicked.
    ///
    /// Zooming in fits the clicked state to the canvas over 750 ms and reports its name;
    /// zooming out returns to the full view over 300 ms and reports `None`. Clicks on a state
    /// are consumed; anything else continues to enclosing handlers.
    pub fn click(
        &mut self,
        event: &PointerEvent,
        linked: &mut dyn LinkedViewState,
    ) -> (EventFlow, Vec<MarkDiff>) {
        let Some(Hover::State(i)) = self.hit_test(event.pos) else {
            return (EventFlow::Continue, Vec::new());
        };
        (EventFlow::Stop, self.toggle_zoom_at(i, event.time, linked))
    }

    /// Toggles the zoom as if the named state had been clicked at host time `now`.
    ///
    /// Returns `None` if the state is not on the map.
    pub fn toggle_zoom(
        &mut self,
        name: &str,
        now: Duration,
        linked: &mut dyn LinkedViewState,
    ) -> Option<Vec<MarkDiff>> {
        let i = self.state_index(name)?;
        Some(self.toggle_zoom_at(i, now, linked))
    }

    fn toggle_zoom_at(
        &mut self,
        i: usize,
        now: Duration,
        linked: &mut dyn LinkedViewState,
    ) -> Vec<MarkDiff> {
        let viewport = self.canvas.size();
        if self.zoom.is_zoomed() {
            self.zoom.zoom_out(viewport, now);
            linked.set_zoomed_state(None);
        } else {
            let state = &self.states[i];
            let target = state
                .bounds
                .map_or(ZoomTransform::IDENTITY, |b| ZoomTransform::fit_bounds(b, viewport));
            self.zoom.zoom_in(target, viewport, now);
            linked.set_zoomed_state(Some(state.name.clone()));
        }
        tracing::debug!(zoomed = self.zoom.is_zoomed(), "zoom toggled");
        self.sync_zoom()
    }
}

fn highlight(ctx: &EvalCtx<'_>, key: &str) -> StateHighlight {
    let brushed = ctx
        .signal_ref::<Option<String>>(BRUSH)
        .and_then(|b| b.as_deref());
    StateHighlight::for_state(key, brushed)
}

fn state_mark(id: MarkId, state: &StateShape, fill: Brush) -> Mark {
    let base = state.path.clone();
    let key = state.key.clone();
    let key2 = state.key.clone();
    Mark::builder(id)
        .path()
        .z_index(z_order::GEO_SHAPES)
        .path_compute([InputRef::Signal { signal: ZOOM }], move |ctx, _| {
            let mut path = base.clone();
            path.apply_affine(ctx.signal::<Affine>(ZOOM).unwrap_or(Affine::IDENTITY));
            path
        })
        .fill_brush_const(fill)
        .stroke_brush_const(css::BLACK.into())
        .stroke_width_compute([InputRef::Signal { signal: BRUSH }], move |ctx, _| {
            highlight(ctx, &key).stroke_width
        })
        .opacity_compute([InputRef::Signal { signal: BRUSH }], move |ctx, _| {
            highlight(ctx, &key2).opacity
        })
        .build()
}

#[cfg(test)]
mod tests {
    use kurbo::Size;
    use whitehat_core::{MarkPayload, PathPayload};
    use whitehat_geo::MultiPolygon;

    use super::*;
    use crate::{CityRecord, SharedViewState, StateFeature, StateRecord, TooltipState};

    const W: f64 = 960.0;
    const H: f64 = 600.0;

    #[derive(Debug, Default)]
    struct Recorder {
        state: SharedViewState,
        brush_calls: Vec<Option<String>>,
        zoom_calls: Vec<Option<String>>,
    }

    impl LinkedViewState for Recorder {
        fn brushed_state(&self) -> Option<&str> {
            self.state.brushed_state()
        }

        fn set_brushed_state(&mut self, state: Option<String>) {
            self.brush_calls.push(state.clone());
            self.state.set_brushed_state(state);
        }

        fn zoomed_state(&self) -> Option<&str> {
            self.state.zoomed_state()
        }

        fn set_zoomed_state(&mut self, state: Option<String>) {
            self.zoom_calls.push(state.clone());
            self.state.set_zoomed_state(state);
        }
    }

    fn feature(name: &str, lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> StateFeature {
        StateFeature {
            name: name.into(),
            shape: MultiPolygon(vec![vec![vec![
                (lon0, lat0),
                (lon1, lat0),
                (lon1, lat1),
                (lon0, lat1),
                (lon0, lat0),
            ]]]),
        }
    }

    fn geography() -> StateGeography {
        StateGeography {
            features: vec![
                feature("Kansas", -102.0, 37.0, -94.6, 40.0),
                feature("Colorado", -109.0, 37.0, -102.0, 41.0),
                feature("New York", -79.0, 42.0, -73.5, 45.0),
            ],
        }
    }

    fn city(name: &str, lng: f64, lat: f64, count: f64) -> CityRecord {
        CityRecord {
            city: name.into(),
            lat,
            lng,
            count,
            key: name.to_lowercase(),
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            states: vec![
                StateRecord {
                    state: "Kansas".into(),
                    abbreviation: "KS".into(),
                    population: 2_900_000.0,
                    count: 400.0,
                    male_count: 340.0,
                },
                StateRecord {
                    state: "New_York".into(),
                    abbreviation: "NY".into(),
                    population: 19_450_000.0,
                    count: 900.0,
                    male_count: 780.0,
                },
            ],
            cities: vec![
                city("Wichita", -97.33, 37.69, 50.0),
                city("Denver", -104.99, 39.74, 100.0),
                city("Paris", 2.35, 48.85, 10.0),
            ],
        }
    }

    fn rendered() -> ChoroplethMap<TooltipState> {
        let mut map = ChoroplethMap::new(Canvas::new(W, H, TooltipState::default()));
        assert!(!map.render(&geography(), &dataset(), None).is_empty());
        map
    }

    fn screen(map: &ChoroplethMap<TooltipState>, lon: f64, lat: f64) -> Point {
        let p = map.projection().project(lon, lat).unwrap();
        map.zoom().displayed().apply(p)
    }

    fn path_payload(map: &ChoroplethMap<TooltipState>, id: MarkId) -> &PathPayload {
        match map.canvas().scene.payload(id) {
            Some(MarkPayload::Path(p)) => p,
            other => panic!("expected a path, got {other:?}"),
        }
    }

    fn highlight_of(map: &ChoroplethMap<TooltipState>, name: &str) -> StateHighlight {
        let paint = &path_payload(map, map.state_mark_id(name).unwrap()).paint;
        StateHighlight {
            opacity: paint.opacity,
            stroke_width: paint.stroke_width,
        }
    }

    #[test]
    fn highlight_rules() {
        assert_eq!(StateHighlight::for_state("Ohio", None), StateHighlight::IDLE);
        assert_eq!(
            StateHighlight::for_state("Ohio", Some("Ohio")),
            StateHighlight::BRUSHED
        );
        assert_eq!(
            StateHighlight::for_state("Ohio", Some("Iowa")),
            StateHighlight::DIMMED
        );
    }

    #[test]
    fn fills_follow_population_per_death() {
        let map = rendered();
        let color = ScaleSequential::rd_yl_gn(COLOR_DOMAIN);
        let kansas = &path_payload(&map, map.state_mark_id("Kansas").unwrap()).paint;
        assert_eq!(kansas.fill, Brush::from(color.map(2_900_000.0 / 400.0)));
        assert_eq!(kansas.stroke, Brush::from(css::BLACK));
        // No record: the color at zero.
        let colorado = &path_payload(&map, map.state_mark_id("Colorado").unwrap()).paint;
        assert_eq!(colorado.fill, Brush::from(interpolate_rd_yl_gn(0.0)));
    }

    #[test]
    fn cities_are_projected_and_sized() {
        let map = rendered();
        // Paris is outside every inset.
        assert_eq!(map.city_count(), 2);
        let denver = map
            .canvas()
            .scene
            .payload(map.city_mark_id(1))
            .and_then(MarkPayload::bounds)
            .unwrap();
        assert!((denver.width() - 2.0 * W / 70.0).abs() < 0.5);
        assert!((denver.center() - screen(&map, -104.99, 39.74)).hypot() < 0.5);
        assert_eq!(
            map.canvas()
                .scene
                .payload(map.city_mark_id(1))
                .map(|p| p.paint().opacity),
            Some(CITY_OPACITY)
        );
    }

    #[test]
    fn brushing_highlights_exactly_one_state() {
        let mut map = rendered();
        for name in ["Kansas", "Colorado", "New York"] {
            assert_eq!(highlight_of(&map, name), StateHighlight::IDLE);
        }

        let diffs = map.apply_brushed_state(Some("New_York"));
        assert_eq!(diffs.len(), 3);
        assert!(diffs.iter().all(|d| matches!(d, MarkDiff::Update { .. })));
        let brushed: Vec<MarkId> = map
            .state_mark_ids()
            .into_iter()
            .filter(|id| {
                let paint = &path_payload(&map, *id).paint;
                paint.opacity == 1.0 && paint.stroke_width == 3.0
            })
            .collect();
        assert_eq!(brushed, vec![map.state_mark_id("New York").unwrap()]);
        assert_eq!(highlight_of(&map, "Kansas"), StateHighlight::DIMMED);
        assert_eq!(highlight_of(&map, "Colorado"), StateHighlight::DIMMED);

        map.apply_brushed_state(None);
        for name in ["Kansas", "Colorado", "New York"] {
            assert_eq!(highlight_of(&map, name), StateHighlight::IDLE);
        }
    }

    #[test]
    fn brush_before_render_is_ignored() {
        let mut map = ChoroplethMap::new(Canvas::new(W, H, TooltipState::default()));
        assert!(map.apply_brushed_state(Some("Kansas")).is_empty());
        assert!(map.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn hover_brushes_once_and_leave_clears() {
        let mut map = rendered();
        let mut host = Recorder::default();

        let p = screen(&map, -99.5, 39.5);
        map.pointer_move(&PointerEvent::at(p.x, p.y), &mut host);
        assert_eq!(host.brush_calls, vec![Some("Kansas".to_string())]);
        let tip = &map.canvas().tooltip;
        assert!(tip.visible);
        assert_eq!(
            tip.lines,
            vec![
                "Kansas".to_string(),
                "Gun Deaths: 400".to_string(),
                "Population: 2900000".to_string(),
            ]
        );

        let q = screen(&map, -99.4, 39.5);
        map.pointer_move(&PointerEvent::at(q.x, q.y), &mut host);
        assert_eq!(host.brush_calls.len(), 1);
        assert_eq!(map.canvas().tooltip.pos, q);

        map.pointer_leave(&mut host);
        assert_eq!(host.brush_calls.last(), Some(&None));
        assert!(!map.canvas().tooltip.visible);
    }

    #[test]
    fn unmatched_state_tooltip_defaults_to_zero() {
        let mut map = rendered();
        let mut host = Recorder::default();
        let p = screen(&map, -107.0, 38.0);
        map.pointer_move(&PointerEvent::at(p.x, p.y), &mut host);
        assert_eq!(host.brush_calls, vec![Some("Colorado".to_string())]);
        assert_eq!(map.canvas().tooltip.lines[1], "Gun Deaths: 0");
        assert_eq!(map.canvas().tooltip.lines[2], "Population: ");
    }

    #[test]
    fn city_hover_shows_count_without_brushing() {
        let mut map = rendered();
        let mut host = Recorder::default();
        let p = screen(&map, -104.99, 39.74);
        map.pointer_move(&PointerEvent::at(p.x, p.y), &mut host);
        assert!(host.brush_calls.is_empty());
        assert_eq!(
            map.canvas().tooltip.lines,
            vec!["Denver".to_string(), "City Count: 100".to_string()]
        );
        map.pointer_move(&PointerEvent::at(2.0, 2.0), &mut host);
        assert!(!map.canvas().tooltip.visible);
        assert!(host.brush_calls.is_empty());
    }

    #[test]
    fn clicks_toggle_zoom_and_stop_propagation() {
        let mut map = rendered();
        let mut host = Recorder::default();
        let kansas = map.state_bounds("Kansas").unwrap();
        let kansas_id = map.state_mark_id("Kansas").unwrap();

        let p = screen(&map, -99.5, 39.5);
        let (flow, _) = map.click(&PointerEvent::new(p, Duration::ZERO), &mut host);
        assert_eq!(flow, EventFlow::Stop);
        assert_eq!(host.zoom_calls, vec![Some("Kansas".to_string())]);
        assert!(map.zoom().is_zoomed());

        assert!(!map.advance(Duration::from_millis(750)).is_empty());
        let target = ZoomTransform::fit_bounds(kansas, Size::new(W, H));
        assert_eq!(map.zoom().displayed(), target);
        let zoomed = path_payload(&map, kansas_id).path.bounding_box();
        assert!((zoomed.center() - Point::new(W / 2.0, H / 2.0)).hypot() < 1e-6);

        // Hit-testing goes through the inverse transform.
        let p = screen(&map, -99.5, 39.5);
        let (flow, _) = map.click(&PointerEvent::new(p, Duration::from_secs(1)), &mut host);
        assert_eq!(flow, EventFlow::Stop);
        assert_eq!(host.zoom_calls.last(), Some(&None));

        map.advance(Duration::from_millis(1300));
        assert_eq!(map.zoom().displayed(), ZoomTransform::IDENTITY);
        assert_eq!(path_payload(&map, kansas_id).path.bounding_box(), kansas);
    }

    #[test]
    fn clicks_off_states_continue() {
        let mut map = rendered();
        let mut host = Recorder::default();
        let (flow, diffs) = map.click(&PointerEvent::at(2.0, 2.0), &mut host);
        assert_eq!(flow, EventFlow::Continue);
        assert!(diffs.is_empty());
        let city = screen(&map, -97.33, 37.69);
        let (flow, _) = map.click(&PointerEvent::at(city.x, city.y), &mut host);
        assert_eq!(flow, EventFlow::Continue);
        assert!(host.zoom_calls.is_empty());
    }

    #[test]
    fn toggle_zoom_by_name() {
        let mut map = rendered();
        let mut host = Recorder::default();
        assert!(map.toggle_zoom("Ohio", Duration::ZERO, &mut host).is_none());
        assert!(map.toggle_zoom("New York", Duration::ZERO, &mut host).is_some());
        assert_eq!(host.zoom_calls, vec![Some("New York".to_string())]);
        map.advance(Duration::from_millis(750));
        let ny = map.state_bounds("New_York").unwrap();
        assert_eq!(
            map.zoom().displayed(),
            ZoomTransform::fit_bounds(ny, Size::new(W, H))
        );
    }

    #[test]
    fn render_resets_zoom() {
        let mut map = rendered();
        let mut host = Recorder::default();
        let p = screen(&map, -99.5, 39.5);
        map.click(&PointerEvent::at(p.x, p.y), &mut host);
        map.advance(Duration::from_secs(1));
        assert_ne!(map.zoom().displayed(), ZoomTransform::IDENTITY);

        map.render(&geography(), &dataset(), None);
        assert!(!map.zoom().is_zoomed());
        assert_eq!(map.zoom().displayed(), ZoomTransform::IDENTITY);
        let kansas = map.state_bounds("Kansas").unwrap();
        let id = map.state_mark_id("Kansas").unwrap();
        assert_eq!(path_payload(&map, id).path.bounding_box(), kansas);
    }

    #[test]
    fn legend_ramp_descends_as_the_ratio_grows() {
        let t = legend_ramp_positions(10.0, 900.0);
        assert!((t[0] - 0.9).abs() < 1e-12);
        assert!((t[9] - 0.01).abs() < 1e-12);
        assert!(t.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn equal_counts_put_every_swatch_mid_ramp() {
        assert_eq!(legend_ramp_positions(10.0, 10.0), [0.5; 10]);

        let mut map = ChoroplethMap::new(Canvas::new(W, H, TooltipState::default()));
        let mut data = dataset();
        data.states.truncate(1);
        map.render(&geography(), &data, None);
        let Some(MarkPayload::Rect(r)) = map.canvas().scene.payload(MarkId::from_raw(LEGEND_ID))
        else {
            panic!("missing swatch");
        };
        assert_eq!(r.paint.fill, Brush::from(interpolate_rd_yl_gn(0.5)));
    }

    #[test]
    fn zero_city_counts_use_the_middle_radius() {
        let mut map = ChoroplethMap::new(Canvas::new(W, H, TooltipState::default()));
        let mut data = dataset();
        for city in &mut data.cities {
            city.count = 0.0;
        }
        map.render(&geography(), &data, None);
        let expected = CITY_MIN_RADIUS + W / 70.0;
        for i in 0..map.city_count() {
            let bounds = map
                .canvas()
                .scene
                .payload(map.city_mark_id(i))
                .and_then(MarkPayload::bounds)
                .unwrap();
            assert!((bounds.width() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn legend_swatches_and_labels() {
        let map = rendered();
        let scene = &map.canvas().scene;
        let (min, max) = dataset().state_count_extent().unwrap();
        let positions = legend_ramp_positions(min, max);
        let bar_height = (H / 15.0).min(40.0);
        let mut prev_y = f64::NEG_INFINITY;
        for (i, t) in positions.into_iter().enumerate() {
            let Some(MarkPayload::Rect(r)) = scene.payload(MarkId::from_raw(LEGEND_ID + i as u64))
            else {
                panic!("missing swatch {i}");
            };
            assert_eq!(r.paint.fill, Brush::from(interpolate_rd_yl_gn(t)));
            assert!((r.rect.height() - bar_height).abs() < 1e-9);
            assert_eq!(r.rect.width(), LEGEND_SWATCH_WIDTH);
            assert!(r.rect.y0 > prev_y);
            prev_y = r.rect.y0;
        }
        let texts: Vec<String> = (0..3)
            .filter_map(|i| match scene.payload(MarkId::from_raw(LEGEND_TEXT_ID + i)) {
                Some(MarkPayload::Text(t)) => Some(t.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec!["<10 per 100K", ">2 per 100K", "rate (per 100000 people)"]
        );
    }
}
