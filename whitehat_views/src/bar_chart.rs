// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paired male/female death-rate bars per state.

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use whitehat_charts::{
    AxisSpec, BarMarkSpec, ScaleBand, ScaleBandSpec, ScaleLinear, ScaleLinearSpec, TextMarkSpec,
    infer_domain_f64, z_order,
};
use whitehat_core::{ColId, MarkDiff, MarkId, MarkPayload, TableData, TableId, TextAnchor};

use crate::{Canvas, Dataset, PointerEvent, StateRates, Tooltip};

const RATES: TableId = TableId(1);
const MALE_RATE: ColId = ColId(0);
const FEMALE_RATE: ColId = ColId(1);

const MARGIN: f64 = 50.0;
const BAND_PADDING: f64 = 0.2;
const TICK_COUNT: usize = 10;

const X_AXIS_ID: u64 = 1 << 40;
const Y_AXIS_ID: u64 = 2 << 40;
const TITLE_ID: u64 = 3 << 40;

const TITLE: &str = "Gun Deaths per 100,000 Population by State (Male and Female)";
const X_TITLE: &str = "State";
const Y_TITLE: &str = "Deaths per 100,000 Population";

#[derive(Debug)]
struct RatesTable(Vec<StateRates>);

impl TableData for RatesTable {
    fn row_count(&self) -> usize {
        self.0.len()
    }

    fn f64(&self, row: usize, col: ColId) -> Option<f64> {
        let rates = self.0.get(row)?;
        match col {
            MALE_RATE => Some(rates.male_rate),
            FEMALE_RATE => Some(rates.female_rate),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sex {
    Male,
    Female,
}

/// Bar chart of male and female firearm deaths per 100,000 people, one band per state.
///
/// Every [`render`](Self::render) re-derives scales, axes and bars from scratch and replaces
/// the previous mark set; stale marks leave through exit diffs.
#[derive(Debug)]
pub struct DeathRateBarChart<T> {
    canvas: Canvas<T>,
    rates: Vec<StateRates>,
    bar_ids: Vec<[MarkId; 2]>,
    band: Option<ScaleBand>,
    y_scale: Option<ScaleLinear>,
    hovered: Option<(usize, Sex)>,
}

impl<T: Tooltip> DeathRateBarChart<T> {
    /// Creates an empty chart drawing into `canvas`.
    pub fn new(canvas: Canvas<T>) -> Self {
        Self {
            canvas,
            rates: Vec::new(),
            bar_ids: Vec::new(),
            band: None,
            y_scale: None,
            hovered: None,
        }
    }

    /// The drawing surface.
    pub fn canvas(&self) -> &Canvas<T> {
        &self.canvas
    }

    /// The drawing surface, e.g. to resize it before the next render.
    pub fn canvas_mut(&mut self) -> &mut Canvas<T> {
        &mut self.canvas
    }

    /// Rates of the last render, in band order.
    pub fn rates(&self) -> &[StateRates] {
        &self.rates
    }

    /// The band scale of the last render.
    pub fn band(&self) -> Option<ScaleBand> {
        self.band
    }

    /// The vertical scale of the last render.
    pub fn y_scale(&self) -> Option<ScaleLinear> {
        self.y_scale
    }

    /// Mark ids of the `(male, female)` bars of row `row`.
    pub fn bar_ids(&self, row: usize) -> Option<(MarkId, MarkId)> {
        self.bar_ids.get(row).map(|[m, f]| (*m, *f))
    }

    /// Rebuilds the chart from `data`. Without states the canvas is cleared.
    pub fn render(&mut self, data: &Dataset) -> Vec<MarkDiff> {
        self.hovered = None;
        self.rates = data.states.iter().map(StateRates::from_record).collect();
        if self.rates.is_empty() {
            tracing::debug!("no states; clearing bar chart");
            self.bar_ids.clear();
            self.band = None;
            self.y_scale = None;
            return self.canvas.scene.tick(Vec::new());
        }

        let (w, h) = (self.canvas.width, self.canvas.height);
        let plot = Rect::new(MARGIN, MARGIN, w - 1.0, h - MARGIN);
        let n = self.rates.len();

        let band_spec = ScaleBandSpec::new(n).with_uniform_padding(BAND_PADDING);
        let band = band_spec.instantiate((plot.x0, plot.x1));
        let table = RatesTable(self.rates.clone());
        // Non-finite rates (zero population) are skipped by the domain; they draw flat bars.
        let max_rate = [MALE_RATE, FEMALE_RATE]
            .into_iter()
            .filter_map(|col| infer_domain_f64(&table, col))
            .fold(0.0, |acc, (_, hi)| f64::max(acc, hi));
        let y_spec = ScaleLinearSpec::new((0.0, max_rate)).with_nice(true);
        let y_scale = y_spec.instantiate_resolved((plot.y1, plot.y0), TICK_COUNT);

        // Rows are keyed by position; abbreviations need not be unique.
        let keys: Vec<u64> = (0..n as u64).collect();
        let labels: Vec<String> = self.rates.iter().map(|r| r.abbreviation.clone()).collect();
        self.canvas
            .scene
            .set_table(RATES, keys.clone(), Box::new(table));

        let male = BarMarkSpec::new(RATES, MALE_RATE, band, y_scale)
            .with_slot(0.0, 0.5)
            .with_fill(css::STEEL_BLUE);
        let female = BarMarkSpec::new(RATES, FEMALE_RATE, band, y_scale)
            .with_slot(0.5, 0.5)
            .with_series(1)
            .with_fill(css::RED);
        self.bar_ids = keys
            .iter()
            .map(|&k| [male.mark_id(k), female.mark_id(k)])
            .collect();

        let mut marks = male.marks(&keys);
        marks.extend(female.marks(&keys));
        marks.extend(
            AxisSpec::bottom(X_AXIS_ID, band_spec)
                .with_band_labels(labels)
                .marks(plot),
        );
        marks.extend(
            AxisSpec::left(Y_AXIS_ID, y_spec)
                .with_tick_count(TICK_COUNT)
                .marks(plot),
        );
        marks.push(
            TextMarkSpec::new(MarkId::from_raw(TITLE_ID), (w / 2.0, MARGIN / 2.0), TITLE)
                .with_font_size(20.0)
                .bold()
                .with_anchor(TextAnchor::Middle)
                .mark(),
        );
        marks.push(
            TextMarkSpec::new(MarkId::from_raw(TITLE_ID + 1), (w / 2.0, h - 10.0), X_TITLE)
                .with_anchor(TextAnchor::Middle)
                .with_z_index(z_order::AXIS_TITLES)
                .mark(),
        );
        marks.push(
            TextMarkSpec::new(
                MarkId::from_raw(TITLE_ID + 2),
                (MARGIN / 2.0 - 10.0, h / 2.0),
                Y_TITLE,
            )
            .with_anchor(TextAnchor::Middle)
            .with_angle(-90.0)
            .with_z_index(z_order::AXIS_TITLES)
            .mark(),
        );

        self.band = Some(band);
        self.y_scale = Some(y_scale);
        let diffs = self.canvas.scene.tick(marks);
        tracing::debug!(states = n, max_rate, diffs = diffs.len(), "rendered bar chart");
        diffs
    }

    fn hit_test(&self, pos: Point) -> Option<(usize, Sex)> {
        let hit = |id: MarkId| match self.canvas.scene.payload(id) {
            Some(MarkPayload::Rect(r)) => r.rect.abs().contains(pos),
            _ => false,
        };
        self.bar_ids.iter().enumerate().find_map(|(row, [m, f])| {
            if hit(*m) {
                Some((row, Sex::Male))
            } else if hit(*f) {
                Some((row, Sex::Female))
            } else {
                None
            }
        })
    }

    fn tooltip_lines(&self, row: usize, sex: Sex) -> Vec<String> {
        let Some(r) = self.rates.get(row) else {
            return Vec::new();
        };
        let (label, deaths, rate) = match sex {
            Sex::Male => ("Male", r.male_deaths, r.male_rate),
            Sex::Female => ("Female", r.female_deaths, r.female_rate),
        };
        vec![
            r.name.clone(),
            format!("Gun Deaths:{}", r.count),
            format!("population:{}", r.population),
            format!("{label} :{deaths}"),
            format!("({label}):{rate:.2}Deaths per 100,000"),
        ]
    }

    /// Shows the tooltip for the bar under the pointer and keeps it at the pointer.
    ///
    /// Moving off every bar hides it.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        match self.hit_test(event.pos) {
            Some((row, sex)) => {
                if self.hovered != Some((row, sex)) {
                    let lines = self.tooltip_lines(row, sex);
                    self.canvas.tooltip.set_content(lines);
                    self.hovered = Some((row, sex));
                }
                self.canvas.tooltip.move_to_pointer(event.pos);
            }
            None => {
                if self.hovered.take().is_some() {
                    self.canvas.tooltip.hide();
                }
            }
        }
    }

    /// The pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
        self.canvas.tooltip.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StateRecord, TooltipState};

    fn record(abbr: &str, state: &str, population: f64, count: f64, male: f64) -> StateRecord {
        StateRecord {
            state: state.into(),
            abbreviation: abbr.into(),
            population,
            count,
            male_count: male,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            states: vec![
                record("X", "X", 1000.0, 10.0, 6.0),
                record("NM", "New_Mexico", 2_000_000.0, 480.0, 400.0),
                record("ZZ", "Zero", 0.0, 1.0, 1.0),
            ],
            cities: Vec::new(),
        }
    }

    fn chart() -> DeathRateBarChart<TooltipState> {
        DeathRateBarChart::new(Canvas::new(800.0, 500.0, TooltipState::default()))
    }

    fn rect(chart: &DeathRateBarChart<TooltipState>, id: MarkId) -> Rect {
        match chart.canvas().scene.payload(id) {
            Some(MarkPayload::Rect(r)) => r.rect,
            other => panic!("expected a rect, got {other:?}"),
        }
    }

    #[test]
    fn bars_sit_in_half_bands_on_the_baseline() {
        let mut chart = chart();
        chart.render(&dataset());
        let band = chart.band().unwrap();
        let y = chart.y_scale().unwrap();

        // Niced upward from 600.
        assert!(y.domain_max() >= 600.0);
        assert_eq!(y.domain_min(), 0.0);
        assert_eq!(y.range(), (450.0, 50.0));

        let (m, f) = chart.bar_ids(0).unwrap();
        let male = rect(&chart, m);
        let female = rect(&chart, f);
        assert!((male.x0 - band.x(0)).abs() < 1e-9);
        assert!((male.width() - band.band_width() / 2.0).abs() < 1e-9);
        assert!((female.x0 - male.x1).abs() < 1e-9);
        assert!((male.y1 - 450.0).abs() < 1e-9);
        assert!((male.y0 - y.map(600.0)).abs() < 1e-9);
        assert!((female.y0 - y.map(400.0)).abs() < 1e-9);

        // Zero population: flat bars, ignored by the domain.
        let (zm, zf) = chart.bar_ids(2).unwrap();
        assert_eq!(rect(&chart, zm).height(), 0.0);
        assert_eq!(rect(&chart, zf).height(), 0.0);
    }

    #[test]
    fn rerender_replaces_instead_of_accumulating() {
        let mut chart = chart();
        chart.render(&dataset());
        let count = chart.canvas().scene.mark_count();
        assert!(chart.render(&dataset()).is_empty());
        assert_eq!(chart.canvas().scene.mark_count(), count);

        let mut fewer = dataset();
        fewer.states.truncate(2);
        let diffs = chart.render(&fewer);
        assert!(diffs.iter().any(|d| matches!(d, MarkDiff::Exit { .. })));
        assert!(chart.canvas().scene.mark_count() < count);

        assert!(!chart.render(&Dataset::default()).is_empty());
        assert_eq!(chart.canvas().scene.mark_count(), 0);
    }

    #[test]
    fn duplicate_abbreviations_keep_their_own_bars() {
        let mut chart = chart();
        let data = Dataset {
            states: vec![
                record("NM", "New_Mexico", 2_000_000.0, 480.0, 400.0),
                record("NM", "New_Mexico", 1_000_000.0, 100.0, 50.0),
            ],
            cities: Vec::new(),
        };
        chart.render(&data);
        let (m0, f0) = chart.bar_ids(0).unwrap();
        let (m1, f1) = chart.bar_ids(1).unwrap();
        assert_ne!(m0, m1);
        assert_ne!(f0, f1);
        assert!(rect(&chart, m1).x0 > rect(&chart, m0).x1);
    }

    #[test]
    fn y_domain_nices_to_a_round_step() {
        let mut chart = chart();
        // 14.5 male deaths per 100,000 people.
        let data = Dataset {
            states: vec![record("KS", "Kansas", 100_000.0, 14.5, 14.5)],
            cities: Vec::new(),
        };
        chart.render(&data);
        let y = chart.y_scale().unwrap();
        assert_eq!(y.domain_max(), 16.0);
    }

    #[test]
    fn hover_shows_rate_tooltip() {
        let mut chart = chart();
        chart.render(&dataset());
        let (m, f) = chart.bar_ids(0).unwrap();
        let center = rect(&chart, m).center();
        chart.pointer_move(&PointerEvent::at(center.x, center.y));
        let tip = &chart.canvas().tooltip;
        assert!(tip.visible);
        assert_eq!(tip.pos, center);
        assert_eq!(
            tip.lines,
            vec![
                "X".to_string(),
                "Gun Deaths:10".to_string(),
                "population:1000".to_string(),
                "Male :6".to_string(),
                "(Male):600.00Deaths per 100,000".to_string(),
            ]
        );

        let center = rect(&chart, f).center();
        chart.pointer_move(&PointerEvent::at(center.x, center.y));
        assert_eq!(chart.canvas().tooltip.lines[3], "Female :4");

        chart.pointer_move(&PointerEvent::at(1.0, 1.0));
        assert!(!chart.canvas().tooltip.visible);

        chart.pointer_move(&PointerEvent::at(center.x, center.y));
        chart.pointer_leave();
        assert!(!chart.canvas().tooltip.visible);
    }
}
