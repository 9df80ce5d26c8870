// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dataset: per-state death counts and per-city counts.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::DataError;

/// Per-state statistics.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StateRecord {
    /// State name with spaces replaced by underscores, e.g. `New_York`.
    pub state: String,
    /// Two-letter abbreviation.
    #[serde(rename = "abreviation")]
    pub abbreviation: String,
    /// Population. Accepts a JSON number or a numeric string; unparsable strings become NaN.
    #[serde(deserialize_with = "lenient_f64")]
    pub population: f64,
    /// Total firearm deaths.
    pub count: f64,
    /// Firearm deaths among men.
    pub male_count: f64,
}

impl StateRecord {
    /// Firearm deaths among women.
    pub fn female_count(&self) -> f64 {
        self.count - self.male_count
    }
}

/// Per-city death count.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CityRecord {
    /// City name.
    pub city: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Firearm deaths.
    pub count: f64,
    /// Identifier. Numbers are kept in their decimal form.
    #[serde(deserialize_with = "lenient_string")]
    pub key: String,
}

/// The full dataset handed to both views.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Dataset {
    /// One record per state.
    pub states: Vec<StateRecord>,
    /// City records; absent in some exports.
    #[serde(default)]
    pub cities: Vec<CityRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match NumberOrString::deserialize(d)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s.trim().parse().unwrap_or(f64::NAN),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match NumberOrString::deserialize(d)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::String(s) => s,
    })
}

/// Replaces every whitespace character with `_`, the form used by [`StateRecord::state`].
pub fn normalize_state_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// The human-readable form of a normalized state name.
pub fn display_name(state: &str) -> String {
    state.replace('_', " ")
}

impl Dataset {
    /// Parses a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a dataset from a JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Finds the record for a state name, normalizing whitespace first.
    pub fn find_state(&self, name: &str) -> Option<&StateRecord> {
        let name = normalize_state_name(name);
        self.states.iter().find(|s| s.state == name)
    }

    /// The state's death count, or `0` when no record matches.
    pub fn get_count(&self, name: &str) -> f64 {
        self.find_state(name).map_or(0.0, |s| s.count)
    }

    /// Population per death for the matching record; drives the map's color.
    ///
    /// A zero count yields an infinite or NaN ratio, which is left to the color scale.
    pub fn state_color_ratio(&self, name: &str) -> Option<f64> {
        self.find_state(name).map(|s| s.population / s.count)
    }

    /// `(min, max)` of the state counts, or `None` without states.
    pub fn state_count_extent(&self) -> Option<(f64, f64)> {
        extent(self.states.iter().map(|s| s.count))
    }

    /// The largest city count, or `None` without cities.
    pub fn city_count_max(&self) -> Option<f64> {
        extent(self.cities.iter().map(|c| c.count)).map(|(_, max)| max)
    }
}

/// Like `d3.extent`: ignores NaN.
fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Per-state deaths normalized to rates per 100,000 people.
#[derive(Clone, Debug, PartialEq)]
pub struct StateRates {
    /// Two-letter abbreviation; the band scale domain.
    pub abbreviation: String,
    /// Display name.
    pub name: String,
    /// Population.
    pub population: f64,
    /// Total deaths.
    pub count: f64,
    /// Deaths among men.
    pub male_deaths: f64,
    /// Deaths among women.
    pub female_deaths: f64,
    /// Male deaths per 100,000 people.
    pub male_rate: f64,
    /// Female deaths per 100,000 people.
    pub female_rate: f64,
}

impl StateRates {
    /// Derives rates from a record. A zero population yields infinite or NaN rates.
    pub fn from_record(record: &StateRecord) -> Self {
        let per_100k = |deaths: f64| deaths / record.population * 100_000.0;
        let female_deaths = record.female_count();
        Self {
            abbreviation: record.abbreviation.clone(),
            name: display_name(&record.state),
            population: record.population,
            count: record.count,
            male_deaths: record.male_count,
            female_deaths,
            male_rate: per_100k(record.male_count),
            female_rate: per_100k(female_deaths),
        }
    }

    /// The larger of the two rates, ignoring non-finite ones.
    pub fn max_rate(&self) -> Option<f64> {
        [self.male_rate, self.female_rate]
            .into_iter()
            .filter(|r| r.is_finite())
            .reduce(f64::max)
    }
}
