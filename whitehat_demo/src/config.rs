// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Demo settings, read from TOML. Every field is optional.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct DemoConfig {
    pub(crate) input: InputConfig,
    pub(crate) output: OutputConfig,
    pub(crate) bar_chart: CanvasConfig,
    pub(crate) map: CanvasConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct InputConfig {
    /// Dataset JSON.
    pub(crate) data: PathBuf,
    /// States GeoJSON.
    pub(crate) map: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct OutputConfig {
    pub(crate) path: PathBuf,
    pub(crate) title: String,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub(crate) struct CanvasConfig {
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            bar_chart: CanvasConfig {
                width: 960.0,
                height: 500.0,
            },
            map: CanvasConfig {
                width: 960.0,
                height: 600.0,
            },
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        Self {
            data: data_dir.join("sample_dataset.json"),
            map: data_dir.join("sample_states.geojson"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("whitehat_report.html"),
            title: "Gun deaths by state".to_string(),
        }
    }
}

impl InputConfig {
    fn resolve_against(&mut self, dir: &Path) {
        for path in [&mut self.data, &mut self.map] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

impl DemoConfig {
    /// Reads a TOML file. Relative input paths are taken from the file's directory; the
    /// output path stays relative to the working directory.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            config.input.resolve_against(dir);
        }
        Ok(config)
    }

    pub(crate) fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = DemoConfig::from_toml_str(
            r#"
            [output]
            path = "out/report.html"

            [map]
            width = 1200
            height = 700
            "#,
        )
        .unwrap();
        let defaults = DemoConfig::default();
        assert_eq!(config.output.path, PathBuf::from("out/report.html"));
        assert_eq!(config.output.title, defaults.output.title);
        assert_eq!(config.map.width, 1200.0);
        assert_eq!(config.bar_chart, defaults.bar_chart);
        assert_eq!(config.input, defaults.input);
    }

    #[test]
    fn input_paths_are_relative_to_the_config_file() {
        let name = format!("whitehat_demo_config_{}", std::process::id());
        let dir = std::env::temp_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("demo.toml");
        fs::write(
            &path,
            "[input]\ndata = \"data/sample.json\"\n\n[output]\npath = \"report.html\"\n",
        )
        .unwrap();

        let config = DemoConfig::load_from_file(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(config.input.data, dir.join("data/sample.json"));
        // Defaults are already absolute.
        assert_eq!(config.input.map, InputConfig::default().map);
        assert_eq!(config.output.path, PathBuf::from("report.html"));
    }

    #[test]
    fn bad_toml_is_reported() {
        let err = DemoConfig::from_toml_str("[map]\nwidth = \"wide\"").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
