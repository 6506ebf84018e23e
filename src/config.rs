//! Run settings for the re-hosting pipeline.
//!
//! Lengths are document units (feet) unless the field name ends in `_mm`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::math::from_mm;

/// Errors raised while loading a [`HostingConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Names of the scalar footprint parameters on opening instances.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    pub width: String,
    pub height: String,
    pub depth: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            width: "CSC-MEP-Width".into(),
            height: "CSC-MEP-Height".into(),
            depth: "CSC-MEP-Depth".into(),
        }
    }
}

/// How the host-face locator chooses between several intersecting slabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabSelection {
    /// Stop at the first slab (ascending id) that yields a horizontal face.
    #[default]
    FirstIntersecting,
    /// Compare horizontal faces across every intersecting slab.
    GlobalNearest,
}

/// Settings for one re-hosting run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    /// Substring a candidate's family name must contain.
    pub family_filter: String,
    /// Name of the grid used as the X reference line.
    pub grid_x: String,
    /// Name of the grid used as the Y reference line.
    pub grid_y: String,
    pub parameters: ParameterNames,
    /// PRE/POST distance tolerance.
    pub tolerance_mm: f64,
    /// Total width/height reduction applied to the probe.
    pub shrink_mm: f64,
    /// Per-side expansion of the probe's box for the slab search.
    pub search_margin: f64,
    /// Lower clamp for probe width and height.
    pub min_probe_extent: f64,
    /// Placed depth as a multiple of slab thickness.
    pub depth_factor: f64,
    /// Minimum `|normal.z|` of a hosting face.
    pub horizontal_threshold: f64,
    /// In-plane corrections at or below this length are not applied.
    pub snap_threshold: f64,
    pub slab_selection: SlabSelection,
    /// Where the run log is written; `None` keeps it in memory only.
    pub log_path: Option<PathBuf>,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            family_filter: "GEN-CSC-Opening-Rectangular".into(),
            grid_x: "13".into(),
            grid_y: "AA".into(),
            parameters: ParameterNames::default(),
            tolerance_mm: 20.0,
            shrink_mm: 50.0,
            search_margin: 0.1,
            min_probe_extent: 0.1,
            depth_factor: 1.1,
            horizontal_threshold: 0.95,
            snap_threshold: 1e-6,
            slab_selection: SlabSelection::default(),
            log_path: None,
        }
    }
}

impl HostingConfig {
    /// Loads settings from a JSON file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overridden from `OPENING_HOST_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `OPENING_HOST_LOG_PATH`, `OPENING_HOST_GRID_X`,
    /// `OPENING_HOST_GRID_Y` and `OPENING_HOST_FAMILY` when set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("OPENING_HOST_LOG_PATH") {
            self.log_path = Some(PathBuf::from(path));
        }
        if let Some(name) = lookup("OPENING_HOST_GRID_X") {
            self.grid_x = name;
        }
        if let Some(name) = lookup("OPENING_HOST_GRID_Y") {
            self.grid_y = name;
        }
        if let Some(family) = lookup("OPENING_HOST_FAMILY") {
            self.family_filter = family;
        }
        self
    }

    /// Distance tolerance in document units.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        from_mm(self.tolerance_mm)
    }

    /// Probe shrink in document units, both sides combined.
    #[must_use]
    pub fn shrink(&self) -> f64 {
        from_mm(self.shrink_mm)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_the_documented_constants() {
        let config = HostingConfig::default();
        assert_eq!(config.grid_x, "13");
        assert_eq!(config.grid_y, "AA");
        assert_eq!(config.parameters.depth, "CSC-MEP-Depth");
        assert_relative_eq!(config.tolerance(), 20.0 / 304.8);
        assert_relative_eq!(config.shrink(), 50.0 / 304.8);
        assert_eq!(config.slab_selection, SlabSelection::FirstIntersecting);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: HostingConfig = serde_json::from_str(
            r#"{ "grid_x": "A1", "slab_selection": "global_nearest", "parameters": { "width": "W" } }"#,
        )
        .unwrap();
        assert_eq!(config.grid_x, "A1");
        assert_eq!(config.grid_y, "AA");
        assert_eq!(config.slab_selection, SlabSelection::GlobalNearest);
        assert_eq!(config.parameters.width, "W");
        assert_eq!(config.parameters.height, "CSC-MEP-Height");
    }

    #[test]
    fn overrides_replace_only_present_keys() {
        let config = HostingConfig::default().with_overrides(|key| match key {
            "OPENING_HOST_GRID_Y" => Some("B".into()),
            "OPENING_HOST_LOG_PATH" => Some("/tmp/rehost.log".into()),
            _ => None,
        });
        assert_eq!(config.grid_x, "13");
        assert_eq!(config.grid_y, "B");
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/rehost.log")));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = HostingConfig::from_json_file("/nonexistent/opening-host.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
