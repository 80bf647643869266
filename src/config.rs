//! Configuration shared by the series store, the viewport mapper and the renderer.
//!
//! [`GraphConfig`] carries the defaults new series are created with plus a few
//! rendering constants. It can be stored as JSON next to the host application.

use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Errors raised while reading or writing a [`GraphConfig`] file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Light or dark chart background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Chart background fill.
    pub fn background(self) -> Color32 {
        match self {
            Theme::Dark => Color32::BLACK,
            Theme::Light => Color32::WHITE,
        }
    }

    /// Colour used for series that never had one assigned.
    pub fn foreground(self) -> Color32 {
        match self {
            Theme::Dark => Color32::WHITE,
            Theme::Light => Color32::BLACK,
        }
    }

    /// Cursor line and min/max label colour.
    pub fn axis(self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_white_alpha(128),
            Theme::Light => Color32::from_black_alpha(128),
        }
    }

    pub fn grid(self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_white_alpha(51),
            Theme::Light => Color32::from_black_alpha(51),
        }
    }

    /// Subtle backdrop behind hover labels.
    pub fn label_backdrop(self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_black_alpha(34),
            Theme::Light => Color32::from_white_alpha(34),
        }
    }
}

/// Defaults and rendering constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Ring buffer capacity of newly created series.
    pub capacity: usize,
    /// Minimum horizontal distance between two samples, in points.
    pub step_size: f32,
    pub line_width: f32,
    pub graph_height: f32,
    /// Minimum step applied to the per-axis children of a vector or quaternion.
    pub vector_step_size: f32,
    /// Height of the last per-axis child, which makes the whole group taller.
    pub vector_graph_height: f32,
    pub grid_size: f32,
    /// Extra height below the chart that still counts as scrollbar territory.
    pub scrollbar_margin: f32,
    pub scrollbar_height: f32,
    /// Decimal places of hover and min/max labels.
    pub label_precision: usize,
    pub theme: Theme,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            step_size: 5.0,
            line_width: 1.5,
            graph_height: 50.0,
            vector_step_size: 0.5,
            vector_graph_height: 65.0,
            grid_size: 10.0,
            scrollbar_margin: 30.0,
            scrollbar_height: 16.0,
            label_precision: 3,
            theme: Theme::Dark,
        }
    }
}

impl GraphConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let cfg: GraphConfig = serde_json::from_str(&text)?;
        Ok(cfg.sanitized())
    }

    /// Like [`load`](Self::load) but falls back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("using default graph config, {:?} unusable: {e}", path);
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Clamp values that would break the store or mapper invariants.
    pub fn sanitized(mut self) -> Self {
        self.capacity = self.capacity.max(1);
        self.step_size = non_negative(self.step_size);
        self.vector_step_size = non_negative(self.vector_step_size);
        self.line_width = non_negative(self.line_width);
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            self.grid_size = GraphConfig::default().grid_size;
        }
        self
    }
}

pub(crate) fn non_negative(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: GraphConfig = serde_json::from_str(r#"{ "capacity": 42 }"#).unwrap();
        assert_eq!(cfg.capacity, 42);
        assert_eq!(cfg.step_size, 5.0);
        assert_eq!(cfg.theme, Theme::Dark);
    }

    #[test]
    fn sanitize_clamps_capacity_and_grid() {
        let cfg = GraphConfig {
            capacity: 0,
            grid_size: 0.0,
            step_size: -3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.capacity, 1);
        assert_eq!(cfg.grid_size, 10.0);
        assert_eq!(cfg.step_size, 0.0);
    }

    #[test]
    fn save_then_load_file() {
        let path = std::env::temp_dir().join(format!("livegraph_cfg_{}.json", std::process::id()));
        let cfg = GraphConfig {
            capacity: 250,
            theme: Theme::Light,
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        let loaded = GraphConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let cfg = GraphConfig::load_or_default("/definitely/not/here/livegraph.json");
        assert_eq!(cfg, GraphConfig::default());
        assert!(matches!(
            GraphConfig::load("/definitely/not/here/livegraph.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
