use serde::Deserialize;
use std::path::Path;

use crate::config::ConfigError;
use crate::config::grid::GridConfig;

/// Editor and tooling settings loaded from `worldpaint.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_snapshot_directory")]
    pub snapshot_directory: String,
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: u32,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f32,
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    #[serde(default = "default_pan_speed")]
    pub pan_speed: f32,
    #[serde(default = "default_view_height")]
    pub view_height: f32,
    #[serde(default = "default_camera_height")]
    pub camera_height: f32,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    #[serde(default)]
    pub grid: GridConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_snapshot_directory() -> String {
    "./snapshots".to_string()
}
fn default_max_snapshots() -> u32 {
    20
}
fn default_min_zoom() -> f32 {
    0.25
}
fn default_max_zoom() -> f32 {
    8.0
}
fn default_initial_zoom() -> f32 {
    1.0
}
fn default_zoom_step() -> f32 {
    1.1
}
fn default_pan_speed() -> f32 {
    0.5
}
fn default_view_height() -> f32 {
    60.0
}
fn default_camera_height() -> f32 {
    100.0
}
fn default_event_capacity() -> usize {
    256
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            log_level: default_log_level(),
            log_json: false,
            snapshot_directory: default_snapshot_directory(),
            max_snapshots: default_max_snapshots(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            initial_zoom: default_initial_zoom(),
            zoom_step: default_zoom_step(),
            pan_speed: default_pan_speed(),
            view_height: default_view_height(),
            camera_height: default_camera_height(),
            event_capacity: default_event_capacity(),
            grid: GridConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Like [`EditorConfig::from_file`], but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !(self.min_zoom > 0.0) {
            errors.push(format!(
                "min_zoom must be > 0.0, got {}. Example: min_zoom = 0.25",
                self.min_zoom
            ));
        }

        if !(self.max_zoom >= self.min_zoom) {
            errors.push(format!(
                "max_zoom must be >= min_zoom ({}), got {}. Example: max_zoom = 8.0",
                self.min_zoom, self.max_zoom
            ));
        }

        if !(self.zoom_step > 1.0) {
            errors.push(format!(
                "zoom_step must be > 1.0, got {}. Example: zoom_step = 1.1",
                self.zoom_step
            ));
        }

        if !(self.pan_speed >= 0.0) {
            errors.push(format!(
                "pan_speed must be >= 0.0, got {}. Example: pan_speed = 0.5",
                self.pan_speed
            ));
        }

        if !(self.view_height > 0.0) {
            errors.push(format!(
                "view_height must be > 0.0, got {}. Example: view_height = 60.0",
                self.view_height
            ));
        }

        if !(self.camera_height > 0.0) {
            errors.push(format!(
                "camera_height must be > 0.0, got {}. Example: camera_height = 100.0",
                self.camera_height
            ));
        }

        if self.max_snapshots == 0 {
            errors.push(format!(
                "max_snapshots must be > 0, got {}. Example: max_snapshots = 20",
                self.max_snapshots
            ));
        }

        if self.event_capacity == 0 {
            errors.push(format!(
                "event_capacity must be > 0, got {}. Example: event_capacity = 256",
                self.event_capacity
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("\n")))
        }
    }
}
