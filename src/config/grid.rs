use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CELL_RADIUS: f32 = 1.0;
pub const DEFAULT_GRID_WIDTH: u32 = 20;
pub const DEFAULT_GRID_HEIGHT: u32 = 20;
pub const DEFAULT_ELEVATION: f32 = 0.2;

/// Largest accepted `gridWidth` / `gridHeight`. Larger values fall back to
/// the default.
pub const MAX_GRID_EXTENT: u32 = 1000;

/// Tile centres are this many cell radii apart.
pub const SPACING_FACTOR: f32 = 2.2;

/// Dimensions and tile geometry of an editable grid.
///
/// Serialized in camelCase. Reads go through [`RawGridConfig`] so that legacy
/// payloads carrying `radius` instead of `cellRadius`, or missing fields
/// altogether, are canonicalized instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawGridConfig")]
pub struct GridConfig {
    pub cell_radius: f32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub elevation: f32,
}

/// Wire form of a grid config as found in stored snapshots.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGridConfig {
    pub cell_radius: Option<f32>,
    pub radius: Option<f32>,
    pub grid_width: Option<u32>,
    pub grid_height: Option<u32>,
    pub elevation: Option<f32>,
}

impl From<RawGridConfig> for GridConfig {
    fn from(raw: RawGridConfig) -> Self {
        GridConfig::canonicalize(raw)
    }
}

fn bounded_extent(field: &str, value: Option<u32>, default: u32) -> u32 {
    match value {
        Some(v) if v > MAX_GRID_EXTENT => {
            warn!(
                field,
                value = v,
                max = MAX_GRID_EXTENT,
                "Grid extent too large, using default"
            );
            default
        }
        Some(v) => v,
        None => default,
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            cell_radius: DEFAULT_CELL_RADIUS,
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            elevation: DEFAULT_ELEVATION,
        }
    }
}

impl GridConfig {
    pub fn new(cell_radius: f32, grid_width: u32, grid_height: u32, elevation: f32) -> Self {
        GridConfig::canonicalize(RawGridConfig {
            cell_radius: Some(cell_radius),
            radius: None,
            grid_width: Some(grid_width),
            grid_height: Some(grid_height),
            elevation: Some(elevation),
        })
    }

    /// `cellRadius` wins over the legacy `radius`; anything missing or out of
    /// range falls back to the default.
    pub fn canonicalize(raw: RawGridConfig) -> Self {
        let cell_radius = raw
            .cell_radius
            .or(raw.radius)
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(DEFAULT_CELL_RADIUS);
        let elevation = raw
            .elevation
            .filter(|e| e.is_finite() && *e >= 0.0)
            .unwrap_or(DEFAULT_ELEVATION);

        GridConfig {
            cell_radius,
            grid_width: bounded_extent("gridWidth", raw.grid_width, DEFAULT_GRID_WIDTH),
            grid_height: bounded_extent("gridHeight", raw.grid_height, DEFAULT_GRID_HEIGHT),
            elevation,
        }
    }

    /// Same config with oversized extents replaced by their defaults. Covers
    /// configs built field by field rather than deserialized.
    pub fn bounded(self) -> Self {
        GridConfig {
            grid_width: bounded_extent("gridWidth", Some(self.grid_width), DEFAULT_GRID_WIDTH),
            grid_height: bounded_extent("gridHeight", Some(self.grid_height), DEFAULT_GRID_HEIGHT),
            ..self
        }
    }

    /// Distance between neighbouring tile centres in world units.
    pub fn spacing(&self) -> f32 {
        SPACING_FACTOR * self.cell_radius
    }

    pub fn half_width(&self) -> i32 {
        (self.grid_width / 2) as i32
    }

    pub fn half_height(&self) -> i32 {
        (self.grid_height / 2) as i32
    }

    /// Number of tile columns (x values).
    pub fn columns(&self) -> usize {
        2 * self.half_width() as usize + 1
    }

    /// Number of tile rows (y values).
    pub fn rows(&self) -> usize {
        2 * self.half_height() as usize + 1
    }

    /// (2·⌊W/2⌋+1)·(2·⌊H/2⌋+1)
    pub fn tile_count(&self) -> usize {
        self.columns() * self.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_count_uses_odd_extents() {
        assert_eq!(GridConfig::new(1.0, 2, 2, 0.0).tile_count(), 9);
        assert_eq!(GridConfig::new(1.0, 3, 3, 0.0).tile_count(), 9);
        assert_eq!(GridConfig::new(1.0, 4, 1, 0.0).tile_count(), 5);
        assert_eq!(GridConfig::new(1.0, 0, 0, 0.0).tile_count(), 1);
        assert_eq!(GridConfig::new(1.0, 20, 10, 0.0).tile_count(), 21 * 11);
    }

    #[test]
    fn legacy_radius_alias_is_canonicalized() {
        let json = r#"{"radius": 1.5, "gridWidth": 4, "gridHeight": 6, "elevation": 0.3}"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.cell_radius, 1.5);
        assert_eq!(config.grid_width, 4);
        assert_eq!(config.grid_height, 6);

        let out = serde_json::to_value(config).unwrap();
        assert_eq!(out["cellRadius"], 1.5);
        assert!(out.get("radius").is_none());
    }

    #[test]
    fn cell_radius_wins_over_radius() {
        let json = r#"{"radius": 1.5, "cellRadius": 0.5}"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.cell_radius, 0.5);
    }

    #[test]
    fn missing_fields_default() {
        let config: GridConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn oversized_extents_fall_back_to_default() {
        let json = r#"{"cellRadius": 1.0, "gridWidth": 4294967295, "gridHeight": 100000}"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid_width, DEFAULT_GRID_WIDTH);
        assert_eq!(config.grid_height, DEFAULT_GRID_HEIGHT);

        let at_limit = GridConfig::new(1.0, MAX_GRID_EXTENT, 2, 0.2);
        assert_eq!(at_limit.grid_width, MAX_GRID_EXTENT);

        let literal = GridConfig {
            grid_width: u32::MAX,
            ..GridConfig::default()
        };
        assert_eq!(literal.bounded().grid_width, DEFAULT_GRID_WIDTH);
    }

    #[test]
    fn invalid_radius_falls_back_to_default() {
        let config = GridConfig::new(-2.0, 4, 4, f32::NAN);
        assert_eq!(config.cell_radius, DEFAULT_CELL_RADIUS);
        assert_eq!(config.elevation, DEFAULT_ELEVATION);
    }

    #[test]
    fn spacing_scales_with_radius() {
        let config = GridConfig::new(2.0, 4, 4, 0.0);
        assert!((config.spacing() - 4.4).abs() < 1e-6);
    }
}
