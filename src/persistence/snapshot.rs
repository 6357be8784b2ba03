use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::grid::GridConfig;
use crate::world::grid::{Grid, LayerMap};
use crate::world::tile::{Biome, LayerValue, Resource, Terrain};

/// One non-default `{index, state}` entry of a sparse layer list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerEntry {
    pub index: usize,
    pub state: String,
}

/// The three sparse layer lists of a new-format snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseLayers {
    #[serde(default)]
    pub terrain: Vec<LayerEntry>,
    #[serde(default)]
    pub biome: Vec<LayerEntry>,
    #[serde(default)]
    pub resources: Vec<LayerEntry>,
}

impl SparseLayers {
    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty() && self.biome.is_empty() && self.resources.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.terrain.len() + self.biome.len() + self.resources.len()
    }
}

/// Tile state of the single-layer schema that predates `layers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyTileState {
    Empty,
    Life,
    Resource,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTile {
    pub index: usize,
    pub state: LegacyTileState,
}

/// A stored snapshot as exchanged with the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "created_at")]
    pub created_at: String,
    #[serde(default)]
    pub config: GridConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<SparseLayers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<LegacyTile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// A snapshot before the store has assigned `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDraft {
    pub name: String,
    pub config: GridConfig,
    pub layers: SparseLayers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl SnapshotDraft {
    pub fn into_snapshot(self, id: String, created_at: String) -> Snapshot {
        Snapshot {
            id,
            name: self.name,
            created_at,
            config: self.config,
            layers: Some(self.layers),
            tiles: None,
            preview: self.preview,
        }
    }
}

/// Which schema a snapshot's tile data uses. `layers` wins when both are
/// present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerPayload<'a> {
    Layers(&'a SparseLayers),
    Legacy(&'a [LegacyTile]),
    Empty,
}

impl Snapshot {
    pub fn payload(&self) -> LayerPayload<'_> {
        match (&self.layers, &self.tiles) {
            (Some(layers), _) => LayerPayload::Layers(layers),
            (None, Some(tiles)) => LayerPayload::Legacy(tiles),
            (None, None) => LayerPayload::Empty,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Layers,
    Legacy,
    Empty,
}

/// Outcome of applying a snapshot payload to a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub format: PayloadFormat,
    pub applied: usize,
    pub skipped: usize,
}

fn encode_layer<T: LayerValue>(layer: &LayerMap<T>) -> Vec<LayerEntry> {
    layer
        .entries()
        .into_iter()
        .filter(|(_, value)| !value.is_default())
        .map(|(index, value)| LayerEntry {
            index,
            state: value.as_str().to_string(),
        })
        .collect()
}

/// Sparse layer lists for the grid's current state.
pub fn capture_layers(grid: &Grid) -> SparseLayers {
    SparseLayers {
        terrain: encode_layer(grid.terrain_layer()),
        biome: encode_layer(grid.biome_layer()),
        resources: encode_layer(grid.resource_layer()),
    }
}

pub fn capture(grid: &Grid, name: &str) -> SnapshotDraft {
    SnapshotDraft {
        name: name.to_string(),
        config: *grid.config(),
        layers: capture_layers(grid),
        preview: None,
    }
}

fn apply_entries<T, F>(
    grid: &mut Grid,
    layer: &str,
    entries: &[LayerEntry],
    report: &mut RestoreReport,
    mut set: F,
) where
    T: LayerValue,
    F: FnMut(&mut Grid, usize, T),
{
    for entry in entries {
        if !grid.contains(entry.index) {
            warn!(layer, index = entry.index, "Snapshot entry outside grid, skipping");
            report.skipped += 1;
            continue;
        }
        match entry.state.parse::<T>() {
            Ok(value) => {
                set(grid, entry.index, value);
                report.applied += 1;
            }
            Err(_) => {
                warn!(
                    layer,
                    index = entry.index,
                    state = %entry.state,
                    "Unknown layer state, skipping"
                );
                report.skipped += 1;
            }
        }
    }
}

/// Apply a decoded payload to a freshly built grid.
pub fn apply_payload(grid: &mut Grid, payload: LayerPayload<'_>) -> RestoreReport {
    let mut report = RestoreReport {
        format: PayloadFormat::Empty,
        applied: 0,
        skipped: 0,
    };

    match payload {
        LayerPayload::Layers(layers) => {
            report.format = PayloadFormat::Layers;
            apply_entries::<Terrain, _>(
                grid,
                "terrain",
                &layers.terrain,
                &mut report,
                Grid::set_terrain,
            );
            apply_entries::<Biome, _>(
                grid,
                "biome",
                &layers.biome,
                &mut report,
                Grid::set_biome,
            );
            apply_entries::<Resource, _>(
                grid,
                "resources",
                &layers.resources,
                &mut report,
                Grid::set_resource,
            );
        }
        LayerPayload::Legacy(tiles) => {
            report.format = PayloadFormat::Legacy;
            for tile in tiles {
                if !grid.contains(tile.index) {
                    report.skipped += 1;
                    continue;
                }
                match tile.state {
                    LegacyTileState::Life => {
                        grid.set_biome(tile.index, Biome::Forest);
                        report.applied += 1;
                    }
                    LegacyTileState::Resource => {
                        grid.set_resource(tile.index, Resource::Node);
                        report.applied += 1;
                    }
                    LegacyTileState::Empty | LegacyTileState::Unknown => report.skipped += 1,
                }
            }
        }
        LayerPayload::Empty => {}
    }

    debug!(
        format = ?report.format,
        applied = report.applied,
        skipped = report.skipped,
        "Applied snapshot payload"
    );
    report
}

/// Build a grid from the snapshot's config and apply its tile data.
pub fn restore_grid(snapshot: &Snapshot, seed: Option<u32>) -> (Grid, RestoreReport) {
    let mut grid = Grid::build(snapshot.config, seed);
    let report = apply_payload(&mut grid, snapshot.payload());
    (grid, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn painted_grid() -> Grid {
        let mut grid = Grid::build(GridConfig::new(1.0, 6, 4, 0.2), Some(11));
        grid.set_terrain(0, Terrain::Water);
        grid.set_terrain(9, Terrain::Mountain);
        grid.set_biome(9, Biome::Tundra);
        grid.set_biome(20, Biome::Desert);
        grid.set_resource(3, Resource::Node);
        grid
    }

    fn as_set(entries: &[LayerEntry]) -> HashSet<LayerEntry> {
        entries.iter().cloned().collect()
    }

    fn stored(draft: SnapshotDraft) -> Snapshot {
        draft.into_snapshot("id-1".to_string(), "2026-01-01T00:00:00Z".to_string())
    }

    #[test]
    fn capture_is_sparse() {
        let layers = capture_layers(&painted_grid());
        assert_eq!(layers.terrain.len(), 2);
        assert_eq!(layers.biome.len(), 2);
        assert_eq!(layers.resources.len(), 1);
        assert_eq!(layers.resources[0], LayerEntry { index: 3, state: "node".into() });
        assert!(layers.terrain.iter().all(|e| e.state != "plain"));
    }

    #[test]
    fn fresh_grid_captures_nothing() {
        let grid = Grid::build(GridConfig::default(), None);
        assert!(capture_layers(&grid).is_empty());
    }

    #[test]
    fn snapshot_restore_snapshot_round_trip() {
        let original = capture(&painted_grid(), "round trip");
        let json = serde_json::to_string(&stored(original.clone())).unwrap();
        let decoded = Snapshot::from_json(&json).unwrap();

        let (restored, report) = restore_grid(&decoded, None);
        assert_eq!(report.format, PayloadFormat::Layers);
        assert_eq!(report.applied, 5);
        assert_eq!(report.skipped, 0);

        let again = capture(&restored, "round trip");
        assert_eq!(again.config, original.config);
        assert_eq!(as_set(&again.layers.terrain), as_set(&original.layers.terrain));
        assert_eq!(as_set(&again.layers.biome), as_set(&original.layers.biome));
        assert_eq!(as_set(&again.layers.resources), as_set(&original.layers.resources));
    }

    #[test]
    fn legacy_life_becomes_forest() {
        let json = r#"{
            "id": "old", "name": "legacy", "createdAt": "2024-05-01T10:00:00Z",
            "config": {"radius": 1.0, "gridWidth": 4, "gridHeight": 4, "elevation": 0.2},
            "tiles": [{"index": 5, "state": "life"}]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert!(matches!(snapshot.payload(), LayerPayload::Legacy(_)));

        let (grid, report) = restore_grid(&snapshot, None);
        assert_eq!(report.format, PayloadFormat::Legacy);
        assert_eq!(grid.biome(5), Biome::Forest);
        assert_eq!(grid.resource(5), Resource::None);
        assert_eq!(grid.terrain(5), Terrain::Plain);
        assert_eq!(capture_layers(&grid).entry_count(), 1);
    }

    #[test]
    fn legacy_resource_and_unknown_states() {
        let json = r#"{
            "config": {"radius": 1.0, "gridWidth": 4, "gridHeight": 4, "elevation": 0.2},
            "tiles": [
                {"index": 1, "state": "resource"},
                {"index": 2, "state": "empty"},
                {"index": 3, "state": "volcano"}
            ]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let (grid, report) = restore_grid(&snapshot, None);
        assert_eq!(grid.resource(1), Resource::Node);
        assert_eq!(grid.state(2), Default::default());
        assert_eq!(grid.state(3), Default::default());
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn layers_win_over_legacy_tiles() {
        let json = r#"{
            "config": {"cellRadius": 1.0, "gridWidth": 2, "gridHeight": 2, "elevation": 0.2},
            "layers": {"terrain": [{"index": 4, "state": "water"}], "biome": [], "resources": []},
            "tiles": [{"index": 4, "state": "life"}]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let (grid, report) = restore_grid(&snapshot, None);
        assert_eq!(report.format, PayloadFormat::Layers);
        assert_eq!(grid.terrain(4), Terrain::Water);
        assert_eq!(grid.biome(4), Biome::None);
    }

    #[test]
    fn bad_entries_are_skipped() {
        let json = r#"{
            "config": {"cellRadius": 1.0, "gridWidth": 2, "gridHeight": 2, "elevation": 0.2},
            "layers": {
                "terrain": [{"index": 99, "state": "water"}, {"index": 1, "state": "lava"}],
                "biome": [{"index": 2, "state": "forest"}]
            }
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let (grid, report) = restore_grid(&snapshot, None);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(grid.biome(2), Biome::Forest);
        assert!(grid.terrain_layer().is_empty());
    }

    #[test]
    fn backend_payload_shape_is_accepted() {
        let json = r#"{
            "id": "abc", "created_at": "2024-05-01T10:00:00+00:00",
            "config": {"radius": 0.8, "gridWidth": 2, "gridHeight": 2, "elevation": 0.1},
            "layers": null, "tiles": null, "preview": null
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.created_at, "2024-05-01T10:00:00+00:00");
        assert_eq!(snapshot.config.cell_radius, 0.8);
        assert_eq!(snapshot.payload(), LayerPayload::Empty);
        let (grid, report) = restore_grid(&snapshot, None);
        assert_eq!(report.format, PayloadFormat::Empty);
        assert_eq!(grid.tile_count(), 9);
    }

    #[test]
    fn serialized_snapshot_uses_wire_names() {
        let value = serde_json::to_value(stored(capture(&painted_grid(), "wire"))).unwrap();
        assert_eq!(value["createdAt"], "2026-01-01T00:00:00Z");
        assert_eq!(value["config"]["cellRadius"], 1.0);
        assert!(value["layers"]["resources"].is_array());
        assert!(value.get("tiles").is_none());
        assert!(value.get("preview").is_none());
    }
}
