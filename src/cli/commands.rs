use std::path::Path;
use tracing::info;

use crate::config::EditorConfig;
use crate::interaction::Editor;
use crate::persistence::preview::{render_image, render_preview};
use crate::persistence::{FileSnapshotStore, Snapshot, SnapshotStore};
use crate::render::LayerVisibility;
use crate::world::grid::Grid;
use crate::world::tile::TileCoord;

/// Pixels per tile for previews embedded in snapshots.
const EMBEDDED_PREVIEW_SCALE: u32 = 4;

fn store_for(config: &EditorConfig) -> FileSnapshotStore {
    FileSnapshotStore::new(&config.snapshot_directory)
}

/// Load a snapshot by id, or the newest one when no id is given.
fn load_snapshot(store: &FileSnapshotStore, id: Option<&str>) -> Result<Snapshot, String> {
    let found = match id {
        Some(id) => store.load(id),
        None => store.latest(),
    }
    .map_err(|e| format!("Failed to load snapshot: {}", e))?;

    found.ok_or_else(|| match id {
        Some(id) => format!("Snapshot {} not found in {}", id, store.dir().display()),
        None => format!(
            "No snapshots found in {}. Generate a world with: worldpaint generate",
            store.dir().display()
        ),
    })
}

fn restored_editor(config: &EditorConfig, snapshot: &Snapshot) -> Editor {
    let mut editor = Editor::new(config.clone());
    let report = editor.restore(&snapshot.name, snapshot);
    if report.skipped > 0 {
        eprintln!(
            "Warning: {} snapshot entries could not be applied",
            report.skipped
        );
    }
    editor
}

/// Build a grid from config, randomize it from `seed`, and store it.
pub fn generate(
    config: &EditorConfig,
    seed: Option<&str>,
    name: &str,
    with_preview: bool,
) -> Result<(), String> {
    let mut editor = Editor::new(config.clone());
    editor.set_seed_input(seed.unwrap_or(""));
    editor.build_grid(config.grid);
    editor.randomize();

    let grid = editor
        .grid()
        .ok_or_else(|| "Grid was not built".to_string())?;
    let mut draft = editor
        .snapshot(name)
        .ok_or_else(|| "Grid was not built".to_string())?;
    if with_preview {
        draft.preview = Some(
            render_preview(grid, editor.visibility(), EMBEDDED_PREVIEW_SCALE)
                .map_err(|e| format!("Cannot render preview: {}", e))?,
        );
    }

    print_grid_summary(grid);

    let mut store = store_for(config);
    let saved = store
        .save(draft)
        .map_err(|e| format!("Cannot save snapshot: {}", e))?;
    println!("\nSnapshot {} saved to {}", saved.id, store.dir().display());
    info!(id = %saved.id, name = %saved.name, "Generated world");

    let pruned = store
        .prune(config.max_snapshots as usize)
        .map_err(|e| format!("Snapshot pruning failed: {}", e))?;
    if !pruned.is_empty() {
        println!("Pruned {} old snapshot(s)", pruned.len());
    }
    Ok(())
}

/// Print one tile or the whole-grid summary of a stored snapshot.
pub fn inspect(
    config: &EditorConfig,
    id: Option<&str>,
    tile: Option<usize>,
    coord: Option<TileCoord>,
) -> Result<(), String> {
    let store = store_for(config);
    let snapshot = load_snapshot(&store, id)?;
    let editor = restored_editor(config, &snapshot);
    let grid = editor
        .grid()
        .ok_or_else(|| "Snapshot did not produce a grid".to_string())?;

    let index = match (tile, coord) {
        (Some(index), _) => Some(index),
        (None, Some(coord)) => Some(grid.index_of(coord).ok_or_else(|| {
            format!(
                "Coordinate {} is outside the grid (x in ±{}, y in ±{})",
                coord,
                grid.config().half_width(),
                grid.config().half_height()
            )
        })?),
        (None, None) => None,
    };

    match index {
        Some(index) => inspect_tile(&editor, index),
        None => {
            print_snapshot_header(&snapshot);
            print_grid_summary(grid);
            Ok(())
        }
    }
}

fn inspect_tile(editor: &Editor, index: usize) -> Result<(), String> {
    let tile_count = editor.grid().map_or(0, Grid::tile_count);
    let info = editor
        .tile_info(index)
        .ok_or_else(|| format!("Tile {} not found (grid has {} tiles)", index, tile_count))?;
    let position = editor
        .grid()
        .and_then(|g| g.world_position(index))
        .unwrap_or_default();

    println!("=== Tile {} ===", info.index);
    println!("Coordinate: {}", info.coord);
    println!("World position: ({:.2}, {:.2})", position.x, position.z);
    println!("  Terrain:  {}", info.state.terrain);
    println!("  Biome:    {}", info.state.biome);
    println!("  Resource: {}", info.state.resource);
    Ok(())
}

/// Write a PNG preview of a stored snapshot to `output`.
pub fn preview(
    config: &EditorConfig,
    id: Option<&str>,
    output: &Path,
    scale: u32,
) -> Result<(), String> {
    let store = store_for(config);
    let snapshot = load_snapshot(&store, id)?;
    let editor = restored_editor(config, &snapshot);
    let grid = editor
        .grid()
        .ok_or_else(|| "Snapshot did not produce a grid".to_string())?;

    let img = render_image(grid, LayerVisibility::default(), scale)
        .map_err(|e| format!("Cannot render preview: {}", e))?;
    img.save(output)
        .map_err(|e| format!("Cannot write {}: {}", output.display(), e))?;
    println!(
        "Preview ({}x{}) written to {}",
        img.width(),
        img.height(),
        output.display()
    );
    Ok(())
}

pub fn list_snapshots(config: &EditorConfig) -> Result<(), String> {
    let store = store_for(config);
    let snapshots = store
        .list()
        .map_err(|e| format!("Cannot list snapshots: {}", e))?;

    if snapshots.is_empty() {
        println!("No snapshots found in {}", store.dir().display());
        return Ok(());
    }

    println!(
        "{:<38} {:<24} {:<30} {:>7} {:>8}",
        "ID", "Name", "Created", "Tiles", "Entries"
    );
    println!("{}", "-".repeat(111));
    for s in &snapshots {
        let entries = s.layers.as_ref().map_or_else(
            || s.tiles.as_ref().map_or(0, Vec::len),
            |layers| layers.entry_count(),
        );
        println!(
            "{:<38} {:<24} {:<30} {:>7} {:>8}",
            s.id,
            truncate(&s.name, 24),
            s.created_at,
            s.config.tile_count(),
            entries
        );
    }
    println!("\n{} snapshot(s)", snapshots.len());
    Ok(())
}

/// Restore a snapshot into a fresh editor and print what it contains.
pub fn restore_snapshot(config: &EditorConfig, id: &str) -> Result<(), String> {
    let store = store_for(config);
    let snapshot = load_snapshot(&store, Some(id))?;
    let editor = restored_editor(config, &snapshot);
    let grid = editor
        .grid()
        .ok_or_else(|| "Snapshot did not produce a grid".to_string())?;

    print_snapshot_header(&snapshot);
    print_grid_summary(grid);
    Ok(())
}

pub fn rename_snapshot(config: &EditorConfig, id: &str, name: &str) -> Result<(), String> {
    let mut store = store_for(config);
    let renamed = store
        .rename(id, name)
        .map_err(|e| format!("Cannot rename snapshot: {}", e))?;
    println!("Snapshot {} renamed to \"{}\"", renamed.id, renamed.name);
    Ok(())
}

pub fn delete_snapshot(config: &EditorConfig, id: &str) -> Result<(), String> {
    let mut store = store_for(config);
    if store
        .load(id)
        .map_err(|e| format!("Cannot read snapshot: {}", e))?
        .is_none()
    {
        return Err(format!("Snapshot {} not found in {}", id, store.dir().display()));
    }
    store
        .delete(id)
        .map_err(|e| format!("Cannot delete snapshot: {}", e))?;
    println!("Deleted snapshot {}", id);
    Ok(())
}

pub fn prune_snapshots(config: &EditorConfig, keep: Option<usize>) -> Result<(), String> {
    let keep = keep.unwrap_or(config.max_snapshots as usize);
    let mut store = store_for(config);
    let deleted = store
        .prune(keep)
        .map_err(|e| format!("Snapshot pruning failed: {}", e))?;
    println!("Kept {} newest, deleted {}", keep, deleted.len());
    for id in &deleted {
        println!("  {}", id);
    }
    Ok(())
}

fn print_snapshot_header(snapshot: &Snapshot) {
    println!("=== Snapshot {} ===", snapshot.id);
    println!("Name: {}", snapshot.name);
    println!("Created: {}", snapshot.created_at);
    if snapshot.tiles.is_some() && snapshot.layers.is_none() {
        println!("Format: legacy tiles");
    }
    println!();
}

fn print_grid_summary(grid: &Grid) {
    let config = grid.config();
    let counts = grid.layer_counts();
    let total = grid.tile_count().max(1) as f64;
    let pct = |n: usize| n as f64 / total * 100.0;

    println!(
        "Grid: {}x{} tiles ({} total), cell radius {:.2}, elevation {:.2}",
        config.columns(),
        config.rows(),
        grid.tile_count(),
        config.cell_radius,
        config.elevation
    );
    println!("--- Terrain ---");
    println!("  Plain:    {:>6} ({:.1}%)", counts.plain, pct(counts.plain));
    println!("  Water:    {:>6} ({:.1}%)", counts.water, pct(counts.water));
    println!("  Mountain: {:>6} ({:.1}%)", counts.mountain, pct(counts.mountain));
    println!("--- Biome ---");
    println!("  Forest:   {:>6} ({:.1}%)", counts.forest, pct(counts.forest));
    println!("  Desert:   {:>6} ({:.1}%)", counts.desert, pct(counts.desert));
    println!("  Tundra:   {:>6} ({:.1}%)", counts.tundra, pct(counts.tundra));
    println!("--- Resources ---");
    println!("  Nodes:    {:>6} ({:.1}%)", counts.nodes, pct(counts.nodes));
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
