use std::collections::HashMap;

use glam::Vec3;

use crate::config::grid::GridConfig;
use crate::world::generation::WorldRng;
use crate::world::tile::{Biome, LayerValue, Resource, Terrain, TileCoord, TileState};

/// Sparse index→value storage for one layer. Absent entries read as the
/// layer default and writing the default removes the entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMap<T: LayerValue> {
    entries: HashMap<usize, T>,
}

impl<T: LayerValue> LayerMap<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, index: usize) -> T {
        self.entries.get(&index).copied().unwrap_or_default()
    }

    pub fn set(&mut self, index: usize, value: T) {
        if value.is_default() {
            self.entries.remove(&index);
        } else {
            self.entries.insert(index, value);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Non-default entries sorted by index.
    pub fn entries(&self) -> Vec<(usize, T)> {
        let mut out: Vec<(usize, T)> = self.entries.iter().map(|(i, v)| (*i, *v)).collect();
        out.sort_unstable_by_key(|(i, _)| *i);
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-layer tile tallies for summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerCounts {
    pub plain: usize,
    pub water: usize,
    pub mountain: usize,
    pub forest: usize,
    pub desert: usize,
    pub tundra: usize,
    pub nodes: usize,
}

/// The editable tile grid: tile positions plus one sparse map per layer.
///
/// Tiles are enumerated x-outer, y-inner over
/// `[-⌊W/2⌋, ⌊W/2⌋] × [-⌊H/2⌋, ⌊H/2⌋]`, so a tile's index is
/// `(x + ⌊W/2⌋) * rows + (y + ⌊H/2⌋)`.
#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    positions: Vec<Vec3>,
    terrain: LayerMap<Terrain>,
    biome: LayerMap<Biome>,
    resources: LayerMap<Resource>,
    rng: WorldRng,
}

impl Grid {
    /// Build a fresh grid with every tile at layer defaults. The generator is
    /// seeded from `seed`, or from entropy when there is none.
    pub fn build(config: GridConfig, seed: Option<u32>) -> Self {
        let config = config.bounded();
        let spacing = config.spacing();
        let (hw, hh) = (config.half_width(), config.half_height());

        let mut positions = Vec::with_capacity(config.tile_count());
        for x in -hw..=hw {
            for y in -hh..=hh {
                positions.push(Vec3::new(spacing * x as f32, 0.0, spacing * y as f32));
            }
        }

        Grid {
            config,
            positions,
            terrain: LayerMap::new(),
            biome: LayerMap::new(),
            resources: LayerMap::new(),
            rng: WorldRng::from_seed(seed),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn tile_count(&self) -> usize {
        self.positions.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.positions.len()
    }

    /// Tile centre on the ground plane (y = 0).
    pub fn world_position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn coord_of(&self, index: usize) -> Option<TileCoord> {
        if !self.contains(index) {
            return None;
        }
        let rows = self.config.rows();
        let x = (index / rows) as i32 - self.config.half_width();
        let y = (index % rows) as i32 - self.config.half_height();
        Some(TileCoord::new(x, y))
    }

    pub fn index_of(&self, coord: TileCoord) -> Option<usize> {
        let (hw, hh) = (self.config.half_width(), self.config.half_height());
        if coord.x < -hw || coord.x > hw || coord.y < -hh || coord.y > hh {
            return None;
        }
        let col = (coord.x + hw) as usize;
        let row = (coord.y + hh) as usize;
        Some(col * self.config.rows() + row)
    }

    pub fn terrain(&self, index: usize) -> Terrain {
        self.terrain.get(index)
    }

    pub fn biome(&self, index: usize) -> Biome {
        self.biome.get(index)
    }

    pub fn resource(&self, index: usize) -> Resource {
        self.resources.get(index)
    }

    pub fn state(&self, index: usize) -> TileState {
        TileState {
            terrain: self.terrain(index),
            biome: self.biome(index),
            resource: self.resource(index),
        }
    }

    // Setters ignore indices outside the grid.

    pub fn set_terrain(&mut self, index: usize, value: Terrain) {
        if self.contains(index) {
            self.terrain.set(index, value);
        }
    }

    pub fn set_biome(&mut self, index: usize, value: Biome) {
        if self.contains(index) {
            self.biome.set(index, value);
        }
    }

    pub fn set_resource(&mut self, index: usize, value: Resource) {
        if self.contains(index) {
            self.resources.set(index, value);
        }
    }

    pub fn terrain_layer(&self) -> &LayerMap<Terrain> {
        &self.terrain
    }

    pub fn biome_layer(&self) -> &LayerMap<Biome> {
        &self.biome
    }

    pub fn resource_layer(&self) -> &LayerMap<Resource> {
        &self.resources
    }

    /// Reset every layer to defaults, keeping the tile list.
    pub fn clear_layers(&mut self) {
        self.terrain.clear();
        self.biome.clear();
        self.resources.clear();
    }

    pub fn rng_mut(&mut self) -> &mut WorldRng {
        &mut self.rng
    }

    pub fn reseed(&mut self, seed: Option<u32>) {
        self.rng = WorldRng::from_seed(seed);
    }

    pub fn layer_counts(&self) -> LayerCounts {
        let mut counts = LayerCounts::default();
        for index in 0..self.tile_count() {
            let state = self.state(index);
            match state.terrain {
                Terrain::Plain => counts.plain += 1,
                Terrain::Water => counts.water += 1,
                Terrain::Mountain => counts.mountain += 1,
            }
            match state.biome {
                Biome::Forest => counts.forest += 1,
                Biome::Desert => counts.desert += 1,
                Biome::Tundra => counts.tundra += 1,
                Biome::None => {}
            }
            if state.resource == Resource::Node {
                counts.nodes += 1;
            }
        }
        counts
    }
}
