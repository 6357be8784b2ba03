use serde::{Deserialize, Serialize};

use crate::world::grid::Grid;
use crate::world::tile::{Biome, Layer, Resource, Terrain, TileCoord};

/// Tool available on the resource layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTool {
    #[default]
    Node,
    Erase,
}

impl ResourceTool {
    pub fn value(self) -> Resource {
        match self {
            ResourceTool::Node => Resource::Node,
            ResourceTool::Erase => Resource::None,
        }
    }
}

/// Editor-session brush parameters. None of this is persisted with tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub active_layer: Layer,
    pub terrain_tool: Terrain,
    pub biome_tool: Biome,
    pub resource_tool: ResourceTool,
    /// Chebyshev radius in grid cells; 0 paints a single tile.
    pub radius: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Brush {
            active_layer: Layer::Terrain,
            terrain_tool: Terrain::Water,
            biome_tool: Biome::Forest,
            resource_tool: ResourceTool::Node,
            radius: 0,
        }
    }
}

impl Brush {
    /// Paint the active layer's tool value on every tile within `radius`
    /// (Chebyshev, grid coordinates) of `center`.
    ///
    /// Returns the touched indices in ascending order. A center outside the
    /// grid touches nothing.
    pub fn apply(&self, grid: &mut Grid, center: usize) -> Vec<usize> {
        let Some(c) = grid.coord_of(center) else {
            return Vec::new();
        };
        let r = self.radius.min(i32::MAX as u32) as i32;
        let hw = grid.config().half_width();
        let hh = grid.config().half_height();

        let mut touched = Vec::new();
        for x in c.x.saturating_sub(r).max(-hw)..=c.x.saturating_add(r).min(hw) {
            for y in c.y.saturating_sub(r).max(-hh)..=c.y.saturating_add(r).min(hh) {
                if let Some(index) = grid.index_of(TileCoord::new(x, y)) {
                    self.paint_one(grid, index);
                    touched.push(index);
                }
            }
        }
        touched
    }

    fn paint_one(&self, grid: &mut Grid, index: usize) {
        match self.active_layer {
            Layer::Terrain => grid.set_terrain(index, self.terrain_tool),
            Layer::Biome => grid.set_biome(index, self.biome_tool),
            Layer::Resources => grid.set_resource(index, self.resource_tool.value()),
        }
    }
}
