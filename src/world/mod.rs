pub mod brush;
pub mod generation;
pub mod grid;
pub mod tile;

pub use brush::{Brush, ResourceTool};
pub use generation::{Seed, WorldRng, randomize};
pub use grid::{Grid, LayerCounts, LayerMap};
pub use tile::{Biome, Layer, LayerValue, Resource, Terrain, TileCoord, TileState};
