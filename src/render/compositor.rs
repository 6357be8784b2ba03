use serde::{Deserialize, Serialize};

use crate::world::tile::{Biome, Resource, Terrain, TileState};

/// Linear RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `self + (target - self) * t`
    pub fn lerp(self, target: Color, t: f32) -> Color {
        Color {
            r: self.r + (target.r - self.r) * t,
            g: self.g + (target.g - self.g) * t,
            b: self.b + (target.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

pub const PLAIN: Color = Color::rgb(0.36, 0.66, 0.31);
pub const WATER: Color = Color::rgb(0.20, 0.45, 0.85);
pub const MOUNTAIN: Color = Color::rgb(0.50, 0.38, 0.26);

pub const FOREST_TINT: Color = Color::rgb(0.08, 0.36, 0.14);
pub const DESERT_TINT: Color = Color::rgb(0.93, 0.80, 0.50);
pub const TUNDRA_TINT: Color = Color::rgb(0.85, 0.90, 0.95);

pub const RESOURCE_TINT: Color = Color::rgb(1.0, 0.84, 0.0);
pub const NEUTRAL_GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
pub const HOVER_HIGHLIGHT: Color = Color::rgb(1.0, 1.0, 0.6);

const BIOME_BLEND: f32 = 0.5;
const RESOURCE_BLEND: f32 = 0.6;
const HIDDEN_TERRAIN_BLEND: f32 = 0.6;

/// Which layers currently contribute to the displayed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub terrain: bool,
    pub biome: bool,
    pub resources: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        LayerVisibility {
            terrain: true,
            biome: true,
            resources: true,
        }
    }
}

pub fn terrain_color(terrain: Terrain) -> Color {
    match terrain {
        Terrain::Plain => PLAIN,
        Terrain::Water => WATER,
        Terrain::Mountain => MOUNTAIN,
    }
}

pub fn biome_tint(biome: Biome) -> Option<Color> {
    match biome {
        Biome::None => None,
        Biome::Forest => Some(FOREST_TINT),
        Biome::Desert => Some(DESERT_TINT),
        Biome::Tundra => Some(TUNDRA_TINT),
    }
}

/// Displayed color of a tile. The steps are applied in a fixed order:
/// terrain base, biome tint, resource tint, then gray dampening when the
/// terrain layer is hidden.
pub fn compose(
    terrain: Terrain,
    biome: Biome,
    resource: Resource,
    visibility: LayerVisibility,
) -> Color {
    let mut color = terrain_color(terrain);

    if visibility.biome {
        if let Some(tint) = biome_tint(biome) {
            color = color.lerp(tint, BIOME_BLEND);
        }
    }

    if visibility.resources && resource == Resource::Node {
        color = color.lerp(RESOURCE_TINT, RESOURCE_BLEND);
    }

    if !visibility.terrain {
        color = color.lerp(NEUTRAL_GRAY, HIDDEN_TERRAIN_BLEND);
    }

    color
}

pub fn compose_state(state: TileState, visibility: LayerVisibility) -> Color {
    compose(state.terrain, state.biome, state.resource, visibility)
}
