use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::world::grid::Grid;
use crate::world::tile::{Biome, Resource, Terrain};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a 32-bit hash of a string's UTF-8 bytes.
pub fn fnv1a_32(text: &str) -> u32 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

/// A generation seed as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    Number(i64),
    Text(String),
}

impl Seed {
    /// Interpret free-form input: integers are numeric seeds, any other
    /// non-blank text is hashed. Blank input means "no seed".
    pub fn parse(input: &str) -> Option<Seed> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<i64>() {
            Ok(n) => Some(Seed::Number(n)),
            Err(_) => Some(Seed::Text(trimmed.to_string())),
        }
    }

    /// 32-bit generator state for this seed.
    pub fn state(&self) -> u32 {
        match self {
            Seed::Number(n) => *n as u32,
            Seed::Text(text) => fnv1a_32(text),
        }
    }
}

/// Small 32-bit state generator (mulberry32 mixing).
///
/// The whole output sequence is reproducible from the initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform value in [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

/// Value stream feeding world generation. Seeded streams are reproducible;
/// unseeded ones draw their state from OS entropy.
#[derive(Debug, Clone)]
pub enum WorldRng {
    Seeded(Mulberry32),
    Entropy(ChaCha8Rng),
}

impl WorldRng {
    pub fn from_seed(seed: Option<u32>) -> Self {
        match seed {
            Some(state) => WorldRng::Seeded(Mulberry32::new(state)),
            None => WorldRng::Entropy(ChaCha8Rng::from_entropy()),
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, WorldRng::Seeded(_))
    }

    /// Uniform value in [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        match self {
            WorldRng::Seeded(rng) => rng.next_unit(),
            WorldRng::Entropy(rng) => rng.r#gen::<f64>(),
        }
    }
}

pub fn classify_terrain(v: f64) -> Terrain {
    if v < 0.08 {
        Terrain::Water
    } else if v < 0.14 {
        Terrain::Mountain
    } else {
        Terrain::Plain
    }
}

pub fn classify_biome(v: f64) -> Biome {
    if v < 0.10 {
        Biome::Forest
    } else if v < 0.14 {
        Biome::Tundra
    } else if v < 0.18 {
        Biome::Desert
    } else {
        Biome::None
    }
}

pub fn classify_resource(v: f64) -> Resource {
    if v < 0.05 {
        Resource::Node
    } else {
        Resource::None
    }
}

/// Assign every layer of every tile from the grid's own stream.
///
/// Draw order per tile is terrain, biome, resource. Changing it changes what
/// existing seeds produce.
pub fn randomize(grid: &mut Grid) {
    let count = grid.tile_count();
    for index in 0..count {
        let terrain = classify_terrain(grid.rng_mut().next_unit());
        let biome = classify_biome(grid.rng_mut().next_unit());
        let resource = classify_resource(grid.rng_mut().next_unit());
        grid.set_terrain(index, terrain);
        grid.set_biome(index, biome);
        grid.set_resource(index, resource);
    }
    debug!(tiles = count, seeded = grid.rng_mut().is_seeded(), "Randomized grid");
}
