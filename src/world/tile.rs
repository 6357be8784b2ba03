use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// === Layer values ===

/// A value stored in one of the sparse tile layers.
///
/// Every layer has a default that is implied for any tile without an entry,
/// and a stable lowercase name used on the wire.
pub trait LayerValue: Copy + Eq + Default + fmt::Debug + FromStr {
    fn as_str(self) -> &'static str;

    fn is_default(self) -> bool {
        self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    #[default]
    Plain,
    Water,
    Mountain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    #[default]
    None,
    Forest,
    Desert,
    Tundra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    #[default]
    None,
    Node,
}

/// Returned when a layer state name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl fmt::Display for UnknownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown layer state '{}'", self.0)
    }
}

impl std::error::Error for UnknownState {}

macro_rules! layer_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];
        }

        impl LayerValue for $ty {
            fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = UnknownState;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(UnknownState(other.to_string())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

layer_names!(Terrain { Plain => "plain", Water => "water", Mountain => "mountain" });
layer_names!(Biome { None => "none", Forest => "forest", Desert => "desert", Tundra => "tundra" });
layer_names!(Resource { None => "none", Node => "node" });

/// The three editable layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Terrain,
    Biome,
    Resources,
}

// === Coordinates ===

/// Integer grid coordinate. The grid is centred on (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: max(|dx|, |dy|).
    pub fn chebyshev(self, other: TileCoord) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// === Tile state ===

/// Resolved state of one tile across all layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileState {
    pub terrain: Terrain,
    pub biome: Biome,
    pub resource: Resource,
}
