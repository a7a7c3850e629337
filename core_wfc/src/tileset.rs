use crate::{
    direction::{Direction, DIRECTIONS},
    error::TileSetError,
    propagator::Propagator,
    superposition::MAX_TILES,
};
use serde::{Deserialize, Serialize};

/// Tile as authored: four socket labels in N, E, S, W order and a weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTile {
    pub name: String,
    pub sockets: Vec<String>,
    pub weight: f64,
}

impl BaseTile {
    pub fn new(name: &str, sockets: [&str; DIRECTIONS], weight: f64) -> Self {
        Self {
            name: name.to_string(),
            sockets: sockets.iter().map(|s| s.to_string()).collect(),
            weight,
        }
    }
}

/// One entry of the catalog. The id is the index into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileVariant {
    pub id: usize,
    pub name: String,
    pub sockets: [String; DIRECTIONS],
    pub weight: f64,
    pub rotation: usize,
}

impl TileVariant {
    pub fn socket(&self, direction: Direction) -> &str {
        &self.sockets[direction as usize]
    }
}

/// Rotates the sockets `times` quarter turns clockwise: [N, E, S, W] -> [W, N, E, S]
pub fn rotate_sockets(sockets: &[String; DIRECTIONS], times: usize) -> [String; DIRECTIONS] {
    let mut rotated = sockets.clone();
    for direction in Direction::ALL {
        rotated[direction.rotate(times) as usize] = sockets[direction as usize].clone();
    }
    rotated
}

/// Immutable tile catalog together with its adjacency table.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    variants: Vec<TileVariant>,
    weights: Vec<f64>,
    propagator: Propagator,
}

impl TileSet {
    /// Builds the catalog from base tiles plus their three rotations, dropping any
    /// rotation whose sockets equal a variant already in the catalog.
    pub fn new(base_tiles: &[BaseTile]) -> Result<Self, TileSetError> {
        Self::build(base_tiles, true)
    }

    /// Builds the catalog from the base tiles as given.
    pub fn without_rotations(base_tiles: &[BaseTile]) -> Result<Self, TileSetError> {
        Self::build(base_tiles, false)
    }

    fn build(base_tiles: &[BaseTile], rotations: bool) -> Result<Self, TileSetError> {
        if base_tiles.is_empty() {
            return Err(TileSetError::Empty);
        }

        let mut variants: Vec<TileVariant> = Vec::new();
        for tile in base_tiles {
            let sockets = validate(tile)?;

            variants.push(TileVariant {
                id: variants.len(),
                name: tile.name.clone(),
                sockets: sockets.clone(),
                weight: tile.weight,
                rotation: 0,
            });
            if !rotations {
                continue;
            }

            for times in 1..DIRECTIONS {
                let rotated = rotate_sockets(&sockets, times);
                if variants.iter().any(|existing| existing.sockets == rotated) {
                    continue;
                }
                variants.push(TileVariant {
                    id: variants.len(),
                    name: format!("{}_rot{}", tile.name, times),
                    sockets: rotated,
                    weight: tile.weight,
                    rotation: times,
                });
            }
        }

        if variants.len() > MAX_TILES {
            return Err(TileSetError::TooManyTiles {
                count: variants.len(),
                max: MAX_TILES,
            });
        }

        let weights = variants.iter().map(|v| v.weight).collect();
        let propagator = Propagator::new(&variants);
        Ok(Self {
            variants,
            weights,
            propagator,
        })
    }

    pub fn tile_count(&self) -> usize {
        self.variants.len()
    }

    pub fn variants(&self) -> &[TileVariant] {
        &self.variants
    }

    pub fn variant(&self, id: usize) -> &TileVariant {
        &self.variants[id]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    /// Looks up a variant by its name and rotation.
    pub fn find(&self, name: &str, rotation: usize) -> Option<usize> {
        self.variants
            .iter()
            .position(|v| v.name == name && v.rotation == rotation)
    }
}

fn validate(tile: &BaseTile) -> Result<[String; DIRECTIONS], TileSetError> {
    if !tile.weight.is_finite() || tile.weight <= 0.0 {
        return Err(TileSetError::NonPositiveWeight {
            name: tile.name.clone(),
            weight: tile.weight,
        });
    }
    tile.sockets
        .clone()
        .try_into()
        .map_err(|sockets: Vec<String>| TileSetError::SocketArity {
            name: tile.name.clone(),
            found: sockets.len(),
        })
}
