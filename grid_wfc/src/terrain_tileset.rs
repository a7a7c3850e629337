//! Terrain catalog: deep water through mountains, plus corner pieces joining
//! neighbouring biomes.

use core_wfc::{BaseTile, TileSet, TileSetError, TileVariant};
use serde::{Deserialize, Serialize};

/// Relative weights of the main biomes. Transition tiles always weigh 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainWeights {
    pub water: f64,
    pub land: f64,
    pub forest: f64,
    pub mountain: f64,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            water: 4.0,
            land: 20.0,
            forest: 6.0,
            mountain: 3.0,
        }
    }
}

pub fn terrain_tiles(weights: &TerrainWeights) -> Vec<BaseTile> {
    vec![
        BaseTile::new("Deep", ["D", "D", "D", "D"], 1.0),
        BaseTile::new("Water", ["W", "W", "W", "W"], weights.water),
        BaseTile::new("Sand", ["S", "S", "S", "S"], 3.0),
        BaseTile::new("Grass", ["G", "G", "G", "G"], weights.land),
        BaseTile::new("Forest", ["F", "F", "F", "F"], weights.forest),
        BaseTile::new("Mountain", ["M", "M", "M", "M"], weights.mountain),
        // transitions
        BaseTile::new("Deep_Water_Corner", ["D", "D", "W", "W"], 1.0),
        BaseTile::new("Water_Sand_Corner", ["W", "W", "S", "S"], 1.0),
        BaseTile::new("Sand_Grass_Corner", ["S", "S", "G", "G"], 1.0),
        BaseTile::new("Grass_Forest_Corner", ["G", "G", "F", "F"], 1.0),
        BaseTile::new("Mountain_Grass_Corner", ["M", "M", "G", "G"], 1.0),
    ]
}

/// Builds the terrain catalog with all distinct rotations.
pub fn terrain_tileset(weights: &TerrainWeights) -> Result<TileSet, TileSetError> {
    TileSet::new(&terrain_tiles(weights))
}

/// Character used when printing a variant of the terrain catalog.
pub fn glyph(variant: &TileVariant) -> char {
    let base = variant.name.split("_rot").next().unwrap_or(&variant.name);
    match base {
        "Deep" => '~',
        "Water" => '-',
        "Sand" => '.',
        "Grass" => '"',
        "Forest" => '^',
        "Mountain" => 'A',
        name if name.ends_with("_Corner") => '+',
        _ => '?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_are_deduplicated() {
        let tileset = terrain_tileset(&TerrainWeights::default()).unwrap();
        // six symmetric biomes plus four rotations of each corner
        assert_eq!(tileset.tile_count(), 6 + 5 * 4);
        assert_eq!(tileset.find("Grass", 0), Some(3));
        assert!(tileset.find("Grass_rot1", 1).is_none());
        assert!(tileset.find("Sand_Grass_Corner_rot2", 2).is_some());
    }

    #[test]
    fn weights_are_applied() {
        let weights = TerrainWeights {
            land: 50.0,
            ..Default::default()
        };
        let tileset = terrain_tileset(&weights).unwrap();
        let grass = tileset.find("Grass", 0).unwrap();
        assert_eq!(tileset.weights()[grass], 50.0);
    }

    #[test]
    fn zero_weight_is_rejected() {
        let weights = TerrainWeights {
            forest: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            terrain_tileset(&weights),
            Err(TileSetError::NonPositiveWeight { .. })
        ));
    }

    #[test]
    fn glyphs_follow_base_names() {
        let tileset = terrain_tileset(&TerrainWeights::default()).unwrap();
        let corner = tileset.find("Deep_Water_Corner_rot3", 3).unwrap();
        assert_eq!(glyph(tileset.variant(corner)), '+');
        assert_eq!(glyph(tileset.variant(0)), '~');
    }
}
