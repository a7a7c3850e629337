//! Loads a tile catalog from XML:
//!
//! ```xml
//! <set rotations="true">
//!   <tiles>
//!     <tile name="Water" weight="4" north="W" east="W" south="W" west="W"/>
//!   </tiles>
//! </set>
//! ```

use anyhow::{Context, Result};
use core_wfc::{BaseTile, TileSet};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

pub fn load(path: impl AsRef<Path>) -> Result<TileSet> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tile catalog {}", path.display()))?;
    let tileset = parse(&xml).with_context(|| format!("Invalid tile catalog {}", path.display()))?;
    info!(
        "Loaded {} tile variants from {}",
        tileset.tile_count(),
        path.display()
    );
    Ok(tileset)
}

pub fn parse(xml: &str) -> Result<TileSet> {
    let config: Config = serde_xml_rs::from_str(xml)?;

    let base_tiles: Vec<BaseTile> = config
        .tiles
        .tile
        .into_iter()
        .map(|tile| BaseTile {
            name: tile.name,
            sockets: vec![tile.north, tile.east, tile.south, tile.west],
            weight: tile.weight,
        })
        .collect();

    let tileset = if config.rotations {
        TileSet::new(&base_tiles)?
    } else {
        TileSet::without_rotations(&base_tiles)?
    };
    Ok(tileset)
}

fn default_rotations() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename = "set")]
struct Config {
    #[serde(default = "default_rotations")]
    rotations: bool,
    tiles: Tiles,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Tiles {
    #[serde(default)]
    tile: Vec<Tile>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Tile {
    name: String,
    #[serde(default = "default_weight")]
    weight: f64,
    north: String,
    east: String,
    south: String,
    west: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_wfc::TileSetError;

    #[test]
    fn parses_sockets_and_rotations() {
        let xml = r#"
            <set>
                <tiles>
                    <tile name="Water" weight="4" north="W" east="W" south="W" west="W"/>
                    <tile name="Shore" north="W" east="S" south="G" west="S"/>
                </tiles>
            </set>
        "#;
        let tileset = parse(xml).unwrap();
        assert_eq!(tileset.tile_count(), 5);
        assert_eq!(tileset.weights()[0], 4.0);
        let shore = tileset.find("Shore_rot2", 2).unwrap();
        assert_eq!(tileset.variant(shore).sockets, ["G", "S", "W", "S"]);
    }

    #[test]
    fn rotations_can_be_disabled() {
        let xml = r#"
            <set rotations="false">
                <tiles>
                    <tile name="Shore" north="W" east="S" south="G" west="S"/>
                </tiles>
            </set>
        "#;
        assert_eq!(parse(xml).unwrap().tile_count(), 1);
    }

    #[test]
    fn invalid_weight_is_rejected() {
        let xml = r#"
            <set>
                <tiles>
                    <tile name="Bad" weight="0" north="A" east="A" south="A" west="A"/>
                </tiles>
            </set>
        "#;
        let error = parse(xml).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<TileSetError>(),
            Some(TileSetError::NonPositiveWeight { .. })
        ));
    }

    #[test]
    fn bundled_catalog_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/terrain.xml");
        let tileset = load(path).unwrap();
        assert_eq!(tileset.tile_count(), 26);
    }
}
