pub mod carcassonne_tileset;
pub mod single_shot;
pub mod terrain_tileset;
pub mod xml_tileset;

pub use terrain_tileset::{terrain_tileset, TerrainWeights};
