use core_wfc::{BaseTile, TileSet, TileSetError};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum TileEdgeType {
    Grass,
    Road,
    City,
    River,
}

impl TileEdgeType {
    fn socket(&self) -> &'static str {
        match self {
            TileEdgeType::Grass => "grass",
            TileEdgeType::Road => "road",
            TileEdgeType::City => "city",
            TileEdgeType::River => "river",
        }
    }
}

/// Edge types of the Carcassonne base game and river expansion, in N, E, S, W order.
pub fn carcassonne_tiles() -> Vec<BaseTile> {
    type T = TileEdgeType;

    let tile_edge_types = [
        [T::Grass, T::Road, T::Road, T::Grass],
        [T::City, T::Road, T::City, T::City],
        [T::City, T::Grass, T::City, T::Grass],
        [T::City, T::Road, T::City, T::Road],
        [T::Grass, T::Grass, T::City, T::City],
        [T::City, T::City, T::Grass, T::Grass],
        [T::City, T::Grass, T::Grass, T::Grass],
        [T::City, T::Road, T::Road, T::Grass],
        [T::City, T::Road, T::Grass, T::Road],
        [T::City, T::Road, T::Road, T::Road],
        [T::City, T::Grass, T::Road, T::Road],
        [T::Road, T::Road, T::Grass, T::Grass],
        [T::Grass, T::Road, T::Road, T::Road],
        [T::Grass, T::Grass, T::Grass, T::Grass],
        [T::Grass, T::Road, T::Grass, T::Grass],
        [T::City, T::City, T::City, T::City],
        [T::City, T::Grass, T::City, T::City],
        [T::Grass, T::River, T::Grass, T::Grass],
        [T::Grass, T::River, T::Grass, T::River],
        [T::Grass, T::Road, T::River, T::River],
        [T::Road, T::River, T::River, T::Road],
        [T::River, T::River, T::Grass, T::Grass],
        [T::River, T::Grass, T::Grass, T::Grass],
        [T::River, T::River, T::Road, T::City],
        [T::City, T::City, T::River, T::River],
        [T::Road, T::Road, T::River, T::River],
        [T::River, T::City, T::River, T::City],
    ];

    tile_edge_types
        .iter()
        .enumerate()
        .map(|(index, edges)| {
            let sockets = edges.map(|edge| edge.socket());
            BaseTile::new(&format!("carcassonne_{index}"), sockets, 1.0)
        })
        .collect()
}

/// All rotations of the Carcassonne tiles, with identical edge layouts merged.
pub fn carcassonne_tileset() -> Result<TileSet, TileSetError> {
    TileSet::new(&carcassonne_tiles())
}
