use thiserror::Error;

/// Reasons a tile catalog is refused at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TileSetError {
    #[error("Tile catalog is empty")]
    Empty,
    #[error("Tile {name} has a non-positive weight ({weight})")]
    NonPositiveWeight { name: String, weight: f64 },
    #[error("Tile {name} has {found} sockets, expected 4")]
    SocketArity { name: String, found: usize },
    #[error("Catalog expands to {count} variants, at most {max} are supported")]
    TooManyTiles { count: usize, max: usize },
}

/// Errors surfaced by the solver outside of the search itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WfcError {
    #[error("Invalid tile catalog: {0}")]
    TileSet(#[from] TileSetError),
    #[error("Grid dimension must be positive")]
    EmptyGrid,
    #[error("Cell {0} is not collapsed")]
    Uncollapsed(usize),
}
