use crate::{
    direction::{Direction, DIRECTIONS},
    superposition::Superposition,
    tileset::TileVariant,
};

/// Adjacency table: for every tile and direction, the tiles admissible in the
/// neighboring cell across that direction. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagator {
    compatible: Vec<[Superposition; DIRECTIONS]>,
    lists: Vec<[Vec<usize>; DIRECTIONS]>,
}

impl Propagator {
    pub fn new(variants: &[TileVariant]) -> Self {
        let mut compatible = vec![[Superposition::empty(); DIRECTIONS]; variants.len()];
        for (a, tile) in variants.iter().enumerate() {
            for direction in Direction::ALL {
                let socket = &tile.sockets[direction as usize];
                for (b, other) in variants.iter().enumerate() {
                    if other.sockets[direction.other() as usize] == *socket {
                        compatible[a][direction as usize].add_tile(b);
                    }
                }
            }
        }

        let lists: Vec<[Vec<usize>; DIRECTIONS]> = compatible
            .iter()
            .map(|allowed| allowed.map(|cell| cell.tile_iter().collect::<Vec<usize>>()))
            .collect();

        Self { compatible, lists }
    }

    pub fn tile_count(&self) -> usize {
        self.compatible.len()
    }

    /// Tiles allowed across `direction` from a cell holding `tile`.
    pub fn allowed(&self, tile: usize, direction: Direction) -> &Superposition {
        &self.compatible[tile][direction as usize]
    }

    /// Same as [`Propagator::allowed`] as an ascending id list.
    pub fn allowed_list(&self, tile: usize, direction: Direction) -> &[usize] {
        &self.lists[tile][direction as usize]
    }

    pub fn is_compatible(&self, tile: usize, direction: Direction, other: usize) -> bool {
        self.compatible[tile][direction as usize].contains(other)
    }
}
