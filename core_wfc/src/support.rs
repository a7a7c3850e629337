//! Arc-consistency support counts.
//!
//! `support[cell][tile][direction]` is the number of options left in the
//! neighbor across `direction` that are compatible with `tile` at `cell`.
//! When it reaches zero, `tile` is no longer viable at `cell`.

use crate::{
    direction::{Direction, DIRECTIONS},
    grid::Grid,
    propagator::Propagator,
    superposition::Superposition,
};

/// Value held by directions that point past the grid border. Those entries are
/// never decremented or incremented.
pub const BOUNDARY: u32 = u32::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportTable {
    counts: Vec<u32>,
    tile_count: usize,
}

impl SupportTable {
    pub fn new(grid: &Grid, propagator: &Propagator) -> Self {
        let tile_count = propagator.tile_count();
        let mut table = Self {
            counts: vec![0; grid.len() * tile_count * DIRECTIONS],
            tile_count,
        };
        table.rebuild(grid, propagator);
        table
    }

    /// Recomputes every count from the current cell options.
    pub fn rebuild(&mut self, grid: &Grid, propagator: &Propagator) {
        for cell in 0..grid.len() {
            for direction in Direction::ALL {
                let neighbor_options = grid
                    .neighbor(cell, direction)
                    .map(|neighbor| grid.cells[neighbor].options);
                for tile in 0..self.tile_count {
                    let idx = self.index(cell, tile, direction);
                    self.counts[idx] = match neighbor_options {
                        Some(options) => Superposition::intersect(
                            propagator.allowed(tile, direction),
                            &options,
                        )
                        .count_bits() as u32,
                        None => BOUNDARY,
                    };
                }
            }
        }
    }

    #[inline]
    fn index(&self, cell: usize, tile: usize, direction: Direction) -> usize {
        (cell * self.tile_count + tile) * DIRECTIONS + direction as usize
    }

    #[inline]
    pub fn get(&self, cell: usize, tile: usize, direction: Direction) -> u32 {
        self.counts[self.index(cell, tile, direction)]
    }

    /// Decrement the count and return the new value.
    #[inline]
    pub fn decrement(&mut self, cell: usize, tile: usize, direction: Direction) -> u32 {
        let idx = self.index(cell, tile, direction);
        debug_assert_ne!(self.counts[idx], BOUNDARY);
        self.counts[idx] -= 1;
        self.counts[idx]
    }

    #[inline]
    pub fn increment(&mut self, cell: usize, tile: usize, direction: Direction) {
        let idx = self.index(cell, tile, direction);
        debug_assert_ne!(self.counts[idx], BOUNDARY);
        self.counts[idx] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::{BaseTile, TileSet};

    fn stripes() -> TileSet {
        TileSet::without_rotations(&[
            BaseTile::new("A", ["a", "a", "a", "a"], 1.0),
            BaseTile::new("AB", ["a", "b", "a", "a"], 1.0),
            BaseTile::new("B", ["b", "b", "b", "b"], 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn initial_counts_match_compatible_neighbors() {
        let tileset = stripes();
        let grid = Grid::new(2, tileset.tile_count());
        let table = SupportTable::new(&grid, tileset.propagator());

        // east of A only A and AB are allowed (their west socket is "a")
        assert_eq!(table.get(0, 0, Direction::East), 2);
        // east of AB only B fits
        assert_eq!(table.get(0, 1, Direction::East), 1);
        assert_eq!(table.get(0, 2, Direction::North), BOUNDARY);
        assert_eq!(table.get(0, 2, Direction::West), BOUNDARY);
    }

    #[test]
    fn rebuild_tracks_shrunk_options() {
        let tileset = stripes();
        let mut grid = Grid::new(2, tileset.tile_count());
        let mut table = SupportTable::new(&grid, tileset.propagator());

        grid.cells[1].options.remove_tile(0);
        table.rebuild(&grid, tileset.propagator());
        assert_eq!(table.get(0, 0, Direction::East), 1);

        assert_eq!(table.decrement(0, 0, Direction::East), 0);
        table.increment(0, 0, Direction::East);
        assert_eq!(table.get(0, 0, Direction::East), 1);
    }

    #[test]
    #[should_panic]
    fn decrement_below_zero_panics() {
        let tileset = stripes();
        let grid = Grid::new(2, tileset.tile_count());
        let mut table = SupportTable::new(&grid, tileset.propagator());

        assert_eq!(table.decrement(0, 1, Direction::East), 0);
        table.decrement(0, 1, Direction::East);
    }
}
