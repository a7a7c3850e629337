//! Live search state of one solver: the grid, its support counts, the entropy
//! queue and the pending removal events that drive propagation.

use crate::{
    direction::Direction,
    entropy::{shannon_entropy, Entropy, EntropyQueue, JITTER},
    grid::{Cell, Grid},
    history::History,
    support::SupportTable,
    tileset::TileSet,
};
use rand::{rngs::SmallRng, Rng};
use std::sync::Arc;

/// A cell ran out of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction(pub usize);

#[derive(Debug, Clone)]
pub struct Wave {
    pub grid: Grid,
    pub supports: SupportTable,
    pub queue: EntropyQueue,
    pending: Vec<(usize, usize)>,
    tileset: Arc<TileSet>,
    entropy: Entropy,
    rng: SmallRng,
}

impl Wave {
    pub fn new(size: usize, tileset: Arc<TileSet>, entropy: Entropy, rng: SmallRng) -> Self {
        let grid = Grid::new(size, tileset.tile_count());
        let supports = SupportTable::new(&grid, tileset.propagator());
        let mut wave = Self {
            queue: EntropyQueue::with_capacity(grid.len()),
            grid,
            supports,
            pending: Vec::new(),
            tileset,
            entropy,
            rng,
        };
        wave.rebuild_queue();
        wave
    }

    pub fn tileset(&self) -> &Arc<TileSet> {
        &self.tileset
    }

    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Priority used to order the queue: entropy plus a small random jitter,
    /// minus the degree term when enabled.
    pub fn priority(&mut self, cell: usize) -> f64 {
        let options = &self.grid.cells[cell].options;
        let mut priority = shannon_entropy(options, self.tileset.weights());
        priority += self.rng.gen::<f64>() * JITTER;
        if let Entropy::Degree { weight } = self.entropy {
            priority -= weight * self.grid.uncollapsed_neighbors(cell) as f64;
        }
        priority
    }

    /// Pushes a fresh queue entry for an open, non-empty cell.
    pub fn register(&mut self, cell: usize) {
        let state = self.grid.cells[cell];
        if state.collapsed || state.is_contradiction() {
            return;
        }
        let priority = self.priority(cell);
        self.queue.push(cell, priority, state.count());
    }

    pub fn rebuild_queue(&mut self) {
        self.queue.clear();
        for cell in 0..self.grid.len() {
            self.register(cell);
        }
    }

    pub fn rebuild_supports(&mut self) {
        self.supports.rebuild(&self.grid, self.tileset.propagator());
    }

    /// Replaces every cell wholesale and recomputes the derived tables.
    pub fn restore_cells(&mut self, cells: Vec<Cell>) {
        self.grid.cells = cells;
        self.pending.clear();
        self.rebuild_supports();
        self.rebuild_queue();
    }

    /// Removes `tile` from the cell's options and queues the removal for
    /// propagation. Removing an absent option does nothing.
    pub fn remove_option(&mut self, cell: usize, tile: usize, history: &mut dyn History) -> bool {
        if !self.grid.cells[cell].options.remove_tile(tile) {
            return false;
        }
        self.pending.push((cell, tile));
        history.on_option_removed(cell, tile);
        self.register(cell);
        true
    }

    /// Puts `tile` back into the cell and undoes the support decrements its
    /// removal caused.
    pub fn restore_option(&mut self, cell: usize, tile: usize) {
        if !self.grid.cells[cell].options.add_tile(tile) {
            return;
        }
        let tileset = self.tileset.clone();
        for direction in Direction::ALL {
            let Some(neighbor) = self.grid.neighbor(cell, direction) else {
                continue;
            };
            for &other in tileset.propagator().allowed_list(tile, direction) {
                self.supports.increment(neighbor, other, direction.other());
            }
        }
    }

    /// Removes every option that has no support across some in-bounds
    /// direction, then propagates. Run once before the first decision.
    pub fn prune(&mut self, history: &mut dyn History) -> Result<(), Contradiction> {
        let tile_count = self.tileset.tile_count();
        for cell in 0..self.grid.len() {
            for tile in 0..tile_count {
                let unsupported = Direction::ALL.into_iter().any(|direction| {
                    self.grid.neighbor(cell, direction).is_some()
                        && self.supports.get(cell, tile, direction) == 0
                });
                if unsupported {
                    self.remove_option(cell, tile, history);
                }
            }
        }

        let result = self.propagate(history);
        if result.is_ok() {
            if let Some(cell) = self.grid.cells.iter().position(|c| c.is_contradiction()) {
                return Err(Contradiction(cell));
            }
        }
        result
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Runs queued removals to a fixpoint.
    ///
    /// Once a cell runs empty no further options are removed, but the support
    /// decrements of the remaining events are still applied so the counts keep
    /// matching the options.
    pub fn propagate(&mut self, history: &mut dyn History) -> Result<(), Contradiction> {
        let tileset = self.tileset.clone();
        let propagator = tileset.propagator();
        let mut contradiction = None;

        while let Some((cell, removed)) = self.pending.pop() {
            for direction in Direction::ALL {
                let Some(neighbor) = self.grid.neighbor(cell, direction) else {
                    continue;
                };
                let opposite = direction.other();
                for &other in propagator.allowed_list(removed, direction) {
                    if self.supports.decrement(neighbor, other, opposite) != 0 {
                        continue;
                    }
                    if contradiction.is_some() {
                        continue;
                    }
                    if self.remove_option(neighbor, other, history)
                        && self.grid.cells[neighbor].is_contradiction()
                    {
                        contradiction = Some(Contradiction(neighbor));
                    }
                }
            }
        }

        match contradiction {
            Some(contradiction) => Err(contradiction),
            None => Ok(()),
        }
    }

    /// Applies the support decrements of every queued removal without
    /// removing anything further.
    pub fn settle(&mut self) {
        let tileset = self.tileset.clone();
        while let Some((cell, removed)) = self.pending.pop() {
            for direction in Direction::ALL {
                let Some(neighbor) = self.grid.neighbor(cell, direction) else {
                    continue;
                };
                for &other in tileset.propagator().allowed_list(removed, direction) {
                    self.supports.decrement(neighbor, other, direction.other());
                }
            }
        }
    }

    /// True when every count equals the number of compatible options left in
    /// the neighbor.
    pub fn supports_consistent(&self) -> bool {
        let mut expected = self.supports.clone();
        expected.rebuild(&self.grid, self.tileset.propagator());
        expected == self.supports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        history::Delta,
        tileset::{BaseTile, TileSet},
    };
    use rand::SeedableRng;

    fn coast() -> Arc<TileSet> {
        Arc::new(
            TileSet::new(&[
                BaseTile::new("Water", ["W", "W", "W", "W"], 2.0),
                BaseTile::new("Land", ["L", "L", "L", "L"], 3.0),
                BaseTile::new("Shore", ["W", "S", "L", "S"], 1.0),
            ])
            .unwrap(),
        )
    }

    fn wave(size: usize) -> Wave {
        Wave::new(size, coast(), Entropy::Shannon, SmallRng::seed_from_u64(3))
    }

    #[test]
    fn removal_is_idempotent() {
        let mut wave = wave(2);
        let mut history = Delta::default();
        assert!(wave.remove_option(0, 0, &mut history));
        assert!(!wave.remove_option(0, 0, &mut history));
        assert!(wave.has_pending());
        wave.propagate(&mut history).unwrap();
        assert!(!wave.has_pending());
        assert!(wave.supports_consistent());
    }

    #[test]
    fn propagation_only_shrinks_domains() {
        let mut wave = wave(4);
        let mut history = Delta::default();
        let before: Vec<usize> = wave.grid.cells.iter().map(|c| c.count()).collect();

        let water = wave.tileset().find("Water", 0).unwrap();
        let options = wave.grid.cells[5].options;
        wave.grid.cells[5].collapsed = true;
        for tile in options.tile_iter().filter(|&t| t != water) {
            wave.remove_option(5, tile, &mut history);
        }
        wave.propagate(&mut history).unwrap();

        for (cell, count) in before.iter().enumerate() {
            assert!(wave.grid.cells[cell].count() <= *count);
        }
        // land can never touch water directly
        let land = wave.tileset().find("Land", 0).unwrap();
        for direction in Direction::ALL {
            let neighbor = wave.grid.neighbor(5, direction).unwrap();
            assert!(!wave.grid.cells[neighbor].options.contains(land));
        }
        assert!(wave.supports_consistent());
    }

    #[test]
    fn contradiction_keeps_supports_consistent() {
        let tileset = Arc::new(
            TileSet::without_rotations(&[
                BaseTile::new("A", ["a", "a", "a", "a"], 1.0),
                BaseTile::new("B", ["b", "b", "b", "b"], 1.0),
            ])
            .unwrap(),
        );
        let mut wave = Wave::new(2, tileset, Entropy::Shannon, SmallRng::seed_from_u64(1));
        let mut history = Delta::default();

        wave.grid.cells[0].collapsed = true;
        wave.remove_option(0, 1, &mut history);
        // the neighbor is left with B only, which A cannot touch
        wave.remove_option(1, 0, &mut history);

        assert!(wave.propagate(&mut history).is_err());
        assert!(!wave.has_pending());
        assert!(wave.supports_consistent());
    }

    #[test]
    fn restore_inverts_removal() {
        let mut wave = wave(3);
        let mut history = Delta::default();
        let supports = wave.supports.clone();

        wave.remove_option(4, 1, &mut history);
        wave.settle();
        assert_ne!(wave.supports, supports);

        wave.restore_option(4, 1);
        assert_eq!(wave.supports, supports);
    }

    #[test]
    fn degree_heuristic_prefers_connected_cells() {
        let mut wave = Wave::new(
            3,
            coast(),
            Entropy::Degree { weight: 1.0 },
            SmallRng::seed_from_u64(9),
        );
        // centre has four open neighbors, corners two
        assert!(wave.priority(4) < wave.priority(0));
    }
}
