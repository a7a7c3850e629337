use crate::{
    entropy::{Entropy, Popped},
    error::WfcError,
    grid::Grid,
    history::{Decision, History, HistoryStrategy},
    tileset::TileSet,
    wave::Wave,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WfcSettings {
    pub history: HistoryStrategy,
    pub entropy: Entropy,
    /// Drawn from the OS when unset.
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Ready,
    Running,
    Completed,
    Failed,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Failed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOutput {
    pub collapsed: bool,
    pub options: Vec<usize>,
}

/// State handed to hosts after every step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfcOutput {
    pub size: usize,
    pub cells: Vec<CellOutput>,
    pub status: Status,
    pub changed: bool,
    pub depth: usize,
    pub remaining: usize,
}

/// One solver instance: grid, tables, queue and history for a single run.
///
/// Completed and failed tasks are final, build a new task to run again.
#[derive(Clone, Debug)]
pub struct WfcTask {
    pub seed: u64,
    pub settings: WfcSettings,
    wave: Wave,
    history: Box<dyn History>,
    status: Status,
    steps: usize,
    backtracks: usize,
    /// Set when the catalog cannot tile the grid even before any decision.
    unsatisfiable: Option<usize>,
}

impl WfcTask {
    pub fn new(size: usize, tileset: Arc<TileSet>, settings: WfcSettings) -> Result<Self, WfcError> {
        if size == 0 {
            return Err(WfcError::EmptyGrid);
        }

        let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let rng = SmallRng::seed_from_u64(seed);
        let mut wave = Wave::new(size, tileset, settings.entropy.clone(), rng);
        let mut history = settings.history.build();
        let unsatisfiable = match wave.prune(history.as_mut()) {
            Ok(()) => None,
            Err(contradiction) => {
                debug!("Initial pruning emptied cell {}", contradiction.0);
                Some(contradiction.0)
            }
        };

        Ok(Self {
            seed,
            settings,
            wave,
            history,
            status: Status::Ready,
            steps: 0,
            backtracks: 0,
            unsatisfiable,
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn depth(&self) -> usize {
        self.history.depth()
    }

    pub fn remaining(&self) -> usize {
        self.wave.grid.remaining()
    }

    pub fn grid(&self) -> &Grid {
        &self.wave.grid
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn tileset(&self) -> &Arc<TileSet> {
        self.wave.tileset()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Collapses the lowest entropy cell and propagates, backtracking on
    /// contradiction. Returns true if the grid changed.
    pub fn step(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = Status::Running;
        self.steps += 1;

        if let Some(cell) = self.unsatisfiable {
            debug!("Cell {} has no viable option", cell);
            return self.backtrack();
        }

        let cell = match self.wave.queue.pop_live(&self.wave.grid) {
            Popped::Cell(cell) => cell,
            Popped::Contradiction(cell) => {
                debug!("Contradiction queued at cell {}", cell);
                return self.backtrack();
            }
            Popped::Empty => {
                debug_assert_eq!(self.wave.grid.remaining(), 0);
                self.status = Status::Completed;
                info!(
                    "Completed on seed {:x} after {} steps and {} backtracks",
                    self.seed, self.steps, self.backtracks
                );
                return false;
            }
        };

        let options = self.wave.grid.cells[cell].options;
        let tileset = self.wave.tileset().clone();
        let Some(tile) = options.select_weighted(self.wave.rng(), tileset.weights()) else {
            return self.backtrack();
        };
        trace!("Collapsing cell {} to {}", cell, tileset.variant(tile).name);

        self.commit(Decision { cell, tile })
    }

    /// Forces `cell` to `tile`. Rejected without any effect when the task is
    /// finished, the cell is already collapsed or `tile` is not one of its
    /// options.
    pub fn collapse(&mut self, cell: usize, tile: usize) -> bool {
        if self.status.is_terminal() || cell >= self.wave.grid.len() {
            return false;
        }
        let state = &self.wave.grid.cells[cell];
        if state.collapsed || tile >= self.tileset().tile_count() || !state.options.contains(tile) {
            debug!("Rejected manual collapse of cell {} to {}", cell, tile);
            return false;
        }
        if self.unsatisfiable.is_some() {
            return self.step();
        }

        self.status = Status::Running;
        self.commit(Decision { cell, tile })
    }

    fn commit(&mut self, decision: Decision) -> bool {
        self.history.save(&self.wave, decision);

        let options = self.wave.grid.cells[decision.cell].options;
        self.wave.grid.cells[decision.cell].collapsed = true;
        for other in options.tile_iter().filter(|&t| t != decision.tile) {
            self.wave
                .remove_option(decision.cell, other, self.history.as_mut());
        }

        match self.wave.propagate(self.history.as_mut()) {
            Ok(()) => true,
            Err(contradiction) => {
                debug!(
                    "Contradiction at cell {} after collapsing {}",
                    contradiction.0, decision.cell
                );
                self.backtrack()
            }
        }
    }

    /// Undoes the most recent decision and excludes its tile, repeating while
    /// the reopened state is contradictory. Fails the task once no decision is
    /// left to undo.
    pub fn backtrack(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        loop {
            let Some(decision) = self.history.undo(&mut self.wave) else {
                self.status = Status::Failed;
                warn!(
                    "Ran out of decisions to undo on seed {:x} after {} backtracks",
                    self.seed, self.backtracks
                );
                return false;
            };
            self.backtracks += 1;
            debug!(
                "Backtracked cell {} (depth {})",
                decision.cell,
                self.history.depth()
            );

            self.wave
                .remove_option(decision.cell, decision.tile, self.history.as_mut());
            if self.wave.grid.cells[decision.cell].is_contradiction() {
                self.wave.settle();
                continue;
            }

            if self.wave.propagate(self.history.as_mut()).is_ok() {
                return true;
            }
        }
    }

    /// Steps up to `count` times, stopping early once finished. Returns true
    /// if any step changed the grid.
    pub fn step_many(&mut self, count: usize) -> bool {
        let mut changed = false;
        for _ in 0..count {
            changed |= self.step();
            if self.status.is_terminal() {
                break;
            }
        }
        changed
    }

    /// Steps until the task completes or fails.
    pub fn run(&mut self) -> Status {
        while !self.status.is_terminal() {
            self.step();
        }
        self.status
    }

    pub fn snapshot(&self, changed: bool) -> WfcOutput {
        let grid = &self.wave.grid;
        WfcOutput {
            size: grid.size,
            cells: grid
                .cells
                .iter()
                .map(|cell| CellOutput {
                    collapsed: cell.collapsed,
                    options: cell.options.tile_iter().collect(),
                })
                .collect(),
            status: self.status,
            changed,
            depth: self.depth(),
            remaining: self.remaining(),
        }
    }

    /// Tile id of every cell, or the first open cell as an error.
    pub fn validate(&self) -> Result<Vec<usize>, WfcError> {
        self.wave
            .grid
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| match (cell.collapsed, cell.options.collapse()) {
                (true, Some(tile)) => Ok(tile),
                _ => Err(WfcError::Uncollapsed(index)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::BaseTile;

    fn checker() -> Arc<TileSet> {
        Arc::new(
            TileSet::without_rotations(&[
                BaseTile::new("Black", ["b", "w", "b", "w"], 1.0),
                BaseTile::new("White", ["w", "b", "w", "b"], 1.0),
                BaseTile::new("Bridge", ["b", "b", "w", "w"], 1.0),
            ])
            .unwrap(),
        )
    }

    fn settings(history: HistoryStrategy, seed: u64) -> WfcSettings {
        WfcSettings {
            history,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn refuses_empty_grid() {
        let result = WfcTask::new(0, checker(), WfcSettings::default());
        assert!(matches!(result, Err(WfcError::EmptyGrid)));
    }

    #[test]
    fn status_moves_from_ready_to_running() {
        let mut task = WfcTask::new(3, checker(), settings(HistoryStrategy::Delta, 1)).unwrap();
        assert_eq!(task.status(), Status::Ready);
        assert_eq!(task.remaining(), 9);
        assert!(task.step());
        assert_eq!(task.status(), Status::Running);
        assert!(task.remaining() < 9);
    }

    #[test]
    fn step_after_completion_is_a_no_op() {
        let mut task = WfcTask::new(1, checker(), settings(HistoryStrategy::Delta, 5)).unwrap();
        assert!(task.step());
        assert!(!task.step());
        assert_eq!(task.status(), Status::Completed);
        assert!(!task.step());
        assert_eq!(task.validate().unwrap().len(), 1);
    }

    #[test]
    fn manual_collapse_rejects_invalid_requests() {
        let mut task = WfcTask::new(2, checker(), settings(HistoryStrategy::Snapshot, 2)).unwrap();
        assert!(!task.collapse(10, 0));
        assert!(!task.collapse(0, 7));
        assert_eq!(task.status(), Status::Ready);

        assert!(task.collapse(0, 0));
        assert_eq!(task.status(), Status::Running);
        assert_eq!(task.depth(), 1);
        assert!(task.grid().cells[0].collapsed);

        let before = task.snapshot(false);
        // already collapsed
        assert!(!task.collapse(0, 0));
        // black only allows black to the north and south, never white
        let south = task.grid().neighbor(0, crate::Direction::South).unwrap();
        assert!(!task.grid().cells[south].options.contains(1));
        assert!(!task.collapse(south, 1));
        assert_eq!(task.snapshot(false), before);
    }

    #[test]
    fn step_many_stops_at_terminal_status() {
        let mut task = WfcTask::new(2, checker(), settings(HistoryStrategy::Delta, 8)).unwrap();
        assert!(task.step_many(100));
        assert!(task.status().is_terminal());
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut task = WfcTask::new(3, checker(), settings(HistoryStrategy::Delta, 4)).unwrap();
        let changed = task.step();
        let output = task.snapshot(changed);
        assert_eq!(output.size, 3);
        assert_eq!(output.cells.len(), 9);
        assert_eq!(output.status, Status::Running);
        assert!(output.changed);
        assert_eq!(output.remaining, task.remaining());
        assert_eq!(output.depth, task.depth());
        assert!(output.cells.iter().any(|c| c.collapsed && c.options.len() == 1));
    }

    #[test]
    fn validate_requires_full_collapse() {
        let task = WfcTask::new(2, checker(), settings(HistoryStrategy::Delta, 3)).unwrap();
        assert!(matches!(task.validate(), Err(WfcError::Uncollapsed(0))));
    }

    #[test]
    fn same_seed_reproduces_the_grid() {
        let run = |seed| {
            let mut task = WfcTask::new(6, checker(), settings(HistoryStrategy::Delta, seed)).unwrap();
            task.run();
            task.snapshot(false)
        };
        assert_eq!(run(42), run(42));
    }
}
