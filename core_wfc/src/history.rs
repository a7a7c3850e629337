use crate::{grid::Cell, wave::Wave};
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};

/// A speculative collapse: `cell` was committed to `tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub cell: usize,
    pub tile: usize,
}

/// Records enough about each decision to undo it later.
pub trait History: DynClone + Send + Sync + std::fmt::Debug {
    /// Opens a frame for `decision`. Called before the wave is mutated.
    fn save(&mut self, wave: &Wave, decision: Decision);

    /// Called for every option removed while frames are open.
    fn on_option_removed(&mut self, _cell: usize, _tile: usize) {}

    /// Restores the wave to the state before the most recent decision and
    /// returns that decision, or `None` when there is nothing left to undo.
    fn undo(&mut self, wave: &mut Wave) -> Option<Decision>;

    fn clear(&mut self);

    fn depth(&self) -> usize;
}

dyn_clone::clone_trait_object!(History);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HistoryStrategy {
    /// Copy the whole grid per decision, rebuild everything on undo.
    Snapshot,
    /// Log removals per decision, replay them backwards on undo.
    #[default]
    Delta,
}

impl HistoryStrategy {
    pub fn build(&self) -> Box<dyn History> {
        match self {
            HistoryStrategy::Snapshot => Box::<Snapshot>::default(),
            HistoryStrategy::Delta => Box::<Delta>::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct SnapshotFrame {
    decision: Decision,
    cells: Vec<Cell>,
}

#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    stack: Vec<SnapshotFrame>,
}

impl History for Snapshot {
    fn save(&mut self, wave: &Wave, decision: Decision) {
        self.stack.push(SnapshotFrame {
            decision,
            cells: wave.grid.cells.clone(),
        });
    }

    fn undo(&mut self, wave: &mut Wave) -> Option<Decision> {
        let frame = self.stack.pop()?;
        wave.restore_cells(frame.cells);
        Some(frame.decision)
    }

    fn clear(&mut self) {
        self.stack.clear();
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[derive(Clone, Debug)]
struct DeltaFrame {
    decision: Decision,
    removed: Vec<(usize, usize)>,
}

/// Removals are logged into the newest frame, so undoing a frame also
/// restores whatever was removed after it was opened.
#[derive(Clone, Debug, Default)]
pub struct Delta {
    stack: Vec<DeltaFrame>,
}

impl History for Delta {
    fn save(&mut self, _wave: &Wave, decision: Decision) {
        self.stack.push(DeltaFrame {
            decision,
            removed: Vec::new(),
        });
    }

    fn on_option_removed(&mut self, cell: usize, tile: usize) {
        if let Some(frame) = self.stack.last_mut() {
            frame.removed.push((cell, tile));
        }
    }

    fn undo(&mut self, wave: &mut Wave) -> Option<Decision> {
        let frame = self.stack.pop()?;

        // restore removed options, newest first
        for &(cell, tile) in frame.removed.iter().rev() {
            wave.restore_option(cell, tile);
        }

        wave.grid.cells[frame.decision.cell].collapsed = false;
        wave.rebuild_queue();

        Some(frame.decision)
    }

    fn clear(&mut self) {
        self.stack.clear();
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}
