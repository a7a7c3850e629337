use crate::{grid::Grid, superposition::Superposition};
use serde::{Deserialize, Serialize};

/// Upper bound of the random tie-breaking term added to every priority.
pub const JITTER: f64 = 0.0001;

pub const DEFAULT_DEGREE_WEIGHT: f64 = 0.1;

/// How cells are ranked for collapse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Entropy {
    /// Weighted Shannon entropy of the remaining options.
    #[default]
    Shannon,
    /// Shannon entropy minus `weight` per uncollapsed neighbor, so well
    /// connected cells are resolved first.
    Degree { weight: f64 },
}

/// `H = ln(sum w) - sum(w ln w) / sum w` over the options. Zero for single
/// option cells.
pub fn shannon_entropy(options: &Superposition, weights: &[f64]) -> f64 {
    if options.count_bits() <= 1 {
        return 0.0;
    }

    let mut sum_of_weights = 0.0;
    let mut sum_of_weight_log_weights = 0.0;
    for tile in options.tile_iter() {
        let weight = weights[tile];
        sum_of_weights += weight;
        sum_of_weight_log_weights += weight * weight.ln();
    }

    if sum_of_weights <= 0.0 {
        return 0.0;
    }
    sum_of_weights.ln() - sum_of_weight_log_weights / sum_of_weights
}

/// Result of asking the queue for the next cell to collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popped {
    Cell(usize),
    Contradiction(usize),
    Empty,
}

/// Binary min-heap over cell priorities with lazy deletion.
///
/// Entries are never updated in place: a cell whose domain shrinks is pushed
/// again and older entries are recognised as stale on pop by comparing the
/// recorded option count with the live one.
#[derive(Debug, Clone, Default)]
pub struct EntropyQueue {
    cells: Vec<usize>,
    priorities: Vec<f64>,
    counts: Vec<usize>,
}

impl EntropyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            priorities: Vec::with_capacity(capacity),
            counts: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.priorities.clear();
        self.counts.clear();
    }

    pub fn push(&mut self, cell: usize, priority: f64, count: usize) {
        self.cells.push(cell);
        self.priorities.push(priority);
        self.counts.push(count);
        self.sift_up(self.cells.len() - 1);
    }

    /// Removes the entry with the lowest priority as `(cell, priority, count)`.
    pub fn pop(&mut self) -> Option<(usize, f64, usize)> {
        if self.cells.is_empty() {
            return None;
        }

        let last = self.cells.len() - 1;
        self.swap(0, last);
        let cell = self.cells.pop()?;
        let priority = self.priorities.pop()?;
        let count = self.counts.pop()?;
        if !self.cells.is_empty() {
            self.sift_down(0);
        }
        Some((cell, priority, count))
    }

    /// Pops until a live entry is found. Collapsed cells and entries recorded
    /// with an outdated option count are dropped.
    pub fn pop_live(&mut self, grid: &Grid) -> Popped {
        while let Some((index, _, count)) = self.pop() {
            let cell = &grid.cells[index];
            if cell.collapsed {
                continue;
            }
            if cell.is_contradiction() {
                return Popped::Contradiction(index);
            }
            if cell.count() != count {
                continue;
            }
            return Popped::Cell(index);
        }
        Popped::Empty
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
        self.priorities.swap(a, b);
        self.counts.swap(a, b);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.priorities[parent] <= self.priorities[index] {
                break;
            }
            self.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let length = self.cells.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < length && self.priorities[left] < self.priorities[smallest] {
                smallest = left;
            }
            if right < length && self.priorities[right] < self.priorities[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}
