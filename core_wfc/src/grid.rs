use crate::{
    direction::{Direction, DIRECTIONS},
    superposition::Superposition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub collapsed: bool,
    pub options: Superposition,
}

impl Cell {
    pub fn new(options: Superposition) -> Self {
        Self {
            collapsed: false,
            options,
        }
    }

    pub fn count(&self) -> usize {
        self.options.count_bits()
    }

    pub fn is_contradiction(&self) -> bool {
        self.options.is_empty()
    }
}

/// Square grid of cells stored row major: `index = row * size + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub size: usize,
    pub cells: Vec<Cell>,
    neighbors: Vec<[Option<usize>; DIRECTIONS]>,
}

impl Grid {
    pub fn new(size: usize, tile_count: usize) -> Self {
        let filled = Superposition::filled(tile_count);
        let cells = vec![Cell::new(filled); size * size];

        let mut neighbors = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let mut node_neighbors = [None; DIRECTIONS];
                for direction in Direction::ALL {
                    let (dr, dc) = direction.offset();
                    let r = row as isize + dr;
                    let c = col as isize + dc;
                    if r < 0 || c < 0 || r >= size as isize || c >= size as isize {
                        continue;
                    }
                    node_neighbors[direction as usize] = Some(r as usize * size + c as usize);
                }
                neighbors.push(node_neighbors);
            }
        }

        Self {
            size,
            cells,
            neighbors,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the cell across `direction`, or `None` past the border.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        self.neighbors[index][direction as usize]
    }

    /// Number of cells not yet committed to a tile.
    pub fn remaining(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.collapsed).count()
    }

    pub fn uncollapsed_neighbors(&self, index: usize) -> usize {
        self.neighbors[index]
            .iter()
            .flatten()
            .filter(|&&n| !self.cells[n].collapsed)
            .count()
    }
}
