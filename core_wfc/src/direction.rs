use serde::{Deserialize, Serialize};

pub const DIRECTIONS: usize = 4;

/// Edge of a tile, in socket order.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; DIRECTIONS] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn other(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Direction this edge faces after `rotation` quarter turns clockwise.
    pub fn rotate(&self, rotation: usize) -> Self {
        Self::from((*self as usize + rotation) % DIRECTIONS)
    }

    /// (row, col) step towards the neighbor across this edge.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }
}

impl From<usize> for Direction {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            3 => Self::West,
            _ => panic!("Invalid direction: {}", value),
        }
    }
}
