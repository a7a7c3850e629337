use rand::Rng;

pub const TILE_U32S: usize = 4;

/// Largest number of tile variants a superposition can hold.
pub const MAX_TILES: usize = TILE_U32S * 32;

/// Set of tile ids still possible for a cell, stored as a fixed bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Superposition {
    pub bits: [u32; TILE_U32S],
}

impl Superposition {
    /// Cell fill with ones up to size
    pub fn filled(size: usize) -> Self {
        let mut result = [0; TILE_U32S];
        for i in 0..size {
            result[i / 32] |= 1 << (i % 32);
        }
        Self { bits: result }
    }

    pub fn empty() -> Self {
        Self {
            bits: [0; TILE_U32S],
        }
    }

    pub fn single(tile: usize) -> Self {
        let mut cell = Self::empty();
        cell.add_tile(tile);
        cell
    }

    /// Returns true if the tile was not present before
    pub fn add_tile(&mut self, tile: usize) -> bool {
        let added = !self.contains(tile);
        self.bits[tile / 32] |= 1 << (tile % 32);
        added
    }

    /// Returns true if the tile was present before
    pub fn remove_tile(&mut self, tile: usize) -> bool {
        let removed = self.contains(tile);
        self.bits[tile / 32] &= !(1 << (tile % 32));
        removed
    }

    pub fn contains(&self, tile: usize) -> bool {
        0 != (self.bits[tile / 32] & 1 << (tile % 32))
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Returns the one and only tile if there is only one
    pub fn collapse(&self) -> Option<usize> {
        if self.count_bits() == 1 {
            self.tile_iter().next()
        } else {
            None
        }
    }

    pub fn intersect(a: &Self, b: &Self) -> Self {
        let mut result = [0; TILE_U32S];
        for i in 0..TILE_U32S {
            result[i] = a.bits[i] & b.bits[i];
        }
        Self { bits: result }
    }

    /// Counts the number of bits set to 1
    pub fn count_bits(&self) -> usize {
        let mut result = 0;
        for i in 0..TILE_U32S {
            result += self.bits[i].count_ones() as usize;
        }
        result
    }

    /// Returns an iterator over all the set bits, in ascending tile order
    pub fn tile_iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..TILE_U32S).flat_map(move |i| {
            (0..32).filter_map(move |j| {
                if self.bits[i] & (1 << j) != 0 {
                    Some(i * 32 + j)
                } else {
                    None
                }
            })
        })
    }

    /// Picks one of the set tiles with probability proportional to its weight.
    ///
    /// Draws `r` in `[0, total)` and walks the tiles in ascending order,
    /// subtracting weights until `r` drops to zero or below.
    pub fn select_weighted<R: Rng>(&self, rng: &mut R, weights: &[f64]) -> Option<usize> {
        let total: f64 = self.tile_iter().map(|t| weights[t]).sum();
        if total <= 0.0 {
            return None;
        }

        let mut r = rng.gen::<f64>() * total;
        let mut last = None;
        for tile in self.tile_iter() {
            r -= weights[tile];
            last = Some(tile);
            if r <= 0.0 {
                return last;
            }
        }
        // floating point slack
        last
    }
}

impl FromIterator<usize> for Superposition {
    fn from_iter<I: IntoIterator<Item = usize>>(tiles: I) -> Self {
        let mut cell = Self::empty();
        for tile in tiles {
            cell.add_tile(tile);
        }
        cell
    }
}

impl std::fmt::Debug for Superposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.tile_iter()).finish()
    }
}

impl std::fmt::Display for Superposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // print the number of bits
        write!(f, "{}", self.count_bits())
    }
}
