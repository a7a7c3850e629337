use core_wfc::{grid::Grid, TileSet};
use grid_wfc::terrain_tileset;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Terrain,
    Ids,
}

fn variant_char(tileset: &TileSet, palette: Palette, tile: usize) -> char {
    match palette {
        Palette::Terrain => terrain_tileset::glyph(tileset.variant(tile)),
        Palette::Ids => char::from_digit((tile % 36) as u32, 36).unwrap_or('?'),
    }
}

/// One line per row. Open cells print as `?`, empty cells as `!`.
pub fn render(grid: &Grid, tileset: &TileSet, palette: Palette) -> String {
    let mut output = String::with_capacity(grid.len() + grid.size);
    for (index, cell) in grid.cells.iter().enumerate() {
        let c = match (cell.collapsed, cell.options.collapse()) {
            (true, Some(tile)) => variant_char(tileset, palette, tile),
            _ if cell.is_contradiction() => '!',
            _ => '?',
        };
        output.push(c);
        if (index + 1) % grid.size == 0 {
            output.push('\n');
        }
    }
    output
}

/// Tile usage sorted by count, most used first.
pub fn histogram(tiles: &[usize], tileset: &TileSet) -> String {
    let mut counts = vec![0usize; tileset.tile_count()];
    for &tile in tiles {
        counts[tile] += 1;
    }
    let mut used: Vec<(usize, usize)> = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    used.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut output = String::new();
    for (tile, count) in used {
        let _ = writeln!(output, "{:>6} {}", count, tileset.variant(tile).name);
    }
    output
}
