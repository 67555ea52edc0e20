use std::num::NonZeroU32;

pub const CELL_WIDTH: u32 = 53;
pub const CELL_HEIGHT: u32 = 27;
pub const CELL_HALF_WIDTH: f64 = 26.5;
pub const CELL_HALF_HEIGHT: f64 = 13.5;

/// Deepest cell index a map is expected to hold.
pub const MAX_DEPTH_IN_MAP: usize = 100_000;

/// Cell position in grid units: `x` is the column within row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

/// Map a linear cell index onto the staggered grid.
///
/// Even rows hold `cells_per_row` cells, odd rows are shifted by half a cell
/// and hold one fewer. An even/odd row pair therefore holds
/// `2 * cells_per_row - 1` cells, which lets the row walk be done in one step.
pub fn project(index: usize, cells_per_row: NonZeroU32) -> GridPos {
    let even = cells_per_row.get() as usize;
    let pair = 2 * even - 1;

    let pairs = index / pair;
    let rem = index % pair;

    let (x, y) = if rem < even {
        (rem, 2 * pairs)
    } else {
        (rem - even, 2 * pairs + 1)
    };

    GridPos {
        x: x as u32,
        y: y as u32,
    }
}

/// Top-left pixel of a cell before its sprite origin is applied
pub fn cell_pixel(pos: GridPos) -> PixelPos {
    let mut x = pos.x as f64 * CELL_WIDTH as f64;
    if pos.y % 2 == 1 {
        x += CELL_HALF_WIDTH;
    }
    PixelPos {
        x,
        y: pos.y as f64 * CELL_HALF_HEIGHT,
    }
}
