//! Reference sample grids. Terminal cells are inferred from the 10.0 sentinel.

use crate::mdp::RawCell::{self, Reward as R, Wall as W};
use crate::mdp::{Grid, TERMINAL_REWARD};

fn build(rows: &[&[RawCell]]) -> Grid {
    let raw = rows.iter().map(|row| row.to_vec()).collect();
    Grid::from_raw(raw, TERMINAL_REWARD).expect("preset grids are rectangular and finite")
}

/// 3x4 maze with walls in the corners and the goal on the right edge.
pub fn small_maze() -> Grid {
    build(&[
        &[W, R(-0.0000000001), R(-0.01), W],
        &[R(0.0), R(-0.04), W, R(10.0)],
        &[W, R(-0.04), R(-0.04), R(-0.04)],
    ])
}

/// 3x3 textbook grid: goal top-right, a -10 penalty cell bottom-right, one wall in the middle.
pub fn classic_3x3() -> Grid {
    build(&[
        &[R(0.0), R(-0.04), R(10.0)],
        &[R(-0.04), W, R(-0.04)],
        &[R(-0.04), R(-0.04), R(-10.0)],
    ])
}

/// 8x10 grid with scattered walls and penalty cells; goal in the top-right corner.
pub fn big_grid() -> Grid {
    build(&[
        &[R(-0.20), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(10.0)],
        &[R(-0.20), W, R(-1.00), W, R(-0.20), R(-1.00), R(-0.20), W, R(-0.20), R(-0.10)],
        &[R(-0.10), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.20), R(-0.01), R(-0.01), R(-0.01)],
        &[R(-0.10), R(-0.20), R(-0.20), W, R(-0.20), R(-1.00), R(-0.20), W, R(-0.20), R(-0.04)],
        &[R(-0.10), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.01), R(-0.04)],
        &[R(-0.10), R(-0.01), W, R(-0.01), R(-0.10), R(-0.10), R(-0.04), R(-1.00), R(-0.20), R(-0.04)],
        &[R(-0.01), R(-0.01), W, R(-0.01), R(-0.20), W, R(-0.04), R(-1.00), R(-0.20), R(-0.04)],
        &[R(0.0), R(-0.01), R(-0.01), R(-0.01), R(-0.20), R(-0.20), R(-0.04), R(-0.04), R(-0.04), R(-0.04)],
    ])
}

/// 4x4 grid where the short route to the goal crosses two -50 cells and the long route is cheap.
pub fn bad_shortcut() -> Grid {
    build(&[
        &[R(0.0), R(-50.0), R(-50.0), R(10.0)],
        &[R(-0.1), W, W, R(-0.1)],
        &[R(-0.1), W, W, R(-0.1)],
        &[R(-0.1), R(-0.1), R(-0.1), R(-0.1)],
    ])
}
