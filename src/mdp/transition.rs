//! Deterministic movement with wall blocking. Probabilities live in the solver
//! config; this module only answers where each move lands.

use super::action::Action;
use super::grid::Grid;

/// Coordinate reached by applying `action` at `(i, j)`.
///
/// Moves that leave the grid or hit a wall keep the agent in place.
pub fn next_state(grid: &Grid, i: usize, j: usize, action: Action) -> (usize, usize) {
    let (di, dj) = action.delta();
    let (Some(ni), Some(nj)) = (i.checked_add_signed(di), j.checked_add_signed(dj)) else {
        return (i, j);
    };
    match grid.get(ni, nj) {
        Some(cell) if !cell.is_wall() => (ni, nj),
        _ => (i, j),
    }
}

/// Perpendicular slip alternatives of `action`, as `(left, right)`.
pub fn slip_pair(action: Action) -> (Action, Action) { action.slip_pair() }

/// Immediate reward of the cell at `(i, j)`; `None` for walls.
pub fn reward(grid: &Grid, i: usize, j: usize) -> Option<f64> { grid.cell(i, j).reward() }

/// Destinations under the intended action and its two slips, in that order.
pub fn outcomes(grid: &Grid, i: usize, j: usize, action: Action) -> [(usize, usize); 3] {
    let (left, right) = slip_pair(action);
    [
        next_state(grid, i, j, action),
        next_state(grid, i, j, left),
        next_state(grid, i, j, right),
    ]
}
