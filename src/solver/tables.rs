use crate::mdp::{Action, Cell, Grid};

/// Converged state values, same shape as the grid. Walls hold `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTable {
    rows: usize,
    cols: usize,
    values: Vec<Option<f64>>,
}

impl ValueTable {
    /// Freeze a flat solver buffer into a table, masking wall cells.
    pub(crate) fn from_buffer(grid: &Grid, buffer: &[f64]) -> Self {
        let values = grid
            .iter()
            .zip(buffer.iter())
            .map(|((_, cell), &v)| if cell.is_wall() { None } else { Some(v) })
            .collect();
        Self { rows: grid.rows(), cols: grid.cols(), values }
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cols(&self) -> usize { self.cols }

    /// Value at `(i, j)`; `None` for walls and out-of-bounds coordinates.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols { self.values[i * self.cols + j] } else { None }
    }

    /// Iterate rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<f64>]> { self.values.chunks(self.cols) }

    /// Owned nested rows, mirroring the grid layout.
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> { self.iter_rows().map(|r| r.to_vec()).collect() }

    /// Smallest and largest defined value, if any cell is defined.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Per-cell label in a policy table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyLabel {
    Move(Action),
    Wall,
    Goal,
}

impl PolicyLabel {
    /// Label for a non-actionable cell, `None` for Free cells.
    pub(crate) fn for_fixed_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Wall => Some(PolicyLabel::Wall),
            Cell::Terminal(_) => Some(PolicyLabel::Goal),
            Cell::Free(_) => None,
        }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            PolicyLabel::Move(a) => Some(*a),
            _ => None,
        }
    }

    /// Single display glyph: arrows for moves, `#` for walls, `G` for goals.
    pub fn glyph(&self) -> char {
        match self {
            PolicyLabel::Move(a) => a.glyph(),
            PolicyLabel::Wall => '#',
            PolicyLabel::Goal => 'G',
        }
    }
}

/// Greedy policy extracted from a value table. Built once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyTable {
    rows: usize,
    cols: usize,
    labels: Vec<PolicyLabel>,
}

impl PolicyTable {
    pub(crate) fn new(rows: usize, cols: usize, labels: Vec<PolicyLabel>) -> Self {
        debug_assert_eq!(labels.len(), rows * cols);
        Self { rows, cols, labels }
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cols(&self) -> usize { self.cols }

    /// Label at `(i, j)`. Panics when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> PolicyLabel { self.labels[i * self.cols + j] }

    /// Chosen action at `(i, j)`, `None` for walls and goals.
    pub fn action(&self, i: usize, j: usize) -> Option<Action> { self.get(i, j).action() }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[PolicyLabel]> { self.labels.chunks(self.cols) }
}
