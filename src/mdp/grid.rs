use crate::core::{GridError, Result};

/// Reward carried by goal cells in the reference configuration.
pub const TERMINAL_REWARD: f64 = 10.0;

/// A classified grid cell. Classification happens once, when the grid is built.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    /// Impassable; holds no reward and no value.
    Wall,
    /// Absorbing goal/trap cell with a fixed reward and no outgoing actions.
    Terminal(f64),
    /// Ordinary cell with an immediate reward and four actions.
    Free(f64),
}

impl Cell {
    pub fn is_wall(&self) -> bool { matches!(self, Cell::Wall) }

    pub fn is_terminal(&self) -> bool { matches!(self, Cell::Terminal(_)) }

    pub fn is_free(&self) -> bool { matches!(self, Cell::Free(_)) }

    /// Immediate reward, `None` for walls.
    pub fn reward(&self) -> Option<f64> {
        match *self {
            Cell::Wall => None,
            Cell::Terminal(r) | Cell::Free(r) => Some(r),
        }
    }
}

/// Unclassified input cell: either the wall marker or a plain number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawCell {
    Wall,
    Reward(f64),
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self { RawCell::Reward(v) }
}

/// Rectangular, non-empty, immutable grid stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from explicitly tagged cells.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let n_rows = rows.len();
        if n_rows == 0 {
            return Err(GridError::MalformedGrid("grid has no rows".into()));
        }
        let n_cols = rows[0].len();
        if n_cols == 0 {
            return Err(GridError::MalformedGrid("grid has no columns".into()));
        }
        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(GridError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    i, row.len(), n_cols
                )));
            }
            for (j, cell) in row.into_iter().enumerate() {
                if let Some(r) = cell.reward() {
                    if !r.is_finite() {
                        return Err(GridError::MalformedGrid(format!("non-finite reward {} at ({}, {})", r, i, j)));
                    }
                }
                cells.push(cell);
            }
        }
        Ok(Self { rows: n_rows, cols: n_cols, cells })
    }

    /// Build a grid from wall markers and numbers, treating any number exactly equal
    /// to `terminal_reward` as a Terminal cell.
    ///
    /// A plain cell that happens to carry `terminal_reward` becomes terminal too; use
    /// [`Grid::new`] with explicit [`Cell::Terminal`] to avoid that.
    pub fn from_raw(rows: Vec<Vec<RawCell>>, terminal_reward: f64) -> Result<Self> {
        let classified = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|raw| match raw {
                        RawCell::Wall => Cell::Wall,
                        RawCell::Reward(r) if r == terminal_reward => Cell::Terminal(r),
                        RawCell::Reward(r) => Cell::Free(r),
                    })
                    .collect()
            })
            .collect();
        Self::new(classified)
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cols(&self) -> usize { self.cols }

    /// Number of cells (`rows * cols`).
    pub fn len(&self) -> usize { self.cells.len() }

    /// Always false: construction rejects empty grids.
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn in_bounds(&self, i: usize, j: usize) -> bool { i < self.rows && j < self.cols }

    /// Cell at `(i, j)`. Panics when out of bounds.
    pub fn cell(&self, i: usize, j: usize) -> Cell { self.cells[self.index(i, j)] }

    pub fn get(&self, i: usize, j: usize) -> Option<Cell> {
        if self.in_bounds(i, j) { Some(self.cell(i, j)) } else { None }
    }

    pub fn is_wall(&self, i: usize, j: usize) -> bool { self.cell(i, j).is_wall() }

    pub fn is_terminal(&self, i: usize, j: usize) -> bool { self.cell(i, j).is_terminal() }

    /// Row-major flat index of `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize { i * self.cols + j }

    /// Iterate all cells with their coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> {
        let cols = self.cols;
        self.cells.iter().enumerate().map(move |(k, c)| ((k / cols, k % cols), c))
    }
}
