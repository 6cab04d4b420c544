//! Grid-world MDP model: actions, cells, grids, and the transition model.

pub mod action;
pub mod grid;
pub mod transition;

pub use action::{Action, ACTION_ORDER};
pub use grid::{Cell, Grid, RawCell, TERMINAL_REWARD};
pub use transition::{next_state, outcomes, reward, slip_pair};
