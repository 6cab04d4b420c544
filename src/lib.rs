pub mod core;
pub mod mdp;
pub mod solver;
pub mod envs;
pub mod utils;

pub use crate::core::{Env, GridError, Info, InfoValue, RenderFrame, Result, Step};
pub use crate::mdp::{Action, Cell, Grid, RawCell, ACTION_ORDER, TERMINAL_REWARD, next_state, slip_pair};
pub use crate::solver::{PolicyLabel, PolicyTable, Solution, SolverConfig, ValueIteration, ValueTable, value_iteration};
pub use crate::envs::{Episode, GridWorldEnv, PolicyEvaluation};
pub use crate::utils::{arrows_from_policy, encode_png, format_policy, format_values, render_value_heatmap, save_png};
