//! Synchronous value iteration over a slippery grid world.
//!
//! Each sweep reads only the previous sweep's values and writes a second
//! buffer; the two buffers are swapped once the sweep is complete. The loop
//! stops when the largest per-cell change drops below `theta` or after
//! `max_iterations` sweeps, then a greedy policy is extracted in a separate
//! pass over the final values.

pub mod config;
pub mod interop;
pub mod tables;

use log::{debug, trace, warn};

use crate::core::{GridError, Result};
use crate::mdp::{outcomes, Action, Cell, Grid, ACTION_ORDER};

pub use config::SolverConfig;
pub use tables::{PolicyLabel, PolicyTable, ValueTable};

/// Output of a solve: frozen values, the greedy policy, and loop diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub values: ValueTable,
    pub policy: PolicyTable,
    /// Number of sweeps performed.
    pub iterations: usize,
    /// Largest per-cell change during the last sweep.
    pub delta: f64,
    /// Whether `delta` fell below `theta` before the iteration budget ran out.
    pub converged: bool,
}

/// Value-iteration engine with a validated configuration.
#[derive(Clone, Debug)]
pub struct ValueIteration {
    config: SolverConfig,
}

impl ValueIteration {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig { &self.config }

    /// Run value iteration to convergence (or budget exhaustion) and extract the greedy policy.
    pub fn solve(&self, grid: &Grid) -> Solution {
        let cfg = &self.config;
        debug!(
            "[ValueIteration] solve: grid={}x{} gamma={} theta={} slip=({}, {}, {}) max_iterations={}",
            grid.rows(), grid.cols(), cfg.gamma, cfg.theta, cfg.p_forward, cfg.p_left, cfg.p_right, cfg.max_iterations
        );

        let mut current = initial_values(grid);
        let mut next = current.clone();
        let mut iterations = 0;
        let mut delta = 0.0_f64;
        let mut converged = false;

        while iterations < cfg.max_iterations {
            delta = self.sweep(grid, &current, &mut next);
            std::mem::swap(&mut current, &mut next);
            iterations += 1;
            trace!("[ValueIteration] sweep {}: delta={:.6}", iterations, delta);
            if delta < cfg.theta {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("[ValueIteration] converged after {} sweeps (delta={:.6})", iterations, delta);
        } else {
            warn!(
                "[ValueIteration] iteration budget of {} exhausted without convergence (delta={:.6})",
                cfg.max_iterations, delta
            );
        }

        let values = ValueTable::from_buffer(grid, &current);
        let policy = self.policy_from_buffer(grid, &current);
        Solution { values, policy, iterations, delta, converged }
    }

    /// One-step Bellman backup of `action` at `(i, j)` against `values`.
    ///
    /// Walls yield `None`; terminal cells yield their current value unchanged.
    pub fn q_value(&self, grid: &Grid, values: &ValueTable, i: usize, j: usize, action: Action) -> Result<Option<f64>> {
        check_shape("value table", values.rows(), values.cols(), grid)?;
        let Some(cell) = grid.get(i, j) else {
            return Err(GridError::OutOfBounds(format!(
                "({}, {}) outside {}x{} grid",
                i, j, grid.rows(), grid.cols()
            )));
        };
        Ok(match cell {
            Cell::Wall => None,
            Cell::Terminal(_) => values.get(i, j),
            Cell::Free(_) => Some(self.backup(grid, &to_buffer(grid, values), i, j, action)),
        })
    }

    /// Greedy policy for `values`, using [`ACTION_ORDER`] to break ties.
    pub fn extract_policy(&self, grid: &Grid, values: &ValueTable) -> Result<PolicyTable> {
        check_shape("value table", values.rows(), values.cols(), grid)?;
        Ok(self.policy_from_buffer(grid, &to_buffer(grid, values)))
    }

    /// Largest gap between a Free cell's value and its best one-step backup.
    pub fn bellman_residual(&self, grid: &Grid, values: &ValueTable) -> Result<f64> {
        check_shape("value table", values.rows(), values.cols(), grid)?;
        let buffer = to_buffer(grid, values);
        Ok(grid.iter()
            .filter(|(_, cell)| cell.is_free())
            .map(|((i, j), _)| {
                let (_, best) = self.best_action(grid, &buffer, i, j);
                (best - buffer[grid.index(i, j)]).abs()
            })
            .fold(0.0, f64::max))
    }

    /// Write one synchronous sweep of `current` into `next`; returns the largest change.
    fn sweep(&self, grid: &Grid, current: &[f64], next: &mut [f64]) -> f64 {
        let mut delta = 0.0_f64;
        for ((i, j), cell) in grid.iter() {
            let k = grid.index(i, j);
            if !cell.is_free() {
                next[k] = current[k];
                continue;
            }
            let (_, best) = self.best_action(grid, current, i, j);
            next[k] = best;
            delta = delta.max((best - current[k]).abs());
        }
        delta
    }

    fn policy_from_buffer(&self, grid: &Grid, values: &[f64]) -> PolicyTable {
        let labels = grid
            .iter()
            .map(|((i, j), cell)| {
                PolicyLabel::for_fixed_cell(cell)
                    .unwrap_or_else(|| PolicyLabel::Move(self.best_action(grid, values, i, j).0))
            })
            .collect();
        PolicyTable::new(grid.rows(), grid.cols(), labels)
    }

    /// Arg-max over [`ACTION_ORDER`]; only a strictly larger Q-value replaces the incumbent.
    fn best_action(&self, grid: &Grid, values: &[f64], i: usize, j: usize) -> (Action, f64) {
        let mut best = (ACTION_ORDER[0], f64::NEG_INFINITY);
        for a in ACTION_ORDER {
            let q = self.backup(grid, values, i, j, a);
            if q > best.1 {
                best = (a, q);
            }
        }
        best
    }

    /// Bellman sum for a Free cell. Destinations are never walls, so wall slots are never read.
    fn backup(&self, grid: &Grid, values: &[f64], i: usize, j: usize, action: Action) -> f64 {
        let cfg = &self.config;
        let reward = grid.cell(i, j).reward().unwrap_or(0.0);
        let [fwd, left, right] = outcomes(grid, i, j, action);
        let v = |(r, c): (usize, usize)| values[grid.index(r, c)];
        let expected = cfg.p_forward * v(fwd) + cfg.p_left * v(left) + cfg.p_right * v(right);
        reward + cfg.gamma * expected
    }
}

/// Solve `grid` with `config`, validating the configuration first.
pub fn value_iteration(grid: &Grid, config: &SolverConfig) -> Result<Solution> {
    Ok(ValueIteration::new(config.clone())?.solve(grid))
}

/// Zero for Free cells, the stored reward for Terminal cells, a placeholder for walls.
fn initial_values(grid: &Grid) -> Vec<f64> {
    grid.iter()
        .map(|(_, cell)| match *cell {
            Cell::Terminal(r) => r,
            Cell::Free(_) | Cell::Wall => 0.0,
        })
        .collect()
}

/// Reject a table whose shape differs from `grid`.
pub(crate) fn check_shape(what: &str, rows: usize, cols: usize, grid: &Grid) -> Result<()> {
    if rows != grid.rows() || cols != grid.cols() {
        return Err(GridError::MalformedGrid(format!(
            "{} {}x{} does not match grid {}x{}",
            what, rows, cols, grid.rows(), grid.cols()
        )));
    }
    Ok(())
}

/// Callers must have checked the shape first.
fn to_buffer(grid: &Grid, values: &ValueTable) -> Vec<f64> {
    grid.iter().map(|((i, j), _)| values.get(i, j).unwrap_or(0.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::presets;

    fn solve_default(grid: &Grid) -> Solution {
        value_iteration(grid, &SolverConfig::default()).expect("default config is valid")
    }

    #[test]
    fn classic_3x3_points_towards_goal() {
        let grid = presets::classic_3x3();
        let sol = solve_default(&grid);
        assert!(sol.converged);
        assert!(sol.iterations < SolverConfig::default().max_iterations);

        // (0,1) sits directly left of the +10 terminal
        assert_eq!(sol.policy.get(0, 1), PolicyLabel::Move(Action::Right));
        let v = sol.values.get(0, 1).unwrap();
        assert!(v > 0.0 && v < 10.0, "value next to goal was {}", v);
        // (1,2) sits directly below it
        assert_eq!(sol.policy.get(1, 2), PolicyLabel::Move(Action::Up));
    }

    #[test]
    fn terminals_keep_reward_and_walls_stay_undefined() {
        let grid = presets::classic_3x3();
        let sol = solve_default(&grid);
        assert_eq!(sol.values.get(0, 2), Some(10.0));
        assert_eq!(sol.values.get(1, 1), None);
        assert_eq!(sol.policy.get(0, 2), PolicyLabel::Goal);
        assert_eq!(sol.policy.get(1, 1), PolicyLabel::Wall);
        // -10 is not the terminal sentinel, so that corner is an ordinary cell
        assert!(matches!(sol.policy.get(2, 2), PolicyLabel::Move(_)));
    }

    #[test]
    fn solve_is_bit_identical_across_runs() {
        let grid = presets::big_grid();
        let a = solve_default(&grid);
        let b = solve_default(&grid);
        assert_eq!(a, b);
    }

    #[test]
    fn converged_values_are_bellman_consistent() {
        let engine = ValueIteration::new(SolverConfig::default()).unwrap();
        for grid in [presets::small_maze(), presets::classic_3x3(), presets::bad_shortcut()] {
            let sol = engine.solve(&grid);
            assert!(sol.converged);
            // contraction bound: residual <= gamma * last delta
            let residual = engine.bellman_residual(&grid, &sol.values).unwrap();
            let bound = engine.config().gamma * sol.delta;
            assert!(residual <= bound + 1e-9, "residual {} exceeds {}", residual, bound);
            assert!(residual < engine.config().theta);
        }
    }

    #[test]
    fn policy_picks_a_maximising_action() {
        let grid = presets::big_grid();
        let engine = ValueIteration::new(SolverConfig::default()).unwrap();
        let sol = engine.solve(&grid);
        for ((i, j), cell) in grid.iter() {
            if !cell.is_free() { continue; }
            let chosen = sol.policy.action(i, j).expect("free cells get an action");
            let q_chosen = engine.q_value(&grid, &sol.values, i, j, chosen).unwrap().unwrap();
            for a in ACTION_ORDER {
                let q = engine.q_value(&grid, &sol.values, i, j, a).unwrap().unwrap();
                assert!(q <= q_chosen, "({},{}) {} beats chosen {}", i, j, a, chosen);
            }
        }
    }

    #[test]
    fn ties_resolve_to_first_action_in_order() {
        // A single free cell boxed in by walls: every action stays in place,
        // so all four Q-values are equal and Up must win.
        let grid = Grid::new(vec![
            vec![Cell::Wall, Cell::Wall, Cell::Wall],
            vec![Cell::Wall, Cell::Free(-1.0), Cell::Wall],
            vec![Cell::Wall, Cell::Wall, Cell::Wall],
        ])
        .unwrap();
        let sol = solve_default(&grid);
        assert_eq!(sol.policy.get(1, 1), PolicyLabel::Move(Action::Up));

        // Goal directly left and right: Left and Right tie, Left comes first
        let grid = Grid::new(vec![vec![Cell::Terminal(10.0), Cell::Free(0.0), Cell::Terminal(10.0)]]).unwrap();
        for _ in 0..5 {
            let sol = solve_default(&grid);
            assert_eq!(sol.policy.get(0, 1), PolicyLabel::Move(Action::Left));
        }
    }

    #[test]
    fn budget_exhaustion_is_reported_not_raised() {
        let grid = presets::big_grid();
        let cfg = SolverConfig::default().with_max_iterations(2);
        let sol = value_iteration(&grid, &cfg).unwrap();
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 2);
        assert!(sol.delta >= cfg.theta);
    }

    #[test]
    fn invalid_config_is_rejected_before_solving() {
        let grid = presets::classic_3x3();
        let cfg = SolverConfig::default().with_slip(0.5, 0.1, 0.1);
        assert!(value_iteration(&grid, &cfg).is_err());
    }

    #[test]
    fn q_value_of_fixed_cells_is_current_value() {
        let grid = presets::classic_3x3();
        let engine = ValueIteration::new(SolverConfig::default()).unwrap();
        let sol = engine.solve(&grid);
        assert_eq!(engine.q_value(&grid, &sol.values, 0, 2, Action::Down), Ok(Some(10.0)));
        assert_eq!(engine.q_value(&grid, &sol.values, 1, 1, Action::Down), Ok(None));
        assert!(matches!(engine.q_value(&grid, &sol.values, 3, 0, Action::Up), Err(GridError::OutOfBounds(_))));
    }

    #[test]
    fn deterministic_single_step_value() {
        // Free(0) next to a goal, no slipping: V = 0 + 0.9 * 10
        let grid = Grid::new(vec![vec![Cell::Free(0.0), Cell::Terminal(10.0)]]).unwrap();
        let sol = value_iteration(&grid, &SolverConfig::deterministic()).unwrap();
        assert!((sol.values.get(0, 0).unwrap() - 9.0).abs() < 1e-12);
        assert_eq!(sol.policy.get(0, 0), PolicyLabel::Move(Action::Right));
    }

    #[test]
    fn extract_policy_matches_solution_policy() {
        let grid = presets::small_maze();
        let engine = ValueIteration::new(SolverConfig::default()).unwrap();
        let sol = engine.solve(&grid);
        assert_eq!(engine.extract_policy(&grid, &sol.values), Ok(sol.policy));
    }

    #[test]
    fn tables_from_another_grid_are_rejected() {
        let engine = ValueIteration::new(SolverConfig::default()).unwrap();
        let small = engine.solve(&presets::classic_3x3());
        let big = presets::big_grid();

        let err = engine.extract_policy(&big, &small.values).unwrap_err();
        assert_eq!(err, GridError::MalformedGrid("value table 3x3 does not match grid 8x10".into()));
        assert!(matches!(engine.bellman_residual(&big, &small.values), Err(GridError::MalformedGrid(_))));
        assert!(matches!(engine.q_value(&big, &small.values, 0, 0, Action::Up), Err(GridError::MalformedGrid(_))));
    }
}
