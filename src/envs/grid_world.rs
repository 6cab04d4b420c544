use crate::core::{Env, GridError, Info, RenderFrame, Result, Step};
use crate::envs::presets;
use crate::mdp::{next_state, Action, Cell, Grid};
use crate::solver::{check_shape, PolicyTable, SolverConfig};
use crate::utils::rng::{rng_from_seed, RngStream, SeedSequence};
use rand::distributions::{Distribution, Uniform};

/// Stochastic simulator of the slippery grid world.
///
/// Observation: agent coordinate `(row, col)`
/// Action: one of the four compass moves; slips with the configured probabilities
/// Reward: reward of the cell being left, plus the terminal reward on entering a terminal cell
/// Episode: terminates on entering a terminal cell, truncates at `max_episode_steps`
pub struct GridWorldEnv {
    grid: Grid,
    start: (usize, usize),
    pos: (usize, usize),

    p_forward: f64,
    p_left: f64,

    steps: u32,
    pub max_episode_steps: u32,

    rng: RngStream,
}

/// Summary of one policy rollout.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    pub total_reward: f64,
    pub steps: u32,
    pub reached_goal: bool,
    /// Visited coordinates, starting with the start cell.
    pub trajectory: Vec<(usize, usize)>,
}

/// Aggregate statistics over several rollouts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolicyEvaluation {
    pub episodes: usize,
    pub mean_return: f64,
    pub mean_steps: f64,
    /// Fraction of episodes that ended in a terminal cell.
    pub goal_rate: f64,
}

impl Default for GridWorldEnv {
    fn default() -> Self {
        Self::new(presets::classic_3x3(), (2, 0), &SolverConfig::default(), 1_234_567)
            .expect("bottom-left cell of the 3x3 preset is free")
    }
}

impl GridWorldEnv {
    /// Create a simulator starting at `start`. The slip probabilities come from `config`.
    pub fn new(grid: Grid, start: (usize, usize), config: &SolverConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let (i, j) = start;
        match grid.get(i, j) {
            None => {
                return Err(GridError::OutOfBounds(format!(
                    "start ({}, {}) outside {}x{} grid",
                    i, j, grid.rows(), grid.cols()
                )));
            }
            Some(Cell::Free(_)) => {}
            Some(other) => {
                return Err(GridError::InvalidStart(format!("start ({}, {}) is {:?}, expected a free cell", i, j, other)));
            }
        }
        Ok(Self {
            grid,
            start,
            pos: start,
            p_forward: config.p_forward,
            p_left: config.p_left,
            steps: 0,
            max_episode_steps: 200,
            rng: rng_from_seed(seed),
        })
    }

    pub fn grid(&self) -> &Grid { &self.grid }

    pub fn position(&self) -> (usize, usize) { self.pos }

    /// Sample which move is actually executed for the intended `action`.
    fn executed_action(&mut self, action: Action) -> Action {
        let u = Uniform::new(0.0f64, 1.0).sample(&mut self.rng);
        let (left, right) = action.slip_pair();
        if u < self.p_forward {
            action
        } else if u < self.p_forward + self.p_left {
            left
        } else {
            right
        }
    }

    /// Grid as text: `#` walls, `G` terminals, `.` free cells, `A` the agent.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(self.grid.len() + self.grid.rows());
        for ((i, j), cell) in self.grid.iter() {
            let c = if (i, j) == self.pos {
                'A'
            } else {
                match cell {
                    Cell::Wall => '#',
                    Cell::Terminal(_) => 'G',
                    Cell::Free(_) => '.',
                }
            };
            out.push(c);
            if j + 1 == self.grid.cols() && i + 1 < self.grid.rows() {
                out.push('\n');
            }
        }
        out
    }

    /// Follow `policy` from the start cell until termination or truncation.
    pub fn run_policy(&mut self, policy: &PolicyTable, seed: Option<u64>) -> Result<Episode> {
        check_shape("policy", policy.rows(), policy.cols(), &self.grid)?;
        let (mut pos, _info) = self.reset(seed);
        let mut episode = Episode { total_reward: 0.0, steps: 0, reached_goal: false, trajectory: vec![pos] };
        while let Some(action) = policy.action(pos.0, pos.1) {
            let s = self.step(action);
            pos = s.observation;
            episode.total_reward += s.reward;
            episode.steps += 1;
            episode.trajectory.push(pos);
            if s.terminated {
                episode.reached_goal = true;
                break;
            }
            if s.truncated { break; }
        }
        Ok(episode)
    }

    /// Roll out `policy` for `episodes` episodes with sub-seeds derived from `seed`.
    pub fn evaluate_policy(&mut self, policy: &PolicyTable, episodes: usize, seed: u64) -> Result<PolicyEvaluation> {
        check_shape("policy", policy.rows(), policy.cols(), &self.grid)?;
        let mut seeds = SeedSequence::new(seed);
        let mut eval = PolicyEvaluation { episodes, ..PolicyEvaluation::default() };
        for _ in 0..episodes {
            let ep = self.run_policy(policy, Some(seeds.next_subseed()))?;
            eval.mean_return += ep.total_reward;
            eval.mean_steps += ep.steps as f64;
            if ep.reached_goal { eval.goal_rate += 1.0; }
        }
        if episodes > 0 {
            let n = episodes as f64;
            eval.mean_return /= n;
            eval.mean_steps /= n;
            eval.goal_rate /= n;
        }
        Ok(eval)
    }
}

impl Env for GridWorldEnv {
    type Obs = (usize, usize);
    type Act = Action;

    fn reset(&mut self, seed: Option<u64>) -> (Self::Obs, Info) {
        if let Some(s) = seed { self.rng = rng_from_seed(s); }
        self.pos = self.start;
        self.steps = 0;
        (self.pos, Info::new())
    }

    fn step(&mut self, action: Self::Act) -> Step<Self::Obs> {
        let (i, j) = self.pos;
        let mut info = Info::new();
        let origin = self.grid.cell(i, j);
        if !origin.is_free() {
            // stepping after termination is a no-op
            return Step::new(self.pos, 0.0, true, false, info);
        }

        let executed = self.executed_action(action);
        let dest = next_state(&self.grid, i, j, executed);
        self.pos = dest;
        self.steps += 1;

        let mut reward = origin.reward().unwrap_or(0.0);
        let dest_cell = self.grid.cell(dest.0, dest.1);
        let terminated = dest_cell.is_terminal();
        if let Cell::Terminal(r) = dest_cell { reward += r; }
        let truncated = !terminated && self.steps >= self.max_episode_steps;

        info.insert("slipped", (executed != action).into());
        info.insert("executed", executed.to_string().into());
        Step::new(dest, reward, terminated, truncated, info)
    }

    fn render(&self) -> Option<RenderFrame> { Some(RenderFrame::Text(self.render_text())) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InfoValue;
    use crate::solver::value_iteration;

    #[test]
    fn rejects_bad_start_cells() {
        let cfg = SolverConfig::default();
        assert!(matches!(GridWorldEnv::new(presets::classic_3x3(), (3, 0), &cfg, 0), Err(GridError::OutOfBounds(_))));
        assert!(matches!(GridWorldEnv::new(presets::classic_3x3(), (1, 1), &cfg, 0), Err(GridError::InvalidStart(_))));
        assert!(matches!(GridWorldEnv::new(presets::classic_3x3(), (0, 2), &cfg, 0), Err(GridError::InvalidStart(_))));
    }

    #[test]
    fn deterministic_moves_follow_transition_model() {
        let mut env = GridWorldEnv::new(presets::classic_3x3(), (2, 0), &SolverConfig::deterministic(), 7).unwrap();
        env.reset(None);
        let s = env.step(Action::Up);
        assert_eq!(s.observation, (1, 0));
        assert_eq!(s.info.get("slipped"), Some(&InfoValue::Bool(false)));
        let s = env.step(Action::Right);
        // wall at (1,1) blocks
        assert_eq!(s.observation, (1, 0));
        assert!(!s.terminated);
    }

    #[test]
    fn entering_goal_terminates_and_pays_terminal_reward() {
        let mut env = GridWorldEnv::new(presets::classic_3x3(), (0, 1), &SolverConfig::deterministic(), 7).unwrap();
        env.reset(None);
        let s = env.step(Action::Right);
        assert_eq!(s.observation, (0, 2));
        assert!(s.terminated);
        assert!((s.reward - (10.0 - 0.04)).abs() < 1e-12);
        let after = env.step(Action::Left);
        assert!(after.terminated);
        assert_eq!(after.reward, 0.0);
    }

    #[test]
    fn same_seed_same_rollout() {
        let grid = presets::big_grid();
        let sol = value_iteration(&grid, &SolverConfig::default()).unwrap();
        let mut a = GridWorldEnv::new(grid.clone(), (7, 0), &SolverConfig::default(), 3).unwrap();
        let mut b = GridWorldEnv::new(grid, (7, 0), &SolverConfig::default(), 3).unwrap();
        assert_eq!(a.run_policy(&sol.policy, Some(11)).unwrap(), b.run_policy(&sol.policy, Some(11)).unwrap());
    }

    #[test]
    fn greedy_policy_reaches_goal_without_slip() {
        let grid = presets::big_grid();
        let cfg = SolverConfig::deterministic();
        let sol = value_iteration(&grid, &cfg).unwrap();
        let mut env = GridWorldEnv::new(grid, (7, 0), &cfg, 0).unwrap();
        let ep = env.run_policy(&sol.policy, None).unwrap();
        assert!(ep.reached_goal);
        assert_eq!(ep.trajectory.last(), Some(&(0, 9)));
        assert_eq!(ep.trajectory.len() as u32, ep.steps + 1);
    }

    #[test]
    fn slippery_rollouts_mostly_reach_goal() {
        let grid = presets::classic_3x3();
        let cfg = SolverConfig::default();
        let sol = value_iteration(&grid, &cfg).unwrap();
        let mut env = GridWorldEnv::new(grid, (2, 0), &cfg, 0).unwrap();
        let eval = env.evaluate_policy(&sol.policy, 200, 42).unwrap();
        assert_eq!(eval.episodes, 200);
        assert!(eval.goal_rate > 0.9, "goal rate {}", eval.goal_rate);
        assert!(eval.mean_steps >= 4.0);
        assert_eq!(Ok(eval), env.evaluate_policy(&sol.policy, 200, 42));
    }

    #[test]
    fn policy_for_another_grid_is_rejected() {
        let small = value_iteration(&presets::classic_3x3(), &SolverConfig::default()).unwrap();
        let mut env = GridWorldEnv::new(presets::big_grid(), (7, 0), &SolverConfig::default(), 0).unwrap();
        let err = env.run_policy(&small.policy, None).unwrap_err();
        assert_eq!(err, GridError::MalformedGrid("policy 3x3 does not match grid 8x10".into()));
        assert!(matches!(env.evaluate_policy(&small.policy, 10, 1), Err(GridError::MalformedGrid(_))));
        assert_eq!(env.position(), (7, 0));
    }

    #[test]
    fn truncates_at_step_limit() {
        let mut env = GridWorldEnv::new(presets::classic_3x3(), (2, 0), &SolverConfig::deterministic(), 1).unwrap();
        env.max_episode_steps = 3;
        env.reset(None);
        // Left from the bottom-left corner never moves
        assert!(!env.step(Action::Left).truncated);
        assert!(!env.step(Action::Left).truncated);
        let last = env.step(Action::Left);
        assert_eq!(last.observation, (2, 0));
        assert!(last.truncated);
        assert!(!last.terminated);
    }

    #[test]
    fn render_marks_agent() {
        let env = GridWorldEnv::default();
        assert_eq!(env.render(), Some(RenderFrame::Text("..G\n.#.\nA..".into())));
    }
}
