use gridworld_vi::envs::presets;
use gridworld_vi::{
    format_values, value_iteration, Action, Cell, Env, Grid, GridError, GridWorldEnv, PolicyLabel, RawCell,
    SolverConfig, TERMINAL_REWARD,
};

#[test]
fn classic_grid_converges_with_defaults() {
    let grid = presets::classic_3x3();
    let cfg = SolverConfig::default();
    let sol = value_iteration(&grid, &cfg).unwrap();
    assert!(sol.converged);
    assert!(sol.iterations < cfg.max_iterations);

    let next_to_goal = sol.values.get(0, 1).unwrap();
    assert!(next_to_goal > 0.0 && next_to_goal < 10.0);
    assert_eq!(sol.policy.get(0, 1), PolicyLabel::Move(Action::Right));
}

#[test]
fn bad_shortcut_takes_the_long_way_round() {
    let grid = presets::bad_shortcut();
    let sol = value_iteration(&grid, &SolverConfig::default()).unwrap();
    // With slipping, pressing Left into the edge only ever slips Down or stays,
    // which beats heading Down and risking a slip into the -50 cell
    assert_eq!(sol.policy.get(0, 0), PolicyLabel::Move(Action::Left));
    assert_eq!(sol.policy.get(1, 0), PolicyLabel::Move(Action::Down));
    assert_eq!(sol.policy.get(3, 0), PolicyLabel::Move(Action::Right));
    assert_eq!(sol.policy.get(1, 3), PolicyLabel::Move(Action::Up));
    assert!(sol.values.get(0, 1).unwrap() < -50.0);

    let det = value_iteration(&grid, &SolverConfig::deterministic()).unwrap();
    assert_eq!(det.policy.get(0, 0), PolicyLabel::Move(Action::Down));
}

#[test]
fn terminal_sentinel_collision_is_preserved_by_from_raw() {
    // A cell that merely carries 10.0 is a terminal when inferred from raw values...
    let raw = vec![vec![RawCell::Reward(0.0), RawCell::Reward(10.0), RawCell::Reward(0.0)]];
    let inferred = Grid::from_raw(raw, TERMINAL_REWARD).unwrap();
    assert!(inferred.is_terminal(0, 1));

    // ...while explicit construction lets it stay an ordinary rewarding cell
    let explicit = Grid::new(vec![vec![Cell::Free(0.0), Cell::Free(10.0), Cell::Free(0.0)]]).unwrap();
    let sol = value_iteration(&explicit, &SolverConfig::default()).unwrap();
    assert!(matches!(sol.policy.get(0, 1), PolicyLabel::Move(_)));
    assert!(sol.values.get(0, 1).unwrap() > 10.0);
}

#[test]
fn malformed_inputs_fail_before_solving() {
    let ragged = Grid::from_raw(vec![vec![RawCell::Wall], vec![]], TERMINAL_REWARD);
    assert!(matches!(ragged, Err(GridError::MalformedGrid(_))));

    let grid = presets::small_maze();
    let cfg = SolverConfig::default().with_theta(2.0);
    assert!(matches!(value_iteration(&grid, &cfg), Err(GridError::InvalidConfig(_))));
}

#[test]
fn big_grid_values_render_as_table() {
    let grid = presets::big_grid();
    let sol = value_iteration(&grid, &SolverConfig::default()).unwrap();
    let text = format_values(&sol.values, 3);
    assert_eq!(text.lines().count(), 8);
    assert_eq!(text.matches("##").count(), grid.iter().filter(|(_, c)| c.is_wall()).count());
}

#[test]
fn env_rollout_follows_solved_policy() {
    let grid = presets::small_maze();
    let cfg = SolverConfig::deterministic();
    let sol = value_iteration(&grid, &cfg).unwrap();
    let mut env = GridWorldEnv::new(grid, (1, 0), &cfg, 5).unwrap();
    let (start, _) = env.reset(None);
    assert_eq!(start, (1, 0));
    let ep = env.run_policy(&sol.policy, None).unwrap();
    assert!(ep.reached_goal);
    assert_eq!(ep.trajectory.last(), Some(&(1, 3)));
}
