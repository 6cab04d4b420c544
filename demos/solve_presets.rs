use gridworld_vi::envs::presets;
use gridworld_vi::{format_policy, format_values, render_value_heatmap, save_png, GridWorldEnv, SolverConfig, ValueIteration};

fn main() {
    let config = SolverConfig::default();
    let engine = ValueIteration::new(config.clone()).expect("default config is valid");

    let grids = [
        ("small_maze", presets::small_maze()),
        ("classic_3x3", presets::classic_3x3()),
        ("big_grid", presets::big_grid()),
        ("bad_shortcut", presets::bad_shortcut()),
    ];

    for (name, grid) in grids {
        let sol = engine.solve(&grid);
        println!("== {} ({} sweeps, delta={:.5}, converged={})", name, sol.iterations, sol.delta, sol.converged);
        println!("Values:\n{}\n", format_values(&sol.values, 3));
        println!("Policy:\n{}\n", format_policy(&sol.policy));

        // Start from the first free cell in row-major order
        if let Some(((i, j), _)) = grid.iter().find(|(_, c)| c.is_free()) {
            let mut env = GridWorldEnv::new(grid.clone(), (i, j), &config, 0).expect("free start cell");
            let eval = env.evaluate_policy(&sol.policy, 500, 2024).expect("policy solved on this grid");
            println!(
                "Rollouts from ({}, {}): goal rate {:.2}, mean return {:.3}, mean steps {:.1}\n",
                i, j, eval.goal_rate, eval.mean_return, eval.mean_steps
            );
        }

        let frame = render_value_heatmap(&grid, &sol.values, 24);
        if let Err(e) = save_png(format!("{}.png", name), &frame) {
            eprintln!("skipping heat map: {}", e);
        }
    }
}
