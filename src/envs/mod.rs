pub mod grid_world;
pub mod presets;

pub use grid_world::{Episode, GridWorldEnv, PolicyEvaluation};
