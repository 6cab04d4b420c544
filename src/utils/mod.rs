pub mod rng;
pub mod render;
pub mod render2d;

pub use rng::{RngStream, SeedSequence, rng_from_seed, split_n};
pub use render::{arrows_from_policy, encode_png, format_policy, format_values, save_png};
pub use render2d::{Canvas, Color, render_value_heatmap};
