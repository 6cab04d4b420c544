use crate::core::RenderFrame;
use crate::mdp::{Cell, Grid};
use crate::solver::ValueTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

pub const BLACK: Color = Color(0, 0, 0, 255);
pub const WHITE: Color = Color(255, 255, 255, 255);
pub const RED: Color = Color(220, 20, 60, 255);
pub const GREEN: Color = Color(0, 200, 0, 255);
pub const GRAY: Color = Color(180, 180, 180, 255);

/// A minimal RGBA software canvas.
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        };
        canvas.clear(BLACK);
        canvas
    }

    pub fn clear(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.0, color.1, color.2, color.3]);
        }
    }

    /// Color at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height { return None; }
        let idx = ((y * self.width + x) as usize) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Color(p[0], p[1], p[2], p[3]))
    }

    /// Draw a filled rectangle with top-left (x, y), width w, height h, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 { return; }
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = (x + w).min(self.width as i32).max(0) as u32;
        let y1 = (y + h).min(self.height as i32).max(0) as u32;
        for yy in y0..y1 {
            let base = (yy * self.width) as usize * 4;
            for xx in x0..x1 {
                let idx = base + (xx as usize) * 4;
                self.pixels[idx..idx + 4].copy_from_slice(&[color.0, color.1, color.2, color.3]);
            }
        }
    }

    pub fn into_render_frame(self) -> RenderFrame {
        RenderFrame::Pixels { width: self.width, height: self.height, data: self.pixels }
    }
}

/// Linear blend between two colors, `t` clamped to [0, 1].
fn lerp(a: Color, b: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Color(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2), 255)
}

/// Heat map of a value table: red (lowest) through white to green (highest),
/// gray walls, one `cell_px` square per cell separated by a 1px black grid line.
pub fn render_value_heatmap(grid: &Grid, values: &ValueTable, cell_px: u32) -> RenderFrame {
    let cell_px = cell_px.max(2);
    let mut canvas = Canvas::new(grid.cols() as u32 * cell_px, grid.rows() as u32 * cell_px);
    let (lo, hi) = values.min_max().unwrap_or((0.0, 0.0));
    let span = hi - lo;

    for ((i, j), cell) in grid.iter() {
        let color = match (cell, values.get(i, j)) {
            (Cell::Wall, _) | (_, None) => GRAY,
            (_, Some(v)) if span > 0.0 => {
                let t = (v - lo) / span;
                if t < 0.5 { lerp(RED, WHITE, t * 2.0) } else { lerp(WHITE, GREEN, (t - 0.5) * 2.0) }
            }
            _ => WHITE,
        };
        let x = (j as u32 * cell_px) as i32 + 1;
        let y = (i as u32 * cell_px) as i32 + 1;
        canvas.fill_rect(x, y, cell_px as i32 - 1, cell_px as i32 - 1, color);
    }
    canvas.into_render_frame()
}
