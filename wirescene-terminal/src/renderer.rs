/// Character-cell rasterizer for wireframe outlines
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use std::io::Write;
use wirescene_core::projection::project;
use wirescene_core::{Camera, Drawable, Rgb};

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// Outlines at least this wide are drawn with a heavy glyph
const HEAVY_OUTLINE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Option<Rgb>,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: None,
};

/// Renderer that rasterizes projected line segments into terminal characters
pub struct LineRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl LineRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    /// Glyph at a cell, for inspection
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].glyph)
    }

    pub fn render_drawable(&mut self, drawable: &Drawable, group: &Matrix4<f32>, camera: &Camera) {
        let mvp = camera.mvp(&(group * drawable.model));
        let color = drawable.outline.color.to_rgb();
        let heavy = drawable.outline.width >= HEAVY_OUTLINE;
        let (w, h) = (self.width as u32, self.height as u32);

        for [a, b] in &drawable.edges {
            // Segments crossing the near plane are dropped whole
            if let (Some(start), Some(end)) = (project(&mvp, a, w, h), project(&mvp, b, w, h)) {
                self.draw_segment(start, end, color, heavy);
            }
        }
    }

    /// DDA line walk with per-cell depth test
    pub fn draw_segment(
        &mut self,
        start: (f32, f32, f32),
        end: (f32, f32, f32),
        color: Rgb,
        heavy: bool,
    ) {
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let steps = dx.abs().max(dy.abs()).ceil();

        // Way off-screen segments would walk millions of cells for nothing
        let limit = 4.0 * (self.width + self.height) as f32;
        if !steps.is_finite() || steps > limit {
            return;
        }

        let glyph = if heavy { '#' } else { slope_glyph(dx, dy) };
        let steps = steps.max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (start.0 + dx * t).floor();
            let y = (start.1 + dy * t).floor();
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let depth = start.2 + (end.2 - start.2) * t;
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.cells[idx] = Cell {
                    glyph,
                    color: Some(color),
                };
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if cell.color != current {
                    let color = match cell.color {
                        Some(Rgb { r, g, b }) => Color::Rgb { r, g, b },
                        None => Color::Reset,
                    };
                    writer.queue(SetForegroundColor(color))?;
                    current = cell.color;
                }
                writer.queue(Print(cell.glyph))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a glyph following the on-screen direction of a segment
fn slope_glyph(dx: f32, dy: f32) -> char {
    // Rows count downwards and cells are tall, so scale dy before comparing
    let (ax, ay) = (dx.abs(), dy.abs() * CELL_ASPECT);
    if ay < ax * 0.5 {
        '-'
    } else if ax < ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}
