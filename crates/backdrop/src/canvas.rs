//! Terminal drawing surface backed by a ratatui braille canvas.
//!
//! Path operations are flattened into canvas lines, rings and dots as the
//! frame is replayed. Colors are white with alpha, so each one becomes the
//! current tint scaled by its clamped alpha over a black background.

use backdrop_core::{Rgba, Surface, Tint, Viewport};
use ratatui::{
    style::Color,
    widgets::canvas::{Circle, Line, Painter, Points, Shape},
};

/// Alpha below which a mark is not worth painting.
const MIN_VISIBLE_ALPHA: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathOp {
    Move(f64, f64),
    Line(f64, f64),
    Arc { x: f64, y: f64, radius: f64 },
    Close,
}

/// Something already rasterizable, in surface coordinates (y down).
#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Segment {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },
    Ring {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
    Dots {
        coords: Vec<(f64, f64)>,
        color: Color,
    },
}

impl Mark {
    /// Reference point used when clearing part of the surface.
    fn origin(&self) -> (f64, f64) {
        match self {
            Mark::Segment { x1, y1, .. } => (*x1, *y1),
            Mark::Ring { x, y, .. } => (*x, *y),
            Mark::Dots { coords, .. } => coords.first().copied().unwrap_or_default(),
        }
    }
}

/// Glow set by the last `set_shadow`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Glow {
    blur: f64,
    color: Rgba,
}

/// A [`Surface`] that collects marks for a ratatui [`Canvas`](ratatui::widgets::canvas::Canvas).
#[derive(Debug)]
pub struct TerminalSurface {
    viewport: Viewport,
    tint: Tint,
    /// Distance between braille dots in virtual pixels.
    dot_pitch: f64,
    path: Vec<PathOp>,
    glow: Option<Glow>,
    marks: Vec<Mark>,
}

impl TerminalSurface {
    pub fn new(tint: Tint) -> Self {
        Self {
            viewport: Viewport::default(),
            tint,
            dot_pitch: 4.0,
            path: Vec::new(),
            glow: None,
            marks: Vec::new(),
        }
    }

    /// Match the surface to the terminal area before a frame is replayed.
    pub fn configure(&mut self, viewport: Viewport, tint: Tint, cell_w: u16, cell_h: u16) {
        self.viewport = viewport;
        self.tint = tint;
        // Braille packs 2×4 dots into a cell.
        self.dot_pitch = (f64::from(cell_w) / 2.0)
            .min(f64::from(cell_h) / 4.0)
            .max(1.0);
    }

    #[cfg(test)]
    fn mark_count(&self) -> usize {
        self.marks.len()
    }

    /// Terminal color for `color`, or `None` when it is too faint to show.
    fn shade(&self, color: Rgba) -> Option<Color> {
        let alpha = color.clamped_alpha();
        if alpha < MIN_VISIBLE_ALPHA {
            return None;
        }
        let tint = self.tint.rgb();
        let channel = |c: u8, t: u8| (f64::from(c) * f64::from(t) / 255.0 * alpha).round() as u8;
        Some(Color::Rgb(
            channel(color.rgb.0, tint.0),
            channel(color.rgb.1, tint.1),
            channel(color.rgb.2, tint.2),
        ))
    }

    /// Brighten `color` by the active glow.
    fn glowing(&self, color: Rgba) -> Rgba {
        match self.glow {
            Some(glow) => Rgba {
                alpha: color.alpha + glow.color.alpha * (glow.blur / 20.0).min(1.0) * 0.5,
                ..color
            },
            None => color,
        }
    }

    /// Halo ring drawn around filled arcs while a glow is active.
    fn halo(&mut self, x: f64, y: f64, radius: f64) {
        if let Some(glow) = self.glow
            && let Some(color) = self.shade(glow.color)
        {
            self.marks.push(Mark::Ring {
                x,
                y,
                radius: radius + glow.blur / 4.0,
                color,
            });
        }
    }

    /// Dot coordinates covering a disc, at least its center.
    fn disc(&self, x: f64, y: f64, radius: f64) -> Vec<(f64, f64)> {
        let mut coords = vec![(x, y)];
        let steps = (radius / self.dot_pitch).floor() as i32;
        for i in -steps..=steps {
            for j in -steps..=steps {
                if (i, j) == (0, 0) {
                    continue;
                }
                let dx = f64::from(i) * self.dot_pitch;
                let dy = f64::from(j) * self.dot_pitch;
                if dx.hypot(dy) <= radius {
                    coords.push((x + dx, y + dy));
                }
            }
        }
        coords
    }
}

impl Surface for TerminalSurface {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let covers_all =
            x <= 0.0 && y <= 0.0 && x + w >= self.viewport.width && y + h >= self.viewport.height;
        if covers_all {
            self.marks.clear();
        } else {
            self.marks.retain(|m| {
                let (mx, my) = m.origin();
                !(mx >= x && mx < x + w && my >= y && my < y + h)
            });
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(PathOp::Move(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push(PathOp::Line(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        self.path.push(PathOp::Arc { x, y, radius });
    }

    fn close_path(&mut self) {
        self.path.push(PathOp::Close);
    }

    fn stroke(&mut self, color: Rgba, _width: f64) {
        let Some(color) = self.shade(self.glowing(color)) else {
            return;
        };

        let mut start = None;
        let mut current = None;
        for op in &self.path {
            match *op {
                PathOp::Move(x, y) => {
                    start = Some((x, y));
                    current = Some((x, y));
                }
                PathOp::Line(x, y) => {
                    if let Some((x1, y1)) = current {
                        self.marks.push(Mark::Segment {
                            x1,
                            y1,
                            x2: x,
                            y2: y,
                            color,
                        });
                    } else {
                        start = Some((x, y));
                    }
                    current = Some((x, y));
                }
                PathOp::Arc { x, y, radius } => {
                    self.marks.push(Mark::Ring {
                        x,
                        y,
                        radius,
                        color,
                    });
                }
                PathOp::Close => {
                    if let (Some((x1, y1)), Some((x2, y2))) = (current, start) {
                        self.marks.push(Mark::Segment {
                            x1,
                            y1,
                            x2,
                            y2,
                            color,
                        });
                        current = start;
                    }
                }
            }
        }
    }

    fn fill(&mut self, color: Rgba) {
        // Only arcs are filled; no effect fills polygons.
        let arcs: Vec<(f64, f64, f64)> = self
            .path
            .iter()
            .filter_map(|op| match *op {
                PathOp::Arc { x, y, radius } => Some((x, y, radius)),
                _ => None,
            })
            .collect();

        let shaded = self.shade(self.glowing(color));
        for (x, y, radius) in arcs {
            self.halo(x, y, radius);
            if let Some(color) = shaded {
                let coords = self.disc(x, y, radius);
                self.marks.push(Mark::Dots { coords, color });
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        let Some(color) = self.shade(self.glowing(color)) else {
            return;
        };
        let mut coords = vec![(x + w / 2.0, y + h / 2.0)];
        if w > self.dot_pitch || h > self.dot_pitch {
            coords.clear();
            let mut yy = y;
            while yy < y + h {
                let mut xx = x;
                while xx < x + w {
                    coords.push((xx, yy));
                    xx += self.dot_pitch;
                }
                yy += self.dot_pitch;
            }
        }
        self.marks.push(Mark::Dots { coords, color });
    }

    fn set_shadow(&mut self, blur: f64, color: Rgba) {
        self.glow = (blur > 0.0).then_some(Glow { blur, color });
    }
}

impl Shape for TerminalSurface {
    fn draw(&self, painter: &mut Painter) {
        // Canvas y grows upwards.
        let h = self.viewport.height;
        for mark in &self.marks {
            match mark {
                Mark::Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                } => Line::new(*x1, h - y1, *x2, h - y2, *color).draw(painter),
                Mark::Ring {
                    x,
                    y,
                    radius,
                    color,
                } => Circle {
                    x: *x,
                    y: h - y,
                    radius: *radius,
                    color: *color,
                }
                .draw(painter),
                Mark::Dots { coords, color } => {
                    let flipped: Vec<(f64, f64)> = coords.iter().map(|&(x, y)| (x, h - y)).collect();
                    Points {
                        coords: &flipped,
                        color: *color,
                    }
                    .draw(painter);
                }
            }
        }
    }
}
