//! Constellation: twinkling points joined by faint lines.
//!
//! Points sway around their anchors by at most one pixel, keyed to wall-clock
//! time. Their twinkle is a per-point phase that advances a fixed step every
//! frame, so it speeds up and slows down with the frame rate.

use std::f64::consts::TAU;

use backdrop_core::{DrawCommand, EffectKind, Rgba, Viewport};
use rand::{Rng, RngCore};

use crate::motion::Anchor;
use crate::population::Population;
use crate::scene::{Scene, clear};

/// Points spawned for a viewport.
pub const POPULATION: Population = Population::Density {
    density: 0.00005,
    min: 15,
    max: 40,
};

/// Pairs closer than this are connected.
pub const CONNECTION_RADIUS: f64 = 150.0;

const AMPLITUDE: f64 = 1.0;
const GLOW_THRESHOLD: f64 = 0.8;

/// A single twinkling point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub anchor: Anchor,
    /// Radius in pixels.
    pub size: f64,
    pub twinkle_phase: f64,
    pub twinkle_speed: f64,
}

impl Point {
    fn random(viewport: Viewport, rng: &mut dyn RngCore) -> Self {
        let size = rng.random::<f64>() * 1.5 + 0.5;
        let x = rng.random::<f64>() * viewport.width;
        let y = rng.random::<f64>() * viewport.height;
        let speed_x = 0.1 + rng.random::<f64>() * 0.2;
        let speed_y = 0.1 + rng.random::<f64>() * 0.2;
        let twinkle_phase = rng.random::<f64>() * TAU;
        let twinkle_speed = 0.03 + rng.random::<f64>() * 0.03;

        Self {
            x,
            y,
            anchor: Anchor {
                origin_x: x,
                origin_y: y,
                speed_x,
                speed_y,
            },
            size,
            twinkle_phase,
            twinkle_speed,
        }
    }

    /// Move to the anchored position for `time` and step the twinkle phase.
    pub fn advance(&mut self, time: f64) {
        (self.x, self.y) = self.anchor.position(time, AMPLITUDE);
        self.twinkle_phase += self.twinkle_speed;
    }

    /// Twinkle amount in `0..=1`.
    pub fn twinkle(&self) -> f64 {
        self.twinkle_phase.sin() * 0.5 + 0.5
    }

    fn draw(&self, out: &mut Vec<DrawCommand>) {
        let twinkle = self.twinkle();

        out.push(DrawCommand::BeginPath);
        out.push(DrawCommand::Arc {
            x: self.x,
            y: self.y,
            radius: self.size,
        });
        out.push(DrawCommand::Fill {
            color: Rgba::white(0.2 + twinkle * 0.5),
        });

        if twinkle > GLOW_THRESHOLD {
            out.push(DrawCommand::Shadow {
                blur: 10.0 * twinkle,
                color: Rgba::white(0.5),
            });
            out.push(DrawCommand::BeginPath);
            out.push(DrawCommand::Arc {
                x: self.x,
                y: self.y,
                radius: self.size * 1.2,
            });
            out.push(DrawCommand::Fill {
                color: Rgba::white(0.1 * twinkle),
            });
            out.push(DrawCommand::Shadow {
                blur: 0.0,
                color: Rgba::TRANSPARENT,
            });
        }
    }
}

/// A line between two nearby points, by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    /// `1 - distance / radius`.
    pub opacity: f64,
}

/// Connect every unordered pair closer than `radius`, once per pair.
pub fn build_connections(points: &[Point], radius: f64) -> Vec<Connection> {
    let mut connections = Vec::new();
    for (a, p) in points.iter().enumerate() {
        for (b, q) in points.iter().enumerate().skip(a + 1) {
            let distance = (p.x - q.x).hypot(p.y - q.y);
            if distance < radius {
                connections.push(Connection {
                    a,
                    b,
                    opacity: 1.0 - distance / radius,
                });
            }
        }
    }
    connections
}

/// The constellation scene.
#[derive(Debug, Default)]
pub struct Constellation {
    viewport: Viewport,
    points: Vec<Point>,
    connections: Vec<Connection>,
}

impl Constellation {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Connections from the most recent frame.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Replace the point set, e.g. with hand-placed points.
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.connections.clear();
    }
}

impl Scene for Constellation {
    fn kind(&self) -> EffectKind {
        EffectKind::Constellation
    }

    fn initialize(&mut self, viewport: Viewport, rng: &mut dyn RngCore) {
        let count = POPULATION.count(viewport);
        self.viewport = viewport;
        self.points = (0..count).map(|_| Point::random(viewport, rng)).collect();
        self.connections.clear();
        log::debug!(
            "constellation seeded with {count} points for {}x{}",
            viewport.width,
            viewport.height
        );
    }

    fn tick(&mut self, now: f64, _rng: &mut dyn RngCore) -> Vec<DrawCommand> {
        let mut out = vec![clear(self.viewport)];

        for point in &mut self.points {
            point.advance(now);
            point.draw(&mut out);
        }

        // Lines go on top of the points, after every point has moved.
        self.connections = build_connections(&self.points, CONNECTION_RADIUS);
        for connection in &self.connections {
            let a = &self.points[connection.a];
            let b = &self.points[connection.b];
            out.push(DrawCommand::BeginPath);
            out.push(DrawCommand::MoveTo { x: a.x, y: a.y });
            out.push(DrawCommand::LineTo { x: b.x, y: b.y });
            out.push(DrawCommand::Stroke {
                color: Rgba::white(connection.opacity * 0.2),
                width: 0.3,
            });
        }

        out
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
