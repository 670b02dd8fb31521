//! Hexagon field: outlined hexagons drifting across the surface.

use std::f64::consts::{PI, TAU};

use backdrop_core::{DrawCommand, EffectKind, Rgba, Viewport};
use rand::{Rng, RngCore};

use crate::motion::wrap_axis;
use crate::population::Population;
use crate::scene::{Scene, clear};

pub const POPULATION: Population = Population::Fixed(15);

const GLOW_SPEED: f64 = 0.02;
const LINE_WIDTH: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Hexagon {
    pub x: f64,
    pub y: f64,
    /// Circumradius in pixels.
    pub size: f64,
    /// Pixels per frame.
    pub speed_x: f64,
    pub speed_y: f64,
    pub opacity: f64,
    pub glow: bool,
    pub glow_intensity: f64,
    pub glow_phase: f64,
}

impl Hexagon {
    fn random(viewport: Viewport, rng: &mut dyn RngCore) -> Self {
        let size = rng.random::<f64>() * (80.0 - 20.0) + 20.0;
        let x = rng.random::<f64>() * viewport.width;
        let y = rng.random::<f64>() * viewport.height;
        let speed_x = (rng.random::<f64>() - 0.5) * 0.2;
        let speed_y = (rng.random::<f64>() - 0.5) * 0.2;
        let opacity = rng.random::<f64>() * 0.3 + 0.1;
        // Roughly 30% of hexagons glow.
        let glow = rng.random::<f64>() > 0.7;
        let glow_intensity = rng.random::<f64>() * 5.0 + 3.0;
        let glow_phase = rng.random::<f64>() * TAU;

        Self {
            x,
            y,
            size,
            speed_x,
            speed_y,
            opacity,
            glow,
            glow_intensity,
            glow_phase,
        }
    }

    /// Drift one frame, wrapping to the opposite edge, and step the glow phase.
    pub fn advance(&mut self, viewport: Viewport) {
        self.x = wrap_axis(self.x + self.speed_x, viewport.width, self.size);
        self.y = wrap_axis(self.y + self.speed_y, viewport.height, self.size);
        if self.glow {
            self.glow_phase += GLOW_SPEED;
        }
    }

    /// Glow strength in `0.6..=1.0`.
    pub fn glow_amount(&self) -> f64 {
        self.glow_phase.sin() * 0.2 + 0.8
    }

    /// Corners at angles `k·π/3`, starting on the positive x axis.
    pub fn vertices(&self) -> [(f64, f64); 6] {
        std::array::from_fn(|i| {
            let angle = PI / 3.0 * i as f64;
            (
                self.x + self.size * angle.cos(),
                self.y + self.size * angle.sin(),
            )
        })
    }

    fn draw(&self, out: &mut Vec<DrawCommand>) {
        if self.glow {
            out.push(DrawCommand::Shadow {
                blur: self.glow_intensity * self.glow_amount(),
                color: Rgba::white(self.opacity * 0.7),
            });
        } else {
            out.push(DrawCommand::Shadow {
                blur: 0.0,
                color: Rgba::TRANSPARENT,
            });
        }

        out.push(DrawCommand::BeginPath);
        for (i, (x, y)) in self.vertices().into_iter().enumerate() {
            if i == 0 {
                out.push(DrawCommand::MoveTo { x, y });
            } else {
                out.push(DrawCommand::LineTo { x, y });
            }
        }
        out.push(DrawCommand::ClosePath);
        out.push(DrawCommand::Stroke {
            color: Rgba::white(self.opacity),
            width: LINE_WIDTH,
        });
        out.push(DrawCommand::Shadow {
            blur: 0.0,
            color: Rgba::TRANSPARENT,
        });
    }
}

/// The hexagon field scene.
#[derive(Debug, Default)]
pub struct HexagonField {
    viewport: Viewport,
    hexagons: Vec<Hexagon>,
}

impl HexagonField {
    pub fn hexagons(&self) -> &[Hexagon] {
        &self.hexagons
    }
}

impl Scene for HexagonField {
    fn kind(&self) -> EffectKind {
        EffectKind::Hexagons
    }

    fn initialize(&mut self, viewport: Viewport, rng: &mut dyn RngCore) {
        let count = POPULATION.count(viewport);
        self.viewport = viewport;
        self.hexagons = (0..count).map(|_| Hexagon::random(viewport, rng)).collect();
        log::debug!(
            "hexagon field seeded with {count} hexagons, {} glowing",
            self.hexagons.iter().filter(|h| h.glow).count()
        );
    }

    fn tick(&mut self, _now: f64, _rng: &mut dyn RngCore) -> Vec<DrawCommand> {
        let mut out = vec![clear(self.viewport)];
        for hexagon in &mut self.hexagons {
            hexagon.advance(self.viewport);
            hexagon.draw(&mut out);
        }
        out
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn len(&self) -> usize {
        self.hexagons.len()
    }
}
