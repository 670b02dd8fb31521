//! The lifecycle every effect implements.

use std::fmt;

use backdrop_core::{DrawCommand, EffectKind, Viewport};
use rand::RngCore;

use crate::{constellation::Constellation, hexagons::HexagonField, voronoi::VoronoiField};

/// A self-contained background effect.
///
/// A scene owns its entity collection outright. `initialize` and `on_resize`
/// replace that collection wholesale; `tick` advances it by one frame and
/// returns the commands that draw it, always starting with a full clear.
pub trait Scene: fmt::Debug {
    fn kind(&self) -> EffectKind;

    /// Generate a fresh entity collection for `viewport`.
    fn initialize(&mut self, viewport: Viewport, rng: &mut dyn RngCore);

    /// React to a viewport change. Regenerates from scratch by default.
    fn on_resize(&mut self, viewport: Viewport, rng: &mut dyn RngCore) {
        self.initialize(viewport, rng);
    }

    /// Advance one frame at wall-clock `now` seconds and draw it.
    fn tick(&mut self, now: f64, rng: &mut dyn RngCore) -> Vec<DrawCommand>;

    fn viewport(&self) -> Viewport;

    /// Number of primary entities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Create an uninitialized scene for `kind`.
pub fn new_scene(kind: EffectKind) -> Box<dyn Scene> {
    match kind {
        EffectKind::Constellation => Box::new(Constellation::default()),
        EffectKind::Hexagons => Box::new(HexagonField::default()),
        EffectKind::Voronoi => Box::new(VoronoiField::default()),
    }
}

/// The clear that opens every frame.
pub(crate) fn clear(viewport: Viewport) -> DrawCommand {
    DrawCommand::ClearRect {
        x: 0.0,
        y: 0.0,
        w: viewport.width,
        h: viewport.height,
    }
}
