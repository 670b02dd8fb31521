//! Effect host state management.

use backdrop_core::{DrawCommand, EffectKind, Viewport};
use rand::{SeedableRng, rngs::StdRng};

use crate::scene::{Scene, new_scene};

/// The active background effect together with its random source.
#[derive(Debug)]
pub struct Backdrop {
    /// Scene currently playing.
    scene: Box<dyn Scene>,
    /// Random source shared by generation and per-frame draws.
    rng: StdRng,
    /// Viewport the scene was last seeded for; `None` before the first frame.
    last_viewport: Option<Viewport>,
}

impl Backdrop {
    /// Create a backdrop playing `kind`, seeded from `seed` or OS entropy.
    pub fn new(kind: EffectKind, seed: Option<u64>) -> Self {
        Self::with_scene(new_scene(kind), seed)
    }

    /// Create a backdrop around an existing scene.
    pub fn with_scene(scene: Box<dyn Scene>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            scene,
            rng,
            last_viewport: None,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.scene.kind()
    }

    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    /// Switch to another effect, seeding it for the current viewport.
    pub fn set_effect(&mut self, kind: EffectKind) {
        log::debug!("switching effect {} -> {}", self.kind(), kind);
        self.scene = new_scene(kind);
        if let Some(viewport) = self.last_viewport {
            self.scene.initialize(viewport, &mut self.rng);
        }
    }

    /// Switch to the next effect in the cycle and return it.
    pub fn cycle_effect(&mut self) -> EffectKind {
        let next = self.kind().next();
        self.set_effect(next);
        next
    }

    /// Throw away the current entities and generate new ones.
    pub fn reseed(&mut self) {
        if let Some(viewport) = self.last_viewport {
            self.scene.on_resize(viewport, &mut self.rng);
        }
    }

    /// Produce the commands for one frame at `now` seconds.
    ///
    /// The scene is regenerated first when `viewport` differs from the one it
    /// was last seeded for.
    pub fn frame(&mut self, viewport: Viewport, now: f64) -> Vec<DrawCommand> {
        match self.last_viewport {
            None => self.scene.initialize(viewport, &mut self.rng),
            Some(last) if last != viewport => {
                log::debug!(
                    "viewport {}x{} -> {}x{}",
                    last.width,
                    last.height,
                    viewport.width,
                    viewport.height
                );
                self.scene.on_resize(viewport, &mut self.rng);
            }
            Some(_) => {}
        }
        self.last_viewport = Some(viewport);

        self.scene.tick(now, &mut self.rng)
    }
}
