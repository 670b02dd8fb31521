//! Decorative background effects.
//!
//! Three interchangeable scenes are provided: a twinkling
//! [constellation](constellation), a drifting [hexagon field](hexagons) and an
//! approximate [Voronoi shimmer](voronoi). Each scene owns its entities,
//! regenerates them for a new viewport and turns every frame into a list of
//! [`DrawCommand`](backdrop_core::DrawCommand)s. [`Backdrop`] hosts the active
//! scene and [`FrameLoop`] drives it with a stoppable, panic-tolerant loop.

pub mod constellation;
pub mod hexagons;
pub mod voronoi;

mod driver;
mod motion;
mod population;
mod scene;
mod state;

#[cfg(test)]
mod test_rng;

pub use driver::{FrameLoop, FrameOutcome, LoopHandle, in_frame};
pub use motion::{Anchor, wrap_axis};
pub use population::Population;
pub use scene::{Scene, new_scene};
pub use state::Backdrop;
