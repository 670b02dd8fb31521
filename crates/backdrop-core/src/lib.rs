//! Core types shared by the backdrop crates.
//!
//! This crate holds everything the effects and their hosts agree on: the
//! viewport, colors and tints, the effect selector, the drawing command
//! stream with its [`Surface`] trait, and the [`Clock`] time source.

mod clock;
mod color;
mod effect;
mod surface;
mod viewport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use color::{Rgb, Rgba, Tint};
pub use effect::EffectKind;
pub use surface::{DrawCommand, Surface, replay};
pub use viewport::Viewport;
