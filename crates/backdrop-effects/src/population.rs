//! Entity counts for a viewport.

use backdrop_core::Viewport;

/// How many entities an effect spawns for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Population {
    /// Always the same count regardless of size.
    Fixed(usize),
    /// `clamp(floor(area * density), min, max)`.
    Density { density: f64, min: usize, max: usize },
}

impl Population {
    pub fn count(&self, viewport: Viewport) -> usize {
        match *self {
            Population::Fixed(n) => n,
            Population::Density { density, min, max } => {
                // Negative or NaN areas saturate to zero.
                let raw = (viewport.area() * density).floor() as usize;
                raw.clamp(min, max)
            }
        }
    }
}
