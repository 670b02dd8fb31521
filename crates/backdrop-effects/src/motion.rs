//! Motion policies shared by the effects.

/// Anchor for bounded periodic motion around a fixed origin.
///
/// The position is a pure function of wall-clock time, so it never drifts no
/// matter how irregular the frame rate is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub origin_x: f64,
    pub origin_y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
}

impl Anchor {
    /// Position at `time` seconds, displaced at most `amplitude` on each axis.
    pub fn position(&self, time: f64, amplitude: f64) -> (f64, f64) {
        (
            self.origin_x + (time * self.speed_x).sin() * amplitude,
            self.origin_y + (time * self.speed_y).cos() * amplitude,
        )
    }
}

/// Wrap a drifting coordinate that left `[-size, extent + size]` to just
/// outside the opposite edge.
pub fn wrap_axis(value: f64, extent: f64, size: f64) -> f64 {
    let mut value = value;
    if value > extent + size {
        value = -size;
    }
    if value < -size {
        value = extent + size;
    }
    value
}
