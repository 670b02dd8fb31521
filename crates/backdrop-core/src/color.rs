//! Colors and tints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A color with a straight (non-premultiplied) alpha.
///
/// Alpha is not clamped here. Effects may emit values above 1.0 and
/// surfaces are expected to clamp when they paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::white(0.0);

    /// White at the given alpha, the only hue the effects draw with.
    pub const fn white(alpha: f64) -> Self {
        Self {
            rgb: Rgb(255, 255, 255),
            alpha,
        }
    }

    /// Alpha clamped to `0.0..=1.0`.
    pub fn clamped_alpha(&self) -> f64 {
        self.alpha.clamp(0.0, 1.0)
    }
}

/// Tint applied by hosts to the white the effects draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tint {
    #[default]
    Mono,
    Frost,
    Ember,
    Moss,
    Violet,
}

impl Tint {
    pub const ALL: [Tint; 5] = [
        Tint::Mono,
        Tint::Frost,
        Tint::Ember,
        Tint::Moss,
        Tint::Violet,
    ];

    /// Cycle to the next tint.
    pub fn next(self) -> Self {
        match self {
            Tint::Mono => Tint::Frost,
            Tint::Frost => Tint::Ember,
            Tint::Ember => Tint::Moss,
            Tint::Moss => Tint::Violet,
            Tint::Violet => Tint::Mono,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tint::Mono => "mono",
            Tint::Frost => "frost",
            Tint::Ember => "ember",
            Tint::Moss => "moss",
            Tint::Violet => "violet",
        }
    }

    /// Full-intensity color for this tint.
    pub const fn rgb(self) -> Rgb {
        match self {
            Tint::Mono => Rgb(255, 255, 255),
            Tint::Frost => Rgb(146, 206, 235),
            Tint::Ember => Rgb(241, 153, 89),
            Tint::Moss => Rgb(136, 210, 121),
            Tint::Violet => Rgb(191, 153, 229),
        }
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tint::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tint '{s}'"))
    }
}
