//! Effect selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which background effect to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Twinkling points joined by faint lines.
    Constellation,
    /// Drifting outlined hexagons.
    Hexagons,
    /// Approximate Voronoi edge shimmer.
    #[default]
    Voronoi,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [
        EffectKind::Constellation,
        EffectKind::Hexagons,
        EffectKind::Voronoi,
    ];

    /// Cycle to the next effect.
    pub fn next(self) -> Self {
        match self {
            EffectKind::Constellation => EffectKind::Hexagons,
            EffectKind::Hexagons => EffectKind::Voronoi,
            EffectKind::Voronoi => EffectKind::Constellation,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Constellation => "constellation",
            EffectKind::Hexagons => "hexagons",
            EffectKind::Voronoi => "voronoi",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown effect '{s}'"))
    }
}
