use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Color of a single puyo.
///
/// Two cells match only when their colors are exactly equal; there is no
/// wildcard color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PuyoColor {
    /// Red (`R`).
    #[serde(rename = "R")]
    Red = 0,
    /// Green (`G`).
    #[serde(rename = "G")]
    Green = 1,
    /// Blue (`B`).
    #[serde(rename = "B")]
    Blue = 2,
    /// Yellow (`Y`).
    #[serde(rename = "Y")]
    Yellow = 3,
    /// Purple (`P`).
    #[serde(rename = "P")]
    Purple = 4,
}

impl Distribution<PuyoColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PuyoColor {
        PuyoColor::ALL[rng.random_range(0..PuyoColor::LEN)]
    }
}

impl PuyoColor {
    /// Number of colors (5).
    pub const LEN: usize = 5;

    /// All colors in their canonical order.
    pub const ALL: [Self; Self::LEN] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Purple,
    ];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Yellow => 'Y',
            Self::Purple => 'P',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Red),
            'G' => Some(Self::Green),
            'B' => Some(Self::Blue),
            'Y' => Some(Self::Yellow),
            'P' => Some(Self::Purple),
            _ => None,
        }
    }
}
