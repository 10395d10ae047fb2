use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PairColors, PuyoColor};

/// Queue of upcoming pairs.
///
/// The queue always holds `lookahead` pairs. Taking the front pair appends a
/// freshly generated one at the back, so the first element is always "next"
/// and the second "next-next". Both colors of a new pair are drawn uniformly
/// and independently from the palette.
///
/// # Example
///
/// ```
/// use popchain_engine::{PairQueue, PuyoColor};
///
/// let mut queue = PairQueue::new(PuyoColor::ALL.to_vec(), 6);
///
/// let next = queue.next_pairs().next().unwrap();
/// assert_eq!(queue.pop_next(), next);
/// assert_eq!(queue.next_pairs().count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct PairQueue {
    rng: Pcg32,
    palette: Vec<PuyoColor>,
    queue: VecDeque<PairColors>,
}

/// Seed for deterministic pair generation.
///
/// A 128-bit seed for the queue's random number generator. Two queues with
/// the same seed and palette produce the same pair sequence. Serialized as a
/// 32-character hex string.
///
/// # Example
///
/// ```
/// use popchain_engine::{GameConfig, GameSession, PairSeed};
/// use rand::Rng as _;
///
/// let seed: PairSeed = rand::rng().random();
///
/// let session1 = GameSession::with_seed(GameConfig::default(), seed)?;
/// let session2 = GameSession::with_seed(GameConfig::default(), seed)?;
/// assert!(session1.next_pairs().eq(session2.next_pairs()));
/// # Ok::<(), popchain_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSeed([u8; 16]);

impl PairSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl Serialize for PairSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PairSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: expected 32 hex characters, got '{input}'")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
}

/// Parses the 32-character hex form used by serialization.
impl std::str::FromStr for PairSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl std::fmt::Display for PairSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Allows generating random `PairSeed` values with `rng.random()`.
impl Distribution<PairSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PairSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PairSeed(seed)
    }
}

impl PairQueue {
    /// Creates a queue with a random seed.
    ///
    /// For deterministic pair generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new(palette: Vec<PuyoColor>, lookahead: usize) -> Self {
        Self::with_seed(rand::rng().random(), palette, lookahead)
    }

    /// Like [`Self::new`], but with a specific seed.
    ///
    /// # Panics
    ///
    /// Panics if the palette is empty.
    #[must_use]
    pub fn with_seed(seed: PairSeed, palette: Vec<PuyoColor>, lookahead: usize) -> Self {
        assert!(!palette.is_empty(), "palette must not be empty");
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            palette,
            queue: VecDeque::with_capacity(lookahead + 1),
        };
        for _ in 0..lookahead {
            let pair = this.random_pair();
            this.queue.push_back(pair);
        }
        this
    }

    fn random_color(&mut self) -> PuyoColor {
        *self
            .palette
            .choose(&mut self.rng)
            .expect("palette is never empty")
    }

    fn random_pair(&mut self) -> PairColors {
        let pivot = self.random_color();
        let satellite = self.random_color();
        PairColors::new(pivot, satellite)
    }

    /// Takes the front pair and appends a new random pair at the back.
    pub fn pop_next(&mut self) -> PairColors {
        let pair = self.random_pair();
        self.queue.push_back(pair);
        self.queue
            .pop_front()
            .expect("queue holds at least the pair just pushed")
    }

    /// Iterates over the upcoming pairs, next first.
    pub fn next_pairs(&self) -> impl Iterator<Item = PairColors> + '_ {
        self.queue.iter().copied()
    }
}
