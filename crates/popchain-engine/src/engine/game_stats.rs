use serde::Serialize;

use crate::TurnSummary;

/// Game statistics tracking score, cleared cells and placed pairs.
///
/// - **Score**: points committed at the end of each chain
/// - **Placed pairs**: pairs locked into the board
/// - **Total cleared**: cells removed over the whole game
/// - **Chain histogram**: number of turns by chain length
///
/// # Example
///
/// ```
/// use popchain_engine::{GameStats, TurnSummary};
///
/// let mut stats = GameStats::new();
/// stats.complete_turn(TurnSummary { chain_length: 2, score: 100, cleared: 8 });
/// stats.complete_turn(TurnSummary::default());
///
/// assert_eq!(stats.score(), 100);
/// assert_eq!(stats.placed_pairs(), 2);
/// assert_eq!(stats.max_chain(), 2);
/// assert_eq!(stats.chain_histogram(), [1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    placed_pairs: usize,
    total_cleared: usize,
    max_chain: usize,
    chain_histogram: Vec<usize>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            placed_pairs: 0,
            total_cleared: 0,
            max_chain: 0,
            chain_histogram: Vec::new(),
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn placed_pairs(&self) -> usize {
        self.placed_pairs
    }

    #[must_use]
    pub const fn total_cleared(&self) -> usize {
        self.total_cleared
    }

    /// Longest chain seen so far.
    #[must_use]
    pub const fn max_chain(&self) -> usize {
        self.max_chain
    }

    /// Number of turns by chain length; index 0 counts locks that cleared
    /// nothing.
    #[must_use]
    pub fn chain_histogram(&self) -> &[usize] {
        &self.chain_histogram
    }

    /// Records a finished turn: one placed pair and the chain that followed.
    pub fn complete_turn(&mut self, summary: TurnSummary) {
        self.placed_pairs += 1;
        self.score += summary.score;
        self.total_cleared += summary.cleared;
        self.max_chain = self.max_chain.max(summary.chain_length);
        if self.chain_histogram.len() <= summary.chain_length {
            self.chain_histogram.resize(summary.chain_length + 1, 0);
        }
        self.chain_histogram[summary.chain_length] += 1;
    }
}
