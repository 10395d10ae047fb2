use serde::Serialize;

use crate::{
    GameConfig,
    core::{Board, MatchGroup, PuyoColor},
};

/// A cell removed by a chain step, with the color it had before removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoppedCell {
    pub x: usize,
    pub y: usize,
    pub color: PuyoColor,
}

/// What a single chain step cleared and scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStepReport {
    depth: usize,
    groups: Vec<MatchGroup>,
    popped: Vec<PoppedCell>,
    score_delta: u64,
}

impl ChainStepReport {
    /// Position of this step in its chain, starting at 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Groups cleared by this step, in scan order.
    #[must_use]
    pub fn groups(&self) -> &[MatchGroup] {
        &self.groups
    }

    /// Cleared cells with their colors, group by group.
    #[must_use]
    pub fn popped(&self) -> &[PoppedCell] {
        &self.popped
    }

    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.popped.len()
    }

    #[must_use]
    pub fn score_delta(&self) -> u64 {
        self.score_delta
    }
}

/// Totals of one turn, from the lock of a pair until the board is stable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    /// Number of chain steps (0 when the lock cleared nothing).
    pub chain_length: usize,
    /// Points earned over the whole chain.
    pub score: u64,
    /// Cells cleared over the whole chain.
    pub cleared: usize,
}

/// Outcome of [`ChainResolver::step_once`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum ChainStep {
    /// Groups were cleared and the board was settled; more steps may follow.
    Cleared(ChainStepReport),
    /// No groups were left; the chain is over and the resolver is idle again.
    Settled(TurnSummary),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    #[default]
    Idle,
    Resolving {
        depth: usize,
        score: u64,
        cleared: usize,
    },
}

/// State machine that resolves the chain started by a pair lock.
///
/// ```text
/// Idle --begin()--> Resolving --step_once()--> Resolving (groups cleared)
///                       |
///                       +--step_once()--> Idle (no groups left)
/// ```
///
/// Each step detects groups, scores them, clears them and applies gravity.
/// Score and cleared-cell totals accumulate inside the resolver and are only
/// handed out, as a [`TurnSummary`], when the chain ends.
///
/// # Example
///
/// ```
/// use popchain_engine::{Board, ChainResolver, ChainStep, GameConfig};
///
/// let config = GameConfig::default();
/// let mut board: Board = "
///     ...
///     G..
///     RRG
///     RRG
/// "
/// .parse()
/// .unwrap();
///
/// let mut resolver = ChainResolver::new();
/// assert!(resolver.begin());
///
/// let Some(ChainStep::Cleared(step)) = resolver.step_once(&mut board, &config) else {
///     panic!("expected a cleared step");
/// };
/// assert_eq!(step.score_delta(), 40);
/// assert_eq!(resolver.depth(), 1);
///
/// let Some(ChainStep::Settled(summary)) = resolver.step_once(&mut board, &config) else {
///     panic!("expected the chain to end");
/// };
/// assert_eq!(summary.score, 40);
/// assert!(!resolver.is_resolving());
/// ```
#[derive(Debug, Default, Clone)]
pub struct ChainResolver {
    state: ChainState,
}

impl ChainResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        matches!(self.state, ChainState::Resolving { .. })
    }

    /// Number of steps completed in the current chain (0 when idle).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self.state {
            ChainState::Idle => 0,
            ChainState::Resolving { depth, .. } => depth,
        }
    }

    /// Starts a new chain.
    ///
    /// Returns `false`, leaving the running chain untouched, if a chain is
    /// already being resolved.
    pub fn begin(&mut self) -> bool {
        if self.is_resolving() {
            return false;
        }
        self.state = ChainState::Resolving {
            depth: 0,
            score: 0,
            cleared: 0,
        };
        true
    }

    /// Performs one detect → score → clear → gravity step.
    ///
    /// Returns `None` when no chain is being resolved.
    pub fn step_once(&mut self, board: &mut Board, config: &GameConfig) -> Option<ChainStep> {
        let ChainState::Resolving {
            depth,
            score,
            cleared,
        } = self.state
        else {
            return None;
        };

        let groups = board.find_groups(config.min_group_size);
        if groups.is_empty() {
            self.state = ChainState::Idle;
            return Some(ChainStep::Settled(TurnSummary {
                chain_length: depth,
                score,
                cleared,
            }));
        }

        let depth = depth + 1;
        let removed = groups.iter().map(MatchGroup::len).sum();
        let score_delta = chain_score(config, removed, depth, groups.len());

        let mut popped = Vec::with_capacity(removed);
        for group in &groups {
            for &(x, y) in group.cells() {
                popped.push(PoppedCell {
                    x,
                    y,
                    color: group.color(),
                });
                board.clear(x, y);
            }
        }
        board.apply_gravity();

        log::debug!(
            "chain step {depth}: {} group(s), {removed} cell(s), +{score_delta}",
            groups.len()
        );

        self.state = ChainState::Resolving {
            depth,
            score: score + score_delta,
            cleared: cleared + removed,
        };
        Some(ChainStep::Cleared(ChainStepReport {
            depth,
            groups,
            popped,
            score_delta,
        }))
    }

    /// Runs steps until the chain ends, returning every cleared step and the
    /// turn totals. Starts a chain first if none is running.
    pub fn resolve_all(
        &mut self,
        board: &mut Board,
        config: &GameConfig,
    ) -> (Vec<ChainStepReport>, TurnSummary) {
        self.begin();
        let mut steps = vec![];
        loop {
            match self.step_once(board, config) {
                Some(ChainStep::Cleared(report)) => steps.push(report),
                Some(ChainStep::Settled(summary)) => return (steps, summary),
                None => return (steps, TurnSummary::default()),
            }
        }
    }
}

/// Points for one chain step.
///
/// `floor(removed × base × chain_multiplier_base^(depth − 1) × (1 + group_bonus × (groups − 1)))`
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn chain_score(config: &GameConfig, removed: usize, depth: usize, groups: usize) -> u64 {
    let exponent = i32::try_from(depth.saturating_sub(1)).unwrap_or(i32::MAX);
    let chain_multiplier = config.chain_multiplier_base.powi(exponent);
    let group_bonus = 1.0 + config.group_bonus * groups.saturating_sub(1) as f64;
    let points =
        removed as f64 * config.base_score_per_cell as f64 * chain_multiplier * group_bonus;
    points.floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_chain_score_reference_values() {
        let config = GameConfig::default();
        assert_eq!(chain_score(&config, 4, 1, 1), 40);
        assert_eq!(chain_score(&config, 9, 1, 2), 117);
        assert_eq!(chain_score(&config, 4, 2, 1), 60);
        assert_eq!(chain_score(&config, 4, 3, 1), 90);
        assert_eq!(chain_score(&config, 5, 4, 1), 168);
    }

    #[test]
    fn test_step_on_idle_resolver_is_noop() {
        let config = GameConfig::default();
        let mut board = board("RRRR");
        let before = board.clone();
        let mut resolver = ChainResolver::new();
        assert_eq!(resolver.step_once(&mut board, &config), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_begin_while_resolving_is_ignored() {
        let config = GameConfig::default();
        let mut board = board(
            "
            R...
            RRRG
            GGGB
            ",
        );
        let mut resolver = ChainResolver::new();
        assert!(resolver.begin());
        assert!(resolver.step_once(&mut board, &config).unwrap().is_cleared());
        assert_eq!(resolver.depth(), 1);

        assert!(!resolver.begin());
        assert_eq!(resolver.depth(), 1);
    }

    #[test]
    fn test_no_groups_settles_immediately() {
        let config = GameConfig::default();
        let mut board = board("RG\nGR");
        let mut resolver = ChainResolver::new();
        let (steps, summary) = resolver.resolve_all(&mut board, &config);
        assert!(steps.is_empty());
        assert_eq!(summary, TurnSummary::default());
        assert!(!resolver.is_resolving());
    }

    #[test]
    fn test_simultaneous_groups_get_group_bonus() {
        let config = GameConfig::default();
        let mut board = board(
            "
            ......
            RR.BBB
            RR.BB.
            ",
        );
        let mut resolver = ChainResolver::new();
        let (steps, summary) = resolver.resolve_all(&mut board, &config);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].groups().len(), 2);
        assert_eq!(steps[0].removed_count(), 9);
        assert_eq!(steps[0].score_delta(), 117);
        assert_eq!(
            summary,
            TurnSummary {
                chain_length: 1,
                score: 117,
                cleared: 9
            }
        );
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_two_step_chain() {
        // Clearing the reds drops the yellow on top of the other three.
        let config = GameConfig::default();
        let mut board = board(
            "
            .Y..
            .R..
            .R..
            .RR.
            YYY.
            ",
        );
        let mut resolver = ChainResolver::new();
        let (steps, summary) = resolver.resolve_all(&mut board, &config);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].depth(), 1);
        assert_eq!(steps[0].groups()[0].color(), PuyoColor::Red);
        assert_eq!(steps[0].score_delta(), 40);
        assert_eq!(steps[1].depth(), 2);
        assert_eq!(steps[1].groups()[0].color(), PuyoColor::Yellow);
        assert_eq!(steps[1].removed_count(), 4);
        assert_eq!(steps[1].score_delta(), 60);

        assert_eq!(
            summary,
            TurnSummary {
                chain_length: 2,
                score: 100,
                cleared: 8
            }
        );
        assert_eq!(board.occupied_count(), 0);
        assert!(!resolver.is_resolving());
        assert_eq!(resolver.depth(), 0);
    }

    #[test]
    fn test_popped_cells_record_prior_colors() {
        let config = GameConfig::default();
        let mut board = board(
            "
            B...
            GGGG
            ",
        );
        let mut resolver = ChainResolver::new();
        resolver.begin();
        let Some(ChainStep::Cleared(step)) = resolver.step_once(&mut board, &config) else {
            panic!("expected a cleared step");
        };
        assert_eq!(step.popped().len(), 4);
        assert!(step.popped().iter().all(|c| c.color == PuyoColor::Green));
        assert!(step.popped().iter().all(|c| c.y == 1));
        // The blue fell into the hole left by the greens.
        assert_eq!(board.to_string(), "....\nB...");
    }

    #[test]
    fn test_min_group_size_from_config() {
        let config = GameConfig {
            min_group_size: 3,
            ..GameConfig::default()
        };
        let mut board = board("PPP.");
        let (steps, summary) = ChainResolver::new().resolve_all(&mut board, &config);
        assert_eq!(steps.len(), 1);
        assert_eq!(summary.score, 30);
    }
}
