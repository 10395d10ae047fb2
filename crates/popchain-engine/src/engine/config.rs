use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::DEFAULT_KICKS, core::PuyoColor};

/// Largest accepted board dimension (columns or total rows).
pub const MAX_DIMENSION: usize = 64;

/// Rule set of a game session.
///
/// A config is fixed when the session is created. Missing fields take the
/// reference values when deserializing, so a rules file only needs to list
/// what it changes:
///
/// ```
/// use popchain_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "columns": 8, "min_group_size": 3 }"#)?;
/// assert_eq!(config.columns, 8);
/// assert_eq!(config.visible_rows, 12);
/// config.validate()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of columns.
    pub columns: usize,
    /// Number of rows shown to the player.
    pub visible_rows: usize,
    /// Number of buffer rows above the visible area.
    pub hidden_rows: usize,
    /// Colors new pairs are drawn from, uniformly.
    pub palette: Vec<PuyoColor>,
    /// Smallest connected group that clears.
    pub min_group_size: usize,
    /// Time between passive drop steps, in milliseconds.
    pub drop_interval_ms: u64,
    /// Time between chain steps, in milliseconds. `0` resolves a whole chain
    /// as soon as the pair locks.
    pub chain_step_delay_ms: u64,
    /// Offsets tried in order when a rotation is blocked.
    pub kicks: Vec<(i32, i32)>,
    /// Points per cleared cell before multipliers.
    pub base_score_per_cell: u64,
    /// Chain multiplier is `chain_multiplier_base ^ (depth - 1)`.
    pub chain_multiplier_base: f64,
    /// Group bonus is `1 + group_bonus * (groups - 1)`.
    pub group_bonus: f64,
    /// Number of upcoming pairs kept in the queue.
    pub lookahead: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            visible_rows: 12,
            hidden_rows: 1,
            palette: PuyoColor::ALL.to_vec(),
            min_group_size: 4,
            drop_interval_ms: 700,
            chain_step_delay_ms: 0,
            kicks: DEFAULT_KICKS.to_vec(),
            base_score_per_cell: 10,
            chain_multiplier_base: 1.5,
            group_bonus: 0.3,
            lookahead: 6,
        }
    }
}

impl GameConfig {
    /// Total number of rows, hidden rows included.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.visible_rows + self.hidden_rows
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_interval_ms)
    }

    #[must_use]
    pub fn chain_step_delay(&self) -> Duration {
        Duration::from_millis(self.chain_step_delay_ms)
    }

    /// Pivot position of a freshly spawned pair.
    ///
    /// The middle column (rounded down) and the first row below the hidden
    /// buffer, so that the satellite starts in the top hidden row.
    #[must_use]
    pub fn spawn_position(&self) -> (i32, i32) {
        let x = self.columns.saturating_sub(1) / 2;
        let y = self.hidden_rows;
        (
            i32::try_from(x).unwrap_or(i32::MAX),
            i32::try_from(y).unwrap_or(i32::MAX),
        )
    }

    /// Checks that the rule set describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.visible_rows == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.hidden_rows == 0 {
            return Err(ConfigError::NoHiddenRow);
        }
        if self.columns > MAX_DIMENSION || self.rows() > MAX_DIMENSION {
            return Err(ConfigError::BoardTooLarge {
                columns: self.columns,
                rows: self.rows(),
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for (i, color) in self.palette.iter().enumerate() {
            if self.palette[..i].contains(color) {
                return Err(ConfigError::DuplicateColor(*color));
            }
        }
        if self.min_group_size < 2 {
            return Err(ConfigError::MinGroupSizeTooSmall(self.min_group_size));
        }
        if self.kicks.is_empty() {
            return Err(ConfigError::NoKicks);
        }
        if self.lookahead < 2 {
            return Err(ConfigError::LookaheadTooShort(self.lookahead));
        }
        for (name, value) in [
            ("chain_multiplier_base", self.chain_multiplier_base),
            ("group_bonus", self.group_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_rule_set() {
        let config = GameConfig::default();
        assert_eq!(config.rows(), 13);
        assert_eq!(config.palette.len(), 5);
        assert_eq!(config.drop_interval(), Duration::from_millis(700));
        assert_eq!(config.chain_step_delay(), Duration::ZERO);
        assert_eq!(config.kicks, DEFAULT_KICKS);
        assert_eq!(config.spawn_position(), (2, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_spawn_column_is_middle_rounded_down() {
        let spawn_x = |columns| {
            GameConfig {
                columns,
                ..GameConfig::default()
            }
            .spawn_position()
            .0
        };
        assert_eq!(spawn_x(1), 0);
        assert_eq!(spawn_x(5), 2);
        assert_eq!(spawn_x(7), 3);
        assert_eq!(spawn_x(8), 3);
    }

    #[test]
    fn test_validate_rejects_unplayable_rules() {
        let base = GameConfig::default();
        let cases = [
            (
                GameConfig {
                    columns: 0,
                    ..base.clone()
                },
                ConfigError::EmptyBoard,
            ),
            (
                GameConfig {
                    hidden_rows: 0,
                    ..base.clone()
                },
                ConfigError::NoHiddenRow,
            ),
            (
                GameConfig {
                    visible_rows: 100,
                    ..base.clone()
                },
                ConfigError::BoardTooLarge {
                    columns: 6,
                    rows: 101,
                },
            ),
            (
                GameConfig {
                    palette: vec![],
                    ..base.clone()
                },
                ConfigError::EmptyPalette,
            ),
            (
                GameConfig {
                    palette: vec![PuyoColor::Red, PuyoColor::Blue, PuyoColor::Red],
                    ..base.clone()
                },
                ConfigError::DuplicateColor(PuyoColor::Red),
            ),
            (
                GameConfig {
                    min_group_size: 1,
                    ..base.clone()
                },
                ConfigError::MinGroupSizeTooSmall(1),
            ),
            (
                GameConfig {
                    kicks: vec![],
                    ..base.clone()
                },
                ConfigError::NoKicks,
            ),
            (
                GameConfig {
                    lookahead: 1,
                    ..base.clone()
                },
                ConfigError::LookaheadTooShort(1),
            ),
            (
                GameConfig {
                    group_bonus: -0.5,
                    ..base.clone()
                },
                ConfigError::InvalidCoefficient {
                    name: "group_bonus",
                    value: -0.5,
                },
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_deserialize_partial_rules() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "palette": ["R", "G", "B"], "kicks": [[0, 0], [0, -1]] }"#)
                .unwrap();
        assert_eq!(
            config.palette,
            [PuyoColor::Red, PuyoColor::Green, PuyoColor::Blue]
        );
        assert_eq!(config.kicks, [(0, 0), (0, -1)]);
        assert_eq!(config.columns, 6);
        assert_eq!(config.lookahead, 6);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        assert!(serde_json::from_str::<GameConfig>(r#"{ "colums": 8 }"#).is_err());
    }
}
