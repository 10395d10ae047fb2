pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a rule set cannot be played.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must have at least one column and one visible row")]
    EmptyBoard,
    #[display("board must have at least one hidden row to spawn into")]
    NoHiddenRow,
    #[display("board of {columns}x{rows} cells is larger than supported")]
    BoardTooLarge { columns: usize, rows: usize },
    #[display("palette must contain at least one color")]
    EmptyPalette,
    #[display("palette lists color {_0:?} more than once")]
    DuplicateColor(#[error(not(source))] PuyoColor),
    #[display("minimum group size must be at least 2, got {_0}")]
    MinGroupSizeTooSmall(#[error(not(source))] usize),
    #[display("kick list must contain at least one offset")]
    NoKicks,
    #[display("lookahead must be at least 2, got {_0}")]
    LookaheadTooShort(#[error(not(source))] usize),
    #[display("{name} must be a finite non-negative number, got {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },
}

/// Reason a player command was not applied.
///
/// Rejections are routine outcomes of collision checks and session state;
/// callers usually ignore them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum CommandError {
    #[display("pair is blocked")]
    Blocked,
    #[display("no falling pair")]
    NoActivePair,
    #[display("chain resolution in progress")]
    Resolving,
    #[display("session is paused")]
    Paused,
    #[display("game is over")]
    GameOver,
}
