//! Game logic built on top of the core board structures.
//!
//! - [`GameSession`] - a whole game: falling pair, timers, commands and events
//! - [`ChainResolver`] - detect, clear, score and settle until the board is stable
//! - [`GameStats`] - score, cleared cells, placed pairs and chain lengths
//! - [`PairQueue`] - seeded generation of upcoming pairs
//! - [`GameConfig`] - the rule set a session is created with
//!
//! # Game Flow
//!
//! 1. A pair spawns at the top of the board
//! 2. The player moves and rotates it; ticks drop it one row at a time
//! 3. The pair locks when it cannot fall further
//! 4. Groups of four or more same-colored cells pop, the board settles, and
//!    popping repeats while new groups form (a chain)
//! 5. The chain's score is committed and the next pair spawns
//! 6. Repeat until a pair cannot spawn
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use popchain_engine::{Command, GameConfig, GameSession, SessionEvent};
//!
//! let mut session = GameSession::new(GameConfig::default())?;
//!
//! session.apply(Command::MoveLeft).ok();
//! session.apply(Command::RotateClockwise).ok();
//! session.tick(Duration::from_millis(16));
//! session.apply(Command::HardDrop).ok();
//!
//! for event in session.drain_events() {
//!     if let SessionEvent::TurnCompleted(summary) = event {
//!         println!("{}-chain for {} points", summary.chain_length, summary.score);
//!     }
//! }
//! # Ok::<(), popchain_engine::ConfigError>(())
//! ```

pub use self::{chain::*, config::*, game_session::*, game_stats::*, pair_queue::*};

mod chain;
mod config;
mod game_session;
mod game_stats;
mod pair_queue;
