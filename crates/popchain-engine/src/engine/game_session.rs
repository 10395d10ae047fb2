use std::time::Duration;

use rand::Rng as _;

use crate::{
    CommandError, ConfigError,
    core::{Board, Pair, PairColors, RotationDirection},
};

use super::{
    ChainResolver, ChainStep, ChainStepReport, GameConfig, GameStats, PairQueue, PairSeed,
    TurnSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateClockwise,
    RotateCounterClockwise,
    TogglePause,
    Reset,
}

/// Something that happened inside the session, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new pair entered the board.
    Spawned(Pair),
    /// One chain step cleared groups; the board is already settled again.
    ChainStep(ChainStepReport),
    /// The chain of a turn ended and its totals were committed.
    TurnCompleted(TurnSummary),
    GameOver,
}

/// A single game: board, falling pair, pair queue, chain resolver and stats.
///
/// The session is driven from outside by [`tick`](Self::tick) with the time
/// elapsed since the previous tick, and by player commands. Nothing blocks
/// and no time is read internally. Everything that happens is also recorded
/// as a [`SessionEvent`], which the driver collects with
/// [`drain_events`](Self::drain_events).
///
/// # Example
///
/// ```
/// use popchain_engine::{Command, GameConfig, GameSession};
///
/// let mut session = GameSession::new(GameConfig::default())?;
/// let pair = session.active_pair().unwrap();
/// assert_eq!((pair.x(), pair.y()), (2, 1));
///
/// session.apply(Command::HardDrop).unwrap();
/// assert_eq!(session.board().occupied_count(), 2);
/// assert_eq!(session.stats().placed_pairs(), 1);
/// assert!(session.active_pair().is_some());
/// # Ok::<(), popchain_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed: PairSeed,
    board: Board,
    active: Option<Pair>,
    queue: PairQueue,
    resolver: ChainResolver,
    stats: GameStats,
    session_state: SessionState,
    drop_timer: Duration,
    chain_timer: Duration,
    resync: bool,
    last_chain_step: Option<ChainStepReport>,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Starts a session with a random seed.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Starts a session whose pair sequence is determined by `seed`.
    pub fn with_seed(config: GameConfig, seed: PairSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, seed))
    }

    fn from_valid_config(config: GameConfig, seed: PairSeed) -> Self {
        let mut this = Self {
            board: Board::new(config.columns, config.rows()),
            queue: PairQueue::with_seed(seed, config.palette.clone(), config.lookahead),
            config,
            seed,
            active: None,
            resolver: ChainResolver::new(),
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            drop_timer: Duration::ZERO,
            chain_timer: Duration::ZERO,
            resync: false,
            last_chain_step: None,
            events: vec![],
        };
        log::info!("new session with seed {seed}");
        this.spawn();
        this
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the current pair sequence.
    #[must_use]
    pub fn seed(&self) -> PairSeed {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling pair; `None` while a chain resolves and after game over.
    #[must_use]
    pub fn active_pair(&self) -> Option<&Pair> {
        self.active.as_ref()
    }

    /// Where the falling pair would land on a hard drop.
    #[must_use]
    pub fn ghost(&self) -> Option<Pair> {
        self.active.map(|pair| pair.drop_position(&self.board))
    }

    pub fn next_pairs(&self) -> impl Iterator<Item = PairColors> + '_ {
        self.queue.next_pairs()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Steps completed in the chain being resolved; 0 between turns.
    #[must_use]
    pub fn chain_depth(&self) -> usize {
        self.resolver.depth()
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.resolver.is_resolving()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// The most recent step of the current turn's chain, if any.
    #[must_use]
    pub fn last_chain_step(&self) -> Option<&ChainStepReport> {
        self.last_chain_step.as_ref()
    }

    /// Takes the events recorded since the previous call, oldest first.
    ///
    /// Events are kept until drained and every turn adds at least two, so a
    /// long-running driver must call this regularly.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::MoveLeft => self.try_move_left(),
            Command::MoveRight => self.try_move_right(),
            Command::SoftDrop => self.try_soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateClockwise => self.try_rotate(RotationDirection::Clockwise),
            Command::RotateCounterClockwise => {
                self.try_rotate(RotationDirection::CounterClockwise)
            }
            Command::TogglePause => {
                self.toggle_pause();
                Ok(())
            }
            Command::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), CommandError> {
        self.try_shift(-1)
    }

    pub fn try_move_right(&mut self) -> Result<(), CommandError> {
        self.try_shift(1)
    }

    fn try_shift(&mut self, dx: i32) -> Result<(), CommandError> {
        let pair = self.controllable_pair()?;
        let moved = pair.moved(&self.board, dx, 0).ok_or(CommandError::Blocked)?;
        self.active = Some(moved);
        Ok(())
    }

    /// Moves the pair one row down, or locks it if it cannot move.
    pub fn try_soft_drop(&mut self) -> Result<(), CommandError> {
        let pair = self.controllable_pair()?;
        self.drop_or_lock(pair);
        Ok(())
    }

    /// Drops the pair as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> Result<(), CommandError> {
        let pair = self.controllable_pair()?;
        self.lock(pair.drop_position(&self.board));
        Ok(())
    }

    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), CommandError> {
        let pair = self.controllable_pair()?;
        let rotated = pair
            .rotated(&self.board, direction, &self.config.kicks)
            .ok_or(CommandError::Blocked)?;
        self.active = Some(rotated);
        Ok(())
    }

    /// Pauses or resumes. Ignored after game over.
    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => {
                self.resync = true;
                SessionState::Playing
            }
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Starts over with the same rules and a fresh random seed.
    pub fn reset(&mut self) {
        self.reset_with_seed(rand::rng().random());
    }

    /// Starts over with the same rules and the given seed.
    pub fn reset_with_seed(&mut self, seed: PairSeed) {
        log::info!("session reset");
        *self = Self::from_valid_config(self.config.clone(), seed);
    }

    /// Advances time by `elapsed`.
    ///
    /// Applies at most one passive drop step per call, once more than the
    /// drop interval has accumulated. While a chain resolves with a positive
    /// step delay, advances the chain instead. The first tick after resuming
    /// from pause is discarded.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.session_state.is_playing() {
            return;
        }
        if self.resync {
            self.resync = false;
            return;
        }

        self.drop_timer += elapsed;
        if self.resolver.is_resolving() {
            self.chain_timer += elapsed;
            if self.chain_timer >= self.config.chain_step_delay() {
                self.chain_timer = Duration::ZERO;
                self.step_chain();
            }
            return;
        }

        if self.drop_timer > self.config.drop_interval() {
            self.drop_timer = Duration::ZERO;
            if let Some(pair) = self.active {
                self.drop_or_lock(pair);
            }
        }
    }

    /// Performs one step of the chain being resolved.
    ///
    /// Returns `None` when no chain is in progress or the game is over. When
    /// the chain ends, its totals are committed and the next pair spawns.
    pub fn step_chain(&mut self) -> Option<ChainStep> {
        if self.session_state.is_game_over() {
            return None;
        }
        let step = self.resolver.step_once(&mut self.board, &self.config)?;
        match &step {
            ChainStep::Cleared(report) => {
                self.last_chain_step = Some(report.clone());
                self.events.push(SessionEvent::ChainStep(report.clone()));
            }
            ChainStep::Settled(summary) => self.finish_turn(*summary),
        }
        Some(step)
    }

    fn controllable_pair(&self) -> Result<Pair, CommandError> {
        match self.session_state {
            SessionState::GameOver => return Err(CommandError::GameOver),
            SessionState::Paused => return Err(CommandError::Paused),
            SessionState::Playing => {}
        }
        if self.resolver.is_resolving() {
            return Err(CommandError::Resolving);
        }
        self.active.ok_or(CommandError::NoActivePair)
    }

    fn drop_or_lock(&mut self, pair: Pair) {
        match pair.moved(&self.board, 0, 1) {
            Some(moved) => self.active = Some(moved),
            None => self.lock(pair),
        }
    }

    fn lock(&mut self, pair: Pair) {
        self.active = None;
        let [pivot, satellite] = pair.cells();
        let (Some(pivot_pos), Some(satellite_pos)) = (
            self.board.checked_position(pivot.0, pivot.1),
            self.board.checked_position(satellite.0, satellite.1),
        ) else {
            log::debug!("pair {} locked outside the board", pair.colors());
            self.game_over();
            return;
        };

        self.board.set(pivot_pos.0, pivot_pos.1, pivot.2);
        self.board.set(satellite_pos.0, satellite_pos.1, satellite.2);
        // A horizontal pair may lock with one half hanging over a gap.
        self.board.apply_gravity();
        log::debug!(
            "locked pair {} at ({}, {})",
            pair.colors(),
            pair.x(),
            pair.y()
        );

        self.last_chain_step = None;
        self.chain_timer = Duration::ZERO;
        self.resolver.begin();
        if self.config.chain_step_delay().is_zero() {
            while self.step_chain().is_some_and(|step| step.is_cleared()) {}
        }
    }

    fn finish_turn(&mut self, summary: TurnSummary) {
        self.stats.complete_turn(summary);
        self.events.push(SessionEvent::TurnCompleted(summary));
        if summary.chain_length > 0 {
            log::info!(
                "{}-chain cleared {} cell(s) for {} point(s)",
                summary.chain_length,
                summary.cleared,
                summary.score
            );
        }
        self.spawn();
    }

    fn spawn(&mut self) {
        let colors = self.queue.pop_next();
        let (x, y) = self.config.spawn_position();
        let pair = Pair::new(colors, x, y);
        if !pair.fits(&self.board) {
            self.game_over();
            return;
        }
        log::debug!("spawned pair {colors}");
        self.active = Some(pair);
        self.events.push(SessionEvent::Spawned(pair));
    }

    fn game_over(&mut self) {
        self.active = None;
        self.session_state = SessionState::GameOver;
        self.events.push(SessionEvent::GameOver);
        log::info!(
            "game over: score {}, {} pair(s) placed",
            self.stats.score(),
            self.stats.placed_pairs()
        );
    }
}
