use std::path::PathBuf;

use anyhow::Context as _;
use log::LevelFilter;
use popchain_engine::{GameConfig, GameSession, GameStats, PairColors, PairSeed, TurnSummary};
use serde::Serialize;

use crate::{
    command::play::{app::PlayApp, screen::PlayScreen},
    logging,
    tui::Tui,
    util,
};

mod app;
mod screen;

const DEFAULT_CHAIN_DELAY_MS: u64 = 360;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the pair sequence (32 hex characters); random if omitted
    #[clap(long)]
    seed: Option<PairSeed>,
    /// Rules file (JSON); the built-in rules if omitted
    #[clap(long)]
    rules: Option<PathBuf>,
    /// Delay between chain steps in milliseconds (0 resolves chains at once)
    #[clap(long, default_value_t = DEFAULT_CHAIN_DELAY_MS)]
    chain_delay_ms: u64,
    /// Start with the ghost piece hidden
    #[clap(long)]
    no_ghost: bool,
    /// Append log records to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Maximum level of logged records
    #[clap(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            rules: None,
            chain_delay_ms: DEFAULT_CHAIN_DELAY_MS,
            no_ghost: false,
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

/// Printed when the player quits.
#[derive(Debug, Serialize)]
struct FinalReport<'a> {
    seed: PairSeed,
    stats: &'a GameStats,
    last_turn: Option<TurnSummary>,
    next_pairs: Vec<PairColors>,
}

impl<'a> FinalReport<'a> {
    fn new(screen: &'a PlayScreen) -> Self {
        let session = screen.session();
        Self {
            seed: session.seed(),
            stats: session.stats(),
            last_turn: screen.last_turn(),
            next_pairs: session.next_pairs().collect(),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        rules,
        chain_delay_ms,
        no_ghost,
        log_file,
        log_level,
    } = arg;

    if let Some(path) = log_file {
        logging::init(path, *log_level)?;
    }

    let mut config = match rules {
        Some(path) => util::read_json_file::<GameConfig, _>("rules", path)?,
        None => GameConfig::default(),
    };
    config.chain_step_delay_ms = *chain_delay_ms;

    let session = match seed {
        Some(seed) => GameSession::with_seed(config, *seed),
        None => GameSession::new(config),
    }
    .context("Invalid rule set")?;

    let mut app = PlayApp::new(session, !no_ghost);
    Tui::new().run(&mut app)?;
    logging::flush();

    util::Output::save_json(&FinalReport::new(app.screen()), None)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    #[test]
    fn test_final_report_lists_last_turn_and_upcoming_pairs() {
        let seed = PairSeed::from_bytes([7; 16]);
        let session = GameSession::with_seed(GameConfig::default(), seed).unwrap();
        let mut screen = PlayScreen::new(session, true);

        let report = serde_json::to_value(FinalReport::new(&screen)).unwrap();
        assert!(report["last_turn"].is_null());

        screen.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
        )));
        let report = serde_json::to_value(FinalReport::new(&screen)).unwrap();

        assert_eq!(report["seed"], seed.to_string());
        assert_eq!(report["stats"]["placed_pairs"], 1);
        assert_eq!(report["last_turn"]["chain_length"], 0);
        assert_eq!(report["last_turn"]["score"], 0);

        let next_pairs = report["next_pairs"].as_array().unwrap();
        assert_eq!(next_pairs.len(), 6);
        let first = screen.session().next_pairs().next().unwrap();
        assert_eq!(next_pairs[0], first.to_string());
    }
}
