use clap::{Parser, Subcommand};

use self::{play::PlayArg, print_rules::PrintRulesArg};

mod play;
mod print_rules;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the built-in rule set as JSON
    PrintRules(#[clap(flatten)] PrintRulesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::PrintRules(arg) => print_rules::run(&arg)?,
    }
    Ok(())
}
