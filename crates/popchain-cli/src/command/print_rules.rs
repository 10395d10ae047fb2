use std::path::PathBuf;

use popchain_engine::GameConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PrintRulesArg {
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PrintRulesArg) -> anyhow::Result<()> {
    let PrintRulesArg { output } = arg;
    Output::save_json(&GameConfig::default(), output.clone())
}
