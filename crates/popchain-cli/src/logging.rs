use std::{fs::File, path::Path};

use anyhow::Context as _;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

/// Installs a logger that appends records to `path`.
///
/// The terminal belongs to the TUI while a game runs, so records cannot go
/// to stderr.
pub(crate) fn init(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to install logger")?;
    Ok(())
}

/// Writes buffered records out.
pub(crate) fn flush() {
    log::logger().flush();
}
