use std::fs::OpenOptions;

use anyhow::Context;
use env_logger::{Builder, Env, Target, WriteStyle};

use crate::cli::Cli;

pub const LOG_ENV: &str = "WEATHER_FX_LOG";

/// Installs the logger.
///
/// The interactive UI owns the terminal, so logs only go to `--log-file`
/// there. One-shot runs log to stderr.
pub fn init(cli: &Cli) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().filter_or(LOG_ENV, "info"));

    if let Some(path) = &cli.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {} failed", path.display()))?;
        builder
            .target(Target::Pipe(Box::new(file)))
            .write_style(WriteStyle::Never);
    } else if !cli.one_shot {
        return Ok(());
    }

    builder.try_init().context("installing logger failed")
}
