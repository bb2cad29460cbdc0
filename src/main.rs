//! Aggregate stylesheets and scripts into cached bundles.

use anyhow::Result;
use assetpack::cli::{Cli, Command, Parser};
use log::LevelFilter;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Bundle { kind, paths } => assetpack::cli::bundle(&cli.opts, kind, &paths)?,
        Command::Clear => assetpack::cli::clear(&cli.opts)?,
    }

    Ok(())
}
