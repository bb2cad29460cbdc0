//! Command line utilities.

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use clap::Parser;
use clap::{Args, Subcommand, ValueEnum};
use log::info;

use crate::{
    build::{clear_cache, Asset, AssetKind, Bundler},
    util::url::is_external,
    Config,
};

/// Command line usage description.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Command line options.
    #[command(flatten)]
    pub opts: Opts,
}

/// List of commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bundle assets and print the URI of each output
    Bundle {
        /// Kind of assets
        #[arg(long, value_enum)]
        kind: Kind,

        /// Asset paths or URLs, in page order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Delete all compiled bundles
    Clear,
}

/// Kind of assets, as given on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
    /// Stylesheets
    Css,
    /// Scripts
    Js,
}

impl From<Kind> for AssetKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Css => Self::Style,
            Kind::Js => Self::Script,
        }
    }
}

/// Command line options.
#[derive(Debug, Args, Clone, Default)]
pub struct Opts {
    /// Configuration file [default: "assetpack.toml", if present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory against which asset paths are read [default: "."]
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Directory of compiled bundles [default: "assets/compiled"]
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Base URL used to anchor stylesheet `url()` references
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Never merge assets whose path contains this string
    #[arg(long, global = true)]
    pub exclude: Vec<String>,
}

/// Run the `bundle` command.
pub fn bundle(opts: &Opts, kind: Kind, paths: &[String]) -> Result<()> {
    let config = Config::from_opts(opts).context("loading configuration")?;
    let kind = AssetKind::from(kind);

    let assets: Vec<Asset> = paths
        .iter()
        .map(|path| Asset::new(path.as_str(), kind).with_external(is_external(path)))
        .collect();

    let artifacts = Bundler::new(&config)
        .compress(&assets, kind)
        .with_context(|| format!("bundling {kind} assets"))?;

    for artifact in artifacts {
        println!("{}", artifact.uri());
    }

    Ok(())
}

/// Run the `clear` command.
pub fn clear(opts: &Opts) -> Result<()> {
    let config = Config::from_opts(opts).context("loading configuration")?;

    info!("Clearing {:?}...", config.output_dir);

    clear_cache(&config)?;

    Ok(())
}
