//! Aggregate stylesheets and scripts into cached, content-addressed bundles.
//!
//! Given an ordered list of assets, the [`Bundler`] merges contiguous local
//! assets into one file named after a digest of their paths. A bundle is
//! written once and reused until the cache is cleared.
//!
//! Stylesheets get their internal `@import` rules inlined, their relative
//! `url()` references anchored to the site base URL, and a safe minification.
//! Scripts are concatenated.
//!
//! ```no_run
//! use assetpack::{Asset, AssetKind, Bundler, Config};
//!
//! let config = Config {
//!     base_url: Some("https://example.com/".into()),
//!     ..Default::default()
//! };
//!
//! let assets = [Asset::style("styles/base.css"), Asset::style("styles/theme.css")];
//!
//! for artifact in Bundler::new(&config).compress(&assets, AssetKind::Style)? {
//!     println!("{}", artifact.uri());
//! }
//! # Ok::<(), assetpack::Error>(())
//! ```

#![warn(missing_docs)]

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod util;

pub use build::{clear_cache, Artifact, Asset, AssetKind, Bundle, Bundler};
pub use config::Config;
pub use error::Error;
