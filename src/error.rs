//! Application errors.

use std::path::PathBuf;

use crate::util::bundle::{css::BundleCssError, js::BundleJsError};

/// Enumerates application errors.
///
/// Every variant keeps its underlying error as a source, so reports built
/// with [`anyhow`] show the full chain.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read or parsed.
    #[error("While loading configuration from {config_path:?}")]
    LoadConfig {
        config_path: PathBuf,
        source: anyhow::Error,
    },
    /// A stylesheet of a bundle, or one of its imports, could not be read.
    #[error("While reading stylesheets for bundle {bundle_path:?}")]
    ReadStyle {
        bundle_path: PathBuf,
        source: BundleCssError,
    },
    /// A script of a bundle could not be read.
    #[error("While reading scripts for bundle {bundle_path:?}")]
    ReadScript {
        bundle_path: PathBuf,
        source: BundleJsError,
    },
    /// Stylesheets were bundled without a base URL to anchor `url()`
    /// references.
    #[error("Base URL must be set before bundling stylesheets")]
    MissingBaseUrl,
    /// The bundle directory could not be created.
    #[error("While creating the directory {output_dir:?}")]
    CreateDir {
        output_dir: PathBuf,
        source: std::io::Error,
    },
    /// The bundle file could not be written.
    #[error("While writing the file {output_path:?}")]
    WriteOutput {
        output_path: PathBuf,
        source: std::io::Error,
    },
    /// The compiled asset directory could not be deleted.
    #[error("While deleting compiled assets in {output_dir:?}")]
    ClearCache {
        output_dir: PathBuf,
        source: std::io::Error,
    },
}
