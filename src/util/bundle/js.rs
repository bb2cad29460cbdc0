//! Bundle JavaScript code.
//!
//! Scripts are not parsed nor decoded: the bytes of each file are appended
//! as is, followed by a statement terminator, so that a file missing its
//! final `;` cannot merge with the first statement of the next one.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum BundleJsError {
    /// A script could not be read.
    #[error("failed to read script {path:?}")]
    Read {
        /// Path of the script.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },
}

/// Concatenate scripts located relative to `root`.
pub fn bundle_js<'a>(
    root: impl AsRef<Path>,
    paths: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<u8>, BundleJsError> {
    let root = root.as_ref();
    let mut output = Vec::new();

    for path in paths {
        let path = root.join(path);
        let contents =
            std::fs::read(&path).map_err(|source| BundleJsError::Read { path, source })?;

        output.extend_from_slice(&contents);
        output.extend_from_slice(b";\n");
    }

    Ok(output)
}
