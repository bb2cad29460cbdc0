//! Write bundle files.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::error::Error;

/// Write a bundle to `directory/filename`.
///
/// The directory is created if needed. Data is first written to a temporary
/// file in the same directory, then renamed into place, so a bundle file is
/// either absent or complete.
pub(super) fn write_bundle(
    directory: &Path,
    filename: &str,
    data: impl AsRef<[u8]>,
) -> Result<PathBuf, Error> {
    create_dir(directory).map_err(|source| Error::CreateDir {
        output_dir: directory.to_owned(),
        source,
    })?;

    let output_path = directory.join(filename);
    let temp_path = directory.join(temp_filename(filename));

    let result = std::fs::write(&temp_path, data)
        .and_then(|_| std::fs::rename(&temp_path, &output_path));

    if let Err(source) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::WriteOutput {
            output_path,
            source,
        });
    }

    Ok(output_path)
}

/// Create directories recursively, readable by the web server.
fn create_dir(directory: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o775);
    }

    builder.create(directory)
}

/// Return a hidden file name unique to this process and call.
fn temp_filename(filename: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(".{filename}.{}.{count}.tmp", std::process::id())
}
