//! Delete compiled bundles.

use log::info;

use crate::{config::Config, error::Error};

/// Delete the compiled output directory and all bundles in it.
///
/// Bundles are rebuilt on the next request. A missing directory is not an
/// error.
pub fn clear_cache(config: &Config) -> Result<(), Error> {
    let output_dir = &config.output_dir;

    match std::fs::remove_dir_all(output_dir) {
        Ok(()) => {
            info!("Deleted {:?}", output_dir);
            Ok(())
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::ClearCache {
            output_dir: output_dir.to_owned(),
            source,
        }),
    }
}
