//! Configure the asset bundler.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{build::AssetKind, cli::Opts, error::Error};

/// Name of the configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "assetpack.toml";

/// Configuration for the asset bundler.
///
/// All fields can be set from a TOML file; unset fields keep their default
/// value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the site (e.g. `https://example.com/`).
    ///
    /// Required to bundle stylesheets: relative `url()` references are
    /// anchored to `base_url` followed by the stylesheet directory.
    pub base_url: Option<String>,

    /// Directory against which asset paths are read.
    pub input_dir: PathBuf,

    /// Directory of compiled bundles.
    ///
    /// Bundles are written to a `css` or `js` subdirectory. Clearing the cache
    /// deletes this whole directory.
    pub output_dir: PathBuf,

    /// Whether stylesheets are bundled.
    pub styles: bool,

    /// Whether scripts are bundled.
    pub scripts: bool,

    /// Assets whose path contains one of these strings are never merged.
    pub exclude_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("assets/compiled"),
            styles: true,
            scripts: true,
            exclude_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Create a configuration from a [`Opts`] object.
    ///
    /// Reads the configuration file given in `opts`, or
    /// [`DEFAULT_CONFIG_FILE`] if it exists, then applies command line
    /// overrides.
    pub fn from_opts(opts: &Opts) -> Result<Self, Error> {
        let config_path = opts
            .config
            .clone()
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()));

        let config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        let mut exclude_paths = config.exclude_paths;
        exclude_paths.extend(opts.exclude.iter().cloned());

        Ok(Self {
            base_url: opts.base_url.clone().or(config.base_url),
            input_dir: opts.input.clone().unwrap_or(config.input_dir),
            output_dir: opts.output.clone().unwrap_or(config.output_dir),
            exclude_paths,
            ..config
        })
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let load = || -> anyhow::Result<Self> {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        };

        load().map_err(|source| Error::LoadConfig {
            config_path: path.to_owned(),
            source,
        })
    }

    /// Check whether bundling is enabled for a kind of asset.
    pub fn is_enabled(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Style => self.styles,
            AssetKind::Script => self.scripts,
        }
    }

    /// Return the directory of bundles of a given kind.
    pub fn bundle_dir(&self, kind: AssetKind) -> PathBuf {
        self.output_dir.join(kind.extension())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use assert_fs::TempDir;

    use super::Config;
    use crate::{build::AssetKind, cli::Opts, error::Error};

    #[test]
    fn from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("assetpack.toml");

        std::fs::write(
            &path,
            concat!(
                "base_url = \"http://host/\"\n",
                "output_dir = \"public/compiled\"\n",
                "scripts = false\n",
                "exclude_paths = [\"vendor/jquery\"]\n",
            ),
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://host/"));
        assert_eq!(config.input_dir, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from("public/compiled"));
        assert!(config.styles);
        assert!(!config.scripts);
        assert_eq!(config.exclude_paths, vec!["vendor/jquery"]);
        assert!(config.is_enabled(AssetKind::Style));
        assert!(!config.is_enabled(AssetKind::Script));
        assert_eq!(
            config.bundle_dir(AssetKind::Style),
            PathBuf::from("public/compiled/css")
        );
    }

    #[test]
    fn unknown_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("assetpack.toml");

        std::fs::write(&path, "base_uri = \"http://host/\"\n").unwrap();

        let error = Config::from_file(&path).unwrap_err();
        assert!(matches!(error, Error::LoadConfig { .. }));
    }

    #[test]
    fn opts_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");

        std::fs::write(
            &path,
            "base_url = \"http://file/\"\nexclude_paths = [\"common.js\"]\n",
        )
        .unwrap();

        let opts = Opts {
            config: Some(path),
            input: Some(PathBuf::from("site")),
            output: None,
            base_url: Some(String::from("http://cli/")),
            exclude: vec![String::from("jquery")],
        };

        let config = Config::from_opts(&opts).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://cli/"));
        assert_eq!(config.input_dir, PathBuf::from("site"));
        assert_eq!(config.output_dir, PathBuf::from("assets/compiled"));
        assert_eq!(config.exclude_paths, vec!["common.js", "jquery"]);
    }
}
