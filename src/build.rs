//! Bundle assets.
//!
//! The [`Bundler`] receives an ordered list of [`Asset`]s of one kind,
//! merges runs of local assets into bundles, and returns one [`Artifact`] per
//! output slot, in the original order.

pub mod clear;
pub mod group;
pub mod write_file;

use std::path::{Path, PathBuf};

use log::{debug, info};

use self::{group::Group, write_file::write_bundle};
use crate::{
    config::Config,
    error::Error,
    util::{
        bundle::{
            css::{hoist_imports, rebase_urls, CssResolver},
            js::bundle_js,
        },
        hash::BundleKey,
    },
};

pub use self::clear::clear_cache;

/// A kind of asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    /// A stylesheet.
    Style,
    /// A script.
    Script,
}

impl AssetKind {
    /// Return the file extension, also used as directory name and bundle
    /// file name prefix.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Style => "css",
            Self::Script => "js",
        }
    }

    /// Return the file name of a bundle (e.g. `css_<key>.css`).
    pub fn bundle_filename(&self, key: &BundleKey) -> String {
        let extension = self.extension();
        format!("{extension}_{key}.{extension}")
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A stylesheet or script reference, as provided by the host page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Asset {
    /// Path of the asset, relative to the input directory, or its URL.
    pub path: String,

    /// Kind of asset.
    pub kind: AssetKind,

    /// Whether the asset is inline code rather than a file.
    pub inline: bool,

    /// Whether the asset is hosted elsewhere (e.g. on a CDN).
    pub external: bool,

    /// Ordering weight; lower weights come first.
    pub weight: i32,
}

impl Asset {
    /// Create a local asset.
    pub fn new(path: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            kind,
            inline: false,
            external: false,
            weight: 0,
        }
    }

    /// Create a stylesheet asset.
    pub fn style(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Style)
    }

    /// Create a script asset.
    pub fn script(path: impl Into<String>) -> Self {
        Self::new(path, AssetKind::Script)
    }

    /// Mark the asset as inline code.
    pub fn with_inline(self, inline: bool) -> Self {
        Self { inline, ..self }
    }

    /// Mark the asset as hosted elsewhere.
    pub fn with_external(self, external: bool) -> Self {
        Self { external, ..self }
    }

    /// Set the ordering weight.
    pub fn with_weight(self, weight: i32) -> Self {
        Self { weight, ..self }
    }
}

/// A bundle file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bundle {
    /// Cache key, derived from the source paths.
    pub key: BundleKey,

    /// Kind of the bundled assets.
    pub kind: AssetKind,

    /// Directory containing the bundle.
    pub directory: PathBuf,

    /// File name of the bundle.
    pub filename: String,

    /// URI of the bundle, `<directory>/<filename>`.
    pub uri: String,
}

impl Bundle {
    /// Describe the bundle of given sources, without touching the disk.
    fn new(config: &Config, kind: AssetKind, sources: &[Asset]) -> Self {
        let paths: Vec<&str> = sources.iter().map(|asset| asset.path.as_str()).collect();
        let key = BundleKey::from_paths(&paths);
        let directory = config.bundle_dir(kind);
        let filename = kind.bundle_filename(&key);
        let uri = format!(
            "{}/{}",
            directory.to_string_lossy().trim_end_matches('/'),
            filename
        );

        Self {
            key,
            kind,
            directory,
            filename,
            uri,
        }
    }

    /// Return the file path of the bundle.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// An output slot: either an asset left untouched or a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// An asset emitted as is.
    Standalone(Asset),
    /// A bundle of merged assets.
    Bundle(Bundle),
}

impl Artifact {
    /// Return the URI to reference from the page.
    pub fn uri(&self) -> &str {
        match self {
            Self::Standalone(asset) => &asset.path,
            Self::Bundle(bundle) => &bundle.uri,
        }
    }
}

/// Merge assets into cached bundles.
#[derive(Clone, Debug)]
pub struct Bundler<'config> {
    config: &'config Config,
}

impl<'config> Bundler<'config> {
    /// Create a bundler with given configuration.
    pub fn new(config: &'config Config) -> Self {
        Self { config }
    }

    /// Bundle assets of a given kind, if enabled in the configuration.
    ///
    /// Assets are first sorted by weight (stable). When bundling is disabled
    /// for `kind`, every asset is returned as a standalone artifact.
    pub fn compress(&self, assets: &[Asset], kind: AssetKind) -> Result<Vec<Artifact>, Error> {
        if !self.config.is_enabled(kind) {
            return Ok(assets.iter().cloned().map(Artifact::Standalone).collect());
        }

        let mut assets = assets.to_vec();
        assets.sort_by_key(|asset| asset.weight);

        self.bundle(&assets, kind)
    }

    /// Bundle assets of a given kind.
    ///
    /// Contiguous mergeable assets are written to a single bundle, or reuse
    /// the existing bundle with the same key. Excluded assets are returned
    /// in place, untouched.
    pub fn bundle(&self, assets: &[Asset], kind: AssetKind) -> Result<Vec<Artifact>, Error> {
        group::partition(assets, kind, &self.config.exclude_paths)
            .into_iter()
            .map(|group| match group {
                Group::Standalone(asset) => Ok(Artifact::Standalone(asset)),
                Group::Merge(sources) => self.build_bundle(kind, &sources).map(Artifact::Bundle),
            })
            .collect()
    }

    /// Build the bundle of given sources, unless it already exists.
    fn build_bundle(&self, kind: AssetKind, sources: &[Asset]) -> Result<Bundle, Error> {
        let bundle = Bundle::new(self.config, kind, sources);
        let path = bundle.path();

        if path.exists() {
            debug!("Reusing {:?}", path);
            return Ok(bundle);
        }

        let data = match kind {
            AssetKind::Style => self.aggregate_styles(sources, &path)?.into_bytes(),
            AssetKind::Script => self.aggregate_scripts(sources, &path)?,
        };

        info!("Writing {} {} files to {:?}", sources.len(), kind, path);

        write_bundle(&bundle.directory, &bundle.filename, &data)?;

        Ok(bundle)
    }

    /// Concatenate stylesheets with their imports inlined and their `url()`
    /// references anchored to the base URL.
    fn aggregate_styles(&self, sources: &[Asset], bundle_path: &Path) -> Result<String, Error> {
        let base_url = self.config.base_url.as_deref().ok_or(Error::MissingBaseUrl)?;
        let resolver = CssResolver::new(&self.config.input_dir);
        let mut data = String::new();

        for asset in sources {
            let contents = resolver
                .load(&asset.path, true)
                .map_err(|source| Error::ReadStyle {
                    bundle_path: bundle_path.to_owned(),
                    source,
                })?;

            // Directory of the stylesheet, as an absolute URL
            let url = format!("{base_url}{}", asset.path);
            let base = match url.rfind('/') {
                Some(i) => &url[..=i],
                None => "/",
            };

            data.push_str(&rebase_urls(&contents, base));
        }

        Ok(hoist_imports(&data))
    }

    /// Concatenate scripts.
    fn aggregate_scripts(&self, sources: &[Asset], bundle_path: &Path) -> Result<Vec<u8>, Error> {
        bundle_js(
            &self.config.input_dir,
            sources.iter().map(|asset| asset.path.as_str()),
        )
        .map_err(|source| Error::ReadScript {
            bundle_path: bundle_path.to_owned(),
            source,
        })
    }
}
