//! Split assets into mergeable groups.

use super::{Asset, AssetKind};

/// A group of assets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Group {
    /// Contiguous assets merged into one bundle.
    Merge(Vec<Asset>),
    /// An asset kept as is.
    Standalone(Asset),
}

/// Check if an asset must stay out of bundles.
///
/// Inline and external assets are never merged, nor are assets whose path
/// contains one of `exclude_paths`, nor assets of another kind.
pub fn is_excluded(asset: &Asset, kind: AssetKind, exclude_paths: &[String]) -> bool {
    asset.inline
        || asset.external
        || asset.kind != kind
        || exclude_paths
            .iter()
            .any(|path| !path.is_empty() && asset.path.contains(path.as_str()))
}

/// Split assets into groups, preserving their order.
///
/// Each excluded asset closes the current group and becomes a
/// [`Group::Standalone`]. Local assets with an empty path are dropped.
pub fn partition(assets: &[Asset], kind: AssetKind, exclude_paths: &[String]) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for asset in assets {
        if is_excluded(asset, kind, exclude_paths) {
            if !current.is_empty() {
                groups.push(Group::Merge(std::mem::take(&mut current)));
            }
            groups.push(Group::Standalone(asset.clone()));
        } else if !asset.path.is_empty() {
            current.push(asset.clone());
        }
    }

    if !current.is_empty() {
        groups.push(Group::Merge(current));
    }

    groups
}
