//! Derive cache keys for bundles.
//!
//! This module uses [`blake3`] under the hood.

/// Number of hexadecimal digits kept from the digest.
const KEY_LEN: usize = 32;

/// Identifier of a bundle, derived from its ordered list of source paths.
///
/// The same list always produces the same key, and any change in order,
/// membership, or path spelling produces a different one. File contents are
/// not hashed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BundleKey(String);

impl BundleKey {
    /// Compute the key of an ordered list of paths.
    pub fn from_paths<S>(paths: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let paths: Vec<&str> = paths.iter().map(|path| path.as_ref()).collect();

        // Serializing a `Vec<&str>` cannot fail
        let json = serde_json::to_string(&paths).unwrap_or_default();

        let digest = blake3::hash(json.as_bytes());
        let mut key = hex::encode(digest.as_bytes());
        key.truncate(KEY_LEN);

        Self(key)
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BundleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BundleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
