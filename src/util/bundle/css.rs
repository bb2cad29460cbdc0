//! Bundle CSS code.
//!
//! Stylesheets are flattened by inlining internal `@import` rules, while
//! relative `url()` references are rewritten so they keep pointing at the
//! same resources from the bundle location.
//!
//! The scanning is text based, not a CSS tokenizer. Known limitations:
//!
//! - an unquoted `@import` target without `url(` ends at the first `;`;
//! - a `url()` target ends at the first quote or `)`, so unquoted targets
//!   containing `)` are cut short;
//! - `@import` rules and `url()` inside comments are processed as well,
//!   unless the minifier removed the comments first;
//! - `@import` rules with a media list are never inlined.
//!
//! Stylesheets must be encoded in UTF-8. A stylesheet importing itself,
//! directly or through other imports, is an error.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::util::{
    minify::css::{minify_css, quoted_len},
    url::{collapse_parent_segments, dirname, is_absolute_or_external, is_external, join_base},
};

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum BundleCssError {
    /// A stylesheet could not be read.
    #[error("failed to read stylesheet {path:?}")]
    Read {
        /// Path of the stylesheet.
        path: PathBuf,
        /// Source error.
        source: std::io::Error,
    },
    /// A stylesheet is not valid UTF-8.
    #[error("stylesheet {path:?} is not valid UTF-8")]
    Encoding {
        /// Path of the stylesheet.
        path: PathBuf,
        /// Source error.
        source: std::string::FromUtf8Error,
    },
    /// A stylesheet imports itself, directly or through other imports.
    #[error("stylesheet {path:?} imports itself")]
    Cycle {
        /// Path of the stylesheet.
        path: PathBuf,
    },
}

/// State of one level of `@import` resolution.
///
/// Frames are passed by reference down the recursion, so a nested import
/// never changes the base path seen by its siblings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportFrame {
    /// Directory of the stylesheet being processed, relative to the root.
    ///
    /// Empty for the top-level call.
    pub base_path: String,
    /// Whether stylesheets are minified before imports are resolved.
    pub optimize: bool,
    /// Canonical paths of the stylesheets being loaded, outermost first.
    pub ancestors: Vec<PathBuf>,
}

/// Load stylesheets and resolve their `@import` rules.
#[derive(Clone, Debug)]
pub struct CssResolver {
    root: PathBuf,
}

impl CssResolver {
    /// Create a resolver reading stylesheet paths relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a stylesheet and inline its internal imports, recursively.
    pub fn load(&self, path: &str, optimize: bool) -> Result<String, BundleCssError> {
        let frame = ImportFrame {
            optimize,
            ..ImportFrame::default()
        };
        self.load_with(&frame, path)
    }

    /// Load a stylesheet imported from the stylesheet described by `parent`.
    ///
    /// Internal paths are resolved against the directory of the importing
    /// stylesheet.
    pub fn load_with(&self, parent: &ImportFrame, path: &str) -> Result<String, BundleCssError> {
        let path = join_base(&parent.base_path, path);

        let file_path = self.root.join(&path);
        let read = |file_path: &Path| -> std::io::Result<(PathBuf, Vec<u8>)> {
            Ok((std::fs::canonicalize(file_path)?, std::fs::read(file_path)?))
        };
        let (canonical_path, bytes) = read(&file_path).map_err(|source| BundleCssError::Read {
            path: file_path.clone(),
            source,
        })?;

        if parent.ancestors.contains(&canonical_path) {
            return Err(BundleCssError::Cycle { path: file_path });
        }

        let contents = String::from_utf8(bytes).map_err(|source| BundleCssError::Encoding {
            path: file_path,
            source,
        })?;

        let mut ancestors = parent.ancestors.clone();
        ancestors.push(canonical_path);

        let frame = ImportFrame {
            base_path: dirname(&path).to_owned(),
            optimize: parent.optimize,
            ancestors,
        };

        self.process(&frame, &contents)
    }

    /// Process the contents of a stylesheet located in `frame.base_path`.
    ///
    /// Strips the leading `@charset` rule, minifies if requested, and
    /// replaces each internal `@import` rule with the imported contents.
    pub fn process(&self, frame: &ImportFrame, contents: &str) -> Result<String, BundleCssError> {
        let contents = strip_charset(contents);

        let contents = if frame.optimize {
            minify_css(contents)
        } else {
            contents.to_owned()
        };

        let mut output = String::with_capacity(contents.len());
        let mut rest = contents.as_str();

        while let Some(i) = rest.find("@import") {
            output.push_str(&rest[..i]);
            rest = &rest[i..];

            match parse_import(rest) {
                Some((len, target)) => {
                    debug!("Inlining {target:?} from {:?}", frame.base_path);
                    let imported = self.load_with(frame, target)?;
                    output.push_str(&rewrite_imported_urls(&imported, target));
                    rest = &rest[len..];
                },
                None => {
                    output.push('@');
                    rest = &rest[1..];
                },
            }
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Remove a `@charset "...";` rule at the very start of a stylesheet.
///
/// Merged stylesheets may only declare a charset once, at the top. Every
/// loaded file is stripped, including the first one of a bundle.
fn strip_charset(contents: &str) -> &str {
    fn parse(contents: &str) -> Option<usize> {
        let keyword = contents.get(..8)?;
        if !keyword.eq_ignore_ascii_case("@charset") {
            return None;
        }

        let rest = &contents[8..];
        let value = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if value.len() == rest.len() {
            return None;
        }

        let len = quoted_len(value)?;
        let name = &value[1..len - 1];
        let ends_with_word = name
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if !ends_with_word || name.contains(|c: char| c.is_whitespace()) {
            return None;
        }

        value[len..]
            .starts_with(';')
            .then(|| contents.len() - value.len() + len + 1)
    }

    match parse(contents) {
        Some(len) => &contents[len..],
        None => contents,
    }
}

/// Return the byte length of the leading ASCII whitespace.
fn leading_whitespace(input: &str) -> usize {
    input.len() - input.trim_start_matches(|c: char| c.is_ascii_whitespace()).len()
}

/// Parse an internal `@import` rule at the start of `input`.
///
/// Accepts `@import "a.css";`, `@import 'a.css';`, `@import url(a.css);`,
/// `@import url("a.css");` and `@import a.css;`. Returns the length of the
/// rule and the imported path. External targets and rules with a media list
/// return `None`.
fn parse_import(input: &str) -> Option<(usize, &str)> {
    let mut pos = "@import".len();
    pos += leading_whitespace(&input[pos..]);

    if input[pos..].starts_with("url(") {
        pos += "url(".len();
        pos += leading_whitespace(&input[pos..]);
    }

    if input[pos..].starts_with(['"', '\'']) {
        pos += 1;
    }

    let target_len = input[pos..].find(['"', '\'', '(', ')', ';'])?;
    let target = input[pos..pos + target_len].trim_end();
    if target.is_empty() || is_external(target) {
        return None;
    }
    pos += target_len;

    if input[pos..].starts_with(['"', '\'']) {
        pos += 1;
    }
    pos += leading_whitespace(&input[pos..]);
    if input[pos..].starts_with(')') {
        pos += 1;
    }
    pos += leading_whitespace(&input[pos..]);

    input[pos..].starts_with(';').then_some((pos + 1, target))
}

/// A `url()` reference found in a stylesheet.
struct UrlRef<'a> {
    /// Byte length of the whole `url(...)` token.
    len: usize,
    /// Opening quote, if any.
    open: &'a str,
    /// Referenced path, without quotes and surrounding whitespace.
    target: &'a str,
    /// Closing quote, if any.
    close: &'a str,
}

/// Parse an internal `url()` reference at the start of `input`.
///
/// The `url` keyword is matched case-insensitively. Absolute and external
/// targets return `None`.
fn parse_url(input: &str) -> Option<UrlRef<'_>> {
    if !input.get(..4)?.eq_ignore_ascii_case("url(") {
        return None;
    }

    let mut pos = 4 + leading_whitespace(&input[4..]);

    let open = if input[pos..].starts_with(['"', '\'']) {
        pos += 1;
        &input[pos - 1..pos]
    } else {
        ""
    };

    let target_len = input[pos..].find(['"', '\'', ')'])?;
    let target = input[pos..pos + target_len].trim_end();
    if target.is_empty() || is_absolute_or_external(target) {
        return None;
    }
    pos += target_len;

    let close = if input[pos..].starts_with(['"', '\'']) {
        pos += 1;
        &input[pos - 1..pos]
    } else {
        ""
    };

    pos += leading_whitespace(&input[pos..]);

    input[pos..].starts_with(')').then_some(UrlRef {
        len: pos + 1,
        open,
        target,
        close,
    })
}

/// Replace each internal `url()` reference using `replace`.
fn replace_urls(contents: &str, mut replace: impl FnMut(&UrlRef) -> String) -> String {
    let mut output = String::with_capacity(contents.len());
    let mut rest = contents;

    while let Some(i) = find_ignore_case(rest, "url(") {
        output.push_str(&rest[..i]);
        rest = &rest[i..];

        match parse_url(rest) {
            Some(url) => {
                output.push_str(&replace(&url));
                rest = &rest[url.len..];
            },
            None => {
                output.push_str(&rest[..1]);
                rest = &rest[1..];
            },
        }
    }

    output.push_str(rest);
    output
}

/// Find an ASCII `needle` in `haystack`, ignoring case.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Prefix internal `url()` references of an imported stylesheet with the
/// directory of the import path.
///
/// `import_path` is the path as written in the `@import` rule, i.e. relative
/// to the importing stylesheet. Quotes are preserved.
pub fn rewrite_imported_urls(contents: &str, import_path: &str) -> String {
    let prefix = match dirname(import_path) {
        "." => String::new(),
        directory => format!("{directory}/"),
    };

    replace_urls(contents, |url| {
        format!("url({}{}{}{})", url.open, prefix, url.target, url.close)
    })
}

/// Anchor internal `url()` references to `base`, collapsing `../` segments.
///
/// `base` is usually the absolute URL of the directory of the stylesheet,
/// ending with `/`. Quotes are dropped.
pub fn rebase_urls(contents: &str, base: &str) -> String {
    replace_urls(contents, |url| {
        let path = collapse_parent_segments(&format!("{base}{}", url.target));
        format!("url({path})")
    })
}

/// Move every `@import` rule to the top, keeping their relative order.
///
/// CSS ignores `@import` rules that follow any other rule, which happens
/// once several stylesheets are concatenated.
pub fn hoist_imports(contents: &str) -> String {
    let mut imports = String::new();
    let mut others = String::with_capacity(contents.len());
    let mut rest = contents;

    while let Some(i) = find_ignore_case(rest, "@import") {
        others.push_str(&rest[..i]);
        rest = &rest[i..];

        let end = rest["@import".len()..]
            .find(';')
            .filter(|&n| n > 0)
            .map(|n| "@import".len() + n + 1);

        match end {
            Some(end) => {
                imports.push_str(&rest[..end]);
                rest = &rest[end..];
            },
            None => {
                others.push_str(&rest[..1]);
                rest = &rest[1..];
            },
        }
    }

    others.push_str(rest);
    imports + &others
}
