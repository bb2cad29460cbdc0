//! Path algebra for asset references and CSS `url()` targets.
//!
//! References are handled as plain strings with `/` separators, since they
//! may be server-relative paths or full URLs (e.g. a base URL joined with a
//! file path). Nothing here touches the file system.

/// Return the length of the scheme at the start of `reference`, if any.
///
/// A scheme starts with an ASCII letter, followed by letters, digits, `+`,
/// `-` or `.`, and ends with `:`.
fn scheme_len(reference: &str) -> Option<usize> {
    let (i, c) = reference.char_indices().find(|(i, c)| match i {
        0 => !c.is_ascii_alphabetic(),
        _ => !c.is_ascii_alphanumeric() && !['+', '-', '.'].contains(c),
    })?;

    (i > 0 && c == ':').then_some(i)
}

/// Check if a reference points outside of the site (e.g. `https://cdn/x.css`,
/// `data:...` or `//cdn/x.css`).
pub fn is_external(reference: &str) -> bool {
    reference.starts_with("//") || scheme_len(reference).is_some()
}

/// Check if a reference is external or absolute (starts with `/`).
///
/// Such references are never rewritten relative to another location.
pub fn is_absolute_or_external(reference: &str) -> bool {
    reference.starts_with('/') || is_external(reference)
}

/// Join a base path and a relative reference with a `/`.
///
/// The reference is returned unchanged when the base is empty or when it
/// already carries an authority (`://`).
pub fn join_base(base: &str, reference: &str) -> String {
    if base.is_empty() || reference.contains("://") {
        reference.to_owned()
    } else {
        format!("{base}/{reference}")
    }
}

/// Return the directory part of a path.
///
/// Returns `"."` when the path has no `/`, and `"/"` for a file located at
/// the root. Trailing slashes are ignored.
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }

    match trimmed.rfind('/') {
        None => ".",
        Some(i) => match trimmed[..i].trim_end_matches('/') {
            "" => "/",
            parent => parent,
        },
    }
}

/// Remove `segment/../` sequences from a path until none can be removed.
///
/// A `../` without a preceding segment is kept, so the result never climbs
/// above its first segment. Applying this function twice yields the same
/// result as applying it once.
pub fn collapse_parent_segments(path: &str) -> String {
    let mut path = path.to_owned();
    while let Some(range) = find_collapsible(&path) {
        path.replace_range(range, "");
    }
    path
}

/// Find the leftmost `segment/../` sequence.
///
/// Returns the byte range to remove. The `/` preceding the segment, if any,
/// is kept.
fn find_collapsible(path: &str) -> Option<std::ops::Range<usize>> {
    let starts = std::iter::once(0).chain(path.match_indices('/').map(|(i, _)| i + 1));

    for start in starts {
        let end = path[start..]
            .find('/')
            .map_or(path.len(), |i| start + i);
        let segment = &path[start..end];

        if segment.is_empty() || segment == ".." {
            continue;
        }

        if path[end..].starts_with("/../") {
            return Some(start..end + 4);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{collapse_parent_segments, dirname, is_absolute_or_external, is_external, join_base};

    #[test]
    fn external() {
        const CASES: [(&str, bool); 10] = [
            ("http://example.com/a.css", true),
            ("HTTPS://example.com/a.css", true),
            ("//cdn.example.com/a.css", true),
            ("data:image/png;base64,AAAA", true),
            ("a+b-c.d:foo", true),
            ("a.css", false),
            ("img/x.png", false),
            ("/img/x.png", false),
            ("../img/x.png", false),
            ("1http://x", false),
        ];

        for (input, expected) in CASES {
            assert_eq!(is_external(input), expected, "is_external({input:?})");
        }
    }

    #[test]
    fn absolute_or_external() {
        assert!(is_absolute_or_external("/img/x.png"));
        assert!(is_absolute_or_external("//cdn/x.png"));
        assert!(is_absolute_or_external("http://other/x.png"));
        assert!(!is_absolute_or_external("img/x.png"));
    }

    #[test]
    fn join() {
        assert_eq!(join_base("", "a.css"), "a.css");
        assert_eq!(join_base("styles", "a.css"), "styles/a.css");
        assert_eq!(join_base("styles", "../a.css"), "styles/../a.css");
        assert_eq!(
            join_base("styles", "http://cdn/a.css"),
            "http://cdn/a.css"
        );
    }

    #[test]
    fn parent_directory() {
        const CASES: [(&str, &str); 9] = [
            ("", "."),
            ("a.css", "."),
            ("styles/a.css", "styles"),
            ("a/b/c.css", "a/b"),
            ("/a.css", "/"),
            ("/", "/"),
            ("styles/", "."),
            ("a//b.css", "a"),
            ("http://host/styles/a.css", "http://host/styles"),
        ];

        for (input, expected) in CASES {
            assert_eq!(dirname(input), expected, "dirname({input:?})");
        }
    }

    #[test]
    fn collapse() {
        const CASES: [(&str, &str); 11] = [
            ("a/b/../c", "a/c"),
            ("../a", "../a"),
            ("a/../b", "b"),
            ("a/b/../../c", "c"),
            ("../../a/../b", "../../b"),
            ("a/b/..", "a/b/.."),
            ("http://host/styles/../img/x.png", "http://host/img/x.png"),
            ("http://host/a/b/../../img/x.png", "http://host/img/x.png"),
            ("/a/../b", "/b"),
            ("a..b/../c", "c"),
            ("img/x.png", "img/x.png"),
        ];

        for (input, expected) in CASES {
            let result = collapse_parent_segments(input);
            assert_eq!(result, expected, "collapse_parent_segments({input:?})");
            assert_eq!(collapse_parent_segments(&result), result, "idempotence");
        }
    }
}
