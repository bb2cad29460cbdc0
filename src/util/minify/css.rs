//! Minify CSS code.
//!
//! This is a conservative text minifier, not a CSS parser: it removes block
//! comments and whitespace that cannot be significant, and never touches the
//! inside of quoted strings.

/// Minify a CSS string.
///
/// - Removes `/* ... */` comments outside of quoted strings.
/// - Removes whitespace around `@`, `{`, `}`, `;` and `,`.
/// - Removes whitespace before `)` and after `(` or `:`, which keeps
///   `@media (a) and (b)` and `a :hover` intact.
/// - Trims the result and ends it with exactly one newline.
///
/// The output is a fixed point: minifying it again returns it unchanged.
pub fn minify_css(input: impl AsRef<str>) -> String {
    let input = strip_comments(input.as_ref());
    let mut output = collapse_whitespace(&input);

    let trimmed_len = output.trim_end_matches(is_trim_char).len();
    output.truncate(trimmed_len);
    let leading = output.len() - output.trim_start_matches(is_trim_char).len();
    output.drain(..leading);
    output.push('\n');

    output
}

/// Characters removed at both ends of the output.
fn is_trim_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// Return the byte length of the quoted string starting at `input[0]`.
///
/// A backslash escapes the next character, newlines included. Returns `None`
/// for an unterminated string.
pub(crate) fn quoted_len(input: &str) -> Option<usize> {
    let mut chars = input.char_indices();
    let (_, quote) = chars.next().filter(|(_, c)| *c == '"' || *c == '\'')?;

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            },
            c if c == quote => return Some(i + 1),
            _ => {},
        }
    }

    None
}

/// Remove block comments, copying quoted strings verbatim.
fn strip_comments(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(i) = rest.find(['"', '\'', '/']) {
        output.push_str(&rest[..i]);
        rest = &rest[i..];

        if let Some(len) = quoted_len(rest) {
            output.push_str(&rest[..len]);
            rest = &rest[len..];
        } else if let Some(end) = rest.strip_prefix("/*").and_then(|s| s.find("*/")) {
            rest = &rest[end + 4..];

            // A slash before the comment must not open a new one with a star
            // after it
            if output.ends_with('/') && rest.starts_with('*') {
                output.push(' ');
            }
        } else {
            // Unterminated string or comment, or a lone slash
            output.push_str(&rest[..1]);
            rest = &rest[1..];
        }
    }

    output.push_str(rest);
    output
}

/// Remove insignificant whitespace, copying quoted strings verbatim.
fn collapse_whitespace(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;

    let skip_whitespace = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                let len = quoted_len(&input[i..]).unwrap_or(1);
                output.push_str(&input[i..i + len]);
                i += len;
            },
            b'@' | b'{' | b'}' | b';' | b',' | b'(' | b':' => {
                output.push(bytes[i] as char);
                i = skip_whitespace(i + 1);
            },
            c if c.is_ascii_whitespace() => {
                let end = skip_whitespace(i);
                match bytes.get(end) {
                    Some(b'@' | b'{' | b'}' | b';' | b',' | b')') => {},
                    _ => output.push_str(&input[i..end]),
                }
                i = end;
            },
            _ => {
                // Copy everything up to the next interesting byte at once, so
                // multi-byte characters are never split
                let end = input[i..]
                    .find(|c: char| c.is_ascii_whitespace() || "\"'@{};,(:".contains(c))
                    .map_or(input.len(), |n| i + n);
                let end = end.max(i + 1);
                output.push_str(&input[i..end]);
                i = end;
            },
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::minify_css;

    #[test]
    fn minify() {
        const INPUT: &str = concat!(
            ".foo {\n",          //
            "  color: black;\n", //
            "}\n"
        );

        assert_eq!(minify_css(INPUT), ".foo{color:black;}\n");
    }

    #[test]
    fn strip_comments() {
        const INPUT: &str = concat!(
            "/* header */\n",                          //
            ".foo { color: \"/* not a comment */\"; }\n", //
            "/* footer */"
        );

        assert_eq!(
            minify_css(INPUT),
            ".foo{color:\"/* not a comment */\";}\n"
        );
    }

    #[test]
    fn keep_single_quoted_strings() {
        let result = minify_css(".a { content: 'a , b { }'; }");
        assert_eq!(result, ".a{content:'a , b { }';}\n");
    }

    #[test]
    fn keep_escaped_quotes() {
        let result = minify_css(r#".a { content: "say \"/* hi */\""; }"#);
        assert_eq!(result, ".a{content:\"say \\\"/* hi */\\\"\";}\n");
    }

    #[test]
    fn keep_significant_whitespace() {
        let result = minify_css("@media screen and ( max-width : 10px ) { a :hover { margin: 0 auto } }");
        assert_eq!(
            result,
            "@media screen and (max-width :10px){a :hover{margin:0 auto}}\n"
        );
    }

    #[test]
    fn keep_line_continuations() {
        let result = minify_css(".a { content: \"x\\\n/* kept */\"; }");
        assert_eq!(result, ".a{content:\"x\\\n/* kept */\";}\n");
    }

    #[test]
    fn comment_between_slash_and_star() {
        assert_eq!(minify_css("a{b:c}//**/*x*/"), "a{b:c}/ *x*/\n");
    }

    #[test]
    fn unterminated_comment() {
        assert_eq!(minify_css("a { b: c } /* open"), "a{b:c}/* open\n");
    }

    #[test]
    fn non_ascii() {
        assert_eq!(
            minify_css(".é { content: \"→\" ; }"),
            ".é{content:\"→\";}\n"
        );
    }

    #[test]
    fn idempotent() {
        const INPUTS: [&str; 7] = [
            ".foo{color:\"/* not a comment */\"} /* real */ .bar { x : y }",
            "@import url( \"a.css\" ) ;\n\n.a , .b { margin : 0 }",
            "  \n\t",
            "a { b: url( img/x.png ) }",
            "@media (min-width: 10px) and (max-width: 20px) { a { b: c } }",
            "a{b:c}//**/*x*/",
            ".a { content: \"x\\\n y\" }",
        ];

        for input in INPUTS {
            let once = minify_css(input);
            assert_eq!(minify_css(&once), once, "input: {input:?}");
        }
    }
}
