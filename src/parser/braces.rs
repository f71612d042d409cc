//! Brace depth tracking over masked source lines.
//!
//! String literals, `/* ... */` spans closed on the same line and trailing
//! `//` comments are removed before counting. A block comment spanning
//! several lines is not tracked across lines.

use regex::Regex;
use std::sync::LazyLock;

static RE_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).unwrap());

static RE_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*.*?\*/").unwrap());

static RE_LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*$").unwrap());

/// Remove string contents and comments from a single line.
pub fn mask(line: &str) -> String {
    let line = RE_STRING.replace_all(line, "");
    let line = RE_BLOCK_COMMENT.replace_all(&line, "");
    RE_LINE_COMMENT.replace(&line, "").into_owned()
}

/// Return `depth` adjusted by the braces opened and closed on `line`.
pub fn update(line: &str, depth: i32) -> i32 {
    if line.trim_start().starts_with("//") {
        return depth;
    }
    let masked = mask(line);
    let open = masked.matches('{').count() as i32;
    let close = masked.matches('}').count() as i32;
    depth + open - close
}
