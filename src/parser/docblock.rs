//! Documentation comment extraction.
//!
//! Walks upward from the line above a declaration and collects either a run
//! of `///` lines or a single `/** ... */` block.

use regex::Regex;
use std::sync::LazyLock;

static RE_DOC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*///\s?(.*)$").unwrap());

/// Collect the doc block ending at `anchor` (the line directly above the
/// documented declaration). Lines are returned top to bottom.
pub fn extract<S: AsRef<str>>(content: &[S], anchor: usize) -> Vec<String> {
    if anchor >= content.len() {
        return Vec::new();
    }

    let mut block: Vec<String> = Vec::new();
    for line in content[..=anchor].iter().rev() {
        match RE_DOC_LINE.captures(line.as_ref()) {
            Some(caps) => block.push(caps[1].trim_end().to_string()),
            None => break,
        }
    }
    if !block.is_empty() {
        block.reverse();
        return block;
    }

    extract_block_comment(content, anchor)
}

fn extract_block_comment<S: AsRef<str>>(content: &[S], anchor: usize) -> Vec<String> {
    let Some(closing) = content[anchor].as_ref().trim_end().strip_suffix("*/") else {
        return Vec::new();
    };

    // A comment opened and closed on the anchor line: documentation only if
    // the line is nothing but a `/** ... */` block.
    if closing.contains("/*") {
        return match closing.trim_start().strip_prefix("/**") {
            Some(rest) => unindent(trim_blank_edges(vec![rest.trim().to_string()])),
            None => Vec::new(),
        };
    }

    let mut block = vec![strip_decoration(closing).trim_end().to_string()];
    let mut opened = false;
    for line in content[..anchor].iter().rev() {
        let text = line.as_ref().trim_end();
        let trimmed = text.trim_start();
        if text.ends_with("*/") {
            // end of an earlier comment
            return Vec::new();
        }
        if let Some(rest) = trimmed.strip_prefix("/**") {
            block.push(rest.trim_end().to_string());
            opened = true;
            break;
        }
        if trimmed.starts_with("/*") {
            // plain block comment, not documentation
            return Vec::new();
        }
        block.push(strip_decoration(text).trim_end().to_string());
    }
    if !opened {
        return Vec::new();
    }

    block.reverse();
    unindent(trim_blank_edges(block))
}

/// Strip a leading ` * ` gutter from a block comment body line.
fn strip_decoration(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

fn trim_blank_edges(mut block: Vec<String>) -> Vec<String> {
    while block.first().is_some_and(|l| l.trim().is_empty()) {
        block.remove(0);
    }
    while block.last().is_some_and(|l| l.trim().is_empty()) {
        block.pop();
    }
    block
}

/// Remove the indentation shared by all non-blank lines. Indentation is
/// counted in characters, so any Unicode whitespace is stripped safely.
fn unindent(block: Vec<String>) -> Vec<String> {
    let indent_of = |l: &str| l.chars().take_while(|c| c.is_whitespace()).count();
    let min_indent = block
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l.as_str()))
        .min()
        .unwrap_or(0);

    block
        .into_iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(min_indent).collect()
            }
        })
        .collect()
}
