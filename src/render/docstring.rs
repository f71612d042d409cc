//! Doc block to reStructuredText conversion.
//!
//! A single pass over the raw comment lines with four modes: prose (default),
//! fenced code, a `- parameters:` list, and a structured field that may
//! continue onto indented lines. Output is produced lazily.

use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

static RE_CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`").unwrap());

static RE_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*- (?i:parameter|param)\s+(?P<name>[^:]+?)\s*:\s*(?P<desc>.*)$").unwrap()
});

static RE_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)- (?P<name>[^:]+?)\s*:\s*(?P<desc>.*)$").unwrap()
});

static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*- (?P<key>[A-Za-z]+(?: [A-Za-z]+)?)\s*:\s*(?P<desc>.*)$").unwrap()
});

const PARAMETERS_MARKER: &str = "- parameters:";
const NOINDEX_MARKER: &str = "- noindex: true";

/// Directive emitted for a recognized field keyword (lowercase).
fn field_directive(keyword: &str) -> Option<&'static str> {
    let directive = match keyword {
        "returns" | "return" => "returns",
        "throws" | "throw" => "throws",
        "default" | "defaults" => "defaults",
        "attention" => "attention",
        "author" => "author",
        "authors" => "authors",
        "bug" => "bug",
        "complexity" => "complexity",
        "copyright" => "copyright",
        "date" => "date",
        "example" => "example",
        "experiment" => "experiment",
        "important" => "important",
        "invariant" => "invariant",
        "note" => "note",
        "precondition" => "precondition",
        "postcondition" => "postcondition",
        "remark" => "remark",
        "requires" => "requires",
        "see also" | "seealso" => "see also",
        "since" => "since",
        "version" => "version",
        "warning" => "warning",
        _ => return None,
    };
    Some(directive)
}

enum Mode {
    Prose,
    Code,
    Parameters { indent: Option<String> },
}

/// Convert a doc block into reStructuredText lines.
pub fn render(doc_block: &[String]) -> RstLines<'_> {
    RstLines {
        lines: doc_block.iter(),
        queue: VecDeque::new(),
        mode: Mode::Prose,
        field: None,
        was_doc: true,
        last_blank: true,
    }
}

/// Lazy output of [`render`]; consumed once.
pub struct RstLines<'a> {
    lines: std::slice::Iter<'a, String>,
    queue: VecDeque<String>,
    mode: Mode,
    /// Field line still accepting continuation text.
    field: Option<String>,
    /// Whether the last emitted content was prose rather than a field.
    was_doc: bool,
    last_blank: bool,
}

impl Iterator for RstLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.queue.pop_front() {
                return Some(line);
            }
            match self.lines.next() {
                Some(line) => self.process(line),
                None => {
                    self.flush_field();
                    return self.queue.pop_front();
                }
            }
        }
    }
}

impl RstLines<'_> {
    fn process(&mut self, line: &str) {
        if line.trim_start().starts_with("```") {
            self.flush_field();
            if matches!(self.mode, Mode::Code) {
                self.mode = Mode::Prose;
                self.blank();
            } else {
                let lang = line.trim().trim_start_matches('`').trim();
                let lang = if lang.is_empty() { "swift" } else { lang };
                self.blank();
                self.push(format!(".. code-block:: {}", lang));
                self.push(String::new());
                self.mode = Mode::Code;
            }
            return;
        }

        if matches!(self.mode, Mode::Code) {
            if line.trim().is_empty() {
                self.push(String::new());
            } else {
                self.push(format!("    {}", line));
            }
            return;
        }

        if self.field.is_some() && self.is_continuation(line) {
            if let Some(field) = self.field.as_mut() {
                field.push(' ');
                field.push_str(&inline(line.trim()));
            }
            return;
        }

        if let Mode::Parameters { indent } = &mut self.mode {
            match RE_LIST_ITEM.captures(line) {
                Some(caps) if indent.as_deref().map_or(true, |i| i == &caps["indent"]) => {
                    *indent = Some(caps["indent"].to_string());
                    let entry = format!(":parameter {}: {}", &caps["name"], inline(&caps["desc"]));
                    self.start_field(entry);
                    return;
                }
                _ => self.mode = Mode::Prose,
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.flush_field();
            self.blank();
            return;
        }
        if trimmed.eq_ignore_ascii_case(NOINDEX_MARKER) {
            self.flush_field();
            return;
        }
        if trimmed.eq_ignore_ascii_case(PARAMETERS_MARKER) {
            self.flush_field();
            self.blank();
            self.was_doc = false;
            self.mode = Mode::Parameters { indent: None };
            return;
        }
        if let Some(caps) = RE_PARAMETER.captures(line) {
            let entry = format!(":parameter {}: {}", &caps["name"], inline(&caps["desc"]));
            self.start_field(entry);
            return;
        }
        if let Some(caps) = RE_FIELD.captures(line) {
            if let Some(directive) = field_directive(&caps["key"].to_lowercase()) {
                let entry = format!(":{}: {}", directive, inline(&caps["desc"]));
                self.start_field(entry);
                return;
            }
        }

        self.flush_field();
        if !self.was_doc {
            self.blank();
            self.was_doc = true;
        }
        self.push(inline(trimmed));
    }

    /// Indented, non-empty text that is not itself a list item.
    fn is_continuation(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("- ") || trimmed.starts_with("```") {
            return false;
        }
        let indent = line.len() - trimmed.len();
        match &self.mode {
            Mode::Parameters { indent: Some(list) } => indent > list.len(),
            _ => indent > 0,
        }
    }

    fn start_field(&mut self, entry: String) {
        self.flush_field();
        if self.was_doc {
            self.blank();
            self.was_doc = false;
        }
        self.field = Some(entry);
    }

    fn flush_field(&mut self) {
        if let Some(field) = self.field.take() {
            self.push(field);
        }
    }

    fn blank(&mut self) {
        if !self.last_blank {
            self.push(String::new());
        }
    }

    fn push(&mut self, line: String) {
        self.last_blank = line.is_empty();
        self.queue.push_back(line);
    }
}

/// Escape backslashes and turn `code` spans into inline literals.
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in RE_CODE_SPAN.captures_iter(text) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&text[last..whole.start()].replace('\\', "\\\\"));
        if !code.as_str().is_empty() {
            out.push_str("``");
            out.push_str(code.as_str());
            out.push_str("``");
        }
        last = whole.end();
    }
    out.push_str(&text[last..].replace('\\', "\\\\"));
    out
}
