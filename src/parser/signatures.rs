//! Single-line declaration signature matchers.
//!
//! Type-level matchers are tried in a fixed order (class, enum, struct,
//! extension, protocol); the first one that matches a line wins. Member
//! matchers are picked per enclosing declaration kind.

use crate::model::{DeclKind, MemberKind, Modifier, Scope};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";

const SCOPE: &str = r"fileprivate|private|internal|public|open";

// Attributes, access levels (including setter-only ones) and the other
// keywords that may precede a member introducer.
static MODIFIERS: LazyLock<String> = LazyLock::new(|| {
    format!(
        r"(?P<mods>(?:(?:@\w+(?:\([^)]*\))?|(?:{scope})\s*\(set\)|{scope}|final|override|convenience|required|dynamic|lazy|weak|unowned|nonisolated|optional|static|class|mutating|nonmutating)\s+)*)",
        scope = SCOPE
    )
});

fn type_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(
        r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:final|indirect)\s+)?(?:(?P<scope>{scope})\s+)?(?:(?:final|indirect)\s+)?(?P<kind>{keyword})\s+(?P<name>{ident})\b(?:<[^{{]*?>)?(?P<tail>[^{{]*)",
        scope = SCOPE,
        keyword = keyword,
        ident = IDENT,
    ))
    .unwrap()
}

static TYPE_MATCHERS: LazyLock<[(DeclKind, Regex); 5]> = LazyLock::new(|| {
    [
        (DeclKind::Class, type_pattern("class")),
        (DeclKind::Enum, type_pattern("enum")),
        (DeclKind::Struct, type_pattern("struct")),
        (DeclKind::Extension, type_pattern("extension")),
        (DeclKind::Protocol, type_pattern("protocol")),
    ]
});

static RE_FUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*{mods}func\s+(?P<name>{ident})(?P<rest>[^{{]*)",
        mods = *MODIFIERS,
        ident = IDENT
    ))
    .unwrap()
});

static RE_INIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*{mods}init[?!]?\s*(?P<rest>[(<][^{{]*)",
        mods = *MODIFIERS
    ))
    .unwrap()
});

static RE_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*{mods}(?P<kind>var|let)\s+(?P<name>{ident})(?P<rest>[^{{]*)",
        mods = *MODIFIERS,
        ident = IDENT
    ))
    .unwrap()
});

static RE_PROTOCOL_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*{mods}var\s+(?P<name>{ident})(?P<rest>[^{{]*)\{{\s*(?:get|set)\b[^}}]*\}}",
        mods = *MODIFIERS,
        ident = IDENT
    ))
    .unwrap()
});

static RE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?:indirect\s+)?case\s+(?P<name>{ident})(?P<rest>.*)$",
        ident = IDENT
    ))
    .unwrap()
});

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{}$", IDENT)).unwrap());

static RE_SETTER_SCOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?:{})\s*\(set\)", SCOPE)).unwrap());

static RE_WHERE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s)where\s+").unwrap());

/// Words that follow `class` when it is a member modifier, not a type:
/// member introducers and the modifiers that may sit between.
const CLASS_MODIFIER_TARGETS: &[&str] = &[
    "func",
    "var",
    "let",
    "subscript",
    "init",
    "override",
    "final",
    "required",
    "convenience",
    "dynamic",
    "nonisolated",
    "fileprivate",
    "private",
    "internal",
    "public",
    "open",
];

// -- Type-level matching ------------------------------------------------------

/// Result of a type-level signature match.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMatch {
    pub kind: DeclKind,
    pub scope: Option<Scope>,
    pub name: String,
    pub conformances: Option<String>,
    pub where_clause: Option<String>,
}

/// Try every type-level matcher against `line`, in priority order.
pub fn match_declaration(line: &str) -> Option<TypeMatch> {
    for (kind, re) in TYPE_MATCHERS.iter() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let name = &caps["name"];
        if *kind == DeclKind::Class && CLASS_MODIFIER_TARGETS.contains(&name) {
            continue;
        }

        let tail = strip_trailing_comment(caps.name("tail").map_or("", |m| m.as_str()));
        let (head, where_clause) = split_where(tail);
        let conformances = head
            .trim()
            .strip_prefix(':')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        return Some(TypeMatch {
            kind: *kind,
            scope: caps.name("scope").and_then(|m| Scope::from_keyword(m.as_str())),
            name: name.to_string(),
            conformances,
            where_clause,
        });
    }
    None
}

/// Split `: A, B where T: C` into the type list and the constraint.
fn split_where(tail: &str) -> (&str, Option<String>) {
    match RE_WHERE.find(tail) {
        Some(m) => {
            let constraint = tail[m.end()..].trim();
            let constraint = (!constraint.is_empty()).then(|| constraint.to_string());
            (&tail[..m.start()], constraint)
        }
        None => (tail, None),
    }
}

// -- Member matching ----------------------------------------------------------

/// One member pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberMatcher {
    Func,
    Init,
    Property,
    ProtocolProperty,
    Case,
}

/// Result of a member signature match.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberMatch {
    pub kind: MemberKind,
    pub scope: Option<Scope>,
    pub name: String,
    pub modifier: Option<Modifier>,
    pub rest: Option<String>,
    pub associated_type: Option<String>,
    pub raw_value: Option<String>,
}

/// Matchers active inside a body of the given kind.
pub fn member_matchers(kind: DeclKind) -> &'static [MemberMatcher] {
    match kind {
        DeclKind::Enum => &[MemberMatcher::Func, MemberMatcher::Init, MemberMatcher::Case],
        DeclKind::Protocol => &[
            MemberMatcher::Func,
            MemberMatcher::Init,
            MemberMatcher::ProtocolProperty,
        ],
        _ => &[MemberMatcher::Func, MemberMatcher::Init, MemberMatcher::Property],
    }
}

impl MemberMatcher {
    /// Match `line`; an empty result means no match. `case a, b` yields one
    /// entry per name.
    pub fn matches(self, line: &str) -> Vec<MemberMatch> {
        match self {
            MemberMatcher::Func => match_simple(&RE_FUNC, line, MemberKind::Func),
            MemberMatcher::Init => match_simple(&RE_INIT, line, MemberKind::Init),
            MemberMatcher::Property => match_simple(&RE_PROPERTY, line, MemberKind::Var),
            MemberMatcher::ProtocolProperty => {
                match_simple(&RE_PROTOCOL_PROPERTY, line, MemberKind::Var)
            }
            MemberMatcher::Case => match_case(line),
        }
    }
}

fn match_simple(re: &Regex, line: &str, default_kind: MemberKind) -> Vec<MemberMatch> {
    let Some(caps) = re.captures(line) else {
        return Vec::new();
    };

    let kind = match caps.name("kind").map(|m| m.as_str()) {
        Some("let") => MemberKind::Let,
        Some("var") => MemberKind::Var,
        _ => default_kind,
    };
    let name = match kind {
        MemberKind::Init => "init".to_string(),
        _ => caps["name"].to_string(),
    };
    let (scope, modifier) = parse_modifiers(caps.name("mods").map_or("", |m| m.as_str()));
    let rest = caps
        .name("rest")
        .map(|m| strip_trailing_comment(m.as_str()).trim().to_string())
        .filter(|r| !r.is_empty());

    vec![MemberMatch {
        kind,
        scope,
        name,
        modifier,
        rest,
        associated_type: None,
        raw_value: None,
    }]
}

fn match_case(line: &str) -> Vec<MemberMatch> {
    let Some(caps) = RE_CASE.captures(line) else {
        return Vec::new();
    };
    let name = caps["name"].to_string();
    let mut rest = strip_trailing_comment(&caps["rest"]).trim();

    let mut associated_type = None;
    if rest.starts_with('(') {
        let Some(end) = closing_paren(rest) else {
            return Vec::new();
        };
        associated_type = Some(rest[..=end].to_string());
        rest = rest[end + 1..].trim();
    }

    let mut raw_value = None;
    let mut names = vec![name];
    if let Some(value) = rest.strip_prefix('=') {
        let value = value.trim();
        if !value.is_empty() {
            raw_value = Some(value.to_string());
        }
    } else if let Some(list) = rest.strip_prefix(',') {
        if associated_type.is_none() {
            names.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|n| RE_IDENT.is_match(n))
                    .map(str::to_string),
            );
        }
    }

    names
        .into_iter()
        .map(|name| MemberMatch {
            kind: MemberKind::Case,
            scope: None,
            name,
            modifier: None,
            rest: None,
            associated_type: associated_type.clone(),
            raw_value: raw_value.clone(),
        })
        .collect()
}

/// Extract the access level and the static/class/mutating modifier.
fn parse_modifiers(mods: &str) -> (Option<Scope>, Option<Modifier>) {
    let mods = RE_SETTER_SCOPE.replace_all(mods, "");
    let mut scope = None;
    let mut modifier = None;
    for word in mods.split_whitespace() {
        if scope.is_none() {
            scope = Scope::from_keyword(word);
        }
        if modifier.is_none() {
            modifier = Modifier::from_keyword(word);
        }
    }
    (scope, modifier)
}

/// Index of the parenthesis closing the one `text` starts with.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Cut a trailing `//` comment that is not inside a string literal.
pub fn strip_trailing_comment(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => {
                return text[..i].trim_end();
            }
            _ => {}
        }
        i += 1;
    }
    text
}
