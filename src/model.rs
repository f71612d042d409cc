//! Data model for indexed Swift symbols: format-agnostic.

use std::fmt;
use std::path::PathBuf;

/// Type-level declaration kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
    Protocol,
    Extension,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Protocol => "protocol",
            DeclKind::Extension => "extension",
        }
    }

    /// Visibility assumed when the declaration spells none.
    pub fn default_scope(self) -> Scope {
        match self {
            DeclKind::Extension => Scope::Public,
            _ => Scope::Internal,
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member kinds found inside a declaration body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Func,
    Init,
    Var,
    Let,
    Case,
}

impl MemberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Func => "func",
            MemberKind::Init => "init",
            MemberKind::Var => "var",
            MemberKind::Let => "let",
            MemberKind::Case => "case",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Private,
    Internal,
    Public,
}

impl Scope {
    /// Map a Swift access keyword onto the three tracked scopes.
    pub fn from_keyword(keyword: &str) -> Option<Scope> {
        match keyword {
            "private" | "fileprivate" => Some(Scope::Private),
            "internal" => Some(Scope::Internal),
            "public" | "open" => Some(Scope::Public),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Private => "private",
            Scope::Internal => "internal",
            Scope::Public => "public",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `static`, `class` or `mutating` in front of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Static,
    Class,
    Mutating,
}

impl Modifier {
    pub fn from_keyword(keyword: &str) -> Option<Modifier> {
        match keyword {
            "static" => Some(Modifier::Static),
            "class" => Some(Modifier::Class),
            "mutating" => Some(Modifier::Mutating),
            _ => None,
        }
    }
}

/// A class, struct, enum, protocol or extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub file: PathBuf,
    /// 0-based line of the declaring signature.
    pub line: usize,
    /// Brace depth in front of the declaring line.
    pub depth: i32,
    pub kind: DeclKind,
    pub scope: Scope,
    pub name: String,
    pub docstring: Vec<String>,
    /// Raw superclass / conformance / raw-value type list.
    pub conformances: Option<String>,
    pub where_clause: Option<String>,
    pub children: Vec<Declaration>,
    pub members: Vec<Member>,
}

/// A func, init, var, let or enum case inside a declaration body.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub line: usize,
    pub kind: MemberKind,
    pub scope: Scope,
    pub name: String,
    pub modifier: Option<Modifier>,
    pub docstring: Vec<String>,
    /// Raw text after the name: parameter list, type annotation, return clause.
    pub signature_tail: Option<String>,
    pub associated_type: Option<String>,
    pub raw_value: Option<String>,
}

/// Source position used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Join a name prefix and a name with `.`.
pub fn dotted(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
