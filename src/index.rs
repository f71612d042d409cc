//! Symbol index over one or more source roots.
//!
//! Built once per run, read-only afterwards. Lookups walk the owned
//! declaration forest and compare dotted paths.

use crate::error::{Error, Result};
use crate::model::{dotted, Declaration, Member};
use crate::parser;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source file extension picked up while walking roots.
pub const SOURCE_EXTENSION: &str = "swift";

/// A lookup hit: a declaration, or a member together with its owner.
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    Declaration(&'a Declaration),
    Member {
        owner: &'a Declaration,
        member: &'a Member,
    },
}

impl<'a> Symbol<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Symbol::Declaration(decl) => &decl.name,
            Symbol::Member { member, .. } => &member.name,
        }
    }

    /// Source file the hit was declared in.
    pub fn file(&self) -> &'a Path {
        match self {
            Symbol::Declaration(decl) => &decl.file,
            Symbol::Member { owner, .. } => &owner.file,
        }
    }

    pub fn as_declaration(&self) -> Option<&'a Declaration> {
        match self {
            Symbol::Declaration(decl) => Some(decl),
            Symbol::Member { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SwiftIndex {
    roots: Vec<PathBuf>,
    files: Vec<PathBuf>,
    declarations: Vec<Declaration>,
}

impl SwiftIndex {
    /// Walk every root for `.swift` files and index them in traversal order.
    pub fn build<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        let mut index = SwiftIndex::default();

        for root in roots {
            let root = root.as_ref();
            index.roots.push(root.to_path_buf());

            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::Io {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    source: e.into(),
                })?;
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION)
                {
                    continue;
                }

                let declarations = parser::parse_file(path)?;
                tracing::info!(
                    file = %path.display(),
                    declarations = declarations.len(),
                    "indexed swift file"
                );
                index.files.push(path.to_path_buf());
                index.declarations.extend(declarations);
            }
        }

        Ok(index)
    }

    /// Wrap an already built forest.
    pub fn from_declarations(declarations: Vec<Declaration>) -> Self {
        let mut files: Vec<PathBuf> = Vec::new();
        for decl in &declarations {
            if !files.contains(&decl.file) {
                files.push(decl.file.clone());
            }
        }
        SwiftIndex {
            roots: Vec::new(),
            files,
            declarations,
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Every record whose dotted path equals `name`, in traversal order.
    pub fn find(&self, name: &str) -> Vec<Symbol<'_>> {
        let mut found = Vec::new();
        find_in(&self.declarations, "", name, &mut found);
        found
    }

    /// Best fuzzy match for `name` among all dotted paths, with a 0..=100
    /// similarity score. `None` when nothing is indexed.
    pub fn find_fuzzy(&self, name: &str) -> Option<(String, u8)> {
        let mut best: Option<(String, u8)> = None;
        for candidate in self.names() {
            let score = similarity(name, &candidate);
            if best.as_ref().is_none_or(|(_, s)| score > *s) {
                best = Some((candidate, score));
            }
        }
        best
    }

    /// Exact lookup that turns a miss into a `NotFound` diagnostic carrying
    /// the closest known name.
    pub fn resolve(&self, name: &str) -> Result<Vec<Symbol<'_>>> {
        let found = self.find(name);
        if !found.is_empty() {
            return Ok(found);
        }
        Err(Error::NotFound {
            name: name.to_string(),
            suggestion: self.find_fuzzy(name).map(|(best, _)| best),
        })
    }

    /// Lazily generated dotted paths of all declarations and members.
    pub fn names(&self) -> Names<'_> {
        Names {
            stack: self
                .declarations
                .iter()
                .rev()
                .map(|d| (String::new(), d))
                .collect(),
            pending: VecDeque::new(),
        }
    }

    /// Top-level declarations grouped by origin file.
    pub fn by_file(&self) -> BTreeMap<&Path, Vec<&Declaration>> {
        let mut result: BTreeMap<&Path, Vec<&Declaration>> = BTreeMap::new();
        for decl in &self.declarations {
            result.entry(decl.file.as_path()).or_default().push(decl);
        }
        result
    }

    /// `file` relative to the root it was found under.
    pub fn relative_path(&self, file: &Path) -> PathBuf {
        for root in &self.roots {
            match file.strip_prefix(root) {
                Ok(rel) if !rel.as_os_str().is_empty() => return rel.to_path_buf(),
                _ => {}
            }
        }
        file.file_name().map(PathBuf::from).unwrap_or_else(|| file.to_path_buf())
    }
}

fn find_in<'a>(
    decls: &'a [Declaration],
    prefix: &str,
    name: &str,
    found: &mut Vec<Symbol<'a>>,
) {
    for decl in decls {
        let path = dotted(prefix, &decl.name);
        if path == name {
            found.push(Symbol::Declaration(decl));
        }
        if name.len() > path.len() && name.starts_with(&path) {
            for member in &decl.members {
                if dotted(&path, &member.name) == name {
                    found.push(Symbol::Member {
                        owner: decl,
                        member,
                    });
                }
            }
        }
        find_in(&decl.children, &path, name, found);
    }
}

/// Depth-first iterator over dotted paths.
pub struct Names<'a> {
    stack: Vec<(String, &'a Declaration)>,
    pending: VecDeque<String>,
}

impl Iterator for Names<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(name) = self.pending.pop_front() {
            return Some(name);
        }
        let (prefix, decl) = self.stack.pop()?;
        let path = dotted(&prefix, &decl.name);
        self.pending
            .extend(decl.members.iter().map(|m| dotted(&path, &m.name)));
        for child in decl.children.iter().rev() {
            self.stack.push((path.clone(), child));
        }
        Some(path)
    }
}

/// Normalized Levenshtein similarity in 0..=100.
pub fn similarity(a: &str, b: &str) -> u8 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100;
    }
    let dist = levenshtein_distance(a, b);
    let ratio = (total - dist) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::swift;

    fn index(src: &str) -> SwiftIndex {
        SwiftIndex::from_declarations(swift::parse(src, Path::new("Test.swift")))
    }

    const SAMPLE: &str = "class Foo {\n    /// does a thing\n    func bar() {}\n    struct Inner {\n        var x: Int\n    }\n}\n";

    #[test]
    fn find_declaration_and_member() {
        let idx = index(SAMPLE);
        assert_eq!(idx.find("Foo").len(), 1);
        assert_eq!(idx.find("Foo.Inner").len(), 1);
        let hits = idx.find("Foo.bar");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "bar");
        assert!(hits[0].as_declaration().is_none());
        assert_eq!(idx.find("Foo.Inner.x").len(), 1);
        assert!(idx.find("Foo.baz").is_empty());
        assert!(idx.find("Inner").is_empty());
    }

    #[test]
    fn duplicates_are_all_returned() {
        let idx = index("extension Foo {\n}\nextension Foo {\n}\n");
        assert_eq!(idx.find("Foo").len(), 2);
    }

    #[test]
    fn names_depth_first() {
        let idx = index(SAMPLE);
        let names: Vec<String> = idx.names().collect();
        assert_eq!(names, vec!["Foo", "Foo.bar", "Foo.Inner", "Foo.Inner.x"]);
    }

    #[test]
    fn every_name_is_findable() {
        let idx = index(SAMPLE);
        for name in idx.names() {
            assert!(!idx.find(&name).is_empty(), "{} not found", name);
        }
    }

    #[test]
    fn fuzzy_suggestion() {
        let idx = index(SAMPLE);
        let (best, score) = idx.find_fuzzy("Foo.baz").unwrap();
        assert_eq!(best, "Foo.bar");
        assert_eq!(score, 93);
    }

    #[test]
    fn resolve_reports_not_found() {
        let idx = index(SAMPLE);
        let err = idx.resolve("Foo.baz").unwrap_err();
        assert!(err.to_string().contains("Did you mean \"Foo.bar\"?"));
        let empty = SwiftIndex::default();
        assert!(empty.find_fuzzy("Foo").is_none());
    }

    #[test]
    fn levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(similarity("same", "same"), 100);
    }

    #[test]
    fn grouped_by_file() {
        let mut decls = swift::parse("struct A {}\n", Path::new("A.swift"));
        decls.extend(swift::parse("struct B {}\nstruct C {}\n", Path::new("B.swift")));
        let idx = SwiftIndex::from_declarations(decls);
        let grouped = idx.by_file();
        assert_eq!(grouped[Path::new("A.swift")].len(), 1);
        assert_eq!(grouped[Path::new("B.swift")].len(), 2);
        assert_eq!(idx.files().len(), 2);
    }
}
