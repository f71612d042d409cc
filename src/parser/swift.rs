//! Per-file symbol pass: line-by-line scan building the declaration tree.

use crate::model::Declaration;
use crate::parser::{braces, docblock, members, signatures};
use std::path::Path;

/// Index one Swift file's content into its top-level declarations.
///
/// Nesting follows the brace depth in front of each declaring line: a
/// declaration becomes a child of the innermost open declaration that sits
/// at a shallower depth, otherwise it is a top-level entry.
pub fn parse(content: &str, path: &Path) -> Vec<Declaration> {
    let lines: Vec<&str> = content.lines().collect();
    let mut roots: Vec<Declaration> = Vec::new();
    let mut stack: Vec<Declaration> = Vec::new();
    let mut depth = 0;

    for (index, line) in lines.iter().enumerate() {
        let before = depth;
        depth = braces::update(line, depth);

        let Some(found) = signatures::match_declaration(line) else {
            continue;
        };

        while stack.last().is_some_and(|open| open.depth >= before) {
            close_innermost(&mut stack, &mut roots);
        }

        let scope = found.scope.unwrap_or_else(|| found.kind.default_scope());
        let docstring = match index.checked_sub(1) {
            Some(anchor) => docblock::extract(&lines, anchor),
            None => Vec::new(),
        };
        let members = match body_start(&lines, index) {
            Some(start) => members::scan(&lines, start, found.kind, scope),
            None => Vec::new(),
        };

        tracing::debug!(
            kind = %found.kind,
            name = %found.name,
            line = index,
            depth = before,
            members = members.len(),
            "declaration"
        );

        stack.push(Declaration {
            file: path.to_path_buf(),
            line: index,
            depth: before,
            kind: found.kind,
            scope,
            name: found.name,
            docstring,
            conformances: found.conformances,
            where_clause: found.where_clause,
            children: Vec::new(),
            members,
        });
    }

    while !stack.is_empty() {
        close_innermost(&mut stack, &mut roots);
    }
    roots
}

/// Pop the innermost open declaration into its parent or the roots.
fn close_innermost(stack: &mut Vec<Declaration>, roots: &mut Vec<Declaration>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// First line of the body opened by the declaration on line `decl`.
///
/// The body opens on the first line from `decl` on that contains a `{`
/// outside strings and comments; `None` when the braces on that line already
/// close again (`struct Empty {}`) or no brace follows.
fn body_start(lines: &[&str], decl: usize) -> Option<usize> {
    for (i, line) in lines.iter().enumerate().skip(decl) {
        let masked = braces::mask(line);
        if masked.contains('{') {
            return (braces::update(line, 0) > 0).then_some(i + 1);
        }
        if i > decl && masked.contains('}') {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclKind, MemberKind, Scope};

    fn parse_str(src: &str) -> Vec<Declaration> {
        parse(src, Path::new("Test.swift"))
    }

    #[test]
    fn class_with_documented_method() {
        let decls = parse_str("class Foo {\n    /// does a thing\n    func bar() {}\n}");
        assert_eq!(decls.len(), 1);
        let foo = &decls[0];
        assert_eq!(foo.kind, DeclKind::Class);
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.scope, Scope::Internal);
        assert_eq!(foo.members.len(), 1);
        assert_eq!(foo.members[0].kind, MemberKind::Func);
        assert_eq!(foo.members[0].docstring, vec!["does a thing"]);
    }

    #[test]
    fn public_enum_cases() {
        let decls = parse_str("public enum Color {\n    case red\n    case green = \"G\"\n}");
        let color = &decls[0];
        assert_eq!(color.kind, DeclKind::Enum);
        assert_eq!(color.scope, Scope::Public);
        let names: Vec<_> = color.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["red", "green"]);
        assert_eq!(color.members[1].raw_value.as_deref(), Some("\"G\""));
    }

    #[test]
    fn nested_declarations() {
        let src = "class A {\n    struct B {\n        enum C {\n            case x\n        }\n    }\n    struct D {}\n}\nextension A {\n}\n";
        let decls = parse_str(src);
        assert_eq!(decls.len(), 2);
        let a = &decls[0];
        let child_names: Vec<_> = a.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(child_names, vec!["B", "D"]);
        assert_eq!(a.children[0].children[0].name, "C");
        assert!(a.children[0].depth > a.depth);
        assert!(a.children[0].children[0].depth > a.children[0].depth);
        assert_eq!(decls[1].kind, DeclKind::Extension);
        assert_eq!(decls[1].scope, Scope::Public);
    }

    #[test]
    fn brace_on_next_line() {
        let src = "/// A thing.\nstruct Thing: Equatable\n{\n    let id: Int\n}\n";
        let decls = parse_str(src);
        assert_eq!(decls[0].docstring, vec!["A thing."]);
        assert_eq!(decls[0].conformances.as_deref(), Some("Equatable"));
        assert_eq!(decls[0].members.len(), 1);
        assert_eq!(decls[0].members[0].name, "id");
    }

    #[test]
    fn nested_with_brace_on_next_line() {
        let src = "class A {\n    struct B\n    {\n        var x: Int\n    }\n}\n";
        let decls = parse_str(src);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].children[0].name, "B");
        assert!(decls[0].members.is_empty());
        assert_eq!(decls[0].children[0].members[0].name, "x");
    }

    #[test]
    fn empty_body() {
        let decls = parse_str("struct Empty {}\nstruct Next {\n    var x = 1\n}\n");
        assert_eq!(decls.len(), 2);
        assert!(decls[0].members.is_empty());
        assert_eq!(decls[1].members.len(), 1);
    }

    #[test]
    fn nested_struct_properties_stay_nested() {
        let src = "class Outer {\n    var a: Int\n    struct Inner {\n        var b: Int\n    }\n}\n";
        let decls = parse_str(src);
        let outer: Vec<_> = decls[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(outer, vec!["a"]);
        assert_eq!(decls[0].children[0].members[0].name, "b");
    }

    #[test]
    fn inline_block_comment_is_not_a_docstring() {
        let decls = parse_str("struct A {\n    var x = 1 /* inline */\n    func f() {}\n}");
        let f = decls[0].members.iter().find(|m| m.name == "f").unwrap();
        assert!(f.docstring.is_empty());
    }

    #[test]
    fn class_method_with_modifier_stays_a_member() {
        let src = "class Base {\n    class override func setUp() {\n        let x = 1\n    }\n}\n";
        let decls = parse_str(src);
        assert_eq!(decls.len(), 1);
        assert!(decls[0].children.is_empty());
        let names: Vec<_> = decls[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["setUp"]);
        assert_eq!(decls[0].members[0].kind, MemberKind::Func);
    }

    #[test]
    fn non_ascii_indented_doc_block() {
        let decls = parse_str("/**\n Summary.\n\u{a0}Second.\n */\nstruct S {}\n");
        assert_eq!(decls[0].docstring, vec!["Summary.", "Second."]);
    }
}
