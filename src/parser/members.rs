//! Member scanning within one declaration body.

use crate::model::{DeclKind, Member, MemberKind, Scope};
use crate::parser::{braces, docblock, signatures};

/// Doc field that drops a member from the index.
const NOINDEX_MARKER: &str = "- noindex: true";

/// Scan the body that starts at line `start` (just past the opening brace)
/// for members of a `kind` declaration whose own visibility is `owner_scope`.
///
/// Stops before the line that closes the body. Only lines that begin at the
/// body's own nesting level are matched, so nested type bodies and function
/// bodies never contribute members.
pub fn scan<S: AsRef<str>>(
    content: &[S],
    start: usize,
    kind: DeclKind,
    owner_scope: Scope,
) -> Vec<Member> {
    let matchers = signatures::member_matchers(kind);
    let mut members = Vec::new();
    let mut depth = 1;

    for (i, line) in content.iter().enumerate().skip(start) {
        let line = line.as_ref();
        let before = depth;
        depth = braces::update(line, depth);
        if depth <= 0 {
            break;
        }
        if before != 1 {
            continue;
        }

        for matcher in matchers {
            let found = matcher.matches(line);
            if found.is_empty() {
                continue;
            }

            let docstring = match i.checked_sub(1) {
                Some(anchor) => docblock::extract(content, anchor),
                None => Vec::new(),
            };
            if is_noindex(&docstring) {
                break;
            }

            for m in found {
                let scope = m.scope.unwrap_or(match kind {
                    DeclKind::Protocol => Scope::Public,
                    DeclKind::Enum if m.kind == MemberKind::Case => owner_scope,
                    _ => Scope::Internal,
                });
                members.push(Member {
                    line: i,
                    kind: m.kind,
                    scope,
                    name: m.name,
                    modifier: m.modifier,
                    docstring: docstring.clone(),
                    signature_tail: m.rest,
                    associated_type: m.associated_type,
                    raw_value: m.raw_value,
                });
            }
            break;
        }
    }

    members
}

fn is_noindex(docstring: &[String]) -> bool {
    docstring
        .iter()
        .any(|l| l.trim().eq_ignore_ascii_case(NOINDEX_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Modifier;

    fn lines(src: &str) -> Vec<&str> {
        src.lines().collect()
    }

    #[test]
    fn function_with_doc() {
        let src = lines("class Foo {\n    /// does a thing\n    func bar() {}\n}");
        let members = scan(&src, 1, DeclKind::Class, Scope::Internal);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].kind, MemberKind::Func);
        assert_eq!(members[0].name, "bar");
        assert_eq!(members[0].scope, Scope::Internal);
        assert_eq!(members[0].docstring, vec!["does a thing"]);
        assert_eq!(members[0].line, 2);
    }

    #[test]
    fn stops_at_closing_brace() {
        let src = lines("struct A {\n    var x: Int\n}\nstruct B {\n    var y: Int\n}");
        let members = scan(&src, 1, DeclKind::Struct, Scope::Internal);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "x");
    }

    #[test]
    fn nested_type_members_do_not_leak() {
        let src = lines(
            "class Outer {\n    struct Inner {\n        var hidden: Int\n        var computed: Int { 1 }\n    }\n    func body() {\n        let local = 1\n    }\n    var visible: Int\n}",
        );
        let members = scan(&src, 1, DeclKind::Class, Scope::Internal);
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["body", "visible"]);
    }

    #[test]
    fn noindex_member_dropped() {
        let src = lines(
            "struct S {\n    /// Hidden helper.\n    /// - noindex: true\n    func helper() {}\n    func shown() {}\n}",
        );
        let members = scan(&src, 1, DeclKind::Struct, Scope::Internal);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "shown");
    }

    #[test]
    fn enum_cases_take_enum_scope() {
        let src = lines("public enum Color {\n    case red\n    case green = \"G\"\n}");
        let members = scan(&src, 1, DeclKind::Enum, Scope::Public);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].kind, MemberKind::Case);
        assert_eq!(members[0].name, "red");
        assert_eq!(members[0].scope, Scope::Public);
        assert_eq!(members[1].raw_value.as_deref(), Some("\"G\""));
    }

    #[test]
    fn protocol_members_default_public() {
        let src = lines(
            "protocol P {\n    var name: String { get }\n    static func make() -> Self\n    var stored: Int\n}",
        );
        let members = scan(&src, 1, DeclKind::Protocol, Scope::Internal);
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.scope == Scope::Public));
        assert_eq!(members[1].modifier, Some(Modifier::Static));
    }

    #[test]
    fn multi_line_signature() {
        let src = lines(
            "struct S {\n    func long(a: Int,\n              b: Int) -> Int {\n        return a + b\n    }\n    let after = 2\n}",
        );
        let members = scan(&src, 1, DeclKind::Struct, Scope::Internal);
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["long", "after"]);
    }
}
