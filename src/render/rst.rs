//! reStructuredText renderer for the Sphinx `swift` domain.
//!
//! A page lists every selected top-level declaration of one source file.
//! Members are nested one indent level below their declaration, nested
//! declarations follow the members at the same level.

use crate::error::{Error, Result};
use crate::index::Symbol;
use crate::model::{dotted, Declaration, Location, Member, MemberKind, Modifier};
use crate::render::{docstring, heading, Options, Page, Registry, Renderer, INDENT};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// `name[: Type][ = value]`, the whole of a property signature.
static RE_PROPERTY_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\s*:\s*(?P<type>[A-Za-z_\[(][A-Za-z0-9_<>\[\]()?!:, \t.-]*?))?(?:\s*=\s*(?P<value>[^{]*?))?\s*$",
    )
    .unwrap()
});

/// Per-directive switches.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveOptions<'a> {
    /// Prefix for option and content lines.
    pub indent: &'a str,
    pub noindex: bool,
    /// Skip the content block entirely.
    pub nodocstring: bool,
    /// Document name for the "Defined in" trailer.
    pub location: Option<&'a str>,
}

impl Default for DirectiveOptions<'_> {
    fn default() -> Self {
        DirectiveOptions {
            indent: INDENT,
            noindex: false,
            nodocstring: false,
            location: None,
        }
    }
}

/// Directive lines for a declaration, unindented.
pub fn declaration_lines(decl: &Declaration, opts: &DirectiveOptions<'_>) -> Vec<String> {
    let mut head = format!(".. swift:{}:: {}", decl.kind, decl.name);
    if let Some(conformances) = &decl.conformances {
        head.push_str(" : ");
        head.push_str(conformances);
    }
    if let Some(where_clause) = &decl.where_clause {
        head.push_str(" where ");
        head.push_str(where_clause);
    }
    directive(head, &decl.docstring, decl.line, opts)
}

/// Directive lines for a member, unindented.
///
/// Property signatures must split into name, type and value; anything else
/// is reported as malformed and produces no output.
pub fn member_lines(
    member: &Member,
    file: &Path,
    opts: &DirectiveOptions<'_>,
) -> Result<Vec<String>> {
    let signature = member_signature(member);
    if matches!(member.kind, MemberKind::Var | MemberKind::Let)
        && !RE_PROPERTY_SIGNATURE.is_match(&signature)
    {
        return Err(Error::MalformedMemberSignature {
            file: file.to_path_buf(),
            line: member.line,
            signature,
        });
    }
    let head = format!(".. swift:{}:: {}", member_directive(member), signature);
    Ok(directive(head, &member.docstring, member.line, opts))
}

/// Sphinx directive name for a member.
pub fn member_directive(member: &Member) -> &'static str {
    let is_static = matches!(member.modifier, Some(Modifier::Static | Modifier::Class));
    match member.kind {
        MemberKind::Case => "enum_case",
        MemberKind::Var if is_static => "static_var",
        MemberKind::Let if is_static => "static_let",
        MemberKind::Var => "var",
        MemberKind::Let => "let",
        MemberKind::Init => "init",
        MemberKind::Func => match member.modifier {
            Some(Modifier::Class) => "class_method",
            Some(Modifier::Static) => "static_method",
            _ => "method",
        },
    }
}

/// Name followed by the signature tail as written in the source.
fn member_signature(member: &Member) -> String {
    if member.kind == MemberKind::Case {
        return match (&member.associated_type, &member.raw_value) {
            (Some(assoc), _) => format!("{}{}", member.name, assoc),
            (None, Some(raw)) => format!("{} = {}", member.name, raw),
            (None, None) => member.name.clone(),
        };
    }
    match member.signature_tail.as_deref() {
        None => member.name.clone(),
        Some(tail) if tail.starts_with(['(', '<', ':']) => format!("{}{}", member.name, tail),
        Some(tail) => format!("{} {}", member.name, tail),
    }
}

/// Key a member registers under: functions carry their argument labels so
/// overloads stay distinct, e.g. `move(to:by:)`.
fn member_key(member: &Member) -> String {
    if !matches!(member.kind, MemberKind::Func | MemberKind::Init) {
        return member.name.clone();
    }
    let Some(params) = member
        .signature_tail
        .as_deref()
        .and_then(parameter_list)
    else {
        return member.name.clone();
    };

    let labels: String = split_top_level(params)
        .into_iter()
        .filter_map(|param| {
            let (label, _) = param.split_once(':')?;
            label.split_whitespace().next().map(|l| format!("{}:", l))
        })
        .collect();
    format!("{}({})", member.name, labels)
}

/// Contents of the first parenthesised list in `tail`.
fn parameter_list(tail: &str) -> Option<&str> {
    let open = tail.find('(')?;
    let mut depth = 0;
    for (i, c) in tail[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&tail[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' => depth -= 1,
            '>' if !list[..i].ends_with('-') => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts.retain(|p| !p.trim().is_empty());
    parts
}

fn directive(
    head: String,
    docstring: &[String],
    line: usize,
    opts: &DirectiveOptions<'_>,
) -> Vec<String> {
    let mut lines = vec![head];
    if opts.noindex {
        lines.push(format!("{}:noindex:", opts.indent));
    }
    lines.push(String::new());

    if !opts.nodocstring {
        let mut body: Vec<String> = docstring::render(docstring).collect();
        while body.last().is_some_and(String::is_empty) {
            body.pop();
        }
        lines.extend(body.into_iter().map(|l| indented(opts.indent, l)));
        lines.push(String::new());
    }

    if let Some(docname) = opts.location {
        lines.push(format!("{}Defined in :doc:`{}`:{}", opts.indent, docname, line + 1));
        lines.push(String::new());
    }
    lines
}

fn indented(indent: &str, line: String) -> String {
    if line.is_empty() || indent.is_empty() {
        line
    } else {
        format!("{}{}", indent, line)
    }
}

/// Full reference pages.
pub struct RstRenderer {
    options: Options,
}

impl RstRenderer {
    pub fn new(options: Options) -> Self {
        RstRenderer { options }
    }

    /// Documentation for a single lookup hit found under dotted `path`.
    ///
    /// The hit itself is always rendered; its members and nested
    /// declarations go through the usual selection.
    pub fn document_symbol(
        &self,
        symbol: Symbol<'_>,
        path: &str,
        docname: Option<&str>,
        registry: &mut Registry,
    ) -> Vec<String> {
        let mut out = Vec::new();
        match symbol {
            Symbol::Declaration(decl) => {
                self.document_declaration(decl, path, "", docname, &mut out, registry)
            }
            Symbol::Member { owner, member } => {
                let owner_path = path.rsplit_once('.').map_or("", |(owner, _)| owner);
                self.document_member(owner, member, owner_path, "", docname, &mut out, registry)
            }
        }
        out
    }

    fn document<'d>(
        &self,
        decls: impl IntoIterator<Item = &'d Declaration>,
        prefix: &str,
        indent: &str,
        docname: Option<&str>,
        out: &mut Vec<String>,
        registry: &mut Registry,
    ) {
        for decl in decls {
            if !self.options.selects(&decl.name, &decl.docstring, decl.scope) {
                continue;
            }
            let path = dotted(prefix, &decl.name);
            self.document_declaration(decl, &path, indent, docname, out, registry);
        }
    }

    fn document_declaration(
        &self,
        decl: &Declaration,
        path: &str,
        indent: &str,
        docname: Option<&str>,
        out: &mut Vec<String>,
        registry: &mut Registry,
    ) {
        let at = Location {
            file: decl.file.clone(),
            line: decl.line,
        };
        let opts = DirectiveOptions {
            noindex: self.options.noindex || !registry.register(path, at),
            nodocstring: decl.docstring.is_empty(),
            location: docname,
            ..DirectiveOptions::default()
        };
        out.extend(
            declaration_lines(decl, &opts)
                .into_iter()
                .map(|l| indented(indent, l)),
        );

        if !self.options.members {
            return;
        }
        let nested = format!("{indent}{INDENT}");
        for member in &decl.members {
            if self.options.selects(&member.name, &member.docstring, member.scope) {
                self.document_member(decl, member, path, &nested, docname, out, registry);
            }
        }
        self.document(&decl.children, path, &nested, docname, out, registry);
    }

    #[allow(clippy::too_many_arguments)]
    fn document_member(
        &self,
        owner: &Declaration,
        member: &Member,
        owner_path: &str,
        indent: &str,
        docname: Option<&str>,
        out: &mut Vec<String>,
        registry: &mut Registry,
    ) {
        let key = dotted(owner_path, &member_key(member));
        let forced = self.options.noindex || self.options.noindex_members;
        let opts = DirectiveOptions {
            noindex: forced || registry.is_registered(&key),
            nodocstring: member.docstring.is_empty(),
            location: docname,
            ..DirectiveOptions::default()
        };

        match member_lines(member, &owner.file, &opts) {
            Ok(lines) => {
                if !forced {
                    let at = Location {
                        file: owner.file.clone(),
                        line: member.line,
                    };
                    registry.register(&key, at);
                }
                out.extend(lines.into_iter().map(|l| indented(indent, l)));
            }
            Err(err) => registry.report(err),
        }
    }
}

impl Renderer for RstRenderer {
    fn render(&self, page: &Page<'_>, registry: &mut Registry) -> String {
        let docname = self.options.location.then(|| page.docname());
        let mut out = Vec::new();
        self.document(
            page.declarations.iter().copied(),
            "",
            "",
            docname.as_deref(),
            &mut out,
            registry,
        );

        let mut text = heading(page.relative);
        for line in out {
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    fn file_extension(&self) -> &str {
        "rst"
    }
}
