//! Renderer module: trait-based format dispatch.

pub mod autodoc;
pub mod docstring;
pub mod rst;

use crate::error::Error;
use crate::model::{Declaration, Location, Scope};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Indentation of directive options and content.
pub const INDENT: &str = "   ";

/// Trait for rendering one source file's declarations into a page.
pub trait Renderer {
    fn render(&self, page: &Page<'_>, registry: &mut Registry) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: Options) -> Result<Box<dyn Renderer>> {
    match format {
        "rst" => Ok(Box::new(rst::RstRenderer::new(options))),
        "autodoc" => Ok(Box::new(autodoc::AutodocRenderer::new(options))),
        _ => Err(anyhow!("unknown format: {}. Use rst or autodoc", format)),
    }
}

/// Run-wide choices about what gets documented and how.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Include private and internal records.
    pub private: bool,
    /// Include records without a doc block.
    pub undoc: bool,
    /// Document members and nested declarations.
    pub members: bool,
    /// Append "Defined in" trailers.
    pub location: bool,
    pub noindex: bool,
    pub noindex_members: bool,
    /// Names that are never documented.
    pub exclude: HashSet<String>,
}

impl Options {
    /// Whether a record with this name, doc block and scope is documented.
    pub fn selects(&self, name: &str, docstring: &[String], scope: Scope) -> bool {
        if self.exclude.contains(name) {
            return false;
        }
        if !self.undoc && docstring.is_empty() {
            return false;
        }
        self.private || scope == Scope::Public
    }
}

/// One output page: the top-level declarations of a single source file.
pub struct Page<'a> {
    /// Source path relative to its root, e.g. `Sources/Foo.swift`.
    pub relative: &'a Path,
    pub declarations: Vec<&'a Declaration>,
}

impl Page<'_> {
    /// Document name used in `:doc:` references: the relative path without
    /// its extension, with `/` separators.
    pub fn docname(&self) -> String {
        docname(self.relative)
    }
}

/// `Sources/Foo.swift` -> `Sources/Foo`.
pub fn docname(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Page title, over- and underlined with `=`, followed by two blank lines.
pub fn heading(relative: &Path) -> String {
    let title = format!("Documentation for {}", relative.display());
    let rule = "=".repeat(title.chars().count());
    format!("{rule}\n{title}\n{rule}\n\n\n")
}

/// Dotted paths registered by indexed directives during one run, plus every
/// diagnostic raised while rendering.
#[derive(Debug, Default)]
pub struct Registry {
    seen: HashMap<String, Location>,
    diagnostics: Vec<Error>,
}

impl Registry {
    pub fn is_registered(&self, name: &str) -> bool {
        self.seen.contains_key(name)
    }

    /// Record `name` as described at `at`. Returns `false` and reports a
    /// duplicate when it was registered before; the first location is kept.
    pub fn register(&mut self, name: &str, at: Location) -> bool {
        match self.seen.get(name) {
            Some(first) => {
                let err = Error::DuplicateRegistration {
                    name: name.to_string(),
                    first: first.clone(),
                    second: at,
                };
                self.report(err);
                false
            }
            None => {
                self.seen.insert(name.to_string(), at);
                true
            }
        }
    }

    pub fn report(&mut self, err: Error) {
        tracing::warn!("{}", err);
        self.diagnostics.push(err);
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }
}
