//! Stub pages of `autoswift` directives, resolved by the Sphinx extension at
//! build time instead of carrying the documentation inline.

use crate::render::{heading, Options, Page, Registry, Renderer, INDENT};

pub struct AutodocRenderer {
    options: Options,
}

impl AutodocRenderer {
    pub fn new(options: Options) -> Self {
        AutodocRenderer { options }
    }

    /// Option flags mirroring this run's options.
    fn flags(&self) -> impl Iterator<Item = &'static str> + '_ {
        let opts = &self.options;
        [
            (opts.noindex, ":noindex:"),
            (opts.noindex_members, ":noindex-members:"),
            (opts.members, ":members:"),
            (opts.undoc, ":undoc-members:"),
            (opts.location, ":file-location:"),
            (opts.private, ":private-members:"),
        ]
        .into_iter()
        .filter_map(|(on, flag)| on.then_some(flag))
    }
}

impl Renderer for AutodocRenderer {
    fn render(&self, page: &Page<'_>, _registry: &mut Registry) -> String {
        let mut output = heading(page.relative);

        for decl in &page.declarations {
            if !self.options.selects(&decl.name, &decl.docstring, decl.scope) {
                continue;
            }
            output.push_str(&format!(".. autoswift:: {}\n", decl.name));
            for flag in self.flags() {
                output.push_str(&format!("{INDENT}{flag}\n"));
            }
            output.push('\n');
        }

        output
    }

    fn file_extension(&self) -> &str {
        "rst"
    }
}
