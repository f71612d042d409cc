//! swiftdoc: generate reStructuredText reference pages from Swift sources.
//!
//! Two modes:
//!
//! - **page mode**: `swiftdoc -o docs/api Sources/` writes one page per
//!   Swift file, mirroring the source tree.
//! - **lookup mode**: `swiftdoc --lookup Foo.bar Sources/` prints the
//!   documentation of one dotted name to stdout.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use swiftdoc::render::{self, rst::RstRenderer, Options, Page, Registry};
use swiftdoc::SwiftIndex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "swiftdoc",
    about = "Generate reStructuredText documentation for Swift sources"
)]
struct Cli {
    /// Swift source roots: directories, .swift files or glob patterns
    #[arg(required = true)]
    paths: Vec<String>,

    /// Output directory for generated pages (required unless --lookup)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: rst (default) or autodoc
    #[arg(short = 'f', long, default_value = "rst")]
    format: String,

    /// Include private and internal declarations and members
    #[arg(long)]
    private: bool,

    /// Include records without a documentation block
    #[arg(long)]
    undoc_members: bool,

    /// Do not document members or nested declarations
    #[arg(long)]
    no_members: bool,

    /// Add a paragraph with the file location of each record
    #[arg(long)]
    file_location: bool,

    /// Do not add anything to the index
    #[arg(long)]
    no_index: bool,

    /// Do not add members to the index, just the top-level records
    #[arg(long)]
    no_index_members: bool,

    /// File with names that are never documented, one per line
    #[arg(long, value_name = "FILE")]
    exclude_list: Option<PathBuf>,

    /// Replace existing pages in the output directory
    #[arg(long)]
    overwrite: bool,

    /// Print the documentation of a dotted name instead of writing pages
    #[arg(long, value_name = "NAME")]
    lookup: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let roots = expand_paths(&cli.paths)?;
    if roots.is_empty() {
        bail!("no Swift sources found in: {}", cli.paths.join(", "));
    }
    let index = SwiftIndex::build(&roots).context("failed to index Swift sources")?;
    let options = build_options(&cli)?;

    match cli.lookup.as_deref() {
        Some(name) => lookup_mode(&index, name, options),
        None => page_mode(&cli, &index, options),
    }
}

/// Log to stderr. `SWIFTDOC_LOG` takes the usual filter directives unless a
/// `-v` flag asks for more.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("SWIFTDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn build_options(cli: &Cli) -> Result<Options> {
    let exclude = match &cli.exclude_list {
        Some(path) => read_exclude_list(path)?,
        None => HashSet::new(),
    };
    Ok(Options {
        private: cli.private,
        undoc: cli.undoc_members,
        members: !cli.no_members,
        location: cli.file_location,
        noindex: cli.no_index,
        noindex_members: cli.no_index_members,
        exclude,
    })
}

fn read_exclude_list(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read exclude list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// page mode: one page per indexed file, refusing to replace existing pages
/// unless --overwrite is given.
fn page_mode(cli: &Cli, index: &SwiftIndex, options: Options) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required unless --lookup is given")?;

    let renderer = render::create_renderer(&cli.format, options)?;
    let ext = renderer.file_extension();

    let pages: Vec<_> = index
        .by_file()
        .into_iter()
        .map(|(file, declarations)| {
            let relative = index.relative_path(file);
            let dest = page_path(output_dir, &relative, ext);
            (dest, relative, declarations)
        })
        .collect();

    if !cli.overwrite {
        let existing: Vec<String> = pages
            .iter()
            .filter(|(dest, _, _)| dest.exists())
            .map(|(dest, _, _)| dest.display().to_string())
            .collect();
        if !existing.is_empty() {
            bail!(
                "{} already exists, to overwrite existing documentation use --overwrite",
                existing.join(", ")
            );
        }
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let mut registry = Registry::default();
    for (dest, relative, declarations) in pages {
        let page = Page {
            relative: &relative,
            declarations,
        };
        let output = renderer.render(&page, &mut registry);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(&dest, &output)
            .with_context(|| format!("failed to write {}", dest.display()))?;
        tracing::info!(page = %dest.display(), source = %relative.display(), "wrote page");
    }

    if !registry.diagnostics().is_empty() {
        tracing::info!(count = registry.diagnostics().len(), "finished with diagnostics");
    }
    Ok(())
}

/// lookup mode: print every record found under `name`. A miss is a warning,
/// not a failure.
fn lookup_mode(index: &SwiftIndex, name: &str, options: Options) -> Result<()> {
    let location = options.location;
    let renderer = RstRenderer::new(options);
    let mut registry = Registry::default();

    let symbols = match index.resolve(name) {
        Ok(symbols) => symbols,
        Err(err) if err.is_diagnostic() => {
            registry.report(err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    for symbol in symbols {
        let docname = location.then(|| render::docname(&index.relative_path(symbol.file())));
        for line in renderer.document_symbol(symbol, name, docname.as_deref(), &mut registry) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Expand input arguments into source roots. Directories and files are taken
/// as they are, anything else is tried as a glob pattern.
fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() || path.is_file() {
            roots.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
        roots.extend(matches);
    }
    // Sort for deterministic output
    roots.sort();
    roots.dedup();
    Ok(roots)
}

/// Output page for a source path relative to its root.
/// "Sources/Foo.swift" → "<out>/Sources/Foo.rst"
fn page_path(output_dir: &Path, relative: &Path, ext: &str) -> PathBuf {
    output_dir.join(relative).with_extension(ext)
}
