//! Error and diagnostic taxonomy.
//!
//! `Io` is a hard failure. The remaining variants are diagnostics: they are
//! logged and collected, never abort a run.

use crate::model::Location;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can not find \"{name}\" in any Swift file. {}", not_found_hint(.suggestion))]
    NotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("duplicate object description of {name} at {second}, other instance at {first}")]
    DuplicateRegistration {
        name: String,
        first: Location,
        second: Location,
    },

    #[error("invalid variable/constant signature \"{signature}\" at {}:{line}", .file.display())]
    MalformedMemberSignature {
        file: PathBuf,
        line: usize,
        signature: String,
    },
}

fn not_found_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(best) => format!("Did you mean \"{}\"?", best),
        None => "No Swift symbols were indexed.".to_string(),
    }
}

impl Error {
    /// Diagnostics are reported and skipped; everything else aborts.
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, Error::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
