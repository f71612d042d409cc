//! swiftdoc: index Swift sources and generate reStructuredText reference
//! pages for the Sphinx `swift` domain.
//!
//! The pipeline is line-oriented: [`parser`] builds a declaration tree per
//! file, [`index::SwiftIndex`] collects them across source roots and answers
//! lookups, and [`render`] turns them into pages.

pub mod error;
pub mod index;
pub mod model;
pub mod parser;
pub mod render;

pub use error::{Error, Result};
pub use index::{SwiftIndex, Symbol};
pub use model::{DeclKind, Declaration, Location, Member, MemberKind, Modifier, Scope};
