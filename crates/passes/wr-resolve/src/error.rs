//! Fatal resolution errors
//!
//! Warnings are not errors: they travel through
//! [`Diagnostics`](crate::Diagnostics) and never abort a run.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;
use wr_parser::ParseError;

/// Errors that abort a resolution run
#[derive(Error, Debug, Diagnostic)]
pub enum ResolveError {
    /// Statement or document parse failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// The module path resolver could not locate an import specifier
    #[error("can't resolve '{specifier}' from '{}'", .base.display())]
    #[diagnostic(code(wr_resolve::unresolvable_import))]
    UnresolvableImport {
        /// The import specifier as written
        specifier: String,
        /// Directory of the importing document
        base: PathBuf,
    },

    /// The import graph loops back on itself
    #[error("circular import detected: {}", format_cycle(.cycle))]
    #[diagnostic(code(wr_resolve::circular_import))]
    CircularImport {
        /// The chain of files forming the cycle, first repeated last
        cycle: Vec<PathBuf>,
    },

    /// A resolved file could not be read
    #[error("failed to read '{}'", .path.display())]
    #[diagnostic(code(wr_resolve::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured preprocessor rejected an imported file
    #[error("preprocessing failed for '{}': {message}", .path.display())]
    #[diagnostic(code(wr_resolve::preprocess))]
    Preprocess { path: PathBuf, message: String },
}

fn format_cycle(cycle: &[PathBuf]) -> String {
    cycle
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
