//! Processing pipeline: parse → resolve → rewrite
//!
//! The driver wires the parser, the resolution pass, and the rewriter into
//! one run and exposes the result as rewritten CSS plus the resolved
//! name→value mapping and any collected warnings.

pub mod options;
pub mod rewriter;

pub use options::Options;

use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wr_resolve::{
    Diagnostics, FileLoader, FsResolver, ResolveError, ResolvedScope, Warning, resolve_document,
};

/// Result of processing one stylesheet
#[derive(Debug, Clone)]
pub struct Output {
    /// The rewritten stylesheet text
    pub css: String,
    /// Full resolved mapping, in definition order; the tooling side channel
    pub values: ResolvedScope,
    /// Non-fatal warnings collected during resolution
    pub warnings: Vec<Warning>,
}

/// Errors surfaced by the driver
#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    /// The input stylesheet itself could not be read
    #[error("failed to read '{}'", .path.display())]
    #[diagnostic(code(wr_driver::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Processes stylesheet text originating from `from`.
///
/// # Errors
///
/// Fatal resolution failures (unresolvable imports, malformed alias lists,
/// import cycles, I/O) abort with no partial output.
pub fn process_source(source: &str, from: &Path, options: &Options) -> Result<Output, DriverError> {
    let sheet = wr_parser::parse_stylesheet(source).map_err(ResolveError::from)?;

    let mut loader = FileLoader::new(FsResolver::new(options.imports_as_module_requests));
    if let Some(preprocess) = &options.preprocess {
        loader = loader.with_preprocessor(preprocess.clone());
    }
    let mut diagnostics = Diagnostics::new();

    let resolution = resolve_document(&sheet, from, &mut loader, &mut diagnostics, false)?;
    tracing::debug!(
        path = %from.display(),
        values = resolution.scope.len(),
        warnings = diagnostics.warnings().len(),
        "document resolved"
    );

    let css = rewriter::rewrite(source, &sheet, &resolution.scope, &resolution.patches, options);
    Ok(Output {
        css,
        values: resolution.scope,
        warnings: diagnostics.into_warnings(),
    })
}

/// Reads and processes the stylesheet at `path`
///
/// # Errors
///
/// As [`process_source`], plus an I/O error when the input cannot be read.
pub fn process_file(path: &Path, options: &Options) -> Result<Output, DriverError> {
    let source = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    process_source(&source, path, options)
}
