//! Cross-file value resolution for wren
//!
//! This crate is the heart of the pipeline: given a parsed stylesheet it
//! walks the document's `@value` statements in order, recursively loads
//! imported files through a run-scoped memoizing loader, and produces the
//! final name→value scope plus the patch list for rewriting the top-level
//! document.
//!
//! # Architecture
//!
//! - **Scope**: ordered symbol table with last-write-wins shadowing
//! - **Walker**: statement-order resolution, import merging, silent-skip
//!   semantics for unresolved path constants
//! - **File loader**: specifier resolution, per-path memoization, cycle
//!   detection
//! - **Diagnostics**: non-fatal warnings collected across the whole run

pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod scope;
pub mod walker;

pub use diagnostics::{Diagnostics, Warning};
pub use error::ResolveError;
pub use loader::{FileLoader, Preprocessor};
pub use resolver::{FsResolver, ResolveImport};
pub use scope::{RequiredSet, ResolvedScope};
pub use walker::{DocumentResolution, resolve_document};
