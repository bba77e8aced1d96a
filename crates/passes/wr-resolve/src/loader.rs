//! Memoized file loading for cross-file resolution
//!
//! Each top-level run owns one `FileLoader`. Completed resolutions are
//! cached unfiltered by canonical path, so a diamond-shaped import graph
//! parses the shared file exactly once while every importer still gets its
//! own aliased view. The loading stack doubles as the cycle detector.

use crate::diagnostics::Diagnostics;
use crate::resolver::ResolveImport;
use crate::scope::{RequiredSet, ResolvedScope};
use crate::walker::resolve_document;
use crate::ResolveError;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hook run over every imported file's content before it is parsed,
/// standing in for upstream transform stages of a host pipeline
pub type Preprocessor = Arc<dyn Fn(&str, &Path) -> anyhow::Result<String> + Send + Sync>;

/// Loads, resolves, and memoizes imported documents for one run
pub struct FileLoader {
    resolver: Box<dyn ResolveImport>,
    preprocess: Option<Preprocessor>,
    cache: FxHashMap<PathBuf, ResolvedScope>,
    loading: Vec<PathBuf>,
    load_counts: FxHashMap<PathBuf, u32>,
}

impl FileLoader {
    pub fn new(resolver: impl ResolveImport + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            preprocess: None,
            cache: FxHashMap::default(),
            loading: Vec::new(),
            load_counts: FxHashMap::default(),
        }
    }

    pub fn with_preprocessor(mut self, preprocess: Preprocessor) -> Self {
        self.preprocess = Some(preprocess);
        self
    }

    /// Resolves `specifier`, loads the target document (or reuses the
    /// cached resolution), and returns its scope filtered and re-keyed per
    /// `required`.
    ///
    /// # Errors
    ///
    /// `UnresolvableImport`, `CircularImport`, I/O and parse failures; all
    /// abort the run.
    pub fn load(
        &mut self,
        specifier: &str,
        base_dir: &Path,
        required: &RequiredSet,
        diagnostics: &mut Diagnostics,
    ) -> Result<ResolvedScope, ResolveError> {
        let resolved = self.resolver.resolve(specifier, base_dir)?;

        if let Some(position) = self.loading.iter().position(|path| *path == resolved) {
            let mut cycle = self.loading[position..].to_vec();
            cycle.push(resolved);
            return Err(ResolveError::CircularImport { cycle });
        }

        if let Some(scope) = self.cache.get(&resolved) {
            tracing::debug!(path = %resolved.display(), "document cache hit");
            return Ok(required.filter(scope));
        }

        let content = fs::read_to_string(&resolved).map_err(|source| ResolveError::Io {
            path: resolved.clone(),
            source,
        })?;
        let content = match &self.preprocess {
            Some(preprocess) => {
                preprocess(&content, &resolved).map_err(|error| ResolveError::Preprocess {
                    path: resolved.clone(),
                    message: format!("{error:#}"),
                })?
            }
            None => content,
        };

        *self.load_counts.entry(resolved.clone()).or_insert(0) += 1;
        tracing::debug!(path = %resolved.display(), "loading imported document");

        let sheet = wr_parser::parse_stylesheet(&content)?;
        self.loading.push(resolved.clone());
        let result = resolve_document(&sheet, &resolved, self, diagnostics, true);
        self.loading.pop();
        let resolution = result?;

        let view = required.filter(&resolution.scope);
        self.cache.insert(resolved, resolution.scope);
        Ok(view)
    }

    /// How many times the file at `path` has been parsed this run.
    /// Stays at 1 for any path in a correct run; tests observe this.
    pub fn load_count(&self, path: &Path) -> u32 {
        self.load_counts.get(path).copied().unwrap_or(0)
    }
}
