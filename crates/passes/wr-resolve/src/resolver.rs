//! Import specifier resolution
//!
//! Maps the source operand of an import statement to a concrete file on
//! disk. Relative and absolute specifiers resolve against the importing
//! document's directory; bare and scoped specifiers (`module`,
//! `@scope/module/file.css`) walk `node_modules` directories upward,
//! honoring a package's `"main"` manifest field.

use crate::ResolveError;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Seam between the resolution engine and the host's path conventions
pub trait ResolveImport {
    /// Resolves `specifier` against the importing document's directory.
    ///
    /// # Errors
    ///
    /// `UnresolvableImport` when no file can be located; this aborts the
    /// whole resolution run.
    fn resolve(&self, specifier: &str, base_dir: &Path) -> Result<PathBuf, ResolveError>;
}

/// Filesystem resolver used by default
#[derive(Debug, Clone, Default)]
pub struct FsResolver {
    imports_as_module_requests: bool,
}

impl FsResolver {
    pub fn new(imports_as_module_requests: bool) -> Self {
        Self { imports_as_module_requests }
    }
}

impl ResolveImport for FsResolver {
    fn resolve(&self, specifier: &str, base_dir: &Path) -> Result<PathBuf, ResolveError> {
        let request = if self.imports_as_module_requests {
            normalize_request(specifier)
        } else {
            Cow::Borrowed(specifier)
        };

        let unresolvable = || ResolveError::UnresolvableImport {
            specifier: specifier.to_string(),
            base: base_dir.to_path_buf(),
        };

        if let Some(path) = strip_relative(&request) {
            return resolve_file(&base_dir.join(path)).ok_or_else(unresolvable);
        }
        if Path::new(request.as_ref()).is_absolute() {
            return resolve_file(Path::new(request.as_ref())).ok_or_else(unresolvable);
        }
        resolve_package(&request, base_dir).ok_or_else(unresolvable)
    }
}

/// Loader-convention request normalization: `~x` forces a package request,
/// anything else becomes relative to the importing document
fn normalize_request(specifier: &str) -> Cow<'_, str> {
    if let Some(stripped) = specifier.strip_prefix('~') {
        return Cow::Borrowed(stripped);
    }
    if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/') {
        return Cow::Borrowed(specifier);
    }
    Cow::Owned(format!("./{specifier}"))
}

fn strip_relative(request: &str) -> Option<&str> {
    if request.starts_with("./") || request.starts_with("../") {
        Some(request)
    } else {
        None
    }
}

/// Probes a candidate path: the file itself, then with a `.css` extension,
/// then as a directory holding `index.css`
fn resolve_file(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(canonical(candidate));
    }
    if candidate.extension().is_none() {
        let with_extension = candidate.with_extension("css");
        if with_extension.is_file() {
            return Some(canonical(&with_extension));
        }
    }
    let index = candidate.join("index.css");
    if index.is_file() {
        return Some(canonical(&index));
    }
    None
}

/// Walks `node_modules` directories upward from `base_dir`
fn resolve_package(request: &str, base_dir: &Path) -> Option<PathBuf> {
    for dir in base_dir.ancestors() {
        let modules = dir.join("node_modules");
        if !modules.is_dir() {
            continue;
        }
        let candidate = modules.join(request);
        if candidate.is_dir() {
            if let Some(main) = package_main(&candidate) {
                return Some(main);
            }
        }
        if let Some(file) = resolve_file(&candidate) {
            return Some(file);
        }
    }
    None
}

/// Resolves a package directory through its `package.json` `"main"` field
fn package_main(package_dir: &Path) -> Option<PathBuf> {
    let manifest = fs::read_to_string(package_dir.join("package.json")).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&manifest).ok()?;
    let main = manifest.get("main")?.as_str()?;
    resolve_file(&package_dir.join(main))
}

/// Canonical cache key for a resolved file. Falls back to the joined path
/// when canonicalization fails (e.g. on exotic filesystems).
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn resolves_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        write(&base.join("colors.css"), "@value red: #FF0000;");

        let resolver = FsResolver::default();
        let resolved = resolver.resolve("./colors.css", &base).unwrap();
        assert!(resolved.ends_with("colors.css"));
    }

    #[test]
    fn resolves_parent_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src/nested");
        fs::create_dir_all(&base).unwrap();
        write(&dir.path().join("src/colors.css"), "@value red: #FF0000;");

        let resolver = FsResolver::default();
        assert!(resolver.resolve("../colors.css", &base).is_ok());
    }

    #[test]
    fn missing_relative_path_is_unresolvable() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FsResolver::default();
        let error = resolver.resolve("./non-existent-file.css", dir.path()).unwrap_err();
        match error {
            ResolveError::UnresolvableImport { specifier, .. } => {
                assert_eq!(specifier, "./non-existent-file.css");
            }
            other => panic!("expected UnresolvableImport, got {other:?}"),
        }
    }

    #[test]
    fn resolves_package_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        fs::create_dir_all(&base).unwrap();
        write(
            &dir.path().join("node_modules/module/module.css"),
            "@value module: black;",
        );

        let resolver = FsResolver::default();
        let resolved = resolver.resolve("module/module.css", &base).unwrap();
        assert!(resolved.ends_with("module/module.css"));
    }

    #[test]
    fn resolves_scoped_package_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        fs::create_dir_all(&base).unwrap();
        write(
            &dir.path().join("node_modules/@scope/module/module.css"),
            "@value scoped-module: purple;",
        );

        let resolver = FsResolver::default();
        assert!(resolver.resolve("@scope/module/module.css", &base).is_ok());
    }

    #[test]
    fn resolves_package_through_main_field() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        fs::create_dir_all(&base).unwrap();
        write(
            &dir.path().join("node_modules/module/package.json"),
            "{ \"main\": \"module.css\" }",
        );
        write(
            &dir.path().join("node_modules/module/module.css"),
            "@value module: black;",
        );

        let resolver = FsResolver::default();
        let resolved = resolver.resolve("module", &base).unwrap();
        assert!(resolved.ends_with("module/module.css"));
    }

    #[test]
    fn module_requests_make_bare_specifiers_relative() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        write(&base.join("level1.css"), "@value base: 10px;");

        let resolver = FsResolver::new(true);
        assert!(resolver.resolve("level1.css", &base).is_ok());
    }

    #[test]
    fn tilde_forces_package_request() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        fs::create_dir_all(&base).unwrap();
        write(
            &dir.path().join("node_modules/@scope/module/module.css"),
            "@value scoped-module: purple;",
        );

        let resolver = FsResolver::new(true);
        assert!(resolver.resolve("~@scope/module/module.css", &base).is_ok());
    }

    #[test]
    fn same_file_resolves_to_one_canonical_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("src");
        fs::create_dir_all(base.join("nested")).unwrap();
        write(&base.join("colors.css"), "@value red: #FF0000;");

        let resolver = FsResolver::default();
        let direct = resolver.resolve("./colors.css", &base).unwrap();
        let indirect = resolver.resolve("../colors.css", &base.join("nested")).unwrap();
        assert_eq!(direct, indirect);
    }
}
