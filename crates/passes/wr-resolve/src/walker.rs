//! The resolution graph walker
//!
//! Walks one document's `@value` statements in source order, growing the
//! scope as it goes. Order is semantic: a later definition shadows an
//! earlier one, and a bare-identifier import source only resolves if the
//! path constant it names was defined on an earlier statement.

use crate::diagnostics::{Diagnostics, Warning};
use crate::loader::FileLoader;
use crate::scope::{RequiredSet, ResolvedScope};
use crate::ResolveError;
use std::path::{Path, PathBuf};
use wr_parser::{lexer, ImportSource, ValueStatement, VALUE_KEYWORD};
use wr_syntax::{Patch, Stylesheet};

/// Result of resolving one document
#[derive(Debug, Clone, Default)]
pub struct DocumentResolution {
    /// The full scope after the walk
    pub scope: ResolvedScope,
    /// Rewritten parameters for the document's plain definition
    /// statements; empty when the document was loaded for an importer
    pub patches: Vec<Patch>,
}

/// Resolves every `@value` statement of `sheet`, recursing into imports
/// through `loader`.
///
/// `for_import` marks documents loaded on behalf of an importer: their
/// definition statements are not patched (only the top-level document's
/// output is rewritten).
///
/// # Errors
///
/// Malformed alias lists and loader failures abort the walk.
pub fn resolve_document(
    sheet: &Stylesheet,
    from: &Path,
    loader: &mut FileLoader,
    diagnostics: &mut Diagnostics,
    for_import: bool,
) -> Result<DocumentResolution, ResolveError> {
    let base_dir = parent_dir(from);
    let mut scope = ResolvedScope::new();
    let mut patches = Vec::new();

    for at_rule in sheet.at_rules(VALUE_KEYWORD) {
        match wr_parser::parse_value_statement(&at_rule.params)? {
            ValueStatement::Import(import) => {
                let Some(path) = import_path(&import.source, &scope) else {
                    // documented leniency: not even a warning
                    tracing::debug!(
                        params = %at_rule.params,
                        "skipping import with unresolved source"
                    );
                    continue;
                };
                let required = RequiredSet::from_bindings(&import.bindings);
                let imported = loader.load(&path, &base_dir, &required, diagnostics)?;
                for (local, value) in imported.iter() {
                    scope.bind(local, value);
                }
            }
            ValueStatement::Definitions(definitions) => {
                // every pair resolves against the scope as it stood before
                // this statement; pairs do not see each other
                let resolved: Vec<(String, String)> = definitions
                    .iter()
                    .map(|definition| {
                        let value =
                            lexer::substitute(&definition.expression, |name| scope.get(name));
                        (definition.name.clone(), value)
                    })
                    .collect();
                if !for_import {
                    let rendered: Vec<String> = definitions
                        .iter()
                        .zip(&resolved)
                        .map(|(definition, (_, value))| definition.render(value))
                        .collect();
                    patches.push(Patch::new(at_rule.params_span, rendered.join("\n")));
                }
                for (name, value) in resolved {
                    scope.bind(name, value);
                }
            }
            ValueStatement::Invalid { raw } => {
                tracing::warn!(path = %from.display(), %raw, "invalid value definition");
                diagnostics.warn(Warning::InvalidDefinition {
                    raw,
                    path: from.to_path_buf(),
                });
            }
            ValueStatement::Empty => {}
        }
    }

    Ok(DocumentResolution { scope, patches })
}

fn parent_dir(from: &Path) -> PathBuf {
    match from.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    }
}

/// The import's path operand: a literal path, or a path constant looked up
/// in the running scope whose value must be a quoted string
fn import_path(source: &ImportSource, scope: &ResolvedScope) -> Option<String> {
    match source {
        ImportSource::Path(path) => Some(path.clone()),
        ImportSource::Constant(name) => {
            scope.get(name).and_then(unquote).map(str::to_string)
        }
    }
}

fn unquote(value: &str) -> Option<&str> {
    let first = value.chars().next()?;
    if (first == '"' || first == '\'') && value.len() >= 2 && value.ends_with(first) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FsResolver;
    use std::fs;
    use wr_syntax::apply_patches;

    fn resolve(source: &str) -> DocumentResolution {
        resolve_in(source, Path::new("input.css"))
    }

    fn resolve_in(source: &str, from: &Path) -> DocumentResolution {
        let sheet = wr_parser::parse_stylesheet(source).unwrap();
        let mut loader = FileLoader::new(FsResolver::default());
        let mut diagnostics = Diagnostics::new();
        resolve_document(&sheet, from, &mut loader, &mut diagnostics, false).unwrap()
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn empty_document_yields_empty_scope() {
        let resolution = resolve(".foo { color: red; }");
        assert!(resolution.scope.is_empty());
        assert!(resolution.patches.is_empty());
    }

    #[test]
    fn binds_definitions_in_order() {
        let resolution = resolve("@value aaa: red;\n@value bbb: aaa;");
        assert_eq!(resolution.scope.get("aaa"), Some("red"));
        assert_eq!(resolution.scope.get("bbb"), Some("red"));
    }

    #[test]
    fn transitive_chains_resolve_to_the_root_value() {
        let source = "@value a: red;\n@value b: a;\n@value c: b;\n@value d: c;";
        let resolution = resolve(source);
        assert_eq!(resolution.scope.get("d"), Some("red"));
    }

    #[test]
    fn later_definition_shadows_earlier() {
        let resolution = resolve("@value blue red; @value blue green;");
        assert_eq!(resolution.scope.get("blue"), Some("green"));
    }

    #[test]
    fn patches_rewrite_definition_statements_in_walk_order() {
        let source = "@value base: 10px;\n@value large: calc(base * 2);";
        let resolution = resolve(source);
        assert_eq!(
            apply_patches(source, &resolution.patches),
            "@value base: 10px;\n@value large: calc(10px * 2);"
        );
    }

    #[test]
    fn shadowed_definition_patch_uses_the_scope_at_its_statement() {
        let source = "@value a: 1; @value b: a; @value a: 2;";
        let resolution = resolve(source);
        assert_eq!(
            apply_patches(source, &resolution.patches),
            "@value a: 1; @value b: 1; @value a: 2;"
        );
        assert_eq!(resolution.scope.get("a"), Some("2"));
        assert_eq!(resolution.scope.get("b"), Some("1"));
    }

    #[test]
    fn pairs_in_one_statement_resolve_against_the_pre_statement_scope() {
        let source = "@value a: red\n  b: a;";
        let resolution = resolve(source);
        // `a` was not yet bound when the statement began
        assert_eq!(resolution.scope.get("b"), Some("a"));
        assert_eq!(resolution.scope.get("a"), Some("red"));
    }

    #[test]
    fn unresolved_constant_source_is_silently_skipped() {
        let resolution = resolve("@value red from colors;\n@value colors: \"./x.css\";");
        assert!(!resolution.scope.contains("red"));
        assert_eq!(resolution.scope.get("colors"), Some("\"./x.css\""));
    }

    #[test]
    fn unquoted_constant_value_is_not_a_path() {
        // `path` resolves to an unquoted string, so the import is a no-op
        let resolution = resolve("@value path: test.png;\n@value x from path;");
        assert!(!resolution.scope.contains("x"));
    }

    #[test]
    fn invalid_statement_warns_and_leaves_scope_alone() {
        let sheet =
            wr_parser::parse_stylesheet("@value red blue\n@value green yellow").unwrap();
        let mut loader = FileLoader::new(FsResolver::default());
        let mut diagnostics = Diagnostics::new();
        let resolution = resolve_document(
            &sheet,
            Path::new("input.css"),
            &mut loader,
            &mut diagnostics,
            false,
        )
        .unwrap();

        assert!(resolution.scope.is_empty());
        assert_eq!(diagnostics.warnings().len(), 1);
        assert_eq!(
            diagnostics.warnings()[0].to_string(),
            "Invalid value definition: red blue\n@value green yellow"
        );
    }

    #[test]
    fn import_merges_under_local_aliases() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("colors.css"),
            "@value red: #FF0000;\n@value blue: #0000FF;\n",
        );
        let from = dir.path().join("from.css");
        let resolution = resolve_in(
            "@value blue as green, red from \"./colors.css\";",
            &from,
        );
        assert_eq!(resolution.scope.get("green"), Some("#0000FF"));
        assert_eq!(resolution.scope.get("red"), Some("#FF0000"));
        assert!(!resolution.scope.contains("blue"));
    }

    #[test]
    fn path_constant_resolves_when_defined_first() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("colors.css"), "@value red: #FF0000;\n");
        let from = dir.path().join("from.css");
        let resolution = resolve_in(
            "@value colors: \"./colors.css\"; @value red from colors;",
            &from,
        );
        assert_eq!(resolution.scope.get("red"), Some("#FF0000"));
    }

    #[test]
    fn imported_value_can_be_shadowed_by_later_definition() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("colors.css"), "@value red: #FF0000;\n");
        let from = dir.path().join("from.css");
        let resolution = resolve_in(
            "@value red from \"./colors.css\"; @value red green;",
            &from,
        );
        assert_eq!(resolution.scope.get("red"), Some("green"));
    }

    #[test]
    fn names_not_exported_by_the_target_stay_unbound() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("colors.css"), "@value red: #FF0000;\n");
        let from = dir.path().join("from.css");
        let resolution = resolve_in("@value hidden from \"./colors.css\";", &from);
        assert!(!resolution.scope.contains("hidden"));
    }
}
