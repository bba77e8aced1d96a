//! Applies the final scope to every substitution site
//!
//! The input tree is never mutated: rewriting collects patches against the
//! original source text and splices them in one pass, so cached trees can
//! be shared between importers safely.

use crate::Options;
use wr_parser::{VALUE_KEYWORD, lexer};
use wr_resolve::ResolvedScope;
use wr_syntax::{Patch, Statement, Stylesheet, apply_patches};

/// Rewrites the document with the resolved scope.
///
/// `value_patches` are the walker's rewritten definition statements; they
/// are dropped entirely when `no_emit_exports` removes the statements
/// themselves.
pub fn rewrite(
    source: &str,
    sheet: &Stylesheet,
    scope: &ResolvedScope,
    value_patches: &[Patch],
    options: &Options,
) -> String {
    let mut patches = Vec::new();
    collect_patches(&sheet.statements, scope, options, &mut patches);
    if !options.no_emit_exports {
        patches.extend_from_slice(value_patches);
    }
    apply_patches(source, &patches)
}

fn collect_patches(
    statements: &[Statement],
    scope: &ResolvedScope,
    options: &Options,
    patches: &mut Vec<Patch>,
) {
    for statement in statements {
        match statement {
            Statement::Declaration(declaration) => {
                let replaced = lexer::substitute(&declaration.value, |name| scope.get(name));
                if replaced != declaration.value {
                    patches.push(Patch::new(declaration.value_span, replaced));
                }
            }
            Statement::Rule(rule) => {
                if options.replace_in_selectors {
                    let replaced = lexer::substitute(&rule.selector, |name| scope.get(name));
                    if replaced != rule.selector {
                        patches.push(Patch::new(rule.selector_span, replaced));
                    }
                }
                collect_patches(&rule.block, scope, options, patches);
            }
            Statement::AtRule(at_rule) => {
                if at_rule.name == VALUE_KEYWORD {
                    if options.no_emit_exports {
                        patches.push(Patch::delete(statement.span()));
                    }
                } else if options.at_rules.iter().any(|kind| *kind == at_rule.name) {
                    let replaced = lexer::substitute(&at_rule.params, |name| scope.get(name));
                    if replaced != at_rule.params {
                        patches.push(Patch::new(at_rule.params_span, replaced));
                    }
                }
                if let Some(block) = &at_rule.block {
                    collect_patches(block, scope, options, patches);
                }
            }
        }
    }
}
