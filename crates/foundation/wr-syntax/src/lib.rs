//! Stylesheet document tree
//!
//! The tree produced by the document parser is immutable: every node carries
//! the byte span of the source text it came from, and rewriting is expressed
//! as a list of [`Patch`]es spliced over the original source. Untouched text
//! (trivia, comments, formatting) survives byte-for-byte.

use wr_span::Span;

/// A parsed stylesheet: an ordered list of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub statements: Vec<Statement>,
}

impl Stylesheet {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Iterates top-level at-rules with the given name (without the `@`)
    pub fn at_rules<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AtRule> {
        self.statements.iter().filter_map(move |statement| match statement {
            Statement::AtRule(at_rule) if at_rule.name == name => Some(at_rule),
            _ => None,
        })
    }
}

/// One node in a stylesheet body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    AtRule(AtRule),
    Rule(StyleRule),
    Declaration(Declaration),
}

impl Statement {
    /// The full span of the statement, terminator included
    pub fn span(&self) -> Span {
        match self {
            Self::AtRule(at_rule) => at_rule.span,
            Self::Rule(rule) => rule.span,
            Self::Declaration(declaration) => declaration.span,
        }
    }
}

/// An at-rule statement: `@name params;` or `@name params { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Keyword without the leading `@`
    pub name: String,
    /// Parameter text, trimmed; `params_span` covers exactly this text
    pub params: String,
    pub params_span: Span,
    /// Block body, when the statement carries one
    pub block: Option<Vec<Statement>>,
    pub span: Span,
}

/// A style rule: `selector { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector text, trimmed; `selector_span` covers exactly this text
    pub selector: String,
    pub selector_span: Span,
    pub block: Vec<Statement>,
    pub span: Span,
}

/// A property declaration: `property: value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    /// Value text, trimmed; `value_span` covers exactly this text
    pub value: String,
    pub value_span: Span,
    pub span: Span,
}

/// A single splice: replace the span's text with `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub span: Span,
    pub text: String,
}

impl Patch {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self { span, text: text.into() }
    }

    /// A patch that deletes the span entirely
    pub fn delete(span: Span) -> Self {
        Self { span, text: String::new() }
    }
}

/// Applies a set of non-overlapping patches to the source text.
///
/// Patches are sorted by start offset before splicing, so callers may collect
/// them in any order.
pub fn apply_patches(source: &str, patches: &[Patch]) -> String {
    let mut sorted: Vec<&Patch> = patches.iter().collect();
    sorted.sort_by_key(|patch| patch.span.start);

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for patch in sorted {
        let range = patch.span.range();
        debug_assert!(range.start >= cursor, "overlapping patches");
        output.push_str(&source[cursor..range.start]);
        output.push_str(&patch.text);
        cursor = range.end;
    }
    output.push_str(&source[cursor..]);
    output
}
