//! Grammar for `@value` statement parameters
//!
//! Two statement forms exist, tried in order:
//!
//! - import form: `<alias-list> from <source>`, where the source operand is
//!   anchored at the end of the statement, either a quoted path or a bare
//!   identifier naming a previously defined path constant;
//! - plain form: one `name [:] expression` pair per line, so one statement
//!   may declare several names.
//!
//! The plain form captures the exact separator and surrounding whitespace
//! of each pair, which lets the rewriter re-emit a resolved statement
//! without disturbing its formatting.

use crate::ParseError;
use crate::lexer::is_word_char;

/// The at-rule keyword that introduces value statements
pub const VALUE_KEYWORD: &str = "value";

/// A classified `@value` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueStatement {
    Import(ImportStatement),
    Definitions(Vec<Definition>),
    /// Malformed statement that still carries the declaration keyword;
    /// surfaced as a non-fatal warning
    Invalid { raw: String },
    /// Nothing recognizable; the statement is ignored
    Empty,
}

/// `<alias-list> from <source>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub bindings: Vec<ImportBinding>,
    pub source: ImportSource,
}

/// One alias-list entry: `name` or `name as alias`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// The name as exported by the imported file
    pub remote_name: String,
    /// The name bound in the importing file
    pub local_name: String,
}

/// The source operand of an import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// A quoted path, stored without its quotes
    Path(String),
    /// A bare identifier referring to a previously defined path constant
    Constant(String),
}

/// One `name value` pair of a plain definition statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub expression: String,
    /// Leading whitespace of the source line
    pub leading: String,
    /// Exact text between name and expression (`: ` or whitespace)
    pub separator: String,
    /// Trailing whitespace of the source line
    pub trailing: String,
}

impl Definition {
    /// Re-emits the definition line with a (possibly rewritten) expression
    pub fn render(&self, expression: &str) -> String {
        format!("{}{}{}{}{}", self.leading, self.name, self.separator, expression, self.trailing)
    }
}

/// Classifies the parameter text of one `@value` statement.
///
/// # Errors
///
/// Fails only on a malformed alias-list entry of an otherwise recognized
/// import statement; every other shape degrades to `Invalid` or `Empty`.
pub fn parse_value_statement(params: &str) -> Result<ValueStatement, ParseError> {
    if let Some(import) = try_parse_import(params)? {
        return Ok(ValueStatement::Import(import));
    }
    if params.contains("@value") {
        return Ok(ValueStatement::Invalid { raw: params.to_string() });
    }
    let definitions = parse_definitions(params);
    if definitions.is_empty() {
        return Ok(ValueStatement::Empty);
    }
    Ok(ValueStatement::Definitions(definitions))
}

/// Recognizes the import form by scanning from the right: a trailing quoted
/// path or bare identifier, preceded by the word `from`.
fn try_parse_import(params: &str) -> Result<Option<ImportStatement>, ParseError> {
    let trimmed = params.trim_end();
    let (source, rest) = match split_trailing_source(trimmed) {
        Some(split) => split,
        None => return Ok(None),
    };

    let rest = rest.trim_end();
    let Some(aliases_part) = rest.strip_suffix("from") else {
        return Ok(None);
    };
    // `from` must stand alone between the alias list and the source
    if !aliases_part.ends_with(|c: char| c.is_whitespace()) {
        return Ok(None);
    }
    let aliases_text = aliases_part.trim();
    if aliases_text.is_empty() {
        return Ok(None);
    }
    // only a parenthesized alias list may span lines
    if !aliases_text.starts_with('(') && aliases_text.contains('\n') {
        return Ok(None);
    }

    let bindings = parse_alias_list(aliases_text)?;
    Ok(Some(ImportStatement { bindings, source }))
}

/// Splits off the trailing source operand: `("...", rest)` or `(word, rest)`
fn split_trailing_source(text: &str) -> Option<(ImportSource, &str)> {
    let last = text.chars().last()?;
    if last == '"' || last == '\'' {
        let body = &text[..text.len() - 1];
        let open = body.rfind(last)?;
        let inner = &body[open + 1..];
        return Some((ImportSource::Path(inner.to_string()), &text[..open]));
    }
    let word_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(index, _)| index)?;
    let word = &text[word_start..];
    if word.is_empty() {
        return None;
    }
    Some((ImportSource::Constant(word.to_string()), &text[..word_start]))
}

/// Parses an alias list: a bare identifier or a parenthesized,
/// comma-separated list of `name` / `name as alias` entries.
///
/// # Errors
///
/// `MalformedAlias` on the first entry that does not match the grammar,
/// carrying the literal entry text.
pub fn parse_alias_list(text: &str) -> Result<Vec<ImportBinding>, ParseError> {
    let text = text.trim();
    let inner = if text.starts_with('(') && text.ends_with(')') && text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    };

    inner
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            parse_alias_entry(entry).ok_or_else(|| ParseError::MalformedAlias {
                entry: entry.to_string(),
            })
        })
        .collect()
}

fn parse_alias_entry(entry: &str) -> Option<ImportBinding> {
    let remote_end = entry
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(entry.len(), |(index, _)| index);
    if remote_end == 0 {
        return None;
    }
    let remote = &entry[..remote_end];
    let rest = &entry[remote_end..];
    if rest.is_empty() {
        return Some(ImportBinding {
            remote_name: remote.to_string(),
            local_name: remote.to_string(),
        });
    }

    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }
    let after_as = after_ws.strip_prefix("as")?;
    let local = after_as.trim_start();
    if local.len() == after_as.len() || local.is_empty() {
        return None;
    }
    if !local.chars().all(is_word_char) {
        return None;
    }
    Some(ImportBinding {
        remote_name: remote.to_string(),
        local_name: local.to_string(),
    })
}

/// Extracts `name [:] expression` pairs, one per line
pub fn parse_definitions(params: &str) -> Vec<Definition> {
    params.split('\n').filter_map(parse_definition_line).collect()
}

fn parse_definition_line(line: &str) -> Option<Definition> {
    let body = line.trim_start();
    let leading = &line[..line.len() - body.len()];

    let name_end = body
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(body.len(), |(index, _)| index);
    if name_end == 0 {
        return None;
    }
    let name = &body[..name_end];
    let after_name = &body[name_end..];

    // separator: optional colon, then at least one whitespace character
    let (colon, after_colon) = match after_name.strip_prefix(':') {
        Some(rest) => (":", rest),
        None => ("", after_name),
    };
    let rest = after_colon.trim_start();
    let whitespace = &after_colon[..after_colon.len() - rest.len()];
    if whitespace.is_empty() {
        return None;
    }

    let expression = rest.trim_end();
    if expression.is_empty() {
        return None;
    }
    let trailing = &rest[expression.len()..];

    Some(Definition {
        name: name.to_string(),
        expression: expression.to_string(),
        leading: leading.to_string(),
        separator: format!("{colon}{whitespace}"),
        trailing: trailing.to_string(),
    })
}
