//! Stylesheet document parser
//!
//! Produces the `wr-syntax` tree from raw stylesheet text. The parser is
//! deliberately tolerant: it tracks strings, comments, and paren depth so
//! that statement boundaries are found correctly, but it does not validate
//! CSS semantics. Every node records the exact byte span of its trimmed
//! text, which is what makes patch-based rewriting byte-faithful.

use crate::ParseError;
use wr_span::Span;
use wr_syntax::{AtRule, Declaration, Statement, StyleRule, Stylesheet};

/// Parses stylesheet text into a document tree
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, ParseError> {
    let mut cursor = Cursor { src: source, pos: 0 };
    let statements = parse_statements(&mut cursor, None)?;
    Ok(Stylesheet::new(statements))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

enum Terminator {
    Semicolon,
    OpenBrace,
    CloseBrace,
    Eof,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at(&self, text: &str) -> bool {
        self.src[self.pos..].starts_with(text)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.at("/*") => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        // at "/*"
        self.pos += 2;
        match self.src[self.pos..].find("*/") {
            Some(offset) => self.pos += offset + 2,
            None => self.pos = self.src.len(),
        }
    }

    fn skip_string(&mut self) {
        let Some(quote) = self.bump() else { return };
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                self.bump();
                continue;
            }
            self.bump();
            if c == quote {
                break;
            }
        }
    }

    /// Advances to the next statement terminator at paren depth zero,
    /// recording the first top-level `:` along the way.
    fn scan_to_terminator(&mut self) -> (Terminator, Option<usize>) {
        let mut paren_depth = 0u32;
        let mut first_colon = None;
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => self.skip_string(),
                '/' if self.at("/*") => self.skip_comment(),
                '(' => {
                    paren_depth += 1;
                    self.bump();
                }
                ')' => {
                    paren_depth = paren_depth.saturating_sub(1);
                    self.bump();
                }
                ':' if paren_depth == 0 => {
                    if first_colon.is_none() {
                        first_colon = Some(self.pos);
                    }
                    self.bump();
                }
                ';' if paren_depth == 0 => return (Terminator::Semicolon, first_colon),
                '{' if paren_depth == 0 => return (Terminator::OpenBrace, first_colon),
                '}' if paren_depth == 0 => return (Terminator::CloseBrace, first_colon),
                _ => {
                    self.bump();
                }
            }
        }
        (Terminator::Eof, first_colon)
    }

    fn unclosed_block(&self, opening: usize) -> ParseError {
        ParseError::UnclosedBlock {
            opening: (opening, 1).into(),
            src: miette::NamedSource::new("<input>", self.src.to_string()),
        }
    }
}

/// Parses statements until EOF, or until the `}` closing the block that
/// opened at `enclosing_brace` (left unconsumed for the caller).
fn parse_statements(
    cursor: &mut Cursor<'_>,
    enclosing_brace: Option<usize>,
) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    loop {
        cursor.skip_trivia();
        match cursor.peek() {
            None => {
                if let Some(opening) = enclosing_brace {
                    return Err(cursor.unclosed_block(opening));
                }
                break;
            }
            Some('}') => {
                if enclosing_brace.is_some() {
                    break;
                }
                // stray close brace at top level, skip it
                cursor.bump();
            }
            Some('@') => statements.push(parse_at_rule(cursor)?),
            Some(_) => statements.push(parse_rule_or_declaration(cursor)?),
        }
    }
    Ok(statements)
}

fn parse_block(cursor: &mut Cursor<'_>, opening: usize) -> Result<Vec<Statement>, ParseError> {
    cursor.bump(); // '{'
    let block = parse_statements(cursor, Some(opening))?;
    match cursor.peek() {
        Some('}') => {
            cursor.bump();
            Ok(block)
        }
        _ => Err(cursor.unclosed_block(opening)),
    }
}

fn parse_at_rule(cursor: &mut Cursor<'_>) -> Result<Statement, ParseError> {
    let start = cursor.pos;
    cursor.bump(); // '@'
    let name_start = cursor.pos;
    while matches!(cursor.peek(), Some(c) if crate::lexer::is_word_char(c)) {
        cursor.bump();
    }
    let name = cursor.src[name_start..cursor.pos].to_string();
    cursor.skip_trivia();

    let params_start = cursor.pos;
    let (terminator, _) = cursor.scan_to_terminator();
    let raw = &cursor.src[params_start..cursor.pos];
    let params = raw.trim_end();
    let params_span = Span::new(params_start as u32, (params_start + params.len()) as u32);

    let block = match terminator {
        Terminator::Semicolon => {
            cursor.bump();
            None
        }
        Terminator::OpenBrace => {
            let opening = cursor.pos;
            Some(parse_block(cursor, opening)?)
        }
        Terminator::CloseBrace | Terminator::Eof => None,
    };

    Ok(Statement::AtRule(AtRule {
        name,
        params: params.to_string(),
        params_span,
        block,
        span: Span::new(start as u32, cursor.pos as u32),
    }))
}

fn parse_rule_or_declaration(cursor: &mut Cursor<'_>) -> Result<Statement, ParseError> {
    let start = cursor.pos;
    let (terminator, first_colon) = cursor.scan_to_terminator();

    if matches!(terminator, Terminator::OpenBrace) {
        let selector = cursor.src[start..cursor.pos].trim_end();
        let selector_span = Span::new(start as u32, (start + selector.len()) as u32);
        let opening = cursor.pos;
        let block = parse_block(cursor, opening)?;
        return Ok(Statement::Rule(StyleRule {
            selector: selector.to_string(),
            selector_span,
            block,
            span: Span::new(start as u32, cursor.pos as u32),
        }));
    }

    let end = cursor.pos;
    let (property, value, value_span) = match first_colon {
        Some(colon) => {
            let property = cursor.src[start..colon].trim_end().to_string();
            let after = &cursor.src[colon + 1..end];
            let value_start = colon + 1 + (after.len() - after.trim_start().len());
            let value = cursor.src[value_start..end].trim_end();
            let value_span = Span::new(value_start as u32, (value_start + value.len()) as u32);
            (property, value.to_string(), value_span)
        }
        None => {
            let property = cursor.src[start..end].trim_end().to_string();
            (property, String::new(), Span::new(end as u32, end as u32))
        }
    };

    if matches!(terminator, Terminator::Semicolon) {
        cursor.bump();
    }

    Ok(Statement::Declaration(Declaration {
        property,
        value,
        value_span,
        span: Span::new(start as u32, cursor.pos as u32),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_rule(statement: &Statement) -> &AtRule {
        match statement {
            Statement::AtRule(at_rule) => at_rule,
            other => panic!("expected at-rule, got {other:?}"),
        }
    }

    fn rule(statement: &Statement) -> &StyleRule {
        match statement {
            Statement::Rule(rule) => rule,
            other => panic!("expected rule, got {other:?}"),
        }
    }

    fn declaration(statement: &Statement) -> &Declaration {
        match statement {
            Statement::Declaration(declaration) => declaration,
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_empty_input() {
        let sheet = parse_stylesheet("").unwrap();
        assert!(sheet.statements.is_empty());
    }

    #[test]
    fn parses_value_at_rule() {
        let source = "@value blue red;";
        let sheet = parse_stylesheet(source).unwrap();
        let at = at_rule(&sheet.statements[0]);
        assert_eq!(at.name, "value");
        assert_eq!(at.params, "blue red");
        assert_eq!(at.params_span.text(source), "blue red");
        assert_eq!(at.span.text(source), "@value blue red;");
    }

    #[test]
    fn params_span_excludes_trailing_whitespace() {
        let source = "@value shadow: 0 1px   ;";
        let sheet = parse_stylesheet(source).unwrap();
        let at = at_rule(&sheet.statements[0]);
        assert_eq!(at.params, "shadow: 0 1px");
        assert_eq!(at.params_span.text(source), "shadow: 0 1px");
    }

    #[test]
    fn parses_rule_with_declarations() {
        let source = ".foo { color: blue; margin: 0 }";
        let sheet = parse_stylesheet(source).unwrap();
        let rule = rule(&sheet.statements[0]);
        assert_eq!(rule.selector, ".foo");
        assert_eq!(rule.block.len(), 2);

        let first = declaration(&rule.block[0]);
        assert_eq!(first.property, "color");
        assert_eq!(first.value, "blue");
        assert_eq!(first.value_span.text(source), "blue");

        let second = declaration(&rule.block[1]);
        assert_eq!(second.value, "0");
        assert_eq!(second.value_span.text(source), "0");
    }

    #[test]
    fn parses_media_block_with_nested_rule() {
        let source = "@media (min-width: calc(base * 200)) { .a { margin: base; } }";
        let sheet = parse_stylesheet(source).unwrap();
        let media = at_rule(&sheet.statements[0]);
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "(min-width: calc(base * 200))");
        let block = media.block.as_ref().unwrap();
        let inner = rule(&block[0]);
        assert_eq!(inner.selector, ".a");
    }

    #[test]
    fn colon_inside_parens_does_not_split_declaration() {
        let source = ".a { background: url(data:image/png;base64,xyz); }";
        let sheet = parse_stylesheet(source).unwrap();
        let decl = declaration(&rule(&sheet.statements[0]).block[0]);
        assert_eq!(decl.property, "background");
        assert_eq!(decl.value, "url(data:image/png;base64,xyz)");
    }

    #[test]
    fn parses_multiline_at_rule_params() {
        let source = "@value (\n  blue,\n  red\n) from \"./colors.css\";";
        let sheet = parse_stylesheet(source).unwrap();
        let at = at_rule(&sheet.statements[0]);
        assert_eq!(at.params, "(\n  blue,\n  red\n) from \"./colors.css\"");
    }

    #[test]
    fn parses_top_level_declaration() {
        let source = "--tw-props:  ;";
        let sheet = parse_stylesheet(source).unwrap();
        let decl = declaration(&sheet.statements[0]);
        assert_eq!(decl.property, "--tw-props");
        assert_eq!(decl.value, "");
    }

    #[test]
    fn parses_at_rule_without_params_or_block() {
        let source = "@font-face {}";
        let sheet = parse_stylesheet(source).unwrap();
        let at = at_rule(&sheet.statements[0]);
        assert_eq!(at.name, "font-face");
        assert_eq!(at.params, "");
        assert_eq!(at.block.as_deref(), Some(&[][..]));
    }

    #[test]
    fn comments_are_trivia_between_statements() {
        let source = "/* a */ .x { /* b */ color: red; }";
        let sheet = parse_stylesheet(source).unwrap();
        let rule = rule(&sheet.statements[0]);
        assert_eq!(rule.selector, ".x");
        assert_eq!(rule.block.len(), 1);
    }

    #[test]
    fn semicolon_inside_string_does_not_terminate() {
        let source = "@value sep: \"a;b\";";
        let sheet = parse_stylesheet(source).unwrap();
        let at = at_rule(&sheet.statements[0]);
        assert_eq!(at.params, "sep: \"a;b\"");
    }

    #[test]
    fn unclosed_block_is_an_error() {
        let result = parse_stylesheet(".foo { color: red;");
        assert!(matches!(result, Err(ParseError::UnclosedBlock { .. })));
    }

    #[test]
    fn pseudo_selector_is_a_rule_not_a_declaration() {
        let source = "a:hover { color: red; }";
        let sheet = parse_stylesheet(source).unwrap();
        assert_eq!(rule(&sheet.statements[0]).selector, "a:hover");
    }
}
