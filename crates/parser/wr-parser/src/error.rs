//! Diagnostic errors for stylesheet and `@value` statement parsing

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Parse error with rich diagnostic information
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum ParseError {
    /// An alias-list entry that does not match the import grammar
    #[error("@value statement \"{entry}\" is invalid!")]
    #[diagnostic(
        code(wr_parser::malformed_alias),
        help("expected `name` or `name as alias`")
    )]
    MalformedAlias {
        /// The literal offending entry text
        entry: String,
    },

    /// A `{` block that never closes
    #[error("this file contains an unclosed block")]
    #[diagnostic(code(wr_parser::unclosed_block))]
    UnclosedBlock {
        /// Opening brace location
        #[label("block opened here")]
        opening: SourceSpan,
        /// Source code for context
        #[source_code]
        src: miette::NamedSource<String>,
    },
}
