//! Configuration surface for a processing run

use wr_resolve::Preprocessor;

/// Options recognized by the pipeline
#[derive(Clone)]
pub struct Options {
    /// Strip `@value` statements from the output
    pub no_emit_exports: bool,
    /// Also rewrite rule selectors
    pub replace_in_selectors: bool,
    /// Treat import specifiers as package-style module requests
    pub imports_as_module_requests: bool,
    /// At-rule kinds (beyond declarations) whose parameters are rewritten
    pub at_rules: Vec<String>,
    /// Transform run over every imported file's content before parsing
    pub preprocess: Option<Preprocessor>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            no_emit_exports: false,
            replace_in_selectors: false,
            imports_as_module_requests: false,
            at_rules: vec!["media".to_string()],
            preprocess: None,
        }
    }
}
