//! Byte spans over stylesheet source text
//!
//! Every node of the document tree records the span of the trimmed text it
//! came from; the rewriter patches exactly those regions, which is what
//! keeps untouched formatting byte-identical in the output.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The source text this span covers
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}
