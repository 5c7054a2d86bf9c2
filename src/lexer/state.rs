//! Lexer state threaded through every rule invocation

/// Coarse lexer phase gating which rules may fire.
///
/// A document moves forward through Title, Description, and Body exactly
/// once; rules advance the partition through their state update and must
/// never move it backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Title,
    Description,
    Body,
}

/// Mutable state owned by a single `lex` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerState {
    /// Current grammar partition.
    pub partition: Partition,
    /// Line terminators consumed so far; the title sits on line 0.
    pub line_count: usize,
}

impl LexerState {
    pub fn new() -> Self {
        LexerState {
            partition: Partition::Title,
            line_count: 0,
        }
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::new()
    }
}
