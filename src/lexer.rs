//! Rule-driven lexer engine for line-oriented grammars
//!
//! This module is the generic half of the parser: it knows nothing about
//! the outline format itself. A grammar is an ordered [`RuleSet`]; the
//! [`Lexer`] drives it over raw text left to right. At every cursor
//! position the rules are tried in declaration order, and the first rule
//! whose guards hold and whose tokenizer matches wins: its raw text is
//! consumed, its embedded line terminators advance the line count, and its
//! state update runs. When no rule fires while input remains, the lex fails
//! fatally with the unconsumed prefix and the current line count. There is
//! no recovery and no partial token stream.
//!
//! Separating guards (cheap, state-based eligibility) from tokenizers
//! (pattern matches against the input) lets partitioned grammars skip whole
//! groups of rules without running their regexes. See the grammar module
//! for the default outline rule set.
//!
//! A rule is allowed to match empty raw text, but only if its state update
//! changes the state enough that it will not fire again at the same cursor;
//! otherwise the lexer would stop making progress.

pub mod rules;
pub mod state;
pub mod token;

pub use rules::{Guard, Rule, RuleSet, StateUpdate, Tokenizer};
pub use state::{LexerState, Partition};
pub use token::{count_line_terminators, split_lines, Token, TokenValue};

use std::fmt;

/// How much unconsumed input an error message carries.
const ERROR_PREFIX_LEN: usize = 10;

/// Errors raised while lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No rule matched at the current cursor.
    UnmatchedInput { prefix: String, line: usize },
    /// An item label could not be decoded.
    InvalidLabel { line: usize },
    /// An inline `key=value` pair could not be decoded.
    InvalidAttribute { line: usize, column: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnmatchedInput { prefix, line } => {
                write!(f, "no matching rule for {:?} at line {}", prefix, line)
            }
            LexError::InvalidLabel { line } => {
                write!(f, "cannot parse item label at line {}", line)
            }
            LexError::InvalidAttribute { line, column } => {
                write!(
                    f,
                    "cannot parse item attribute at line {}, column {}",
                    line, column
                )
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Drives an ordered rule set over raw text.
///
/// The rule set is immutable once the lexer is built and can be shared
/// freely; all mutable state lives in the [`LexerState`] owned by each
/// `lex` call.
pub struct Lexer {
    ruleset: RuleSet,
}

impl Lexer {
    pub fn new(ruleset: RuleSet) -> Self {
        Lexer { ruleset }
    }

    /// Tokenize the whole input, or fail on the first cursor position no
    /// rule matches.
    pub fn lex(&self, src: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut state = LexerState::new();
        let mut rest = src;

        while !rest.is_empty() {
            let mut matched = false;
            for rule in &self.ruleset {
                if !rule.will_enforce(&state) {
                    continue;
                }
                if let Some((token, new_lines)) = rule.tokenize(rest, &state)? {
                    rest = &rest[token.raw.len()..];
                    state.line_count += new_lines;
                    rule.apply_update(&mut state);
                    tokens.push(token);
                    matched = true;
                    break;
                }
            }
            if !matched {
                return Err(LexError::UnmatchedInput {
                    prefix: rest.chars().take(ERROR_PREFIX_LEN).collect(),
                    line: state.line_count,
                });
            }
        }

        Ok(tokens)
    }
}
