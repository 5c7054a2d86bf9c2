//! Rule and rule-set definitions
//!
//! A rule pairs a tokenizer with a list of guards and an optional state
//! update. Guards are cheap, side-effect-free predicates over the lexer
//! state; they are checked before the tokenizer runs so that rules for the
//! wrong partition never pay for a pattern match. The tokenizer inspects
//! the input at the cursor and either produces a token, reports that the
//! rule does not apply, or fails fatally for input that matched the rule's
//! shape but could not be decoded.
//!
//! Rules carry an implicit guard refusing to fire on the first line, which
//! is reserved for the document title; a rule that should run there opts
//! out through [`Rule::new_unguarded`].

use super::state::LexerState;
use super::token::Token;
use super::LexError;

/// An ordered collection of rules forming a grammar. Declaration order is
/// part of the grammar: the lexer takes the first rule that fires.
pub type RuleSet = Vec<Rule>;

/// State predicate that must hold before a rule's tokenizer is attempted.
pub type Guard = fn(&LexerState) -> bool;

/// Pattern match against the input at the cursor.
///
/// `Ok(Some(token))` consumes `token.raw`; `Ok(None)` means the rule does
/// not apply here and the next rule should be tried; `Err` aborts the lex
/// for input that matched the rule's shape but is semantically invalid.
pub type Tokenizer = fn(&str, &LexerState) -> Result<Option<Token>, LexError>;

/// State transition applied after a successful match.
pub type StateUpdate = fn(&mut LexerState);

/// The first line is reserved for the title rule.
fn not_first_line(state: &LexerState) -> bool {
    state.line_count != 0
}

/// A guarded, stateful tokenizer.
pub struct Rule {
    kind: &'static str,
    tokenizer: Tokenizer,
    guards: Vec<Guard>,
    update_state: Option<StateUpdate>,
}

impl Rule {
    /// Create a rule carrying the implicit first-line guard.
    pub fn new(kind: &'static str, tokenizer: Tokenizer) -> Self {
        Rule {
            kind,
            tokenizer,
            guards: vec![not_first_line],
            update_state: None,
        }
    }

    /// Create a rule without the implicit first-line guard.
    pub fn new_unguarded(kind: &'static str, tokenizer: Tokenizer) -> Self {
        Rule {
            kind,
            tokenizer,
            guards: Vec::new(),
            update_state: None,
        }
    }

    /// Add a guard predicate.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Set the state update applied after a successful match.
    pub fn with_update(mut self, update: StateUpdate) -> Self {
        self.update_state = Some(update);
        self
    }

    /// Name of the token kind this rule produces.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// True iff every guard holds for the current state.
    pub fn will_enforce(&self, state: &LexerState) -> bool {
        self.guards.iter().all(|guard| guard(state))
    }

    /// Run the tokenizer and, on a match, count the line terminators the
    /// token consumed.
    pub fn tokenize(
        &self,
        src: &str,
        state: &LexerState,
    ) -> Result<Option<(Token, usize)>, LexError> {
        match (self.tokenizer)(src, state)? {
            Some(token) => {
                let new_lines = token.line_span();
                Ok(Some((token, new_lines)))
            }
            None => Ok(None),
        }
    }

    /// Apply the state update, if any. Called only after a match.
    pub fn apply_update(&self, state: &mut LexerState) {
        if let Some(update) = self.update_state {
            update(state);
        }
    }
}
