//! The default treeline grammar
//!
//! Rules in declaration order, most specific first — the order is part of
//! the grammar:
//!
//! 1. `title` — the whole first line; moves the partition to Description.
//! 2. `description` — free text up to the first item line (possibly empty);
//!    moves the partition to Body.
//! 3. `item_ordered` — one `<indent>- label | key=value, ...` line.
//! 4. `markdown_block` — a `...`-fenced note block.
//! 5. `item_attribute` — a standalone `| key=value, ...` line.
//! 6. `plain_line` — anything else in the body; ignored by the builder.
//!
//! All patterns accept `\n`, `\r\n`, and `\r` line endings, and the final
//! line of input may omit its terminator.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::inline;
use crate::lexer::{LexError, LexerState, Partition, Rule, RuleSet, Token, TokenValue};

/// Token kind names produced by the default grammar.
pub mod kinds {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const ITEM_ORDERED: &str = "item_ordered";
    pub const MARKDOWN_BLOCK: &str = "markdown_block";
    pub const ITEM_ATTRIBUTE: &str = "item_attribute";
    pub const PLAIN_LINE: &str = "plain_line";
}

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[^\r\n]*(\r\n|\r|\n|\z)").unwrap());

/// Lazily up to the first line that starts body structure (an item, an
/// attribute line, or a fence, each allowing indentation); the starter
/// itself stays unconsumed. A description line that begins with `- `
/// terminates the match early, even inside prose.
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A(?P<text>(?:.*?(?:\r\n|\r|\n))*?)(?:[ ]*-\s|[ \t]*\||[ \t]*\.\.\.)").unwrap()
});

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A *-\s[^\r\n]*(\r\n|\r|\n|\z)").unwrap());

/// A fenced note block with its closing fence. Both fences are lines
/// consisting solely of `...`; the body is matched lazily so the block
/// closes at the first closing fence.
static FENCED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A[ \t]*\.\.\.[ \t]*(\r\n|\r|\n)(?P<body>(?:[^\r\n]*(?:\r\n|\r|\n))*?)[ \t]*\.\.\.[ \t]*(\r\n|\r|\n|\z)",
    )
    .unwrap()
});

/// An opening fence that never closes: the rest of the input is the body.
static FENCED_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A[ \t]*\.\.\.[ \t]*(?:(?:\r\n|\r|\n)(?P<body>.*))?\z").unwrap()
});

static ATTRIBUTE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\s*\|[^\r\n]*(\r\n|\r|\n|\z)").unwrap());

static PLAIN_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[^\r\n]*(\r\n|\r|\n|\z)").unwrap());

/// Build the default grammar rule set.
pub fn default_rules() -> RuleSet {
    vec![
        Rule::new_unguarded(kinds::TITLE, title)
            .with_guard(on_first_line)
            .with_update(to_description),
        Rule::new(kinds::DESCRIPTION, description)
            .with_guard(in_description)
            .with_update(to_body),
        Rule::new(kinds::ITEM_ORDERED, item_ordered).with_guard(in_body),
        Rule::new(kinds::MARKDOWN_BLOCK, markdown_block).with_guard(in_body),
        Rule::new(kinds::ITEM_ATTRIBUTE, item_attribute_line).with_guard(in_body),
        Rule::new(kinds::PLAIN_LINE, plain_line).with_guard(in_body),
    ]
}

fn on_first_line(state: &LexerState) -> bool {
    state.line_count == 0
}

fn in_description(state: &LexerState) -> bool {
    state.partition == Partition::Description
}

fn in_body(state: &LexerState) -> bool {
    state.partition == Partition::Body
}

fn to_description(state: &mut LexerState) {
    state.partition = Partition::Description;
}

fn to_body(state: &mut LexerState) {
    state.partition = Partition::Body;
}

/// Strip one trailing line terminator, if present.
fn strip_terminator(text: &str) -> &str {
    if let Some(stripped) = text.strip_suffix("\r\n") {
        stripped
    } else if let Some(stripped) = text.strip_suffix(['\r', '\n']) {
        stripped
    } else {
        text
    }
}

/// Leading indentation width, measured in spaces.
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn title(src: &str, _state: &LexerState) -> Result<Option<Token>, LexError> {
    let raw = match TITLE_RE.find(src) {
        Some(m) => m.as_str(),
        None => return Ok(None),
    };
    let value = strip_terminator(raw).to_string();
    Ok(Some(Token::new(kinds::TITLE, raw, TokenValue::Text(value))))
}

fn description(src: &str, _state: &LexerState) -> Result<Option<Token>, LexError> {
    // When no body structure follows anywhere, the whole remainder is the
    // description and the document simply has no tasks.
    let raw = match DESCRIPTION_RE.captures(src) {
        Some(caps) => caps.name("text").map_or("", |m| m.as_str()),
        None => src,
    };
    let value = strip_terminator(raw).to_string();
    Ok(Some(Token::new(
        kinds::DESCRIPTION,
        raw,
        TokenValue::Text(value),
    )))
}

fn item_ordered(src: &str, state: &LexerState) -> Result<Option<Token>, LexError> {
    let raw = match ITEM_RE.find(src) {
        Some(m) => m.as_str(),
        None => return Ok(None),
    };

    let indent = indent_width(raw);
    let trimmed = raw.trim_start_matches(' ');
    let line = trimmed.strip_prefix('-').unwrap_or(trimmed).trim();

    let mut rest = line;
    let mut column = 1usize;

    let label = match inline::item_title(rest) {
        Some(title) => {
            rest = &rest[title.len..];
            column += title.len;
            title.value
        }
        None => {
            return Err(LexError::InvalidLabel {
                line: state.line_count,
            })
        }
    };

    let attributes = decode_attributes(rest, state.line_count, column)?;

    Ok(Some(Token::new(
        kinds::ITEM_ORDERED,
        raw,
        TokenValue::Item {
            label,
            indent,
            attributes,
        },
    )))
}

fn markdown_block(src: &str, _state: &LexerState) -> Result<Option<Token>, LexError> {
    let caps = match FENCED_RE.captures(src).or_else(|| FENCED_OPEN_RE.captures(src)) {
        Some(caps) => caps,
        None => return Ok(None),
    };
    let raw = caps.get(0).map_or("", |m| m.as_str());
    let body = caps.name("body").map_or("", |m| m.as_str());
    Ok(Some(Token::new(
        kinds::MARKDOWN_BLOCK,
        raw,
        TokenValue::Text(decode_note_body(body)),
    )))
}

fn item_attribute_line(src: &str, state: &LexerState) -> Result<Option<Token>, LexError> {
    let raw = match ATTRIBUTE_LINE_RE.find(src) {
        Some(m) => m.as_str(),
        None => return Ok(None),
    };

    let trimmed = raw.trim();
    let text = trimmed.strip_prefix('|').unwrap_or(trimmed).trim();
    let column = raw.len() - raw.trim_start().len();

    let attributes = decode_attributes(text, state.line_count, column)?;

    Ok(Some(Token::new(
        kinds::ITEM_ATTRIBUTE,
        raw,
        TokenValue::Attributes(attributes),
    )))
}

fn plain_line(src: &str, _state: &LexerState) -> Result<Option<Token>, LexError> {
    let raw = match PLAIN_LINE_RE.find(src) {
        Some(m) => m.as_str(),
        None => return Ok(None),
    };
    Ok(Some(Token::new(kinds::PLAIN_LINE, raw, TokenValue::None)))
}

/// Decode a full attribute list by repeatedly applying the inline
/// attribute tokenizer until the text is exhausted. A non-empty remainder
/// that is not `key=value`-shaped is fatal.
fn decode_attributes(
    text: &str,
    line: usize,
    start_column: usize,
) -> Result<BTreeMap<String, String>, LexError> {
    let mut attributes = BTreeMap::new();
    let mut rest = text;
    let mut column = start_column;

    while !rest.is_empty() {
        let attribute = match inline::item_attribute(rest) {
            Some(attribute) => attribute,
            None => return Err(LexError::InvalidAttribute { line, column }),
        };
        attributes.insert(attribute.value.key, attribute.value.value);
        rest = &rest[attribute.len..];
        column += attribute.len;
    }

    Ok(attributes)
}

/// Decode a fenced note body: the first line establishes an indentation
/// baseline that is stripped from every line at or beyond it, and a line
/// indented less lowers the baseline instead of failing. Blank lines are
/// carried as a single space so they stay inside the note.
fn decode_note_body(body: &str) -> String {
    let mut notes = String::new();
    let mut baseline: Option<usize> = None;

    for line in crate::lexer::split_lines(body) {
        let line = if line.is_empty() { " " } else { line };
        let indent = indent_width(line);
        let base = *baseline.get_or_insert(indent);
        if indent >= base {
            notes.push_str(&line[base..]);
        } else {
            baseline = Some(indent);
            notes.push_str(line);
        }
        notes.push('\n');
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_state() -> LexerState {
        LexerState {
            partition: Partition::Body,
            line_count: 3,
        }
    }

    #[test]
    fn test_title_consumes_first_line() {
        let token = title("My List\nrest", &LexerState::new()).unwrap().unwrap();
        assert_eq!(token.raw, "My List\n");
        assert_eq!(token.value, TokenValue::Text("My List".to_string()));
    }

    #[test]
    fn test_title_without_terminator() {
        let token = title("My List", &LexerState::new()).unwrap().unwrap();
        assert_eq!(token.raw, "My List");
        assert_eq!(token.value, TokenValue::Text("My List".to_string()));
    }

    #[test]
    fn test_description_stops_before_item() {
        let state = LexerState {
            partition: Partition::Description,
            line_count: 1,
        };
        let token = description("Some prose.\n- item\n", &state).unwrap().unwrap();
        assert_eq!(token.raw, "Some prose.\n");
        assert_eq!(token.value, TokenValue::Text("Some prose.".to_string()));
    }

    #[test]
    fn test_description_matches_empty_span() {
        let state = LexerState {
            partition: Partition::Description,
            line_count: 1,
        };
        let token = description("- item\n", &state).unwrap().unwrap();
        assert_eq!(token.raw, "");
        assert_eq!(token.value, TokenValue::Text(String::new()));
    }

    #[test]
    fn test_description_swallows_remainder_without_items() {
        let state = LexerState {
            partition: Partition::Description,
            line_count: 1,
        };
        let token = description("just prose\nno items\n", &state).unwrap().unwrap();
        assert_eq!(token.raw, "just prose\nno items\n");
        assert_eq!(token.value, TokenValue::Text("just prose\nno items".to_string()));
    }

    #[test]
    fn test_description_yields_to_fence() {
        let state = LexerState {
            partition: Partition::Description,
            line_count: 1,
        };
        let token = description("...\nstray\n...\n", &state).unwrap().unwrap();
        assert_eq!(token.raw, "");
    }

    #[test]
    fn test_description_truncated_by_bullet_line() {
        // Known edge: a bullet inside prose ends the description early.
        let state = LexerState {
            partition: Partition::Description,
            line_count: 1,
        };
        let token = description("prose\n- looks like a bullet\nmore prose\n", &state)
            .unwrap()
            .unwrap();
        assert_eq!(token.raw, "prose\n");
    }

    #[test]
    fn test_item_plain_label() {
        let token = item_ordered("- Buy milk\n", &body_state()).unwrap().unwrap();
        match token.value {
            TokenValue::Item {
                label,
                indent,
                attributes,
            } => {
                assert_eq!(label, "Buy milk");
                assert_eq!(indent, 0);
                assert!(attributes.is_empty());
            }
            other => panic!("expected item value, got {:?}", other),
        }
    }

    #[test]
    fn test_item_with_attributes() {
        let token = item_ordered("  - Buy milk | done=false, note=\"2 pints\"\n", &body_state())
            .unwrap()
            .unwrap();
        match token.value {
            TokenValue::Item {
                label,
                indent,
                attributes,
            } => {
                assert_eq!(label, "Buy milk");
                assert_eq!(indent, 2);
                assert_eq!(attributes.get("done").map(String::as_str), Some("false"));
                assert_eq!(attributes.get("note").map(String::as_str), Some("2 pints"));
            }
            other => panic!("expected item value, got {:?}", other),
        }
    }

    #[test]
    fn test_item_rejects_shapeless_attribute() {
        let err = item_ordered("- Buy milk | what even\n", &body_state()).unwrap_err();
        assert!(matches!(err, LexError::InvalidAttribute { line: 3, .. }));
    }

    #[test]
    fn test_item_requires_dash_space() {
        assert_eq!(item_ordered("-not an item\n", &body_state()).unwrap(), None);
    }

    #[test]
    fn test_markdown_block_strips_baseline() {
        let token = markdown_block("  ...\n  hello\n  world\n  ...\n", &body_state())
            .unwrap()
            .unwrap();
        assert_eq!(token.raw, "  ...\n  hello\n  world\n  ...\n");
        assert_eq!(token.value, TokenValue::Text("hello\nworld\n".to_string()));
    }

    #[test]
    fn test_markdown_block_closes_at_first_fence() {
        let src = "...\nfirst\n...\n- next item\n";
        let token = markdown_block(src, &body_state()).unwrap().unwrap();
        assert_eq!(token.raw, "...\nfirst\n...\n");
        assert_eq!(token.value, TokenValue::Text("first\n".to_string()));
    }

    #[test]
    fn test_markdown_block_unclosed_runs_to_end() {
        let token = markdown_block("...\nleft open\nstill notes\n", &body_state())
            .unwrap()
            .unwrap();
        assert_eq!(token.value, TokenValue::Text("left open\nstill notes\n".to_string()));
    }

    #[test]
    fn test_markdown_block_relative_indent_kept() {
        let token = markdown_block("...\n  code\n    nested\n...\n", &body_state())
            .unwrap()
            .unwrap();
        assert_eq!(token.value, TokenValue::Text("code\n  nested\n".to_string()));
    }

    #[test]
    fn test_markdown_block_lowers_baseline() {
        let token = markdown_block("...\n    deep\nshallow\n...\n", &body_state())
            .unwrap()
            .unwrap();
        assert_eq!(token.value, TokenValue::Text("deep\nshallow\n".to_string()));
    }

    #[test]
    fn test_attribute_line_merges_pairs() {
        let token = item_attribute_line("| due=friday, owner=sam\n", &body_state())
            .unwrap()
            .unwrap();
        match token.value {
            TokenValue::Attributes(map) => {
                assert_eq!(map.get("due").map(String::as_str), Some("friday"));
                assert_eq!(map.get("owner").map(String::as_str), Some("sam"));
            }
            other => panic!("expected attributes value, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_line_reports_column() {
        let err = item_attribute_line("  | nonsense\n", &body_state()).unwrap_err();
        assert_eq!(err, LexError::InvalidAttribute { line: 3, column: 2 });
    }

    #[test]
    fn test_plain_line_matches_anything() {
        let token = plain_line("\n", &body_state()).unwrap().unwrap();
        assert_eq!(token.raw, "\n");
        let token = plain_line("random prose\n", &body_state()).unwrap().unwrap();
        assert_eq!(token.raw, "random prose\n");
    }

    #[test]
    fn test_rule_order_most_specific_first() {
        let kinds: Vec<&str> = default_rules().iter().map(|rule| rule.kind()).collect();
        insta::assert_debug_snapshot!(kinds, @r###"
[
    "title",
    "description",
    "item_ordered",
    "markdown_block",
    "item_attribute",
    "plain_line",
]
"###);
    }
}
