//! Integration tests for the lexer over sample documents
//!
//! These drive the default grammar through the generic lexer and check the
//! token streams the tree builder consumes, using the curated sample
//! documents under `docs/samples/`.

use std::fs;

use treeline::grammar::{default_rules, kinds};
use treeline::lexer::{Lexer, Token};

fn lex_document(source: &str) -> Vec<Token> {
    Lexer::new(default_rules())
        .lex(source)
        .expect("sample document should lex")
}

fn read_sample_document(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read sample document")
}

fn kind_sequence(tokens: &[Token]) -> Vec<&'static str> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_000_basic_tokenization() {
    let content = read_sample_document("docs/samples/000-basic.tl");
    let tokens = lex_document(&content);

    assert_eq!(
        kind_sequence(&tokens),
        vec![
            kinds::TITLE,
            kinds::DESCRIPTION,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ORDERED,
        ]
    );
}

#[test]
fn test_010_attributes_tokenization() {
    let content = read_sample_document("docs/samples/010-attributes.tl");
    let tokens = lex_document(&content);

    assert_eq!(
        kind_sequence(&tokens),
        vec![
            kinds::TITLE,
            kinds::DESCRIPTION,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ATTRIBUTE,
            kinds::ITEM_ATTRIBUTE,
        ]
    );
}

#[test]
fn test_020_notes_tokenization() {
    let content = read_sample_document("docs/samples/020-notes.tl");
    let tokens = lex_document(&content);

    assert_eq!(
        kind_sequence(&tokens),
        vec![
            kinds::TITLE,
            kinds::DESCRIPTION,
            kinds::ITEM_ORDERED,
            kinds::MARKDOWN_BLOCK,
            kinds::ITEM_ORDERED,
            kinds::MARKDOWN_BLOCK,
        ]
    );
}

#[test]
fn test_030_nesting_tokenization() {
    let content = read_sample_document("docs/samples/030-nesting.tl");
    let tokens = lex_document(&content);

    let item_count = tokens
        .iter()
        .filter(|t| t.kind == kinds::ITEM_ORDERED)
        .count();
    assert_eq!(item_count, 9);
}

#[test]
fn test_raw_text_reassembles_the_source() {
    // Tokens consume the input exactly; concatenating raw text must give
    // the original document back.
    for path in [
        "docs/samples/000-basic.tl",
        "docs/samples/010-attributes.tl",
        "docs/samples/020-notes.tl",
        "docs/samples/030-nesting.tl",
    ] {
        let content = read_sample_document(path);
        let tokens = lex_document(&content);
        let reassembled: String = tokens.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(reassembled, content, "raw round trip failed for {}", path);
    }
}

#[test]
fn test_description_spans_blank_lines() {
    let tokens = lex_document("Title\n\nLine one.\nLine two.\n- item\n");
    assert_eq!(tokens[1].kind, kinds::DESCRIPTION);
    assert_eq!(tokens[1].raw, "\nLine one.\nLine two.\n");
}

#[test]
fn test_windows_line_endings_lex() {
    let tokens = lex_document("Title\r\n\r\n- a\r\n  - b\r\n");
    assert_eq!(
        kind_sequence(&tokens),
        vec![
            kinds::TITLE,
            kinds::DESCRIPTION,
            kinds::ITEM_ORDERED,
            kinds::ITEM_ORDERED,
        ]
    );
}

#[test]
fn test_unparseable_attribute_is_a_lex_error() {
    let err = Lexer::new(default_rules())
        .lex("Title\n- task | !!\n")
        .unwrap_err();
    assert!(matches!(
        err,
        treeline::lexer::LexError::InvalidAttribute { line: 1, .. }
    ));
}
