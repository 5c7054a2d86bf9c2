//! The tree format: the default outline parser
//!
//! Lexes the input with the default grammar and assembles the task forest
//! from the token stream. Nesting is reconstructed from item indentation
//! with an explicit ancestor stack over a flat node arena: the stack holds
//! arena indices, children are recorded as indices while parsing, and the
//! nested [`Task`] tree is materialized once at the end. This keeps parent
//! and child ownership untangled while the tree is still in flux.

use std::collections::{BTreeMap, BTreeSet};

use super::document::{ParsedDocument, Task};
use super::interface::{Format, ParseError};
use crate::grammar::{default_rules, kinds};
use crate::lexer::{count_line_terminators, Lexer, Token, TokenValue};

/// The default outline format, registered as `"tree"`.
pub struct TreeFormat;

impl Format for TreeFormat {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn parse(&self, text: &str) -> Result<ParsedDocument, ParseError> {
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let tokens = Lexer::new(default_rules()).lex(text)?;
        DocumentBuilder::new().build(tokens)
    }
}

/// A task plus the construction-time bookkeeping that is stripped from the
/// final tree.
#[derive(Debug, Default)]
struct TaskNode {
    name: String,
    notes: Option<String>,
    properties: BTreeMap<String, String>,
    children: Vec<usize>,
    indent: usize,
}

/// Assembles a [`ParsedDocument`] from the default grammar's token stream.
pub struct DocumentBuilder {
    arena: Vec<TaskNode>,
    stack: Vec<usize>,
    roots: Vec<usize>,
    line: usize,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder {
            arena: Vec::new(),
            stack: Vec::new(),
            roots: Vec::new(),
            line: 0,
        }
    }

    /// Consume a token stream and build the document.
    pub fn build(mut self, tokens: Vec<Token>) -> Result<ParsedDocument, ParseError> {
        let mut doc = ParsedDocument::new("");

        for token in tokens {
            let span = count_line_terminators(&token.raw);
            match token.kind {
                kinds::TITLE => {
                    if let TokenValue::Text(text) = token.value {
                        doc.name = text.trim().to_string();
                    }
                }
                kinds::ITEM_ORDERED => {
                    if let TokenValue::Item {
                        label,
                        indent,
                        attributes,
                    } = token.value
                    {
                        self.place_item(label, indent, attributes);
                    }
                }
                kinds::MARKDOWN_BLOCK => {
                    if let TokenValue::Text(text) = token.value {
                        self.attach_notes(text)?;
                    }
                }
                kinds::ITEM_ATTRIBUTE => {
                    if let TokenValue::Attributes(map) = token.value {
                        self.merge_attributes(map)?;
                    }
                }
                // Descriptions partition the grammar but carry no structure;
                // plain lines are ignored outright.
                _ => {}
            }
            self.line += span;
        }

        let roots = std::mem::take(&mut self.roots);
        doc.tasks = roots.into_iter().map(|idx| self.materialize(idx)).collect();
        Ok(doc)
    }

    /// Create a node for a new item and wire it into the forest.
    ///
    /// A deeper item becomes a child of the current top of stack. Otherwise
    /// the stack unwinds until the top is shallower than the new item (or
    /// is a root-level frame); the new item attaches there when a shallower
    /// frame remains, and becomes a root when it sits at depth zero itself.
    /// The new item is pushed as the current frame regardless.
    fn place_item(
        &mut self,
        name: String,
        indent: usize,
        properties: BTreeMap<String, String>,
    ) {
        let idx = self.arena.len();
        self.arena.push(TaskNode {
            name,
            notes: None,
            properties,
            children: Vec::new(),
            indent,
        });

        let mut attached = false;
        if let Some(&top) = self.stack.last() {
            if indent > self.arena[top].indent {
                self.arena[top].children.push(idx);
                attached = true;
            } else {
                self.unwind(indent);
                if let Some(&top) = self.stack.last() {
                    if self.arena[top].indent < indent {
                        self.arena[top].children.push(idx);
                        attached = true;
                    }
                }
            }
        }
        if !attached && indent == 0 {
            self.roots.push(idx);
        }
        self.stack.push(idx);
    }

    /// Pop frames at or beyond the given depth. Root-level frames are never
    /// popped here; they anchor the bottom of the stack until the end.
    fn unwind(&mut self, indent: usize) {
        while let Some(&top) = self.stack.last() {
            let top_indent = self.arena[top].indent;
            if top_indent < indent || top_indent == 0 {
                break;
            }
            self.stack.pop();
        }
    }

    fn attach_notes(&mut self, text: String) -> Result<(), ParseError> {
        let top = self.current_item("note block")?;
        match &mut self.arena[top].notes {
            Some(notes) => notes.push_str(&text),
            slot => *slot = Some(text),
        }
        Ok(())
    }

    fn merge_attributes(&mut self, map: BTreeMap<String, String>) -> Result<(), ParseError> {
        let top = self.current_item("attribute line")?;
        self.arena[top].properties.extend(map);
        Ok(())
    }

    fn current_item(&self, what: &str) -> Result<usize, ParseError> {
        self.stack.last().copied().ok_or_else(|| ParseError::Structural {
            message: format!("{} has no parent item", what),
            line: self.line,
        })
    }

    /// Turn an arena node (and, recursively, its children) into a task,
    /// dropping the construction-time indentation.
    fn materialize(&mut self, idx: usize) -> Task {
        let node = std::mem::take(&mut self.arena[idx]);
        Task {
            name: node.name,
            notes: node.notes,
            properties: node.properties,
            children: node
                .children
                .into_iter()
                .map(|child| self.materialize(child))
                .collect(),
            flags: BTreeSet::new(),
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
