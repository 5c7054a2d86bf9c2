//! # treeline
//!
//! A parser for the treeline outline format: a forgiving, line-oriented
//! markup for nested task lists. The first line is the document title, an
//! optional free-text description follows, and the body is a list of items
//! nested by indentation, with inline `key=value` attributes and
//! `...`-fenced notes:
//!
//! ```text
//! My List
//!
//! A short description.
//! - Buy milk | done=false
//! - Plan trip
//!   - Book flight
//!   - Book hotel
//! ```
//!
//! Parsing happens in two passes sharing one grammar: a rule-driven
//! [`lexer`] turns the raw text into typed tokens, and the tree builder in
//! [`formats::tree`] reconstructs nesting from item indentation with an
//! explicit ancestor stack. The result is a [`ParsedDocument`]: the title,
//! the task forest, document flags, and an extension slot for plugins.
//!
//! Most callers go through the [`TreelinePipeline`], which picks a format
//! from the registry and runs installed plugins (such as the progress
//! tracker in [`plugins::progress`]) around the parse.

pub mod formats;
pub mod grammar;
pub mod lexer;
pub mod pipeline;
pub mod plugins;

pub use formats::{
    Format, FormatRegistry, ParseError, ParsedDocument, Task, TreeFormat, DOCUMENT_VERSION,
};
pub use lexer::{LexError, Lexer, Rule, RuleSet, Token, TokenValue};
pub use pipeline::{PipelineError, TreelinePipeline, DEFAULT_FORMAT};
pub use plugins::{Plugin, PluginError, ProgressPlugin, ProgressStore};
