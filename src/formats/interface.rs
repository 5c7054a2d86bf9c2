//! Format interface and registry
//!
//! A format turns raw text into a [`ParsedDocument`]. Formats register
//! under a string key; the default outline format is registered as
//! `"tree"`, and callers must not assume it is the only one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use super::document::ParsedDocument;
use super::tree::TreeFormat;
use crate::lexer::LexError;

/// Errors that can occur while parsing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No format registered under the requested name.
    FormatNotFound(String),
    /// The input document has no content at all.
    EmptyInput,
    /// The grammar could not tokenize the input.
    Syntax(LexError),
    /// A note fence or attribute line appeared with no current item.
    Structural { message: String, line: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::FormatNotFound(name) => write!(f, "format '{}' not found", name),
            ParseError::EmptyInput => write!(f, "cannot parse empty input"),
            ParseError::Syntax(err) => write!(f, "syntax error: {}", err),
            ParseError::Structural { message, line } => {
                write!(f, "{} at line {}", message, line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Syntax(err)
    }
}

/// A parser implementation selectable by name.
pub trait Format: Send + Sync {
    /// Registry key for this format.
    fn name(&self) -> &'static str;

    /// Parse a whole document. Any failure aborts the parse; there is no
    /// partial result.
    fn parse(&self, text: &str) -> Result<ParsedDocument, ParseError>;
}

/// Registry of format implementations.
///
/// The registry itself is cheap to clone; pipelines snapshot the global
/// registry at construction and may register further formats locally.
#[derive(Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, Arc<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format implementation under its own name.
    pub fn register(&mut self, format: Arc<dyn Format>) {
        self.formats.insert(format.name().to_string(), format);
    }

    /// Get a registered format by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Format>> {
        self.formats.get(name).cloned()
    }

    /// Check if a format is registered.
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Names of all registered formats, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Parse using a registered format.
    pub fn parse(&self, name: &str, text: &str) -> Result<ParsedDocument, ParseError> {
        let format = self
            .get(name)
            .ok_or_else(|| ParseError::FormatNotFound(name.to_string()))?;
        format.parse(text)
    }

    /// The process-global format registry.
    pub fn global() -> &'static Mutex<FormatRegistry> {
        static REGISTRY: OnceLock<Mutex<FormatRegistry>> = OnceLock::new();
        REGISTRY.get_or_init(|| Mutex::new(FormatRegistry::new()))
    }

    /// Populate the global registry with the default formats.
    pub fn init_defaults() {
        let mut registry = Self::global().lock().unwrap();
        if registry.available().is_empty() {
            registry.register(Arc::new(TreeFormat));
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
