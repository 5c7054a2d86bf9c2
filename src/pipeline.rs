//! High-level parsing pipeline
//!
//! The [`TreelinePipeline`] ties the pieces together: it snapshots the
//! global format registry, holds installed plugins, and runs the full hook
//! sequence around every parse:
//!
//! ```text
//! init* -> format.parse -> pre* -> each (per task, pre-order)* -> post*
//! ```
//!
//! ```ignore
//! use treeline::TreelinePipeline;
//!
//! let mut pipeline = TreelinePipeline::new();
//! let doc = pipeline.parse("My List\n- first task\n")?;
//! assert_eq!(doc.name, "My List");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::formats::{Format, FormatRegistry, ParseError, ParsedDocument};
use crate::plugins::{Plugin, PluginError};

/// Format used when the caller does not pick one.
pub const DEFAULT_FORMAT: &str = "tree";

/// Errors that can occur during pipeline operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Parse(ParseError),
    Plugin(PluginError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Parse(err) => write!(f, "parse error: {}", err),
            PipelineError::Plugin(err) => write!(f, "plugin error: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ParseError> for PipelineError {
    fn from(err: ParseError) -> Self {
        PipelineError::Parse(err)
    }
}

impl From<PluginError> for PipelineError {
    fn from(err: PluginError) -> Self {
        PipelineError::Plugin(err)
    }
}

/// Parses documents through a selected format and runs installed plugins
/// over the result.
pub struct TreelinePipeline {
    formats: FormatRegistry,
    plugins: Vec<Box<dyn Plugin>>,
}

impl TreelinePipeline {
    /// Create a pipeline backed by a snapshot of the global format
    /// registry (initializing the defaults when needed).
    pub fn new() -> Self {
        FormatRegistry::init_defaults();
        let formats = FormatRegistry::global().lock().unwrap().clone();
        TreelinePipeline {
            formats,
            plugins: Vec::new(),
        }
    }

    /// Register an additional format on this pipeline only.
    pub fn register(&mut self, format: Arc<dyn Format>) {
        self.formats.register(format);
    }

    /// Install a plugin. Plugins run in installation order.
    pub fn install(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Names of the formats this pipeline can parse, sorted.
    pub fn available_formats(&self) -> Vec<String> {
        self.formats.available()
    }

    /// Parse with the default format.
    pub fn parse(&mut self, text: &str) -> Result<ParsedDocument, PipelineError> {
        self.parse_as(text, DEFAULT_FORMAT)
    }

    /// Parse with a named format, running all plugin hooks around the
    /// result.
    pub fn parse_as(
        &mut self,
        text: &str,
        format: &str,
    ) -> Result<ParsedDocument, PipelineError> {
        for plugin in &mut self.plugins {
            plugin.init()?;
        }

        let mut doc = self.formats.parse(format, text)?;

        for plugin in &mut self.plugins {
            plugin.pre(&mut doc)?;
        }
        for plugin in &mut self.plugins {
            doc.for_each_task_mut(&mut |task| plugin.each(task))?;
        }
        for plugin in &mut self.plugins {
            plugin.post(&mut doc)?;
        }

        Ok(doc)
    }
}

impl Default for TreelinePipeline {
    fn default() -> Self {
        Self::new()
    }
}
