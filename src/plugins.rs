//! Plugin pipeline
//!
//! Plugins extend parsing without touching the core: the pipeline calls
//! `init` before the text is parsed, `pre` with the freshly built document,
//! `each` once per task in depth-first pre-order, and `post` with the final
//! document. A plugin writes anything it wants to remember into the
//! document's extension slot under its own scope name; the core never reads
//! that slot.
//!
//! Any hook error aborts the whole parse. Plugins are installed once and
//! reused across parses, so `init` must reset all per-parse state.

pub mod progress;

pub use progress::{ProgressPlugin, ProgressStore};

use std::fmt;

use crate::formats::{ParsedDocument, Task};

/// Errors raised by plugin hooks or their backing stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Two tasks in one document share a name.
    DuplicateName(String),
    /// The backing store could not be read or written.
    Store(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::DuplicateName(name) => {
                write!(f, "task names should be unique: {:?} appears twice", name)
            }
            PluginError::Store(message) => write!(f, "progress store error: {}", message),
        }
    }
}

impl std::error::Error for PluginError {}

/// A pipeline extension run around every parse.
///
/// All hooks default to no-ops so a plugin only implements the stages it
/// cares about.
pub trait Plugin {
    /// Scope key under which this plugin writes document extensions.
    fn name(&self) -> &'static str;

    /// Called before the text is parsed; must reset per-parse state.
    fn init(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called with the freshly parsed document, before traversal.
    fn pre(&mut self, _doc: &mut ParsedDocument) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called once per task, depth-first pre-order.
    fn each(&mut self, _task: &mut Task) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called after traversal with the final document.
    fn post(&mut self, _doc: &mut ParsedDocument) -> Result<(), PluginError> {
        Ok(())
    }
}
