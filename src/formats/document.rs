//! Parsed document model
//!
//! The output of every format: a version-stamped document holding the task
//! forest, top-level flags, and a scope-keyed extension slot that plugins
//! may populate. The core never reads the extension slot; it only
//! guarantees the empty mapping is there.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Version stamp embedded in every parsed document.
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Extension data contributed by plugins, keyed by plugin scope.
pub type Extensions = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// A single outline node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Free-text notes captured from a fenced block, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Inline `key=value` attributes; repeated keys are last-write-wins.
    pub properties: BTreeMap<String, String>,
    /// Child tasks in document order.
    pub children: Vec<Task>,
    /// Marker flags, typically plugin-contributed.
    pub flags: BTreeSet<String>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            ..Task::default()
        }
    }
}

/// The result of parsing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub version: String,
    /// Document title, taken from the first line.
    pub name: String,
    /// Top-level flags in the order they were raised.
    pub flags: Vec<String>,
    /// Root task forest in document order.
    pub tasks: Vec<Task>,
    /// Plugin-owned data; empty unless plugins wrote to it.
    pub extensions: Extensions,
}

impl ParsedDocument {
    /// An empty document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        ParsedDocument {
            version: DOCUMENT_VERSION.to_string(),
            name: name.into(),
            flags: Vec::new(),
            tasks: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    /// Depth-first pre-order traversal over the task forest.
    ///
    /// Parents are yielded before their children, siblings in document
    /// order. The walk borrows the document, mutates nothing, and can be
    /// restarted by calling `traverse` again.
    pub fn traverse(&self) -> TaskWalk<'_> {
        TaskWalk::new(&self.tasks)
    }

    /// Visit every task mutably, in the same pre-order as [`traverse`].
    ///
    /// This is the pass the plugin runner uses so per-task hooks can raise
    /// flags; it stops at the first error.
    pub fn for_each_task_mut<E>(
        &mut self,
        visit: &mut impl FnMut(&mut Task) -> Result<(), E>,
    ) -> Result<(), E> {
        visit_mut(&mut self.tasks, visit)
    }
}

fn visit_mut<E>(
    tasks: &mut [Task],
    visit: &mut impl FnMut(&mut Task) -> Result<(), E>,
) -> Result<(), E> {
    for task in tasks {
        visit(task)?;
        visit_mut(&mut task.children, visit)?;
    }
    Ok(())
}

/// Pre-order iterator over a task forest.
pub struct TaskWalk<'a> {
    stack: Vec<&'a Task>,
}

impl<'a> TaskWalk<'a> {
    fn new(tasks: &'a [Task]) -> Self {
        TaskWalk {
            stack: tasks.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for TaskWalk<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<Self::Item> {
        let task = self.stack.pop()?;
        self.stack.extend(task.children.iter().rev());
        Some(task)
    }
}
