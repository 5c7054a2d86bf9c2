//! Progress tracking plugin
//!
//! Remembers which tasks are done across runs. The store is a JSON file
//! mapping a document file name to its completed task names; the plugin
//! built from it flags completed tasks on the parsed document and keeps a
//! pointer to the next task worth doing.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use super::{Plugin, PluginError};
use crate::formats::{ParsedDocument, Task};

type Store = BTreeMap<String, BTreeMap<String, bool>>;

/// File-backed store of task completion, scoped per document file.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    file: String,
    store: Store,
}

impl ProgressStore {
    /// Open the store at `path`. A missing file is an empty store; the
    /// file is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PluginError> {
        let path = path.into();
        let store = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|err| {
                PluginError::Store(format!("failed to read {}: {}", path.display(), err))
            })?;
            serde_json::from_str(&text).map_err(|err| {
                PluginError::Store(format!("failed to parse {}: {}", path.display(), err))
            })?
        } else {
            Store::new()
        };

        Ok(ProgressStore {
            path,
            file: String::new(),
            store,
        })
    }

    /// Select the document file subsequent marks apply to.
    pub fn set_file(&mut self, name: impl Into<String>) {
        self.file = name.into();
    }

    /// Mark a task done.
    pub fn mark(&mut self, task: &str) -> Result<(), PluginError> {
        self.store
            .entry(self.file.clone())
            .or_default()
            .insert(task.to_string(), true);
        self.save()
    }

    /// Mark a task not done.
    pub fn unmark(&mut self, task: &str) -> Result<(), PluginError> {
        self.store
            .entry(self.file.clone())
            .or_default()
            .insert(task.to_string(), false);
        self.save()
    }

    /// Whether a task is marked done in the current file.
    pub fn is_marked(&self, task: &str) -> bool {
        self.store
            .get(&self.file)
            .and_then(|tasks| tasks.get(task))
            .copied()
            .unwrap_or(false)
    }

    /// Build a plugin over a snapshot of the current file's marks.
    pub fn plugin(&self) -> ProgressPlugin {
        ProgressPlugin::new(self.store.get(&self.file).cloned().unwrap_or_default())
    }

    fn save(&self) -> Result<(), PluginError> {
        let text = serde_json::to_string_pretty(&self.store).map_err(|err| {
            PluginError::Store(format!("failed to serialize store: {}", err))
        })?;
        fs::write(&self.path, text).map_err(|err| {
            PluginError::Store(format!("failed to write {}: {}", self.path.display(), err))
        })
    }
}

/// Flags completed tasks and tracks overall document progress.
///
/// Scope `"progress"`: after a parse the document carries the flag
/// `has_progress`, the flag `is_checked` when every task is done, and
/// `extensions["progress"]["latest"]` naming the first task that is not
/// done yet (absent for a fully checked document, where the last task seen
/// is recorded instead).
pub struct ProgressPlugin {
    checked: BTreeMap<String, bool>,
    all_checked: bool,
    latest: Option<String>,
    seen: BTreeSet<String>,
}

impl ProgressPlugin {
    pub fn new(checked: BTreeMap<String, bool>) -> Self {
        ProgressPlugin {
            checked,
            all_checked: true,
            latest: None,
            seen: BTreeSet::new(),
        }
    }
}

impl Plugin for ProgressPlugin {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn init(&mut self) -> Result<(), PluginError> {
        self.all_checked = true;
        self.latest = None;
        self.seen.clear();
        Ok(())
    }

    fn pre(&mut self, doc: &mut ParsedDocument) -> Result<(), PluginError> {
        doc.flags.push("has_progress".to_string());
        Ok(())
    }

    fn each(&mut self, task: &mut Task) -> Result<(), PluginError> {
        let is_checked = self.checked.get(&task.name).copied().unwrap_or(false);
        if is_checked {
            task.flags.insert("is_checked".to_string());
        }

        if !self.seen.insert(task.name.clone()) {
            return Err(PluginError::DuplicateName(task.name.clone()));
        }

        // `latest` trails the scan until the first unchecked task fixes it.
        if self.all_checked {
            self.latest = Some(task.name.clone());
            if !is_checked {
                self.all_checked = false;
            }
        }
        Ok(())
    }

    fn post(&mut self, doc: &mut ParsedDocument) -> Result<(), PluginError> {
        if self.all_checked {
            doc.flags.push("is_checked".to_string());
        }
        if let Some(latest) = &self.latest {
            doc.extensions
                .entry("progress".to_string())
                .or_default()
                .insert(
                    "latest".to_string(),
                    serde_json::Value::String(latest.clone()),
                );
        }
        Ok(())
    }
}
