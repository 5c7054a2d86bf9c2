//! Formats: parser implementations selectable by name
//!
//! A format is anything that turns raw text into a [`ParsedDocument`].
//! Formats register under a string key in a [`FormatRegistry`]; the default
//! outline format lives at `"tree"`. The document model and its traversal
//! are shared by all formats.

pub mod document;
pub mod interface;
pub mod tree;

pub use document::{Extensions, ParsedDocument, Task, TaskWalk, DOCUMENT_VERSION};
pub use interface::{Format, FormatRegistry, ParseError};
pub use tree::{DocumentBuilder, TreeFormat};
