//! The treeline outline grammar
//!
//! A treeline document is line-oriented: a title line, an optional free
//! text description, and then a body of items, note fences, and attribute
//! lines:
//!
//! ```text
//! My List
//!
//! A short description.
//! - Buy milk | done=false
//! - Plan trip
//!   - Book flight
//!   | airline = "Aero Lines"
//!   ...
//!   Remember the passports.
//!   ...
//! ```
//!
//! This module defines that grammar as a [`RuleSet`](crate::lexer::RuleSet)
//! for the generic lexer engine, plus the inline tokenizers the item and
//! attribute rules share for `key=value` lists.

pub mod default;
pub mod inline;

pub use default::{default_rules, kinds};
pub use inline::{item_attribute, item_title, Attribute, InlineMatch};
