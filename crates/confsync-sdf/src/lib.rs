//! Structured document format (SDF) for confsync.
//!
//! The SDF tree is the closed set of block elements this system produces and
//! hands to the Confluence backend as a page body. [`DocBuilder`] accumulates
//! an ordered sequence of elements; nesting (table cells, list items) is
//! modeled by building a fresh builder per scope and embedding its result,
//! never by mutating a shared structure.

mod builder;
mod element;
mod json;

pub use builder::DocBuilder;
pub use element::{InlineNode, MediaLayout, SdfElement};
pub use json::to_document_body;
