//! Rendered markup tree for confsync.
//!
//! This crate defines [`MarkupNode`], the block/inline node tree that the
//! conversion engine consumes, and [`parse`], which renders markdown source
//! into that tree.
//!
//! The tree is deliberately shallow in its inline modeling: emphasis, links
//! and other inline formatting are preserved as [`NodeKind::Container`] nodes
//! with text children, because inline parsing is the content directors'
//! responsibility, not this crate's.

mod node;
mod reader;

pub use node::{MarkupNode, NodeKind};
pub use reader::parse;
