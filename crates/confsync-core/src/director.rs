//! Inline content directors.
//!
//! Inline parsing of paragraph and table-cell content (links, emphasis,
//! inline code, cross-document link resolution) lives behind the
//! [`ContentDirector`] trait and outside this crate. The engine only decides
//! tree shape; directors decide what inline content a scope receives.

use std::path::Path;

use confsync_markup::MarkupNode;
use confsync_sdf::{DocBuilder, InlineNode, SdfElement};

use crate::error::SyncError;

/// Appends the inline content of one container node to a builder.
///
/// Two roles exist, paragraph-level and table-cell-level; both use this
/// trait. Directors may perform their own I/O (link resolution); errors
/// propagate and abort the whole document conversion.
pub trait ContentDirector: Sync {
    fn add_items(
        &self,
        node: &MarkupNode,
        builder: &mut DocBuilder,
        doc_path: &Path,
    ) -> Result<(), SyncError>;
}

/// Minimal director: one paragraph of flattened text per container.
///
/// Appends nothing for whitespace-only content. Serves as the default for
/// both director roles until a full inline parser is plugged in.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextDirector;

impl ContentDirector for PlainTextDirector {
    fn add_items(
        &self,
        node: &MarkupNode,
        builder: &mut DocBuilder,
        _doc_path: &Path,
    ) -> Result<(), SyncError> {
        let text = node.text_content();
        let text = text.trim();
        if !text.is_empty() {
            builder.add_item(SdfElement::paragraph(vec![InlineNode::text(text)]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsync_markup::NodeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn appends_flattened_paragraph() {
        let node = MarkupNode::with_children(
            NodeKind::Paragraph,
            vec![MarkupNode::text("hello "), MarkupNode::text("world")],
        );
        let mut builder = DocBuilder::new();
        PlainTextDirector
            .add_items(&node, &mut builder, Path::new("doc.md"))
            .unwrap();

        assert_eq!(
            builder.build(),
            vec![SdfElement::paragraph(vec![InlineNode::text("hello world")])]
        );
    }

    #[test]
    fn skips_empty_content() {
        let node = MarkupNode::with_children(
            NodeKind::Paragraph,
            vec![MarkupNode::text("  \n ")],
        );
        let mut builder = DocBuilder::new();
        PlainTextDirector
            .add_items(&node, &mut builder, Path::new("doc.md"))
            .unwrap();
        assert!(builder.is_empty());
    }
}
