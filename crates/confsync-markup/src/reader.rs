//! Markdown source to markup tree.
//!
//! Renders markdown into a [`MarkupNode`] tree via pulldown-cmark with
//! GitHub Flavored Markdown extensions (tables, task lists, strikethrough).

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::node::{MarkupNode, NodeKind};

/// Render markdown source into a markup tree.
///
/// The returned root is a [`NodeKind::Container`] whose children are the
/// document's top-level blocks in source order.
#[must_use]
pub fn parse(source: &str) -> MarkupNode {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options);

    let mut root = MarkupNode::new(NodeKind::Container);
    let mut stack: Vec<MarkupNode> = Vec::new();

    for event in parser {
        match event {
            Event::Start(tag) => stack.push(MarkupNode::new(node_kind(&tag))),
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    attach(&mut root, &mut stack, node);
                }
            }
            Event::Text(text) => attach(&mut root, &mut stack, MarkupNode::text(text.as_ref())),
            Event::Code(code) => attach(&mut root, &mut stack, MarkupNode::text(code.as_ref())),
            Event::SoftBreak | Event::HardBreak => {
                attach(&mut root, &mut stack, MarkupNode::text("\n"));
            }
            Event::Rule => attach(&mut root, &mut stack, MarkupNode::new(NodeKind::Rule)),
            Event::TaskListMarker(checked) => {
                // In a loose list the marker arrives inside the item's
                // paragraph, so the owning item may sit below the top of
                // the stack.
                for open in stack.iter_mut().rev() {
                    if let NodeKind::ListItem {
                        checked: item_checked,
                    } = &mut open.kind
                    {
                        *item_checked = Some(checked);
                        break;
                    }
                }
                attach(
                    &mut root,
                    &mut stack,
                    MarkupNode::new(NodeKind::Checkbox { checked }),
                );
            }
            // Raw HTML, footnotes and math are not part of the conversion surface.
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    // Unbalanced events should not happen with pulldown-cmark, but drain
    // anything left so no content is lost.
    while let Some(node) = stack.pop() {
        attach(&mut root, &mut stack, node);
    }

    root
}

/// Attach a finished node to the current open node, or to the root.
fn attach(root: &mut MarkupNode, stack: &mut [MarkupNode], node: MarkupNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.children.push(node),
    }
}

/// Map a pulldown-cmark start tag to a node kind.
fn node_kind(tag: &Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: heading_level_to_num(*level),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            language: fence_language(kind),
        },
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => NodeKind::ListItem { checked: None },
        Tag::Table(_) => NodeKind::Table,
        // The header row arrives as its own tag but is structurally a row.
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis
        | Tag::Strong
        | Tag::Strikethrough
        | Tag::Link { .. }
        | Tag::Image { .. }
        | Tag::FootnoteDefinition(_)
        | Tag::HtmlBlock
        | Tag::MetadataBlock(_)
        | Tag::DefinitionList
        | Tag::DefinitionListTitle
        | Tag::DefinitionListDefinition
        | Tag::Superscript
        | Tag::Subscript => NodeKind::Container,
    }
}

/// Convert pulldown-cmark heading level to a number.
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Extract the language tag from fence info (first whitespace-separated token).
fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .filter(|lang| !lang.is_empty())
            .map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}
