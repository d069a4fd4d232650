//! JSON serialization of the SDF sequence to the backend's page body.

use serde_json::{Value, json};

use crate::element::{InlineNode, SdfElement};

/// Render an ordered SDF sequence as the backend's document body.
#[must_use]
pub fn to_document_body(elements: &[SdfElement]) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": elements.iter().map(element_to_json).collect::<Vec<_>>(),
    })
}

fn element_to_json(element: &SdfElement) -> Value {
    match element {
        SdfElement::Heading { level, text } => json!({
            "type": "heading",
            "attrs": {"level": level},
            "content": text_run(text),
        }),
        SdfElement::Paragraph { content } => json!({
            "type": "paragraph",
            "content": content.iter().map(inline_to_json).collect::<Vec<_>>(),
        }),
        SdfElement::Table { rows } => json!({
            "type": "table",
            "content": rows.iter().map(element_to_json).collect::<Vec<_>>(),
        }),
        SdfElement::TableRow { cells } => json!({
            "type": "tableRow",
            "content": cells
                .iter()
                .map(|cell| json!({
                    "type": "tableCell",
                    "attrs": {},
                    "content": cell.iter().map(element_to_json).collect::<Vec<_>>(),
                }))
                .collect::<Vec<_>>(),
        }),
        SdfElement::OrderedList { items } => json!({
            "type": "orderedList",
            "content": items.iter().map(element_to_json).collect::<Vec<_>>(),
        }),
        SdfElement::BulletList { items } => json!({
            "type": "bulletList",
            "content": items.iter().map(element_to_json).collect::<Vec<_>>(),
        }),
        SdfElement::ListItem { content } => json!({
            "type": "listItem",
            "content": content.iter().map(element_to_json).collect::<Vec<_>>(),
        }),
        SdfElement::TaskList { items } => json!({
            "type": "taskList",
            "content": items.iter().map(element_to_json).collect::<Vec<_>>(),
        }),
        SdfElement::TaskItem { text, checked } => json!({
            "type": "taskItem",
            "attrs": {"state": if *checked { "DONE" } else { "TODO" }},
            "content": text_run(text),
        }),
        SdfElement::CodeBlock { text } => json!({
            "type": "codeBlock",
            "content": text_run(text),
        }),
        SdfElement::Blockquote { text } => json!({
            "type": "blockquote",
            "content": [{
                "type": "paragraph",
                "content": text_run(text),
            }],
        }),
        SdfElement::Rule => json!({"type": "rule"}),
        SdfElement::MediaSingle {
            attachment_id,
            layout,
        } => json!({
            "type": "mediaSingle",
            "attrs": {"layout": layout.as_str()},
            "content": [{
                "type": "media",
                "attrs": {"type": "file", "id": attachment_id},
            }],
        }),
    }
}

/// A content array holding a single text node, or empty for empty text.
///
/// The backend rejects empty text nodes, so empty strings serialize to an
/// empty content array instead.
fn text_run(text: &str) -> Value {
    if text.is_empty() {
        json!([])
    } else {
        json!([{"type": "text", "text": text}])
    }
}

fn inline_to_json(inline: &InlineNode) -> Value {
    match inline {
        InlineNode::Text { text } => json!({"type": "text", "text": text}),
        InlineNode::Code { text } => json!({
            "type": "text",
            "text": text,
            "marks": [{"type": "code"}],
        }),
        InlineNode::Link { text, href } => json!({
            "type": "text",
            "text": text,
            "marks": [{"type": "link", "attrs": {"href": href}}],
        }),
    }
}
