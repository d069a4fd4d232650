//! Markup node tree types.

/// Kind of a markup node.
///
/// Closed enumeration: the conversion engine matches exhaustively over this,
/// so adding a block kind is a compile-time-checked change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Heading with level 1-6.
    Heading { level: u8 },
    /// Paragraph of inline content.
    Paragraph,
    /// Table containing rows.
    Table,
    /// Table row containing cells.
    TableRow,
    /// Table cell containing arbitrary block content.
    TableCell,
    /// Ordered or unordered list.
    List { ordered: bool },
    /// List item. `checked` is set when the item carries a task marker.
    ListItem { checked: Option<bool> },
    /// Task checkbox input.
    Checkbox { checked: bool },
    /// Block quote.
    BlockQuote,
    /// Horizontal rule.
    Rule,
    /// Fenced or indented code block with an optional language tag.
    CodeBlock { language: Option<String> },
    /// Leaf text content.
    Text,
    /// Generic container for inline formatting the engine does not inspect
    /// (emphasis, links, raw spans).
    Container,
}

/// A node in the rendered markup tree.
///
/// Read-only input to the conversion engine. Leaf text lives in `text` on
/// [`NodeKind::Text`] nodes; everything else carries its content in
/// `children`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupNode {
    pub kind: NodeKind,
    pub text: String,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Create a text leaf.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            text: content.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with the given children.
    #[must_use]
    pub fn with_children(kind: NodeKind, children: Vec<MarkupNode>) -> Self {
        Self {
            kind,
            text: String::new(),
            children,
        }
    }

    /// Flattened text content of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Count checkbox descendants anywhere under this node.
    #[must_use]
    pub fn checkbox_count(&self) -> usize {
        let own = usize::from(matches!(self.kind, NodeKind::Checkbox { .. }));
        own + self
            .children
            .iter()
            .map(MarkupNode::checkbox_count)
            .sum::<usize>()
    }

    /// Direct children that are list items.
    pub fn items(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children
            .iter()
            .filter(|c| matches!(c.kind, NodeKind::ListItem { .. }))
    }

    /// Direct children that are table rows.
    pub fn rows(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children
            .iter()
            .filter(|c| matches!(c.kind, NodeKind::TableRow))
    }

    /// Direct children that are table cells.
    pub fn cells(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children
            .iter()
            .filter(|c| matches!(c.kind, NodeKind::TableCell))
    }
}
