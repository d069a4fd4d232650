//! SDF element variants and constructors.

/// Inline content inside a paragraph.
///
/// Content directors emit these; the conversion engine never builds inline
/// content itself beyond flattened text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain text run.
    Text { text: String },
    /// Inline code span.
    Code { text: String },
    /// Link with display text.
    Link { text: String, href: String },
}

/// Layout hint for a media element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaLayout {
    Wide,
    Center,
}

impl MediaLayout {
    /// Backend layout keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Center => "center",
        }
    }
}

/// A block-level element of the structured document format.
///
/// The top-level document body is always a flat ordered sequence of these;
/// nesting only occurs inside [`SdfElement::ListItem`] content and
/// [`SdfElement::TableRow`] cells, each holding its own ordered sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SdfElement {
    Heading { level: u8, text: String },
    Paragraph { content: Vec<InlineNode> },
    Table { rows: Vec<SdfElement> },
    TableRow { cells: Vec<Vec<SdfElement>> },
    OrderedList { items: Vec<SdfElement> },
    BulletList { items: Vec<SdfElement> },
    ListItem { content: Vec<SdfElement> },
    TaskList { items: Vec<SdfElement> },
    TaskItem { text: String, checked: bool },
    CodeBlock { text: String },
    Blockquote { text: String },
    Rule,
    MediaSingle { attachment_id: String, layout: MediaLayout },
}

/// Pure, shape-only constructors. No I/O, no validation.
impl SdfElement {
    #[must_use]
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn paragraph(content: Vec<InlineNode>) -> Self {
        Self::Paragraph { content }
    }

    #[must_use]
    pub fn table(rows: Vec<SdfElement>) -> Self {
        Self::Table { rows }
    }

    #[must_use]
    pub fn table_row(cells: Vec<Vec<SdfElement>>) -> Self {
        Self::TableRow { cells }
    }

    #[must_use]
    pub fn ordered_list(items: Vec<SdfElement>) -> Self {
        Self::OrderedList { items }
    }

    #[must_use]
    pub fn bullet_list(items: Vec<SdfElement>) -> Self {
        Self::BulletList { items }
    }

    #[must_use]
    pub fn list_item(content: Vec<SdfElement>) -> Self {
        Self::ListItem { content }
    }

    #[must_use]
    pub fn task_list(items: Vec<SdfElement>) -> Self {
        Self::TaskList { items }
    }

    #[must_use]
    pub fn task_item(text: impl Into<String>, checked: bool) -> Self {
        Self::TaskItem {
            text: text.into(),
            checked,
        }
    }

    #[must_use]
    pub fn code_block(text: impl Into<String>) -> Self {
        Self::CodeBlock { text: text.into() }
    }

    #[must_use]
    pub fn blockquote(text: impl Into<String>) -> Self {
        Self::Blockquote { text: text.into() }
    }

    #[must_use]
    pub fn rule() -> Self {
        Self::Rule
    }

    #[must_use]
    pub fn media_single(attachment_id: impl Into<String>, layout: MediaLayout) -> Self {
        Self::MediaSingle {
            attachment_id: attachment_id.into(),
            layout,
        }
    }
}

impl InlineNode {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn code(text: impl Into<String>) -> Self {
        Self::Code { text: text.into() }
    }

    #[must_use]
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            href: href.into(),
        }
    }
}
