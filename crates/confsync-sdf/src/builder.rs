//! Ordered document builder.

use crate::element::SdfElement;

/// Accumulates an ordered sequence of SDF block elements.
///
/// One builder exists per traversal scope: the document root, each list item
/// and each table cell get a fresh instance, and the parent embeds the built
/// sequence. This keeps nesting free of shared mutable state.
#[derive(Debug, Default)]
pub struct DocBuilder {
    items: Vec<SdfElement>,
}

impl DocBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the sequence.
    pub fn add_item(&mut self, element: SdfElement) {
        self.items.push(element);
    }

    /// Number of elements accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the builder and return the accumulated sequence.
    #[must_use]
    pub fn build(self) -> Vec<SdfElement> {
        self.items
    }
}
