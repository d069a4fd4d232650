//! Error types for the conversion core.

use confsync_confluence::ConfluenceError;
use confsync_diagrams::DiagramError;

use crate::properties::PropertiesError;

/// Error from document conversion or page linkage.
///
/// Diagram failures never surface through this type at the top level: the
/// attachment pipeline swallows them at its own boundary and the conversion
/// degrades to a code block. Everything else aborts the conversion.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote API call failed.
    #[error("Confluence API error: {0}")]
    Api(#[from] ConfluenceError),

    /// A content director rejected inline content.
    #[error("inline content error: {0}")]
    Inline(String),

    /// The document's properties block could not be read or written.
    #[error("document properties error: {0}")]
    Properties(#[from] PropertiesError),

    /// Diagram render failure (only observed inside the attachment pipeline).
    #[error("diagram error: {0}")]
    Diagram(#[from] DiagramError),

    /// Attachment upload succeeded but the response carried no file id.
    #[error("attachment response carried no file id")]
    MissingFileId,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
