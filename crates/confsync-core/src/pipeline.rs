//! Diagram-to-attachment pipeline.

use confsync_confluence::{MultipartForm, RemoteApi};
use confsync_diagrams::{DiagramRenderer, attachment_filename, to_standalone_svg};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SyncError;

/// Converts diagram source text into an uploaded image attachment.
///
/// Requires a resolved remote page id; callers must not invoke this for
/// documents that are not yet linked.
pub struct DiagramPipeline<'a> {
    api: &'a dyn RemoteApi,
    renderer: &'a dyn DiagramRenderer,
}

impl<'a> DiagramPipeline<'a> {
    /// Create a pipeline over the given backend and renderer.
    #[must_use]
    pub fn new(api: &'a dyn RemoteApi, renderer: &'a dyn DiagramRenderer) -> Self {
        Self { api, renderer }
    }

    /// Render, post-process and upload one diagram.
    ///
    /// Returns the backend-assigned file identifier, or `None` on any
    /// failure at any step. Failures are logged and swallowed here; the
    /// caller degrades to a plain code block.
    pub fn diagram_to_attachment(&self, source: &str, page_id: &str) -> Option<String> {
        match self.upload(source, page_id) {
            Ok(file_id) => {
                debug!("Uploaded diagram as attachment file {}", file_id);
                Some(file_id)
            }
            Err(e) => {
                warn!("Diagram upload failed, falling back to code block: {e}");
                None
            }
        }
    }

    fn upload(&self, source: &str, page_id: &str) -> Result<String, SyncError> {
        // Unique per call so concurrent renders cannot collide on element ids.
        let render_id = format!("render-{}", Uuid::new_v4().simple());

        let svg = self.renderer.render(&render_id, source)?;
        let image = to_standalone_svg(&svg);

        let filename = attachment_filename(source);
        let form = MultipartForm::new().file("file", &filename, "image/svg+xml", image.as_bytes());

        let response = self.api.upload_attachment(page_id, form)?;
        response
            .first_file_id()
            .map(str::to_owned)
            .ok_or(SyncError::MissingFileId)
    }
}
