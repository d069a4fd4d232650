//! Diagram rendering for confsync.
//!
//! A diagram source text is rendered to SVG markup by a [`DiagramRenderer`]
//! (the production implementation posts to a Kroki server), then
//! post-processed into a standalone export image with a fixed canvas and an
//! opaque background so the uploaded attachment is visually stable regardless
//! of the viewing surface.

mod kroki;
mod svg;

pub use kroki::{KrokiRenderer, create_agent};
pub use svg::{EXPORT_HEIGHT, EXPORT_WIDTH, attachment_filename, to_standalone_svg};

/// Diagram rendering error.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// HTTP error talking to the render service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error reading the response.
    #[error("I/O error: {0}")]
    Io(String),

    /// Response was not valid SVG text.
    #[error("invalid SVG in render response: {0}")]
    InvalidSvg(String),
}

/// Renders diagram source text to SVG markup.
///
/// `render_id` is unique per call so concurrent renders cannot collide on
/// element identifiers inside the produced markup.
pub trait DiagramRenderer: Sync {
    fn render(&self, render_id: &str, source: &str) -> Result<String, DiagramError>;
}
