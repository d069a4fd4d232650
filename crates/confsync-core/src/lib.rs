//! Conversion core for confsync.
//!
//! Converts a rendered markup tree into a structured document and keeps each
//! document linked to its remote Confluence page:
//!
//! - [`TraversalEngine`] dispatches over markup node kinds and drives the
//!   document builder, fanning out table cells and list items while
//!   preserving source order.
//! - [`DiagramPipeline`] turns diagram code blocks into uploaded SVG
//!   attachments, degrading to a plain code block on any failure.
//! - [`LinkageOrchestrator`] resolves or creates the per-document page
//!   linkage and pushes the converted body to the remote page.
//! - [`PropertiesFile`] reads and writes the linkage metadata block embedded
//!   at the top of the document source.

mod director;
mod engine;
mod error;
mod linkage;
mod pipeline;
mod properties;
mod vault;

pub use director::{ContentDirector, PlainTextDirector};
pub use engine::{ConvertContext, ConvertSettings, TraversalEngine};
pub use error::SyncError;
pub use linkage::LinkageOrchestrator;
pub use pipeline::DiagramPipeline;
pub use properties::{PageProperties, PropertiesError, PropertiesFile};
pub use vault::{Document, FsVault, Vault};
