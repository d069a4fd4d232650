//! Confluence Cloud REST API client.
//!
//! Provides a sync HTTP client for the Confluence Cloud REST API with basic
//! (API token) authentication, plus the [`RemoteApi`] trait the conversion
//! core is written against so remote operations can be mocked in tests.

mod api;
mod client;
mod error;
mod multipart;
mod types;

pub use api::{CreatedPage, RemoteApi};
pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use multipart::MultipartForm;
pub use types::{AttachmentExtensions, AttachmentResult, AttachmentsResponse, Links, Page, Version};
