//! Confluence API types.

mod attachment;
mod page;

pub use attachment::{AttachmentExtensions, AttachmentResult, AttachmentsResponse};
pub use page::{Links, Page, Version};
