//! Attachment operations for the Confluence API.

use tracing::info;

use super::{ConfluenceClient, read_response};
use crate::error::ConfluenceError;
use crate::multipart::MultipartForm;
use crate::types::AttachmentsResponse;

impl ConfluenceClient {
    /// Upload an attachment to a page.
    pub fn upload_attachment(
        &self,
        page_id: &str,
        form: MultipartForm,
    ) -> Result<AttachmentsResponse, ConfluenceError> {
        let url = format!("{}/content/{}/child/attachment", self.rest_url(), page_id);

        info!("Uploading attachment to page {}", page_id);

        let content_type = form.content_type();
        let body = form.into_bytes();

        let response = self
            .agent()
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", &content_type)
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        read_response(response)
    }
}
