//! Page operations for the Confluence API.

use serde_json::{Value, json};
use tracing::info;

use super::{ConfluenceClient, read_response};
use crate::api::CreatedPage;
use crate::error::ConfluenceError;
use crate::types::Page;

/// Serialized empty document body, used for freshly created pages.
const EMPTY_DOC: &str = r#"{"type":"doc","version":1,"content":[]}"#;

impl ConfluenceClient {
    /// Create a new page with an empty body.
    pub fn create_page(
        &self,
        space_id: &str,
        title: &str,
    ) -> Result<CreatedPage, ConfluenceError> {
        let url = format!("{}/pages", self.v2_url());

        let payload = json!({
            "spaceId": space_id,
            "status": "current",
            "title": title,
            "body": {
                "representation": "atlas_doc_format",
                "value": EMPTY_DOC,
            }
        });

        info!("Creating page '{}' in space {}", title, space_id);

        let response = self
            .agent()
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&serde_json::to_vec(&payload)?[..])?;

        let page: Page = read_response(response)?;
        let links = page
            .links
            .ok_or_else(|| ConfluenceError::Shape("create response has no _links".into()))?;
        let base_link = links
            .base
            .ok_or_else(|| ConfluenceError::Shape("create response has no base link".into()))?;
        let webui_link = links
            .webui
            .ok_or_else(|| ConfluenceError::Shape("create response has no webui link".into()))?;

        info!("Created page {}", page.id);

        Ok(CreatedPage {
            id: page.id,
            space_id: page.space_id.unwrap_or_else(|| space_id.to_owned()),
            base_link,
            webui_link,
        })
    }

    /// Get a page by ID.
    pub(crate) fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        let url = format!("{}/pages/{}", self.v2_url(), page_id);

        let response = self
            .agent()
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        read_response(response)
    }

    /// Replace a page's title and body (auto-increments the version).
    pub fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &Value,
    ) -> Result<(), ConfluenceError> {
        let current = self.get_page(page_id)?;
        let version = current.version.map_or(1, |v| v.number);

        let url = format!("{}/pages/{}", self.v2_url(), page_id);
        let payload = json!({
            "id": page_id,
            "status": "current",
            "title": title,
            "body": {
                "representation": "atlas_doc_format",
                "value": serde_json::to_string(body)?,
            },
            "version": {"number": version + 1}
        });

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let response = self
            .agent()
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&serde_json::to_vec(&payload)?[..])?;

        let _: Page = read_response(response)?;
        Ok(())
    }
}
