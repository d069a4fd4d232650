//! Remote backend operations the conversion core depends on.

use serde_json::Value;

use crate::error::ConfluenceError;
use crate::multipart::MultipartForm;
use crate::types::AttachmentsResponse;

/// Identity of a freshly created remote page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedPage {
    /// Page ID.
    pub id: String,
    /// Space the page was created in.
    pub space_id: String,
    /// Site base URL from the creation response.
    pub base_link: String,
    /// Web UI path, relative to the base.
    pub webui_link: String,
}

impl CreatedPage {
    /// Full web URL of the page (`base + webui`).
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.base_link, self.webui_link)
    }
}

/// Remote page and attachment operations.
///
/// [`super::ConfluenceClient`] is the production implementation; tests drive
/// the core with recording mocks. `Sync` because conversion fans out across
/// threads while holding a shared reference.
pub trait RemoteApi: Sync {
    /// Create a new page with an empty body.
    fn create_page(&self, space_id: &str, title: &str) -> Result<CreatedPage, ConfluenceError>;

    /// Replace a page's title and body.
    fn update_page(&self, page_id: &str, title: &str, body: &Value)
    -> Result<(), ConfluenceError>;

    /// Upload an attachment to a page.
    fn upload_attachment(
        &self,
        page_id: &str,
        form: MultipartForm,
    ) -> Result<AttachmentsResponse, ConfluenceError>;
}

impl RemoteApi for crate::ConfluenceClient {
    fn create_page(&self, space_id: &str, title: &str) -> Result<CreatedPage, ConfluenceError> {
        Self::create_page(self, space_id, title)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &Value,
    ) -> Result<(), ConfluenceError> {
        Self::update_page(self, page_id, title, body)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        form: MultipartForm,
    ) -> Result<AttachmentsResponse, ConfluenceError> {
        Self::upload_attachment(self, page_id, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_concatenates_base_and_webui() {
        let page = CreatedPage {
            id: "1".to_owned(),
            space_id: "s".to_owned(),
            base_link: "https://example.atlassian.net/wiki".to_owned(),
            webui_link: "/spaces/DOC/pages/1".to_owned(),
        };
        assert_eq!(page.url(), "https://example.atlassian.net/wiki/spaces/DOC/pages/1");
    }
}
