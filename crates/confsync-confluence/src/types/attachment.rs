//! Confluence attachment types.

use serde::Deserialize;

/// Attachments API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentsResponse {
    /// Uploaded attachments.
    #[serde(default)]
    pub results: Vec<AttachmentResult>,
    /// Total count.
    #[serde(default)]
    pub size: usize,
}

/// A single attachment in an upload response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentResult {
    /// Attachment content ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Attachment title/filename.
    #[serde(default)]
    pub title: Option<String>,
    /// Backend-specific extension fields.
    #[serde(default)]
    pub extensions: Option<AttachmentExtensions>,
}

/// Extension fields of an attachment result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentExtensions {
    /// Backend-assigned file identifier, referenced by media elements.
    #[serde(rename = "fileId", default)]
    pub file_id: Option<String>,
}

impl AttachmentsResponse {
    /// File identifier of the first attachment, if the response carries one.
    #[must_use]
    pub fn first_file_id(&self) -> Option<&str> {
        self.results
            .first()
            .and_then(|r| r.extensions.as_ref())
            .and_then(|e| e.file_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_first_file_id() {
        let json = r#"{
            "results": [
                {"id": "att1", "title": "diagram_abc.svg", "extensions": {"fileId": "file-1"}},
                {"id": "att2", "extensions": {"fileId": "file-2"}}
            ],
            "size": 2
        }"#;
        let response: AttachmentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_file_id(), Some("file-1"));
        assert_eq!(response.size, 2);
    }

    #[test]
    fn missing_extensions_yield_none() {
        let response: AttachmentsResponse =
            serde_json::from_str(r#"{"results": [{"id": "att1"}]}"#).unwrap();
        assert_eq!(response.first_file_id(), None);
    }

    #[test]
    fn empty_results_yield_none() {
        let response: AttachmentsResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(response.first_file_id(), None);
    }
}
