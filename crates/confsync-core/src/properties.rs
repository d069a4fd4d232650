//! Page linkage properties embedded in the document source.
//!
//! The linkage between a local document and its remote page is persisted as
//! a fenced `yaml` code block at the very top of the source text. The block
//! holds a fixed set of named fields rather than a free-form map, since the
//! core only ever reads and writes these three.

use serde::{Deserialize, Serialize};

/// Language tag of the embedded metadata block.
pub const PROPERTIES_LANGUAGE: &str = "yaml";

const FENCE_OPEN: &str = "```yaml\n";
const FENCE_CLOSE: &str = "\n```";

/// Persisted page linkage for one document.
///
/// Absence of `page_id` means the document is not yet linked to a remote
/// page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProperties {
    /// Remote page ID.
    #[serde(rename = "pageId", default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,

    /// Remote space ID.
    #[serde(rename = "spaceId", default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    /// Full web URL of the remote page.
    #[serde(
        rename = "confluenceUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub confluence_url: Option<String>,
}

impl PageProperties {
    /// Whether the document is linked to a remote page.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.page_id.is_some()
    }
}

/// Error reading or writing the properties block.
#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    /// The block is present but not valid YAML for the expected fields.
    #[error("invalid properties block: {0}")]
    Parse(String),

    /// Serialization failure (should not happen for this fixed shape).
    #[error("failed to serialize properties: {0}")]
    Serialize(String),
}

/// The properties block of one document source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertiesFile {
    /// Parsed properties (default when the source has no block).
    pub properties: PageProperties,
}

impl PropertiesFile {
    /// Parse the leading properties block of a document source.
    ///
    /// A source without a leading `yaml` fence yields default (unlinked)
    /// properties; a malformed block is an error.
    pub fn parse(source: &str) -> Result<Self, PropertiesError> {
        let Some((_, yaml)) = block_span(source) else {
            return Ok(Self::default());
        };

        let properties = if yaml.trim().is_empty() {
            PageProperties::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| PropertiesError::Parse(e.to_string()))?
        };

        Ok(Self { properties })
    }

    /// Overlay non-empty fields of `patch` onto these properties.
    pub fn merge(&mut self, patch: PageProperties) {
        if patch.page_id.is_some() {
            self.properties.page_id = patch.page_id;
        }
        if patch.space_id.is_some() {
            self.properties.space_id = patch.space_id;
        }
        if patch.confluence_url.is_some() {
            self.properties.confluence_url = patch.confluence_url;
        }
    }

    /// Write the properties back into a document source.
    ///
    /// Replaces the existing leading block, or inserts a new one at the top.
    /// The block position is fixed: linkage metadata always lives at the
    /// start of the source.
    pub fn apply(&self, source: &str) -> Result<String, PropertiesError> {
        let yaml = serde_yaml::to_string(&self.properties)
            .map_err(|e| PropertiesError::Serialize(e.to_string()))?;
        let block = format!("{FENCE_OPEN}{yaml}```\n");

        match block_span(source) {
            Some((end, _)) => Ok(format!("{block}{}", &source[end..])),
            None => Ok(format!("{block}\n{source}")),
        }
    }
}

/// Locate the leading properties block.
///
/// Returns the byte offset just past the block (including its trailing
/// newline) and the inner YAML text.
fn block_span(source: &str) -> Option<(usize, &str)> {
    let rest = source.strip_prefix(FENCE_OPEN)?;
    let close = rest.find(FENCE_CLOSE)?;
    let yaml = &rest[..close];

    let mut end = FENCE_OPEN.len() + close + FENCE_CLOSE.len();
    if source[end..].starts_with('\n') {
        end += 1;
    }
    Some((end, yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINKED: &str = "```yaml\npageId: \"123\"\nspaceId: \"45\"\nconfluenceUrl: \"https://example.atlassian.net/wiki/spaces/DOC/pages/123\"\n```\n\n# Title\n";

    #[test]
    fn parses_linked_document() {
        let file = PropertiesFile::parse(LINKED).unwrap();
        assert_eq!(file.properties.page_id.as_deref(), Some("123"));
        assert_eq!(file.properties.space_id.as_deref(), Some("45"));
        assert!(file.properties.is_linked());
    }

    #[test]
    fn missing_block_means_unlinked() {
        let file = PropertiesFile::parse("# Just a document\n").unwrap();
        assert_eq!(file.properties, PageProperties::default());
        assert!(!file.properties.is_linked());
    }

    #[test]
    fn block_not_at_top_is_ignored() {
        let source = "# Title\n\n```yaml\npageId: \"123\"\n```\n";
        let file = PropertiesFile::parse(source).unwrap();
        assert!(!file.properties.is_linked());
    }

    #[test]
    fn malformed_block_is_an_error() {
        let source = "```yaml\npageId: [unclosed\n```\n";
        assert!(PropertiesFile::parse(source).is_err());
    }

    #[test]
    fn apply_inserts_block_at_top() {
        let mut file = PropertiesFile::default();
        file.merge(PageProperties {
            page_id: Some("123".to_owned()),
            space_id: Some("45".to_owned()),
            confluence_url: Some("https://example/wiki/x".to_owned()),
        });

        let out = file.apply("# Title\n\nBody\n").unwrap();
        assert!(out.starts_with("```yaml\n"));
        assert!(out.contains("pageId: '123'") || out.contains("pageId: \"123\"") || out.contains("pageId: 123"));
        assert!(out.ends_with("# Title\n\nBody\n"));

        // Round-trip: the annotated source parses back to the same linkage.
        let reparsed = PropertiesFile::parse(&out).unwrap();
        assert_eq!(reparsed.properties.page_id.as_deref(), Some("123"));
        assert_eq!(
            reparsed.properties.confluence_url.as_deref(),
            Some("https://example/wiki/x")
        );
    }

    #[test]
    fn apply_replaces_existing_block() {
        let mut file = PropertiesFile::parse(LINKED).unwrap();
        file.merge(PageProperties {
            page_id: Some("999".to_owned()),
            ..PageProperties::default()
        });

        let out = file.apply(LINKED).unwrap();
        let reparsed = PropertiesFile::parse(&out).unwrap();
        assert_eq!(reparsed.properties.page_id.as_deref(), Some("999"));
        assert_eq!(reparsed.properties.space_id.as_deref(), Some("45"));
        assert_eq!(out.matches("```yaml").count(), 1);
        assert!(out.ends_with("# Title\n"));
    }

    #[test]
    fn merge_keeps_unpatched_fields() {
        let mut file = PropertiesFile::parse(LINKED).unwrap();
        file.merge(PageProperties::default());
        assert_eq!(file.properties.page_id.as_deref(), Some("123"));
    }
}
