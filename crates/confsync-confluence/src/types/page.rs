//! Confluence page types.

use serde::Deserialize;

/// Confluence page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Space the page belongs to.
    #[serde(rename = "spaceId", default)]
    pub space_id: Option<String>,
    /// Page title.
    pub title: String,
    /// Version information.
    #[serde(default)]
    pub version: Option<Version>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize)]
pub struct Links {
    /// Site base URL.
    #[serde(default)]
    pub base: Option<String>,
    /// Web UI link, relative to the base.
    #[serde(default)]
    pub webui: Option<String>,
}
