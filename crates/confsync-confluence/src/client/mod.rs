//! HTTP client plumbing.

mod attachments;
mod pages;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use ureq::Agent;

use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence Cloud REST API client.
///
/// Authenticates with basic auth (account email + API token).
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create a client for the given site.
    ///
    /// `base_url` is the site root (e.g. `https://example.atlassian.net`).
    #[must_use]
    pub fn new(base_url: &str, user: &str, api_token: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let credentials = BASE64_STANDARD.encode(format!("{user}:{api_token}"));

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Get the site base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// v2 API root.
    fn v2_url(&self) -> String {
        format!("{}/wiki/api/v2", self.base_url)
    }

    /// v1 REST API root (attachments are not exposed through v2).
    fn rest_url(&self) -> String {
        format!("{}/wiki/rest/api", self.base_url)
    }

    pub(crate) fn agent(&self) -> &Agent {
        &self.agent
    }

    pub(crate) fn auth_header(&self) -> &str {
        &self.auth_header
    }
}

/// Read a response body, mapping HTTP >= 400 to an error with the body text.
pub(crate) fn read_response<T: serde::de::DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_string());
        return Err(ConfluenceError::Http {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}
