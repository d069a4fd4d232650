//! Kroki-backed diagram renderer.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::{DiagramError, DiagramRenderer};

/// Default HTTP timeout for render requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default diagram language endpoint.
const DEFAULT_ENDPOINT: &str = "mermaid";

/// Create an HTTP agent with the specified timeout.
#[must_use]
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Renders diagrams via a Kroki server.
///
/// Configured once at startup; the endpoint selects the diagram language
/// (default: mermaid).
pub struct KrokiRenderer {
    agent: Agent,
    server_url: String,
    endpoint: String,
}

impl KrokiRenderer {
    /// Create a renderer for the given Kroki server URL.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            agent: create_agent(DEFAULT_TIMEOUT),
            server_url: server_url.into().trim_end_matches('/').to_owned(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Set the diagram language endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the HTTP timeout for render requests.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }
}

impl DiagramRenderer for KrokiRenderer {
    fn render(&self, render_id: &str, source: &str) -> Result<String, DiagramError> {
        let url = format!("{}/{}/svg", self.server_url, self.endpoint);

        debug!("Rendering diagram {} via {}", render_id, url);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| DiagramError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramError::Http(format!("HTTP {status}: {error_body}")));
        }

        let svg = body
            .read_to_string()
            .map_err(|e| DiagramError::Io(e.to_string()))?;

        if !svg.contains("<svg") {
            return Err(DiagramError::InvalidSvg(format!(
                "response for {render_id} has no <svg> root"
            )));
        }

        Ok(svg)
    }
}
