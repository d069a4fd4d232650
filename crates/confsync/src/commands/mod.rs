//! CLI command implementations.

mod link;
mod publish;

pub use link::LinkArgs;
pub use publish::PublishArgs;

use std::time::Duration;

use confsync_config::Config;
use confsync_confluence::ConfluenceClient;
use confsync_core::{
    ConvertSettings, FsVault, LinkageOrchestrator, PlainTextDirector, TraversalEngine,
};
use confsync_diagrams::{DiagramError, DiagramRenderer, KrokiRenderer};

use crate::error::CliError;
use crate::output::Output;

/// Renderer used when no render server is configured.
///
/// Always fails, so diagram code blocks degrade to plain code blocks instead
/// of aborting the sync.
struct DisabledRenderer;

impl DiagramRenderer for DisabledRenderer {
    fn render(&self, _render_id: &str, _source: &str) -> Result<String, DiagramError> {
        Err(DiagramError::Http(
            "no diagrams.kroki_url configured".to_owned(),
        ))
    }
}

fn build_renderer(config: &Config, output: &Output) -> Box<dyn DiagramRenderer> {
    let diagrams = &config.diagrams_resolved;
    match &diagrams.kroki_url {
        Some(url) => {
            let mut renderer =
                KrokiRenderer::new(url).timeout(Duration::from_secs(diagrams.timeout_secs));
            if let Some(endpoint) = &diagrams.endpoint {
                renderer = renderer.endpoint(endpoint);
            }
            Box::new(renderer)
        }
        None => {
            output.warning("No diagrams.kroki_url configured; diagrams stay code blocks");
            Box::new(DisabledRenderer)
        }
    }
}

/// Wire the full sync stack from config and run `f` against the orchestrator.
///
/// The engine borrows the client and renderer, and the orchestrator borrows
/// the engine, so the whole stack lives in this scope.
pub(crate) fn with_orchestrator<T>(
    config: &Config,
    output: &Output,
    f: impl FnOnce(&LinkageOrchestrator<'_>) -> Result<T, CliError>,
) -> Result<T, CliError> {
    const DIRECTOR: PlainTextDirector = PlainTextDirector;

    let confluence = config.require_confluence()?;
    let client = ConfluenceClient::new(
        &confluence.base_url,
        &confluence.username,
        &confluence.api_token,
    );
    let renderer = build_renderer(config, output);
    let vault = FsVault::new(&config.docs_resolved.source_dir);

    let engine = TraversalEngine::new(
        &client,
        renderer.as_ref(),
        &DIRECTOR,
        &DIRECTOR,
        ConvertSettings::default(),
    );
    let orchestrator =
        LinkageOrchestrator::new(&client, &vault, &engine, confluence.space_id.as_str());

    f(&orchestrator)
}
