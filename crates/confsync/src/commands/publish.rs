//! `confsync publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use confsync_config::{CliSettings, Config};

use crate::commands::with_orchestrator;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub struct PublishArgs {
    /// Markdown document to publish (relative to the docs source directory).
    file: PathBuf,

    /// Path to configuration file (default: auto-discover confsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the Confluence space ID.
    #[arg(long)]
    space_id: Option<String>,

    /// Override the docs source directory.
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Override the Kroki server URL for diagram rendering.
    #[arg(long)]
    kroki_url: Option<String>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be resolved or the upload fails.
    pub fn execute(self, output: &Output) -> Result<(), CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir,
            space_id: self.space_id,
            kroki_url: self.kroki_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        output.step(&format!("Publishing {}...", self.file.display()));
        let url = with_orchestrator(&config, output, |orchestrator| {
            Ok(orchestrator.publish(&self.file)?)
        })?;

        match url {
            Some(url) => {
                output.success(&format!("Published {}", self.file.display()));
                output.page_url(&url);
                Ok(())
            }
            None => Err(CliError::Validation(format!(
                "no document found at {}",
                self.file.display()
            ))),
        }
    }
}
