//! Confsync CLI - Sync markdown documents to Confluence pages.
//!
//! Provides commands for:
//! - `link`: Resolve (creating if needed) the remote page for a document
//! - `publish`: Push a document's current content to its remote page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{LinkArgs, PublishArgs};
use output::Output;

/// Confsync - Markdown in, Confluence pages out.
#[derive(Parser)]
#[command(name = "confsync", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link a document to a Confluence page, creating the page if needed.
    Link(LinkArgs),
    /// Upload a document's current content to its linked page.
    Publish(PublishArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Link(args) => args.execute(&output),
        Commands::Publish(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
