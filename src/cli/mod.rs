//! Command-line interface wiring for bioedge.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod edges;
pub mod pipeline;
pub mod tag;
pub mod tokenize;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Biomedical corpus tagging and relation candidates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Tag(args) => tag::run(args, settings).await,
            Commands::Tokenize(args) => tokenize::run(args, settings).await,
            Commands::Edges(args) => edges::run(args, settings).await,
            Commands::Pipeline(args) => pipeline::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch tmVar annotations and merge them into a corpus file.
    Tag(tag::Args),
    /// Split part text into sentences and tokenize them.
    Tokenize(tokenize::Args),
    /// Generate candidate edges between annotated entities.
    Edges(edges::Args),
    /// Tag, tokenize and generate edges in one run.
    Pipeline(pipeline::Args),
}
