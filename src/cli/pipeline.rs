//! CLI entry-point running tagging, tokenization and edge generation together.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{edges::PolicyArgs, tag, tokenize},
    config::Settings,
    tokenize::UnicodeSegmenter,
};

/// Args for the `pipeline` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comma separated PubMed identifiers.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<String>,
    /// Output corpus file; merged into when it already exists.
    #[arg(long, default_value = "corpus.json")]
    pub corpus: PathBuf,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let policy = args.policy.policy()?;
    let path = settings.join_data(&args.corpus);
    let mut corpus = tag::load_or_new(&path)?;

    tag::tag_into(&args.ids, &mut corpus, &settings).await?;
    tokenize::tokenize_corpus(&mut corpus, &UnicodeSegmenter);
    policy.generate(&mut corpus);

    info!(
        documents = corpus.len(),
        edges = corpus.edge_count(),
        "pipeline finished"
    );
    corpus
        .save(&path)
        .with_context(|| format!("save corpus to {}", path.display()))?;
    Ok(())
}
