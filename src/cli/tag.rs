//! CLI entry-point for tmVar tagging.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    corpus::Corpus,
    tagger::{AnnotationCache, TmVarClient, TmVarTagger},
};

/// Args for the `tag` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comma separated PubMed identifiers.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<String>,
    /// Corpus file to merge into; created when missing. Relative paths
    /// resolve under the data directory.
    #[arg(long, default_value = "corpus.json")]
    pub corpus: PathBuf,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let path = settings.join_data(&args.corpus);
    let mut corpus = load_or_new(&path)?;
    tag_into(&args.ids, &mut corpus, &settings).await?;
    corpus
        .save(&path)
        .with_context(|| format!("save corpus to {}", path.display()))?;
    Ok(())
}

/// Fetch and merge `ids` into `corpus` using the configured service and cache.
pub async fn tag_into(ids: &[String], corpus: &mut Corpus, settings: &Settings) -> Result<()> {
    let client = TmVarClient::new(settings).context("build tmVar client")?;
    let cache = AnnotationCache::load(&settings.cache_path);
    let mut tagger = TmVarTagger::new(client, cache);
    let report = tagger.tag(ids, corpus).await.context("tag identifiers with tmVar")?;
    for (id, outcome) in &report.outcomes {
        info!(%id, ?outcome, "tmVar outcome");
    }
    Ok(())
}

pub(crate) fn load_or_new(path: &std::path::Path) -> Result<Corpus> {
    if path.exists() {
        Corpus::load(path).with_context(|| format!("load corpus from {}", path.display()))
    } else {
        Ok(Corpus::new())
    }
}
