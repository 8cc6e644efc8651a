//! CLI entry-point for edge generation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    corpus::Corpus,
    edges::{Combinator, EdgePolicy, SentenceDistance, WordFilter},
};

/// Args for the `edges` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Corpus file, rewritten in place.
    #[arg(long, default_value = "corpus.json")]
    pub corpus: PathBuf,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Edge policy selection shared by `edges` and `pipeline`.
#[derive(Debug, Clone, ClapArgs)]
pub struct PolicyArgs {
    /// Class id of the first entity.
    #[arg(long, default_value = "e_1")]
    pub entity1: String,
    /// Class id of the second entity.
    #[arg(long, default_value = "e_2")]
    pub entity2: String,
    /// Relation type assigned to generated edges.
    #[arg(long, default_value = "r_4")]
    pub relation: String,
    /// Pair entities exactly this many sentences apart.
    #[arg(long, conflicts_with = "any_distance")]
    pub distance: Option<usize>,
    /// Pair every entity in a part regardless of sentence.
    #[arg(long)]
    pub any_distance: bool,
    /// Comma separated trigger words for same-sentence pairing.
    #[arg(long, value_delimiter = ',')]
    pub words: Vec<String>,
    /// Ignore predicted annotations in the distance policy.
    #[arg(long)]
    pub gold_only: bool,
    /// Append to existing edges instead of replacing them. Only the distance
    /// policy appends, so this cannot be combined with `--words`.
    #[arg(long, conflicts_with = "words")]
    pub keep_edges: bool,
}

impl PolicyArgs {
    /// Distance and word options together build a combinator.
    pub fn policy(&self) -> Result<EdgePolicy> {
        let distance = (self.distance.is_some() || self.any_distance).then(|| {
            SentenceDistance::new(&self.entity1, &self.entity2, &self.relation, self.distance)
                .use_predicted(!self.gold_only)
                .clear_existing(!self.keep_edges)
        });
        let words = (!self.words.is_empty()).then(|| {
            WordFilter::new(&self.entity1, &self.entity2, &self.relation, self.words.iter().cloned())
        });
        match (distance, words) {
            (Some(d), Some(w)) => Ok(Combinator::new(vec![d.into(), w.into()])?.into()),
            (Some(d), None) => Ok(d.into()),
            (None, Some(w)) => Ok(w.into()),
            (None, None) => bail!("choose --distance, --any-distance or --words"),
        }
    }
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let policy = args.policy.policy()?;
    let path = settings.join_data(&args.corpus);
    let mut corpus =
        Corpus::load(&path).with_context(|| format!("load corpus from {}", path.display()))?;
    policy.generate(&mut corpus);
    info!(edges = corpus.edge_count(), "corpus edges after generation");
    corpus
        .save(&path)
        .with_context(|| format!("save corpus to {}", path.display()))?;
    Ok(())
}
